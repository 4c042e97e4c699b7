use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use toss_harness::matching::{request_matches, resolve, InboundRequest, MatchPolicy};
use toss_harness::mock::InteractionRegistry;
use toss_harness::{Interaction, InteractionRequest, InteractionResponse, Method};

fn create_interaction(id: usize) -> Interaction {
    Interaction::new(
        9000,
        InteractionRequest::new(Method::Get, format!("/api/v1/endpoint{id}"))
            .query("page", "1")
            .header("Accept", "application/json"),
        InteractionResponse::new(200).body(json!({"id": id})),
    )
}

fn create_registry(count: usize) -> InteractionRegistry {
    let mut registry = InteractionRegistry::new();
    for i in 0..count {
        registry.insert(create_interaction(i));
    }
    registry
}

fn request_for(path: &str) -> InboundRequest {
    InboundRequest::new("GET", path)
        .with_query_string("page=1&size=20")
        .with_header("Accept", "application/json")
        .with_header("User-Agent", "bench")
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    // Every interaction is scanned regardless of where the match sits
    for count in [10, 50, 100, 500, 1000].iter() {
        let mut registry = create_registry(*count);
        let hit = request_for(&format!("/api/v1/endpoint{}", count / 2));
        let miss = request_for("/not/found");

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("last_match_wins", count), count, |b, _| {
            b.iter(|| resolve(&mut registry, black_box(&hit), MatchPolicy::LastMatchWins));
        });
        group.bench_with_input(BenchmarkId::new("first_match_wins", count), count, |b, _| {
            b.iter(|| resolve(&mut registry, black_box(&hit), MatchPolicy::FirstMatchWins));
        });
        group.bench_with_input(BenchmarkId::new("no_match", count), count, |b, _| {
            b.iter(|| resolve(&mut registry, black_box(&miss), MatchPolicy::LastMatchWins));
        });
    }

    group.finish();
}

fn bench_single_predicate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_predicate");

    let expected = InteractionRequest::new(Method::Post, "/users")
        .header("Content-Type", "application/json")
        .body(json!({"name": "x", "roles": ["admin", "dev"], "profile": {"age": 30}}));
    let request = InboundRequest::new("POST", "/users")
        .with_header("content-type", "application/json")
        .with_body(json!({"profile": {"age": 30}, "roles": ["admin", "dev"], "name": "x"}));

    group.throughput(Throughput::Elements(1));
    group.bench_function("body_match", |b| {
        b.iter(|| request_matches(black_box(&expected), black_box(&request)));
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_single_predicate);
criterion_main!(benches);
