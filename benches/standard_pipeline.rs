use battlesnake_rules::rules::{Config, Ruleset, SnakeMoves, StandardRuleset};
use battlesnake_rules::string_pool::StringPool;
use battlesnake_rules::types::Move;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::SmallRng;
use rand::SeedableRng;

fn bench_next_board_state(c: &mut Criterion) {
    let pool = StringPool::new();
    let ids: Vec<_> = (0..4).map(|i| pool.add(&format!("snake_{}", i))).collect();

    let mut rules = StandardRuleset::with_rng(Config::default(), SmallRng::seed_from_u64(11));
    let board = rules.create_initial_board_state(11, 11, &ids).unwrap();

    let mut moves = SnakeMoves::default();
    for id in &ids {
        moves.insert(id.clone(), Move::Up);
    }

    c.bench_function("standard next board state", |b| {
        b.iter(|| {
            rules
                .create_next_board_state(black_box(&board), &moves, 1)
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_next_board_state);
criterion_main!(benches);
