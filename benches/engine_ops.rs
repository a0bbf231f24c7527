use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use game_2048::engine::{sweep, Board, Direction};
use game_2048::session::Session;
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus(side: usize) -> Vec<Board> {
    let mut session = Session::with_seed(side, 42);
    session.start_new_game();
    let mut boards = vec![Board::new(side), session.board().clone()];
    // Derive a variety of densities deterministically
    for i in 0..40 {
        if session.apply(Direction::ALL[i % 4]).moved {
            boards.push(session.board().clone());
        }
    }
    boards
}

fn bench_sweep(c: &mut Criterion) {
    for side in [4, 6] {
        let boards = corpus(side);
        for dir in Direction::ALL {
            c.bench_function(&format!("sweep/{side}x{side}/{dir:?}"), |bch| {
                bch.iter_batched(
                    || boards.clone(),
                    |mut bs| {
                        let mut acc = 0u64;
                        for b in &mut bs { acc ^= sweep(b, dir).score_delta; }
                        black_box(acc)
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
}

fn bench_spawn_and_queries(c: &mut Criterion) {
    c.bench_function("board/spawn_fill_4x4", |bch| {
        bch.iter_batched(
            || (Board::new(4), StdRng::seed_from_u64(7)),
            |(mut bd, mut rng)| {
                for _ in 0..16 { bd.spawn(&mut rng); }
                black_box(bd)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("query/is_over", |bch| {
        let boards = corpus(5);
        bch.iter(|| {
            let mut n = 0;
            for b in &boards { n += b.is_over() as u32; }
            black_box(n)
        })
    });
}

fn bench_session(c: &mut Criterion) {
    c.bench_function("session/apply_cycle", |bch| {
        bch.iter_batched(
            || {
                let mut s = Session::with_seed(4, 9);
                s.start_new_game();
                s
            },
            |mut s| {
                for i in 0..64 { s.apply(Direction::ALL[i % 4]); }
                black_box(s.score())
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(engine_ops, bench_sweep, bench_spawn_and_queries, bench_session);
criterion_main!(engine_ops);
