use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use minefield_core::*;
use std::hint::black_box;

fn opening_reveal(c: &mut Criterion) {
    let mut group = c.benchmark_group("opening_reveal");

    for &(width, height, mines) in &[(9, 9, 10), (30, 16, 99), (200, 200, 400)] {
        let config = GameConfig::new(width, height, mines).unwrap();
        let center = Coord::new(width / 2, height / 2);
        group.bench_function(format!("{width}x{height}/{mines}"), |b| {
            let mut seed = 0;
            b.iter_batched(
                || {
                    seed += 1;
                    Minesweeper::with_seed(config, seed).unwrap()
                },
                |mut game| black_box(game.reveal_cell(center).unwrap()),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn empty_board_flood(c: &mut Criterion) {
    // a single corner mine leaves one zero region spanning the whole board
    let config = GameConfig::new(500, 500, 1).unwrap();
    c.bench_function("empty_board_flood/500x500", |b| {
        b.iter_batched(
            || {
                Minesweeper::with_generator(config, FixedMineGenerator::from_pairs(&[(499, 499)]))
                    .unwrap()
            },
            |mut game| black_box(game.reveal_cell(Coord::new(0, 0)).unwrap()),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, opening_reveal, empty_board_flood);
criterion_main!(benches);
