use criterion::{black_box, criterion_group, criterion_main, Criterion};
use eaglescript::prelude::*;
use std::f64::consts::FRAC_PI_4;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn bus(board: &mut Board, lanes: usize) -> Vec<SignalId> {
    (0..lanes)
        .map(|lane| {
            let mut signal = board.new_signal(0.2, 1, 2).unwrap();
            signal.add(0.0, lane as f64).add(10.0, lane as f64);
            let id = signal.id();
            board.add(signal).unwrap();
            id
        })
        .collect()
}

fn bench_elbow(c: &mut Criterion) {
    c.bench_function("elbow_32_lanes", |b| {
        b.iter(|| {
            let mut board = Board::default();
            let ids = bus(&mut board, 32);
            board
                .group(&ids)
                .unwrap()
                .elbow(black_box(0.0), black_box(FRAC_PI_4), 5.0, None, 0)
                .unwrap();
            board
        });
    });
}

fn bench_render_description(c: &mut Criterion) {
    let board = eaglescript::load_board(&fixture_path("bundle.json")).unwrap();
    c.bench_function("render_bundle", |b| {
        b.iter(|| black_box(&board).render());
    });
}

criterion_group!(benches, bench_elbow, bench_render_description);
criterion_main!(benches);
