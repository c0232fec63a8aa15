use criterion::{black_box, criterion_group, criterion_main, Criterion};
use puyo_director::core::{Board, BoardEngine, NullSink, ReferenceDirector, SessionConfig};
use puyo_director::types::LogicalKey;

fn bench_idle_tick(c: &mut Criterion) {
    let mut director =
        ReferenceDirector::from_config(&SessionConfig::default(), LogicalKey::empty(), NullSink);
    director.enable_spawn(true);

    c.bench_function("director_tick_idle", |b| {
        b.iter(|| {
            director.tick();
            black_box(director.state());
        })
    });
}

fn bench_quick_drop_session(c: &mut Criterion) {
    c.bench_function("quick_drop_until_game_over", |b| {
        b.iter(|| {
            let config = SessionConfig {
                seed: black_box(7),
                ..SessionConfig::default()
            };
            let mut director =
                ReferenceDirector::from_config(&config, LogicalKey::empty(), NullSink);
            director.enable_spawn(true);
            let mut press = true;
            while !director.is_game_over() && director.ticks() < 100_000 {
                *director.input_mut() = if press {
                    LogicalKey::QUICK_DROP
                } else {
                    LogicalKey::empty()
                };
                press = !press;
                director.tick();
            }
            black_box(director.score())
        })
    });
}

fn bench_check_erase(c: &mut Criterion) {
    c.bench_function("check_erase_full_board", |b| {
        b.iter(|| {
            let mut board = Board::from_rows(&[
                "RGBYRG", "RGBYRG", "GBYRGB", "GBYRGB", "BYRGBY", "BYRGBY", "YRGBYR", "YRGBYR",
                "RGBYRG", "RGBYRG", "GBYRGB", "GBYRGB",
            ]);
            black_box(board.check_erase(black_box(0)))
        })
    });
}

criterion_group!(
    benches,
    bench_idle_tick,
    bench_quick_drop_session,
    bench_check_erase
);
criterion_main!(benches);
