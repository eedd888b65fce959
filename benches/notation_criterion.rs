use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chessmate_client::game_state::chess_types::Color;
use chessmate_client::utils::move_notation::{move_record_to_notation, notation_to_move_record};

const WIRE_MOVES: &[&str] = &[
    "e2e4",
    "Ng1f3",
    "Bf1xb5+",
    "e5xd6ep",
    "e7e8=Q",
    "d2xc1=N#",
    "Ra1a8#",
    "Qd8xh4+",
    "O-O",
    "O-O-O",
];

fn bench_notation(c: &mut Criterion) {
    let mut group = c.benchmark_group("notation");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(3));
    group.throughput(Throughput::Elements(WIRE_MOVES.len() as u64));

    let records: Vec<_> = WIRE_MOVES
        .iter()
        .map(|text| notation_to_move_record(text, Color::White).expect("benchmark move should parse"))
        .collect();

    group.bench_function(BenchmarkId::from_parameter("decode"), |b| {
        b.iter(|| {
            for text in WIRE_MOVES {
                let record = notation_to_move_record(black_box(text), Color::White)
                    .expect("benchmark move should parse");
                black_box(record);
            }
        });
    });

    for (name, preserve) in [("encode_wire", false), ("encode_display", true)] {
        group.bench_function(BenchmarkId::from_parameter(name), |b| {
            b.iter(|| {
                for record in &records {
                    black_box(move_record_to_notation(black_box(record), preserve));
                }
            });
        });
    }

    group.finish();
}

criterion_group!(notation_benches, bench_notation);
criterion_main!(notation_benches);
