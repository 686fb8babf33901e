use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mnet_rs::frame::{build_frame, parse_frame, Frame};
use mnet_rs::obfuscation::{decode, derive_key, encode};

fn bench_frame_round_trip(c: &mut Criterion) {
    let frame = Frame {
        destination: 0x02,
        source: 0x01,
        packet_type: 0x0C2A,
        payload: vec![0x9C, 0x43, 0x00, 0x00, 0xFF, 0x9C, 0xAC, 0x00, 0x00],
    };
    c.bench_function("build_frame", |b| b.iter(|| build_frame(black_box(&frame)).unwrap()));

    let bytes = build_frame(&frame).unwrap();
    c.bench_function("parse_frame", |b| b.iter(|| parse_frame(black_box(&bytes)).unwrap()));
}

fn bench_obfuscation(c: &mut Criterion) {
    let key = derive_key([0x01, 0x02, 0x03, 0x04]);
    let data = vec![0x42u8; 256];
    c.bench_function("obfuscation_encode", |b| b.iter(|| encode(black_box(&data), black_box(&key))));

    let cipher = encode(&data, &key);
    c.bench_function("obfuscation_decode", |b| b.iter(|| decode(black_box(&cipher), black_box(&key))));
}

criterion_group!(benches, bench_frame_round_trip, bench_obfuscation);
criterion_main!(benches);
