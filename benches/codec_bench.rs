use bson::doc;
use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use world_client::core::batch;
use world_client::core::frame::{FrameReassembler, HEADER_LEN};
use world_client::Packet;

#[allow(clippy::unwrap_used)]
fn bench_batch_encode_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_encode_decode");
    let batch_sizes = [1usize, 8, 32, 128];

    for &size in &batch_sizes {
        let packets: Vec<Packet> = (0..size)
            .map(|i| {
                Packet::from_document(doc! {
                    "ID": "mP",
                    "t": i as i64,
                    "x": i as f64,
                    "y": i as f64,
                    "a": 1i32,
                    "d": 7i32,
                })
                .unwrap()
            })
            .collect();
        let wire = batch::encode(&packets).unwrap();

        group.throughput(Throughput::Bytes(wire.len() as u64));
        group.bench_function(format!("encode_{size}pkts"), |b| {
            b.iter(|| batch::encode(&packets).unwrap())
        });
        group.bench_function(format!("decode_{size}pkts"), |b| {
            b.iter(|| batch::decode(&wire[HEADER_LEN..]).unwrap())
        });
    }
    group.finish();
}

#[allow(clippy::unwrap_used)]
fn bench_frame_reassembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_reassembly");
    let packets = vec![Packet::login(); 16];
    let wire = batch::encode(&packets).unwrap();

    group.throughput(Throughput::Bytes(wire.len() as u64));
    group.bench_function("whole_chunk", |b| {
        b.iter_batched(
            FrameReassembler::new,
            |mut r| r.feed(&wire).unwrap(),
            BatchSize::SmallInput,
        )
    });
    group.bench_function("split_chunks", |b| {
        b.iter_batched(
            FrameReassembler::new,
            |mut r| {
                let mid = wire.len() / 2;
                r.feed(&wire[..mid]).unwrap();
                r.feed(&wire[mid..]).unwrap()
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_batch_encode_decode, bench_frame_reassembly);
criterion_main!(benches);
