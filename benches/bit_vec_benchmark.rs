use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use rand::distributions::{Distribution, Uniform};
use slidebits::BitVec;

mod common;

fn bench_push(b: &mut Criterion) {
    let mut group = b.benchmark_group("push");
    group.plot_config(common::plot_config());

    for l in common::SIZES {
        group.bench_with_input(format!("{} elements", l), &l, |b, &l| {
            b.iter(|| {
                let mut bit_vec = BitVec::new();
                for i in 0..l {
                    bit_vec.push(i % 3 == 0);
                }
                black_box(bit_vec)
            })
        });
    }
    group.finish();
}

fn bench_insert_remove(b: &mut Criterion) {
    let mut rng = rand::thread_rng();

    let mut group = b.benchmark_group("insert_remove");
    group.plot_config(common::plot_config());

    for l in common::SIZES {
        let bit_vec = common::construct_random_vec(&mut rng, l);
        let sample = Uniform::new(0, l);

        group.bench_with_input(format!("front {} elements", l), &l, |b, _| {
            b.iter_batched_ref(
                || bit_vec.clone(),
                |v| {
                    v.insert(1, true).unwrap();
                    black_box(v.remove(0).unwrap())
                },
                BatchSize::LargeInput,
            )
        });

        group.bench_with_input(format!("random {} elements", l), &l, |b, _| {
            b.iter_batched_ref(
                || (bit_vec.clone(), sample.sample(&mut rng)),
                |(v, i)| {
                    v.insert(*i, true).unwrap();
                    black_box(v.remove(*i).unwrap())
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

fn bench_index_of(b: &mut Criterion) {
    let mut group = b.benchmark_group("index_of");
    group.plot_config(common::plot_config());

    for l in common::SIZES {
        let mut bit_vec = BitVec::from_zeros(l);
        bit_vec.set(l - 1, true).unwrap();

        group.bench_with_input(format!("{} elements", l), &l, |b, _| {
            b.iter(|| black_box(bit_vec.index_of(true)))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_push, bench_insert_remove, bench_index_of);
criterion_main!(benches);
