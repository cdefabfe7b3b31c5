use chaos_gacha::{
    Catalog, Category, ContentFilters, DEFAULT_EXPONENT, ItemSelector, RarityLadder, sample_rarity,
};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const BANDS: [(f64, f64, f64); 4] = [(0.1, 1.3, 3.3), (2.5, 4.3, 6.3), (1.0, 5.0, 9.0), (0.1, 5.0, 10.0)];

fn bench_ladder_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("ladder_build");
    for &(min, ave, max) in &BANDS {
        group.bench_function(format!("band={min}..{max}"), |b| {
            b.iter(|| {
                black_box(
                    RarityLadder::new(black_box(min), black_box(max), black_box(ave), DEFAULT_EXPONENT)
                        .unwrap(),
                )
            });
        });
    }
    group.finish();
}

fn bench_ladder_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("ladder_sample");
    const DRAWS_PER_ITER: usize = 1024;

    for &(min, ave, max) in &BANDS {
        let ladder = RarityLadder::new(min, max, ave, DEFAULT_EXPONENT).unwrap();
        group.throughput(Throughput::Elements(DRAWS_PER_ITER as u64));

        group.bench_function(format!("prebuilt_band={min}..{max}"), |b| {
            b.iter_batched_ref(
                || Pcg32::seed_from_u64(999),
                |rng| {
                    let mut s = 0.0;
                    for _ in 0..DRAWS_PER_ITER {
                        s += ladder.sample(rng);
                    }
                    black_box(s)
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("per_roll_band={min}..{max}"), |b| {
            b.iter_batched_ref(
                || Pcg32::seed_from_u64(1001),
                |rng| {
                    let mut s = 0.0;
                    for _ in 0..DRAWS_PER_ITER {
                        s += sample_rarity(min, max, ave, DEFAULT_EXPONENT, rng).unwrap();
                    }
                    black_box(s)
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let catalog = Catalog::bundled().unwrap();
    let selector = ItemSelector::default();
    let filters = ContentFilters {
        exclude_character_drops: true,
        exclude_tech_drops: false,
    };

    let mut group = c.benchmark_group("select");
    for category in [Category::Items, Category::Random] {
        group.bench_function(format!("category={category}"), |b| {
            b.iter_batched_ref(
                || Pcg32::seed_from_u64(777),
                |rng| {
                    let target = rng.random_range(0.1..=10.0);
                    black_box(
                        selector
                            .select_from_catalog(&catalog, category, target, filters, rng)
                            .unwrap(),
                    )
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(roll, bench_ladder_build, bench_ladder_sample, bench_select);
criterion_main!(roll);
