use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sandbox_core::{
    generate_blueprint, mesh::build_merged_terrain, Blueprint, BlueprintKind, EditorState,
    SandboxConfig, SandboxScene,
};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");

    for kind in BlueprintKind::ALL {
        for dim in [20u32, 40, 60] {
            group.bench_with_input(BenchmarkId::new(kind.label(), dim), &dim, |b, &dim| {
                b.iter_batched(
                    || (Blueprint::new(dim), ChaCha8Rng::seed_from_u64(42)),
                    |(mut blueprint, mut rng)| generate_blueprint(kind, &mut blueprint, &mut rng),
                    BatchSize::SmallInput,
                )
            });
        }
    }

    group.finish();
}

fn bench_terrain_mesh(c: &mut Criterion) {
    let mut group = c.benchmark_group("terrain_mesh");

    for dim in [20u32, 40, 60] {
        let mut blueprint = Blueprint::new(dim);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        generate_blueprint(BlueprintKind::Puddles, &mut blueprint, &mut rng);
        group.bench_with_input(BenchmarkId::new("puddles", dim), &blueprint, |b, blueprint| {
            b.iter(|| build_merged_terrain(blueprint))
        });
    }

    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    c.bench_function("editor_resize_40_to_60", |b| {
        b.iter_batched(
            || {
                let editor = EditorState::new(&SandboxConfig::default()).expect("default config");
                (editor, SandboxScene::new(3), ChaCha8Rng::seed_from_u64(3))
            },
            |(mut editor, mut scene, mut rng)| {
                editor
                    .resize(60, &mut rng, &mut scene)
                    .expect("60 is a valid size")
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(generate_benches, bench_generate, bench_terrain_mesh, bench_resize);
criterion_main!(generate_benches);
