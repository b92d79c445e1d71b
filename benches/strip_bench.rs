use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use shader_strip::{
    ConfigurationSnapshot, DecalMode, PipelineFeatures, ShaderFamily, ShaderVariantKey,
    ShadowQuality, common_pipeline, names,
};

const KEYWORD_POOL: [&str; 15] = [
    names::TRANSPARENT,
    names::DEBUG_DISPLAY,
    names::TILE_LIGHTING,
    names::CLUSTER_LIGHTING,
    names::LOD_FADE_CROSSFADE,
    names::DECALS_OFF,
    names::DECALS_3RT,
    names::DECALS_4RT,
    names::LIGHT_LAYERS,
    names::PUNCTUAL_SHADOW_LOW,
    names::PUNCTUAL_SHADOW_MEDIUM,
    names::PUNCTUAL_SHADOW_HIGH,
    names::DIRECTIONAL_SHADOW_LOW,
    names::DIRECTIONAL_SHADOW_MEDIUM,
    names::DIRECTIONAL_SHADOW_HIGH,
];

const PASSES: [&str; 5] = [
    "Forward",
    "GBuffer",
    "ShadowCaster",
    names::MOTION_VECTORS_PASS,
    names::SCENE_SELECTION_PASS,
];

/// Deterministic variant list: keyword subsets picked from the bits of `i`.
fn make_variants(count: usize) -> Vec<ShaderVariantKey> {
    (0..count)
        .map(|i| {
            let hash = (i as u64).wrapping_mul(2_654_435_761);
            let keywords: Vec<&str> = KEYWORD_POOL
                .iter()
                .enumerate()
                .filter(|(bit, _)| (hash >> bit) & 0b11 == 0)
                .map(|(_, kw)| *kw)
                .collect();
            ShaderVariantKey::from_names("Lit", PASSES[i % PASSES.len()], &keywords)
        })
        .collect()
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");

    let pipeline = common_pipeline([ShaderFamily::new("Lit")]);
    let config = ConfigurationSnapshot {
        features: PipelineFeatures::MOTION_VECTORS | PipelineFeatures::LIGHT_LAYERS,
        decal_mode: DecalMode::FourRenderTargets,
        punctual_shadow_quality: ShadowQuality::Medium,
        directional_shadow_quality: ShadowQuality::High,
        stripping_enabled: true,
    };

    for count in [1_000usize, 10_000, 100_000] {
        let variants = make_variants(count);
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("sequential", count), &variants, |b, v| {
            b.iter(|| black_box(pipeline.evaluate(v.clone(), &config)));
        });

        group.bench_with_input(BenchmarkId::new("parallel", count), &variants, |b, v| {
            b.iter(|| black_box(pipeline.evaluate_parallel(v.clone(), &config)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
