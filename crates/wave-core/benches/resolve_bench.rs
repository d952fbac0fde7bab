use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wave_core::params::{ParameterSet, PartialParameterSet};
use wave_core::preset::{builtin_presets, PresetLibrary};
use wave_core::resolve::{resolve, RawOverrides};

fn bench_resolve_no_overrides(c: &mut Criterion) {
    let builtin = builtin_presets();
    let user = PresetLibrary::new();
    let defaults = ParameterSet::default();
    let overrides = RawOverrides::new();
    c.bench_function("resolve_no_overrides", |b| {
        b.iter(|| {
            black_box(resolve(
                black_box("vibrant"),
                &user,
                &builtin,
                &defaults,
                &overrides,
            ));
        });
    });
}

fn bench_resolve_full_overrides(c: &mut Criterion) {
    let builtin = builtin_presets();
    let mut user = PresetLibrary::new();
    user.insert(
        "vibrant",
        PartialParameterSet {
            amplitude: Some(0.3),
            col1: Some("#112233".into()),
            ..Default::default()
        },
    );
    let defaults = ParameterSet::default();
    let overrides: RawOverrides = [
        ("speed", "1.8"),
        ("linecount", "24"),
        ("amplitude", "0.25"),
        ("yoffset", "0.1"),
        ("linethickness", "0.004"),
        ("softnessbase", "0.01"),
        ("softnessrange", "0.3"),
        ("amplitudefalloff", "0.04"),
        ("bokehexponent", "2.5"),
        ("bgangle", "120"),
        ("col1", "#aabbcc"),
        ("col2", "#ddeeff"),
        ("bg1", "#000011"),
        ("bg2", "#110000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    c.bench_function("resolve_full_overrides", |b| {
        b.iter(|| {
            black_box(resolve(
                black_box("vibrant"),
                &user,
                &builtin,
                &defaults,
                &overrides,
            ));
        });
    });
}

criterion_group!(benches, bench_resolve_no_overrides, bench_resolve_full_overrides);
criterion_main!(benches);
