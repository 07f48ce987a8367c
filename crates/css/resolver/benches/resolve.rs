use criterion::{Criterion, criterion_group, criterion_main};
use css_resolver::convert::color_to_rgb;
use css_resolver::{ColorEngine, ResolveCache, ResolveOptions};
use std::hint::black_box;
use std::sync::Arc;

const INPUTS: [&str; 6] = [
    "rebeccapurple",
    "#336699cc",
    "hsl(from rgb(200 40 90) calc(h + 30) s l)",
    "color-mix(in oklch longer hue, red 30%, color(display-p3 0.2 0.8 0.4))",
    "lab(52% 40 -30 / 0.5)",
    "color-mix(in lab, color-mix(in srgb, red, blue), white 25%)",
];

fn bench_resolve(criterion: &mut Criterion) {
    let options = ResolveOptions::new();

    // Capacity zero stores nothing, so every call parses and converts.
    let cold = ColorEngine::with_cache(Arc::new(ResolveCache::with_capacity(0)));
    criterion.bench_function("resolve_color_uncached", |bencher| {
        bencher.iter(|| {
            for input in INPUTS {
                black_box(cold.resolve_color(black_box(input), &options));
            }
        });
    });

    let warm = ColorEngine::with_cache(Arc::new(ResolveCache::new()));
    for input in INPUTS {
        black_box(warm.resolve_color(input, &options));
    }
    criterion.bench_function("resolve_color_cached", |bencher| {
        bencher.iter(|| {
            for input in INPUTS {
                black_box(warm.resolve_color(black_box(input), &options));
            }
        });
    });

    criterion.bench_function("color_to_rgb_global", |bencher| {
        bencher.iter(|| black_box(color_to_rgb(black_box("oklch(62% 0.2 30)"), &options)));
    });
}

criterion_group!(resolve_benches, bench_resolve);
criterion_main!(resolve_benches);
