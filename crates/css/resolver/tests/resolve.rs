#![allow(clippy::unwrap_used, reason = "tests unwrap resolved values")]

use css_resolver::convert::{color_to_hex, color_to_hsl, color_to_rgb, color_to_xyz};
use css_resolver::{
    CacheLookup, ColorEngine, ColorFormat, ColorResult, ColorSpace, CustomProperties, Dimensions,
    PropertyCallback, ResolveCache, ResolveOptions, cache_key, css_calc, css_var, is_color,
    is_gradient, resolve_color, resolve_mix_value,
};
use std::sync::Arc;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn isolated(capacity: usize) -> ColorEngine {
    ColorEngine::with_cache(Arc::new(ResolveCache::with_capacity(capacity)))
}

fn text(value: &str) -> ColorResult<String> {
    ColorResult::Value(value.to_owned())
}

#[test]
fn named_and_legacy_colors() {
    init();
    let options = ResolveOptions::new();
    assert_eq!(resolve_color("rebeccapurple", &options), text("rgb(102, 51, 153)"));
    assert_eq!(resolve_color("  RED ", &options), text("rgb(255, 0, 0)"));
    assert_eq!(resolve_color("hsl(120 100% 50% / 25%)", &options), text("rgba(0, 255, 0, 0.25)"));
    assert_eq!(resolve_color("transparent", &options), text("rgba(0, 0, 0, 0)"));
}

#[test]
fn invalid_input_per_format() {
    init();
    let nullable = ResolveOptions::new().with_nullable(true);
    assert_eq!(resolve_color("not-a-color", &nullable), ColorResult::Invalid);
    assert_eq!(
        resolve_color("not-a-color", &ResolveOptions::new()),
        text("rgba(0, 0, 0, 0)")
    );
    let specified = ResolveOptions::new().with_format(ColorFormat::SpecifiedValue);
    assert_eq!(resolve_color("not-a-color", &specified), text(""));
    let hex = ResolveOptions::new().with_format(ColorFormat::Hex);
    assert_eq!(resolve_color("not-a-color", &hex), ColorResult::Invalid);
    // A real transparent color is never the invalid marker.
    assert_eq!(resolve_color("transparent", &nullable), text("rgba(0, 0, 0, 0)"));
}

#[test]
fn output_formats() {
    init();
    let specified = ResolveOptions::new().with_format(ColorFormat::SpecifiedValue);
    assert_eq!(resolve_color("RebeccaPurple", &specified), text("rebeccapurple"));
    assert_eq!(resolve_color("#FFF", &specified), text("#fff"));
    let hex = ResolveOptions::new().with_format(ColorFormat::Hex);
    assert_eq!(resolve_color("red", &hex), text("#ff0000"));
    let hex_alpha = ResolveOptions::new().with_format(ColorFormat::HexAlpha);
    assert_eq!(resolve_color("rgb(0 0 0 / 50%)", &hex_alpha), text("#00000080"));
    let mix = ResolveOptions::new().with_format(ColorFormat::MixValue);
    assert_eq!(
        resolve_color("color-mix(in srgb, red, blue)", &mix),
        text("rgb(128, 0, 128)")
    );
}

#[test]
fn hex_conversion() {
    init();
    assert_eq!(color_to_hex("rgb(255, 0, 0)", &ResolveOptions::new()), text("#ff0000"));
    let alpha = ResolveOptions::new().with_alpha(true);
    assert_eq!(color_to_hex("rgba(0,0,0,0.5)", &alpha), text("#00000080"));
    assert_eq!(color_to_hex("nope", &ResolveOptions::new()), ColorResult::Invalid);
}

#[test]
fn alpha_is_clamped_and_floored() {
    init();
    let options = ResolveOptions::new();
    let alpha = |value: &str| color_to_rgb(value, &options).value().unwrap()[3];
    assert!((alpha("rgb(0 0 0 / 150%)") - 1.0).abs() < f64::EPSILON);
    assert!(alpha("rgb(0 0 0 / -5%)").abs() < f64::EPSILON);
    assert!(alpha("rgb(0 0 0 / 0.05%)").abs() < f64::EPSILON);
    assert!((alpha("rgb(0 0 0 / 0.12345)") - 0.123).abs() < 1e-9);
}

#[test]
fn numeric_conversions() {
    init();
    let options = ResolveOptions::new();
    assert_eq!(
        color_to_rgb("hsl(240 100% 50%)", &options),
        ColorResult::Value([0.0, 0.0, 255.0, 1.0])
    );
    let [hue, saturation, lightness, _] = color_to_hsl("rgb(255 0 0)", &options).value().unwrap();
    assert!(hue.abs() < 1e-9);
    assert!((saturation - 100.0).abs() < 1e-9);
    assert!((lightness - 50.0).abs() < 1e-9);

    let d65 = color_to_xyz("white", &options).value().unwrap();
    let d50 = color_to_xyz("white", &ResolveOptions::new().with_d50(true)).value().unwrap();
    assert!((d65[1] - 1.0).abs() < 1e-4);
    assert!((d50[1] - 1.0).abs() < 1e-4);
    assert!((d65[0] - 0.950_46).abs() < 1e-4);
    assert!((d50[0] - 0.964_3).abs() < 1e-3);

    assert_eq!(color_to_rgb("nope", &options), ColorResult::Value([0.0; 4]));
    let nullable = ResolveOptions::new().with_nullable(true);
    assert_eq!(color_to_rgb("nope", &nullable), ColorResult::Invalid);
}

#[test]
fn mixing() {
    init();
    let options = ResolveOptions::new();
    assert_eq!(
        resolve_color("color-mix(in srgb, red, blue)", &options),
        text("rgb(128, 0, 128)")
    );
    let longer = resolve_mix_value(
        "color-mix(in hsl longer hue, hsl(10 100% 50%), hsl(350 100% 50%))",
        &options,
    )
    .value()
    .unwrap();
    assert_eq!(longer.space, ColorSpace::Hsl);
    assert!((longer.numbers()[0] - 180.0).abs() < 1e-6);

    let shorter = resolve_mix_value(
        "color-mix(in hsl, hsl(10 100% 50%), hsl(350 100% 50%))",
        &options,
    )
    .value()
    .unwrap();
    let hue = shorter.numbers()[0];
    assert!(hue < 1e-6 || hue > 360.0 - 1e-6);

    let srgb = ResolveOptions::new().with_color_space("srgb");
    let converted = resolve_mix_value("color-mix(in srgb, red, blue)", &srgb)
        .value()
        .unwrap();
    assert_eq!(converted.space, ColorSpace::Srgb);
    assert!((converted.numbers()[0] - 0.5).abs() < 1e-9);
    assert!(
        resolve_mix_value("color-mix(in srgb, red 0%, blue 0%)", &options).is_invalid()
    );
}

#[test]
fn cache_keys_cover_color_space() {
    init();
    let engine = isolated(16);
    let plain = ResolveOptions::new();
    let lab = ResolveOptions::new().with_color_space("lab");
    let first = engine.resolve_color("red", &plain).value().unwrap();
    let second = engine.resolve_color("red", &lab).value().unwrap();
    assert_eq!(first, "rgb(255, 0, 0)");
    assert!(second.starts_with("lab("), "{second}");
    assert_eq!(engine.cache().len(), 2);
    assert_eq!(engine.resolve_color("red", &plain).value().unwrap(), first);
}

#[test]
fn invalid_results_are_cached() {
    init();
    let engine = isolated(16);
    let options = ResolveOptions::new().with_nullable(true);
    assert!(engine.resolve_color("rgb(1 2)", &options).is_invalid());
    let key = cache_key("resolveColor", "rgb(1 2)", &options).unwrap();
    assert_eq!(engine.cache().get(&key), CacheLookup::NegativeHit);
    assert!(engine.resolve_color("rgb(1 2)", &options).is_invalid());
    assert_eq!(engine.cache().len(), 1);
}

#[test]
fn cache_is_bounded() {
    init();
    let engine = isolated(2);
    let options = ResolveOptions::new();
    for value in ["red", "green", "blue", "white"] {
        engine.resolve_color(value, &options);
    }
    assert_eq!(engine.cache().len(), 2);
    let oldest = cache_key("resolveColor", "red", &options).unwrap();
    assert_eq!(engine.cache().get(&oldest), CacheLookup::Miss);
}

#[test]
fn custom_properties() {
    init();
    let table = CustomProperties::new()
        .with_property("--main", "#336699")
        .with_property("--gap", "calc(2px * 3)");
    let options = ResolveOptions::new().with_custom_properties(table);
    assert_eq!(resolve_color("var(--main)", &options), text("rgb(51, 102, 153)"));
    assert_eq!(css_var("var(--gap)", &options), "6px");
    assert_eq!(css_var("var(--missing)", &options), "");
    assert!(is_color("var(--main)", &options));
    assert!(is_gradient("linear-gradient(var(--main), blue)", &options));

    let callback = PropertyCallback::new(|name| (name == "--dynamic").then(|| "lime".to_owned()));
    let dynamic = ResolveOptions::new()
        .with_custom_properties(CustomProperties::new().with_callback(callback));
    assert_eq!(resolve_color("var(--dynamic)", &dynamic), text("rgb(0, 255, 0)"));
    assert_eq!(
        resolve_color("var(--absent)", &dynamic.clone().with_nullable(true)),
        ColorResult::Invalid
    );
}

#[test]
fn callbacks_take_part_in_keys() {
    init();
    let first = PropertyCallback::new(|_| Some("red".to_owned()));
    let second = PropertyCallback::new(|_| Some("blue".to_owned()));
    let with_first = ResolveOptions::new()
        .with_custom_properties(CustomProperties::new().with_callback(first));
    let with_second = ResolveOptions::new()
        .with_custom_properties(CustomProperties::new().with_callback(second));
    assert_ne!(
        cache_key("resolveColor", "var(--x)", &with_first),
        cache_key("resolveColor", "var(--x)", &with_second)
    );
    let engine = isolated(16);
    assert_eq!(engine.resolve_color("var(--x)", &with_first), text("rgb(255, 0, 0)"));
    assert_eq!(engine.resolve_color("var(--x)", &with_second), text("rgb(0, 0, 255)"));
}

#[test]
fn calc_folding() {
    init();
    let options = ResolveOptions::new();
    assert_eq!(css_calc("calc(1px + 2px)", &options), "3px");
    let em = ResolveOptions::new().with_dimensions(Dimensions::new().with_unit("em", 16.0));
    assert_eq!(css_calc("calc(1em + 2px)", &em), "18px");
    assert_eq!(css_calc("calc(1px + 2px", &options), "");
}

#[test]
fn calc_folding_is_idempotent() {
    init();
    let options = ResolveOptions::new();
    for expression in [
        "calc(100% - 10px)",
        "calc(2 * (1px + 1em))",
        "min(10px, 2em)",
        "calc((1px + 1em) / 2)",
        "calc(-1 * (1px + 1em))",
        "calc(min(1px, 1em) + 2px)",
        "calc(1e3px + 1.5e-2em)",
        "calc(100% / 3)",
        "calc(1em * 2 - 3px / 2)",
    ] {
        let once = css_calc(expression, &options);
        assert!(!once.is_empty(), "{expression} failed to fold");
        assert_eq!(css_calc(&once, &options), once, "{expression} is not stable");
    }
}

fn nested_parens(inner: &str, levels: usize) -> String {
    format!("{}{inner}{}", "(".repeat(levels), ")".repeat(levels))
}

#[test]
fn deep_nesting_is_rejected() {
    init();
    let options = ResolveOptions::new();
    let nullable = ResolveOptions::new().with_nullable(true);
    let calc = format!("calc{}", nested_parens("1", 100_000));
    assert_eq!(css_calc(&calc, &options), "");

    let color = format!("rgb(calc{} 0 0)", nested_parens("1", 100_000));
    assert_eq!(resolve_color(&color, &nullable), ColorResult::Invalid);
    assert!(!is_color(&color, &options));

    let levels = 30_000;
    let mut fallbacks = String::new();
    for level in 0..levels {
        fallbacks.push_str(&format!("var(--u{level}, "));
    }
    fallbacks.push_str("red");
    fallbacks.push_str(&")".repeat(levels));
    assert_eq!(css_var(&fallbacks, &options), "");
    assert_eq!(resolve_color(&fallbacks, &nullable), ColorResult::Invalid);
}

#[test]
fn predicates() {
    init();
    let options = ResolveOptions::new();
    assert!(is_color("currentColor", &options));
    assert!(is_color("oklch(70% 0.1 200)", &options));
    assert!(!is_color("rgb(1 2)", &options));
    assert!(is_color("color-mix(in hsl longer hue, red, blue)", &options));
    assert!(!is_color("color-mix(in srgb longer hue, red, blue)", &options));
    assert!(is_gradient("radial-gradient(circle, red, blue)", &options));
    assert!(!is_gradient("linear-gradient(red)", &options));
}
