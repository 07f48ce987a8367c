#![allow(clippy::unwrap_used)]

use css_color::ParseContext;
use css_images::{GradientError, GradientItem, GradientKind, is_gradient, parse_gradient};
use css_values_units::Dimensions;

#[test]
fn accepts_each_function() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dimensions = Dimensions::new();
    let context = ParseContext::new(&dimensions);
    for value in [
        "linear-gradient(red, blue)",
        "linear-gradient(to right, red 10%, 30%, blue)",
        "linear-gradient(45deg in oklch longer hue, #f00 0 50%, rgb(0 0 255) 100%)",
        "repeating-linear-gradient(in srgb, red 0px, blue 20px)",
        "radial-gradient(circle 40px at 10% 20%, red, currentcolor)",
        "radial-gradient(ellipse farthest-corner, hsl(0 100% 50%), transparent)",
        "repeating-radial-gradient(red, blue 10%, green 20%)",
        "conic-gradient(from 0.25turn at 50% 30%, red, blue 90deg, green)",
        "Conic-Gradient(red 0deg 90deg, blue 90deg 180deg)",
    ] {
        assert!(is_gradient(value, &context), "{value}");
    }
}

#[test]
fn rejects_malformed() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dimensions = Dimensions::new();
    let context = ParseContext::new(&dimensions);
    for value in [
        "linear-gradient(red)",
        "linear-gradient(to up, red, blue)",
        "linear-gradient(red, 10%, 20%, blue)",
        "linear-gradient(red, blue, 50%)",
        "linear-gradient(in srgb longer hue, red, blue)",
        "radial-gradient(circle 10%, red, blue)",
        "conic-gradient(red 10px, blue)",
        "linear-gradient(red, notacolor)",
        "elliptic-gradient(red, blue)",
        "linear-gradient(red, blue",
    ] {
        assert!(!is_gradient(value, &context), "{value}");
    }
}

#[test]
fn reports_structure() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dimensions = Dimensions::new();
    let context = ParseContext::new(&dimensions);
    let gradient =
        parse_gradient("repeating-conic-gradient(from 45deg, red, 25%, blue)", &context).unwrap();
    assert_eq!(gradient.kind, GradientKind::Conic);
    assert!(gradient.repeating);
    assert_eq!(gradient.configuration, vec!["from", "45deg"]);
    assert_eq!(gradient.items.len(), 3);
    assert_eq!(gradient.items[1], GradientItem::Hint("25%".to_owned()));
    assert_eq!(
        parse_gradient("linear-gradient(blue)", &context),
        Err(GradientError::TooFewStops(1))
    );
    assert_eq!(
        parse_gradient("linear-gradient(5%, red, blue)", &context),
        Err(GradientError::MisplacedHint("5%".to_owned()))
    );
}
