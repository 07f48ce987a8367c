#![allow(clippy::unwrap_used)]

use css_values_units::{
    CalcContext, CalcError, CalcValue, DimensionCallback, Dimensions, css_calc, evaluate_calc, evaluate_math,
};

fn fold(value: &str) -> String {
    css_calc(value, &Dimensions::new())
}

#[test]
fn folding_is_idempotent() {
    let _ = env_logger::builder().is_test(true).try_init();
    for expression in [
        "calc(1px + 2px)",
        "calc(2 * (1px + 1em))",
        "calc(100% - 10px)",
        "calc(1px + var(--gap) - 3em)",
        "calc(var(--x) * 2)",
        "min(10px, 2em)",
        "calc(1px / 0)",
        "calc(3px * 2em)",
        "calc(e)",
    ] {
        let once = fold(expression);
        assert!(!once.is_empty(), "{expression} failed to fold");
        assert_eq!(fold(&once), once, "{expression} is not stable");
    }
}

#[test]
fn canonical_forms() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert_eq!(fold("calc(2 * (1px + 1em))"), "calc(2em + 2px)");
    assert_eq!(fold("calc(100% - 10px)"), "calc(-10px + 100%)");
    assert_eq!(fold("calc(var(--x) * 2)"), "calc(2 * var(--x))");
    assert_eq!(fold("calc(1px / 0)"), "calc(1px / 0)");
    assert_eq!(fold("calc(1turn + 90deg)"), "450deg");
    assert_eq!(fold("calc(e)"), "2.71828");
}

#[test]
fn finalize_flag_controls_distribution() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dims = Dimensions::new();
    let lazy = CalcContext::new(&dims).with_finalize(false);
    assert_eq!(
        evaluate_calc("calc(2 * (1px + 1em))", &lazy).unwrap(),
        "calc(2 * (1em + 1px))"
    );
}

#[test]
fn comparison_and_stepped_functions() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert_eq!(fold("clamp(1px, 5px, 3px)"), "3px");
    assert_eq!(fold("max(1, 4, 2)"), "4");
    assert_eq!(fold("round(up, 7px, 5px)"), "10px");
    assert_eq!(fold("mod(-7, 3)"), "2");
    assert_eq!(fold("rem(-7, 3)"), "-1");
    assert_eq!(fold("abs(-4%)"), "4%");
    assert_eq!(fold("sin(90deg)"), "1");
    assert_eq!(fold("min(10px, 2em)"), "min(10px, 2em)");
}

#[test]
fn dimensions_resolve_through_table_and_callback() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dims = Dimensions::new()
        .with_unit("em", 16.0)
        .with_callback(DimensionCallback::new(|unit| (unit == "rem").then_some(10.0)));
    assert_eq!(css_calc("calc(1em + 4px)", &dims), "20px");
    assert_eq!(css_calc("calc(2rem)", &dims), "20px");
    assert_eq!(css_calc("calc(1vw + 1px)", &dims), "calc(1px + 1vw)");
}

#[test]
fn multi_component_values() {
    let _ = env_logger::builder().is_test(true).try_init();
    assert_eq!(fold("calc(1px + 1px) calc(2 * 2)"), "2px 4");
    assert_eq!(
        fold("translate(calc(1px + 1px), 3px)"),
        "translate(2px, 3px)"
    );
    assert_eq!(fold("no math here"), "no math here");
}

#[test]
fn single_values_for_channels() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dims = Dimensions::new();
    let context = CalcContext::new(&dims);
    assert_eq!(
        evaluate_math("calc(50% + 10%)", &context).unwrap().single_value(),
        Some(CalcValue::Percentage(60.0))
    );
    assert_eq!(
        evaluate_math("calc(255 / 2)", &context).unwrap().single_value(),
        Some(CalcValue::Number(127.5))
    );
    assert!(
        evaluate_math("calc(50% + 10)", &context)
            .unwrap()
            .single_value()
            .is_none()
    );
}

#[test]
fn deep_nesting_is_rejected() {
    let _ = env_logger::builder().is_test(true).try_init();
    let dims = Dimensions::new();
    let context = CalcContext::new(&dims);
    let deep = format!("calc({}1px{})", "(".repeat(100_000), ")".repeat(100_000));
    assert_eq!(evaluate_math(&deep, &context), Err(CalcError::NestingTooDeep));
    assert_eq!(evaluate_calc(&deep, &context), Err(CalcError::NestingTooDeep));
    assert_eq!(fold(&deep), "");

    let shallow = format!("calc({}1px{})", "(".repeat(8), ")".repeat(8));
    assert_eq!(fold(&shallow), "1px");
}
