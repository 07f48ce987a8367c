#![allow(clippy::unwrap_used)]

use css_variables::{CustomProperties, PropertyCallback, VarError, resolve_vars};

#[test]
fn table_lookup_and_fallback() {
    let _ = env_logger::builder().is_test(true).try_init();
    let props = CustomProperties::new()
        .with_property("--main", "#336699")
        .with_property("--alpha", " 50% ");
    assert_eq!(resolve_vars("var(--main)", &props).unwrap(), "#336699");
    assert_eq!(
        resolve_vars("rgb(0 0 0 / var(--alpha))", &props).unwrap(),
        "rgb(0 0 0 / 50%)"
    );
    assert_eq!(resolve_vars("var(--other, red)", &props).unwrap(), "red");
}

#[test]
fn names_are_case_sensitive() {
    let _ = env_logger::builder().is_test(true).try_init();
    let props = CustomProperties::new().with_property("--Main", "blue");
    assert_eq!(resolve_vars("var(--Main)", &props).unwrap(), "blue");
    assert_eq!(
        resolve_vars("var(--main)", &props),
        Err(VarError::Unresolved("--main".to_owned()))
    );
}

#[test]
fn indirection_and_cycles() {
    let _ = env_logger::builder().is_test(true).try_init();
    // Indirection: --b uses --a
    let props = CustomProperties::new()
        .with_property("--a", "33px")
        .with_property("--b", "var(--a)")
        .with_property("--loop", "var(--loop)");
    assert_eq!(resolve_vars("var(--b)", &props).unwrap(), "33px");
    assert_eq!(
        resolve_vars("var(--loop)", &props),
        Err(VarError::Cycle("--loop".to_owned()))
    );
    assert_eq!(resolve_vars("var(--loop, 1px)", &props).unwrap(), "1px");
}

#[test]
fn callback_fills_missing_names() {
    let _ = env_logger::builder().is_test(true).try_init();
    let callback = PropertyCallback::new(|name| (name == "--dynamic").then(|| "green".to_owned()));
    let props = CustomProperties::new().with_callback(callback);
    assert_eq!(resolve_vars("var(--dynamic)", &props).unwrap(), "green");
    assert!(resolve_vars("var(--absent)", &props).is_err());
}

#[test]
fn nested_fallbacks() {
    let _ = env_logger::builder().is_test(true).try_init();
    let props = CustomProperties::new().with_property("--x", "10px");
    assert_eq!(
        resolve_vars("calc(var(--y, var(--x)) * 2)", &props).unwrap(),
        "calc(10px * 2)"
    );
    assert_eq!(
        resolve_vars("var(--x", &props),
        Err(VarError::UnbalancedParentheses)
    );
}

fn nested_fallback_chain(levels: usize) -> String {
    let mut value = String::new();
    for level in 0..levels {
        value.push_str(&format!("var(--u{level}, "));
    }
    value.push_str("red");
    value.push_str(&")".repeat(levels));
    value
}

#[test]
fn fallback_depth_is_bounded() {
    let _ = env_logger::builder().is_test(true).try_init();
    let props = CustomProperties::new();
    assert_eq!(
        resolve_vars(&nested_fallback_chain(8), &props).unwrap(),
        "red"
    );
    assert_eq!(
        resolve_vars(&nested_fallback_chain(30_000), &props),
        Err(VarError::NestingTooDeep)
    );
}
