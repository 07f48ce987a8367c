//! CSS Images 4 — §3 Gradients
//! Spec: <https://www.w3.org/TR/css-images-4/#gradients>
//!
//! Validation only: the gradient is split into its configuration prefix, an optional
//! color interpolation method and the color stop list, and each piece is checked
//! against its grammar. Colors in stops go through the full color parser.

use crate::GradientError;
use css_color::{ColorSpace, ParseContext, parse_color};
use css_syntax::{Pattern, function_arguments, grammar, split_components, split_value};
use css_values_units::{HueArc, parse_number};

/// Radial extent keywords.
const EXTENT_KEYWORDS: [&str; 4] = [
    "closest-side",
    "closest-corner",
    "farthest-side",
    "farthest-corner",
];
/// Keywords valid in a `<position>`.
const POSITION_KEYWORDS: [&str; 5] = ["left", "right", "top", "bottom", "center"];

/// The three gradient functions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GradientKind {
    /// `linear-gradient()` and its repeating form.
    Linear,
    /// `radial-gradient()` and its repeating form.
    Radial,
    /// `conic-gradient()` and its repeating form.
    Conic,
}

impl GradientKind {
    /// Kind and repeating flag of a gradient function name.
    fn from_function(name: &str) -> Option<(Self, bool)> {
        let (base, repeating) = name
            .strip_prefix("repeating-")
            .map_or((name, false), |rest| (rest, true));
        let kind = match base {
            "linear-gradient" => Self::Linear,
            "radial-gradient" => Self::Radial,
            "conic-gradient" => Self::Conic,
            _ => return None,
        };
        Some((kind, repeating))
    }
}

/// `in <color-space> [<hue-interpolation-method> hue]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Interpolation {
    pub space: ColorSpace,
    pub arc: Option<HueArc>,
}

/// One entry of the color stop list.
#[derive(Clone, Debug, PartialEq)]
pub enum GradientItem {
    /// A color with up to two positions.
    ColorStop {
        color: String,
        positions: Vec<String>,
    },
    /// A transition hint between two stops.
    Hint(String),
}

/// A validated gradient.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    pub repeating: bool,
    /// Direction, shape, size or position components preceding the stops.
    pub configuration: Vec<String>,
    pub interpolation: Option<Interpolation>,
    pub items: Vec<GradientItem>,
}

fn is_zero(text: &str) -> bool {
    parse_number(text).is_ok_and(|value| value == 0.0)
}

fn is_math(text: &str) -> bool {
    grammar().is_match(Pattern::MathFunctionStart, text)
}

fn is_length_percentage(text: &str) -> bool {
    let table = grammar();
    table.is_match(Pattern::Percentage, text)
        || (table.is_match(Pattern::Length, text) && !table.is_match(Pattern::Angle, text))
        || is_zero(text)
        || is_math(text)
}

fn is_angle(text: &str) -> bool {
    grammar().is_match(Pattern::Angle, text) || is_zero(text) || is_math(text)
}

fn is_angle_percentage(text: &str) -> bool {
    is_angle(text) || grammar().is_match(Pattern::Percentage, text)
}

fn is_position(tokens: &[&str]) -> bool {
    (1..=4).contains(&tokens.len())
        && tokens
            .iter()
            .all(|token| POSITION_KEYWORDS.contains(token) || is_length_percentage(token))
}

/// Separate a leading or trailing interpolation method from the other configuration.
fn take_interpolation<'parts>(
    tokens: &[&'parts str],
    text: &str,
) -> Result<(Vec<&'parts str>, Option<Interpolation>), GradientError> {
    let invalid = || GradientError::Syntax(text.to_owned());
    let Some(start) = tokens.iter().position(|token| *token == "in") else {
        return Ok((tokens.to_vec(), None));
    };
    let space = tokens
        .get(start + 1)
        .and_then(|name| ColorSpace::from_interpolation(name))
        .ok_or_else(invalid)?;
    let mut end = start + 2;
    let mut arc = None;
    if let (Some(keyword), Some(&"hue")) = (tokens.get(end), tokens.get(end + 1)) {
        arc = Some(HueArc::from_keyword(keyword).ok_or_else(invalid)?);
        end += 2;
    }
    if arc.is_some() && !space.is_polar() {
        return Err(invalid());
    }
    if start != 0 && end != tokens.len() {
        return Err(invalid());
    }
    let mut rest = tokens.get(..start).unwrap_or_default().to_vec();
    rest.extend_from_slice(tokens.get(end..).unwrap_or_default());
    Ok((rest, Some(Interpolation { space, arc })))
}

fn is_horizontal(side: &str) -> bool {
    side == "left" || side == "right"
}

fn is_vertical(side: &str) -> bool {
    side == "top" || side == "bottom"
}

/// `[ <angle> | to <side-or-corner> ]`
fn valid_linear(tokens: &[&str]) -> bool {
    match tokens {
        [] => true,
        [angle] => is_angle(angle),
        ["to", side] => is_horizontal(side) || is_vertical(side),
        ["to", first, second] => {
            (is_horizontal(first) && is_vertical(second))
                || (is_vertical(first) && is_horizontal(second))
        }
        _ => false,
    }
}

/// `[ <radial-shape> || <radial-size> ]? [ at <position> ]?`
fn valid_radial(tokens: &[&str]) -> bool {
    let (shape_size, position) = match tokens.iter().position(|token| *token == "at") {
        Some(index) => (
            tokens.get(..index).unwrap_or_default(),
            Some(tokens.get(index + 1..).unwrap_or_default()),
        ),
        None => (tokens, None),
    };
    if position.is_some_and(|position| !is_position(position)) {
        return false;
    }
    let mut shape = None;
    let mut extent = false;
    let mut sizes = Vec::new();
    for token in shape_size {
        match *token {
            "circle" | "ellipse" if shape.is_none() => shape = Some(*token),
            keyword if EXTENT_KEYWORDS.contains(&keyword) && !extent => extent = true,
            size if is_length_percentage(size) => sizes.push(size),
            _ => return false,
        }
    }
    match (shape, sizes.as_slice()) {
        (_, []) => true,
        (Some("circle") | None, [radius]) => !extent && !radius.ends_with('%'),
        (Some("ellipse") | None, [_, _]) => !extent,
        _ => false,
    }
}

/// `[ from <angle> ]? [ at <position> ]?`
fn valid_conic(tokens: &[&str]) -> bool {
    let rest = match tokens {
        ["from", angle, rest @ ..] if is_angle(angle) => rest,
        ["from", ..] => return false,
        rest => rest,
    };
    match rest {
        [] => true,
        ["at", position @ ..] => is_position(position),
        _ => false,
    }
}

fn parse_configuration(
    kind: GradientKind,
    part: &str,
) -> Result<(Vec<String>, Option<Interpolation>), GradientError> {
    let components = split_components(part);
    let tokens: Vec<&str> = components.iter().map(String::as_str).collect();
    let (rest, interpolation) = take_interpolation(&tokens, part)?;
    let valid = match kind {
        GradientKind::Linear => valid_linear(&rest),
        GradientKind::Radial => valid_radial(&rest),
        GradientKind::Conic => valid_conic(&rest),
    };
    if !valid || (rest.is_empty() && interpolation.is_none()) {
        return Err(GradientError::Syntax(part.to_owned()));
    }
    Ok((rest.into_iter().map(str::to_owned).collect(), interpolation))
}

fn parse_item(
    kind: GradientKind,
    part: &str,
    context: &ParseContext<'_>,
) -> Result<GradientItem, GradientError> {
    let invalid = || GradientError::Syntax(part.to_owned());
    let position_ok = |text: &String| match kind {
        GradientKind::Conic => is_angle_percentage(text),
        GradientKind::Linear | GradientKind::Radial => is_length_percentage(text),
    };
    let components = split_components(part);
    let (first, positions) = components.split_first().ok_or_else(invalid)?;
    if positions.is_empty() && position_ok(first) {
        return Ok(GradientItem::Hint(first.clone()));
    }
    if positions.len() > 2 || !positions.iter().all(position_ok) {
        return Err(invalid());
    }
    if first != "currentcolor" && parse_color(first, context).is_err() {
        return Err(invalid());
    }
    Ok(GradientItem::ColorStop {
        color: first.clone(),
        positions: positions.to_vec(),
    })
}

fn check_stops(items: &[GradientItem]) -> Result<(), GradientError> {
    let is_hint = |item: &GradientItem| matches!(item, GradientItem::Hint(_));
    let stops = items
        .iter()
        .filter(|item| matches!(item, GradientItem::ColorStop { .. }))
        .count();
    if stops < 2 {
        return Err(GradientError::TooFewStops(stops));
    }
    for (index, item) in items.iter().enumerate() {
        let GradientItem::Hint(hint) = item else {
            continue;
        };
        let first_or_last = index == 0 || index + 1 == items.len();
        let after_hint = index > 0 && items.get(index - 1).is_some_and(is_hint);
        if first_or_last || after_hint {
            return Err(GradientError::MisplacedHint(hint.clone()));
        }
    }
    Ok(())
}

/// Validate a gradient value.
///
/// # Errors
/// Returns [`GradientError`] describing the first problem found.
pub fn parse_gradient(value: &str, context: &ParseContext<'_>) -> Result<Gradient, GradientError> {
    let text = value.trim().to_ascii_lowercase();
    let invalid = || GradientError::Syntax(text.clone());
    if !grammar().is_match(Pattern::Gradient, &text) {
        return Err(invalid());
    }
    let (name, arguments) = function_arguments(&text).ok_or_else(invalid)?;
    let (kind, repeating) = GradientKind::from_function(name).ok_or_else(invalid)?;
    let parts = split_value(arguments, ',');
    let (first, rest) = parts.split_first().ok_or_else(invalid)?;
    let (configuration, interpolation, stop_parts) = match parse_item(kind, first, context) {
        Ok(_) => (Vec::new(), None, parts.as_slice()),
        Err(_) => {
            let (configuration, interpolation) = parse_configuration(kind, first)?;
            (configuration, interpolation, rest)
        }
    };
    let items = stop_parts
        .iter()
        .map(|part| parse_item(kind, part, context))
        .collect::<Result<Vec<_>, _>>()?;
    check_stops(&items)?;
    Ok(Gradient {
        kind,
        repeating,
        configuration,
        interpolation,
        items,
    })
}

/// Whether `value` is a valid gradient.
pub fn is_gradient(value: &str, context: &ParseContext<'_>) -> bool {
    match parse_gradient(value, context) {
        Ok(_) => true,
        Err(error) => {
            log::debug!("{value:?} is not a gradient: {error}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_configuration() {
        assert!(valid_linear(&["45deg"]));
        assert!(valid_linear(&["to", "top", "right"]));
        assert!(!valid_linear(&["to", "top", "bottom"]));
        assert!(!valid_linear(&["10px"]));
    }

    #[test]
    fn radial_configuration() {
        assert!(valid_radial(&["circle", "10px"]));
        assert!(!valid_radial(&["circle", "10%"]));
        assert!(valid_radial(&["ellipse", "10%", "20px", "at", "center"]));
        assert!(valid_radial(&["farthest-corner", "at", "left", "top"]));
        assert!(!valid_radial(&["closest-side", "10px"]));
        assert!(!valid_radial(&["at"]));
    }

    #[test]
    fn conic_configuration() {
        assert!(valid_conic(&["from", "90deg", "at", "25%", "75%"]));
        assert!(valid_conic(&["at", "center"]));
        assert!(!valid_conic(&["from", "10px"]));
    }

    #[test]
    fn interpolation_clause_position() {
        let tokens = ["in", "oklch", "longer", "hue", "to", "right"];
        let (rest, interpolation) = take_interpolation(&tokens, "").unwrap_or_default();
        assert_eq!(rest, vec!["to", "right"]);
        assert_eq!(
            interpolation,
            Some(Interpolation {
                space: ColorSpace::Oklch,
                arc: Some(HueArc::Longer),
            })
        );
        assert!(take_interpolation(&["to", "in", "srgb", "right"], "").is_err());
        assert!(take_interpolation(&["in", "srgb", "longer", "hue"], "").is_err());
    }
}
