//! Rendering quantities as text
//!
//! A quantity renders as `"<magnitude> <numerator> / <denominator>"`, where
//! each side lists its unit terms joined by `" * "`. Terms are ordered by a
//! caller-supplied priority list; symbols missing from the list follow in
//! alphabetical order.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};

use super::Dimensions;

/// Default number of decimal places for a quantity
pub const DEFAULT_DIGITS: usize = 3;

/// Largest accepted number of decimal places
pub const MAX_DIGITS: usize = 64;

/// Validate a digit count coming from user input
pub fn check_digits(digits: usize) -> Result<usize, String> {
    if digits > MAX_DIGITS {
        Err(format!(
            "digits {digits} exceeds the maximum of {MAX_DIGITS}"
        ))
    } else {
        Ok(digits)
    }
}

pub(crate) fn bounded_digits<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let digits = usize::deserialize(deserializer)?;
    check_digits(digits).map_err(serde::de::Error::custom)
}

/// Output markup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    /// Raw text: `2.000 lb / ft^2`
    Plain,
    /// LaTeX for typeset reports: `\mbox{lb} / \mbox{ft} \ensuremath{{\!}^2}`
    #[default]
    Latex,
}

/// How a quantity is displayed. Carried by every quantity and propagated
/// through arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Decimal places of the magnitude
    #[serde(deserialize_with = "bounded_digits")]
    pub digits: usize,
    /// Unit symbol priority list
    pub order: Option<Vec<String>>,
    pub markup: Markup,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            digits: DEFAULT_DIGITS,
            order: None,
            markup: Markup::default(),
        }
    }
}

impl DisplayConfig {
    /// Plain-text configuration with the default digit count
    pub fn plain() -> Self {
        Self {
            markup: Markup::Plain,
            ..Self::default()
        }
    }

    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.markup = markup;
        self
    }

    pub fn with_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order = Some(order.into_iter().map(Into::into).collect());
        self
    }

    /// Compare two symbols under this configuration's priority list
    pub fn compare_symbols(&self, a: &str, b: &str) -> Ordering {
        let rank = |symbol: &str| match &self.order {
            Some(order) => order
                .iter()
                .position(|s| s == symbol)
                .unwrap_or(order.len()),
            None => 0,
        };
        rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
    }
}

/// Render a single unit term
pub fn render_term(symbol: &str, exponent: i32, markup: Markup) -> String {
    match (markup, exponent) {
        (Markup::Plain, 1) => symbol.to_string(),
        (Markup::Plain, _) => format!("{symbol}^{exponent}"),
        (Markup::Latex, 1) => format!(r"\mbox{{{symbol}}}"),
        (Markup::Latex, _) => format!(r"\mbox{{{symbol}}} \ensuremath{{{{\!}}^{exponent}}}"),
    }
}

/// Render one side of the fraction, ordered and joined
fn render_side<'a>(
    entries: impl Iterator<Item = (&'a str, i32)>,
    config: &DisplayConfig,
) -> Option<String> {
    let mut entries: Vec<_> = entries.collect();
    if entries.is_empty() {
        return None;
    }
    entries.sort_by(|(a, _), (b, _)| config.compare_symbols(a, b));
    let terms: Vec<String> = entries
        .into_iter()
        .map(|(symbol, exponent)| render_term(symbol, exponent, config.markup))
        .collect();
    Some(terms.join(" * "))
}

/// Render a magnitude with a dimension map under `config`
pub fn format_quantity(magnitude: f64, dimensions: &Dimensions, config: &DisplayConfig) -> String {
    let mut out = format!("{:.*}", config.digits.min(MAX_DIGITS), magnitude);
    if dimensions.is_dimensionless() {
        return out;
    }
    if config.markup == Markup::Latex {
        out.push_str(r"\,");
    }
    if let Some(numerator) = render_side(dimensions.numerator(), config) {
        out.push(' ');
        out.push_str(&numerator);
    }
    if let Some(denominator) = render_side(dimensions.denominator(), config) {
        out.push_str(" / ");
        out.push_str(&denominator);
    }
    out
}
