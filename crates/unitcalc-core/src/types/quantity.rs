//! The dimensioned value type

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::format::{format_quantity, DisplayConfig, Markup};
use super::Dimensions;
use crate::error::{QuantityError, QuantityResult};
use crate::parser;

/// A magnitude with a dimension map and display configuration.
///
/// Quantities are values: every arithmetic operation returns a new quantity
/// and never touches its operands.
///
/// ```rust
/// use unitcalc_core::{DisplayConfig, Quantity};
///
/// let pressure = Quantity::parse("2 lb/ft^2").unwrap().with_display(DisplayConfig::plain());
/// let width = Quantity::parse("3 ft").unwrap();
/// let line_load = pressure.try_mul(&width).unwrap();
/// assert_eq!(line_load.to_string(), "6.000 lb / ft");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    pub(crate) magnitude: f64,
    pub(crate) dimensions: Dimensions,
    pub(crate) display: DisplayConfig,
}

impl Quantity {
    /// Parse a literal such as `"1.0 lb/ft^2"` with the default display
    /// configuration
    pub fn parse(literal: &str) -> QuantityResult<Self> {
        Self::parse_with(literal, DisplayConfig::default())
    }

    /// Parse a literal with an explicit display configuration
    pub fn parse_with(literal: &str, display: DisplayConfig) -> QuantityResult<Self> {
        let (magnitude, dimensions) = parser::parse_literal(literal)?;
        Ok(Self {
            magnitude,
            dimensions,
            display,
        })
    }

    /// Build from parts. Fails if the magnitude is not finite.
    pub fn new(magnitude: f64, dimensions: Dimensions) -> QuantityResult<Self> {
        Self::from_parts(magnitude, dimensions, DisplayConfig::default())
    }

    /// A dimensionless quantity holding a raw number
    pub fn dimensionless(magnitude: f64) -> QuantityResult<Self> {
        Self::new(magnitude, Dimensions::new())
    }

    pub(crate) fn from_parts(
        magnitude: f64,
        dimensions: Dimensions,
        display: DisplayConfig,
    ) -> QuantityResult<Self> {
        if !magnitude.is_finite() {
            return Err(QuantityError::invalid_operation(format!(
                "magnitude {magnitude} is not finite"
            )));
        }
        Ok(Self {
            magnitude,
            dimensions,
            display,
        })
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn dimensions(&self) -> &Dimensions {
        &self.dimensions
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn digits(&self) -> usize {
        self.display.digits
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dimensions.is_dimensionless()
    }

    /// Copy with a different digit count
    pub fn with_digits(mut self, digits: usize) -> Self {
        self.display.digits = digits;
        self
    }

    pub fn with_markup(mut self, markup: Markup) -> Self {
        self.display.markup = markup;
        self
    }

    pub fn with_order<I, S>(mut self, order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.display = self.display.with_order(order);
        self
    }

    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Render under another configuration
    pub fn format_with(&self, config: &DisplayConfig) -> String {
        format_quantity(self.magnitude, &self.dimensions, config)
    }

    /// A literal that parses back to the same magnitude and dimensions,
    /// e.g. `"2 ft^-2*lb"`
    pub fn to_literal(&self) -> String {
        if self.is_dimensionless() {
            format!("{}", self.magnitude)
        } else {
            format!("{} {}", self.magnitude, self.dimensions)
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.magnitude == other.magnitude && self.dimensions == other.dimensions
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityError;

    fn try_from(literal: String) -> Result<Self, Self::Error> {
        Self::parse(&literal)
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.to_literal()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_with(&self.display))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_defaults() {
        let q = Quantity::parse("1.0 lb/ft^2").unwrap();
        assert_eq!(q.magnitude(), 1.0);
        assert_eq!(q.dimensions().exponent("lb"), Some(1));
        assert_eq!(q.dimensions().exponent("ft"), Some(-2));
        assert_eq!(q.digits(), 3);
        assert_eq!(q.display().markup, Markup::Latex);
    }

    #[test]
    fn test_display_plain() {
        let q = Quantity::parse("1.0 lb/ft^2")
            .unwrap()
            .with_digits(1)
            .with_markup(Markup::Plain);
        assert_eq!(q.to_string(), "1.0 lb / ft^2");

        let q = Quantity::parse("1 lb / ft^2")
            .unwrap()
            .with_digits(2)
            .with_markup(Markup::Plain);
        assert_eq!(q.to_string(), "1.00 lb / ft^2");
    }

    #[test]
    fn test_copy_keeps_configuration() {
        let q = Quantity::parse_with("5 lb/ft^2", DisplayConfig::plain().with_order(["lb", "ft"]))
            .unwrap();
        let copy = q.clone().with_digits(1);
        assert_eq!(copy.digits(), 1);
        assert_eq!(copy.display().order, q.display().order);
        assert_eq!(copy, q);
    }

    #[test]
    fn test_new_rejects_non_finite() {
        assert!(Quantity::dimensionless(f64::NAN).is_err());
        assert!(Quantity::new(f64::INFINITY, Dimensions::single("ft", 1)).is_err());
    }

    #[test]
    fn test_parse_rejects_overflowing_magnitude() {
        let literal = format!("1{} ft", "0".repeat(400));
        assert_eq!(
            Quantity::parse(&literal).unwrap_err().error_code(),
            "PARSE_ERROR"
        );
        assert!(literal.parse::<Quantity>().is_err());
        assert!(serde_json::from_str::<Quantity>(&format!("\"{literal}\"")).is_err());
    }

    #[test]
    fn test_literal_round_trip() {
        let q = Quantity::parse("-2.5 lb*ft/sec^2").unwrap();
        assert_eq!(q.to_literal(), "-2.5 ft*lb*sec^-2");
        assert_eq!(Quantity::parse(&q.to_literal()).unwrap(), q);
    }

    #[test]
    fn test_serde_as_literal() {
        let q = Quantity::parse("120 lb/ft^3").unwrap();
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, "\"120 ft^-3*lb\"");
        let back: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
