//! Dimension-checked arithmetic on quantities
//!
//! Addition and subtraction need matching dimensions (or a raw number
//! against a dimensionless quantity). Multiplication and division combine
//! dimension maps. Every result is a fresh quantity.

use std::ops::Neg;

use tracing::trace;

use super::format::DisplayConfig;
use super::{Dimensions, Operand, Quantity};
use crate::error::{QuantityError, QuantityResult};

fn exponent_overflow(op: &str) -> QuantityError {
    QuantityError::invalid_operation(format!("unit exponent overflow in {op}"))
}

impl Quantity {
    /// `self + rhs`
    pub fn try_add<'a>(&self, rhs: impl Into<Operand<'a>>) -> QuantityResult<Quantity> {
        self.sum(rhs.into(), 1.0, "add")
    }

    /// `self - rhs`
    pub fn try_sub<'a>(&self, rhs: impl Into<Operand<'a>>) -> QuantityResult<Quantity> {
        self.sum(rhs.into(), -1.0, "subtract")
    }

    /// `lhs - self`, for a raw number on the left
    pub fn rsub(&self, lhs: f64) -> QuantityResult<Quantity> {
        (-self).try_add(lhs)
    }

    /// `self * rhs`
    pub fn try_mul<'a>(&self, rhs: impl Into<Operand<'a>>) -> QuantityResult<Quantity> {
        match rhs.into() {
            Operand::Number(n) => Quantity::from_parts(
                self.magnitude * n,
                self.dimensions.clone(),
                self.display.clone(),
            ),
            Operand::Quantity(q) => {
                let dimensions = self
                    .dimensions
                    .multiply(&q.dimensions)
                    .ok_or_else(|| exponent_overflow("multiplication"))?;
                trace!(left = %self.dimensions, right = %q.dimensions, result = %dimensions, "multiply");
                Quantity::from_parts(
                    self.magnitude * q.magnitude,
                    dimensions,
                    self.merged_display(q),
                )
            }
        }
    }

    /// `self / rhs`
    pub fn try_div<'a>(&self, rhs: impl Into<Operand<'a>>) -> QuantityResult<Quantity> {
        match rhs.into() {
            Operand::Number(n) => {
                if n == 0.0 {
                    return Err(QuantityError::invalid_operation(format!(
                        "division of {} by zero",
                        Operand::Quantity(self)
                    )));
                }
                Quantity::from_parts(
                    self.magnitude / n,
                    self.dimensions.clone(),
                    self.display.clone(),
                )
            }
            Operand::Quantity(q) => {
                if q.magnitude == 0.0 {
                    return Err(QuantityError::invalid_operation(format!(
                        "division of {} by zero quantity {}",
                        Operand::Quantity(self),
                        Operand::Quantity(q)
                    )));
                }
                let dimensions = self
                    .dimensions
                    .divide(&q.dimensions)
                    .ok_or_else(|| exponent_overflow("division"))?;
                trace!(left = %self.dimensions, right = %q.dimensions, result = %dimensions, "divide");
                Quantity::from_parts(
                    self.magnitude / q.magnitude,
                    dimensions,
                    self.merged_display(q),
                )
            }
        }
    }

    /// `lhs / self`, for a raw number on the left. Every exponent is
    /// negated.
    pub fn rdiv(&self, lhs: f64) -> QuantityResult<Quantity> {
        if self.magnitude == 0.0 {
            return Err(QuantityError::invalid_operation(format!(
                "division of {lhs} by zero quantity {}",
                Operand::Quantity(self)
            )));
        }
        let dimensions = self
            .dimensions
            .inverse()
            .ok_or_else(|| exponent_overflow("reciprocal"))?;
        Quantity::from_parts(lhs / self.magnitude, dimensions, self.display.clone())
    }

    /// `self ^ exponent`. Only integer exponents are defined.
    pub fn try_pow(&self, exponent: f64) -> QuantityResult<Quantity> {
        if exponent.fract() != 0.0
            || !exponent.is_finite()
            || exponent.abs() > f64::from(i32::MAX)
        {
            return Err(QuantityError::invalid_operation(format!(
                "cannot raise {} to non-integer power {exponent}",
                Operand::Quantity(self)
            )));
        }
        self.powi(exponent as i32)
    }

    /// `self ^ exponent`
    pub fn powi(&self, exponent: i32) -> QuantityResult<Quantity> {
        let dimensions = self
            .dimensions
            .powi(exponent)
            .ok_or_else(|| exponent_overflow("power"))?;
        Quantity::from_parts(
            self.magnitude.powi(exponent),
            dimensions,
            self.display.clone(),
        )
    }

    /// Absolute magnitude of a dimensionless quantity
    pub fn abs(&self) -> QuantityResult<f64> {
        self.scalar("take the absolute value of").map(f64::abs)
    }

    /// Magnitude of a dimensionless quantity truncated toward zero
    pub fn trunc(&self) -> QuantityResult<i64> {
        self.scalar("truncate").map(|m| m.trunc() as i64)
    }

    /// Magnitude of a dimensionless quantity
    pub fn to_f64(&self) -> QuantityResult<f64> {
        self.scalar("convert to a plain number")
    }

    fn scalar(&self, action: &str) -> QuantityResult<f64> {
        if self.is_dimensionless() {
            Ok(self.magnitude)
        } else {
            Err(QuantityError::dimension_mismatch(format!(
                "cannot {action} dimensioned quantity {}",
                Operand::Quantity(self)
            )))
        }
    }

    fn sum(&self, rhs: Operand<'_>, sign: f64, verb: &str) -> QuantityResult<Quantity> {
        match rhs {
            Operand::Number(n) => {
                if !self.is_dimensionless() {
                    return Err(QuantityError::dimension_mismatch(format!(
                        "cannot {verb} raw number {n} and dimensioned quantity {}",
                        Operand::Quantity(self)
                    )));
                }
                Quantity::from_parts(
                    self.magnitude + sign * n,
                    Dimensions::new(),
                    self.display.clone(),
                )
            }
            Operand::Quantity(q) => {
                if self.dimensions != q.dimensions {
                    return Err(QuantityError::dimension_mismatch(format!(
                        "cannot {verb} {} and {}: dimensions differ",
                        Operand::Quantity(self),
                        Operand::Quantity(q)
                    )));
                }
                Quantity::from_parts(
                    self.magnitude + sign * q.magnitude,
                    self.dimensions.clone(),
                    self.display.clone(),
                )
            }
        }
    }

    /// Display configuration of a product or quotient of two quantities:
    /// the larger digit count, the left ordering unless it has none.
    fn merged_display(&self, other: &Quantity) -> DisplayConfig {
        DisplayConfig {
            digits: self.display.digits.max(other.display.digits),
            order: self
                .display
                .order
                .clone()
                .or_else(|| other.display.order.clone()),
            markup: self.display.markup,
        }
    }
}

impl Neg for &Quantity {
    type Output = Quantity;

    fn neg(self) -> Quantity {
        Quantity {
            magnitude: -self.magnitude,
            dimensions: self.dimensions.clone(),
            display: self.display.clone(),
        }
    }
}

impl Neg for Quantity {
    type Output = Quantity;

    fn neg(mut self) -> Quantity {
        self.magnitude = -self.magnitude;
        self
    }
}

impl TryFrom<&Quantity> for f64 {
    type Error = QuantityError;

    fn try_from(q: &Quantity) -> Result<Self, Self::Error> {
        q.to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::format::Markup;
    use pretty_assertions::assert_eq;

    fn plain(literal: &str) -> Quantity {
        Quantity::parse(literal).unwrap().with_markup(Markup::Plain)
    }

    #[test]
    fn test_add_same_dimensions() {
        let sum = plain("2 lb/ft").try_add(&plain("3 lb/ft")).unwrap();
        assert_eq!(sum.to_string(), "5.000 lb / ft");

        let diff = plain("2 lb/ft").try_sub(&plain("3 lb/ft")).unwrap();
        assert_eq!(diff.magnitude(), -1.0);
    }

    #[test]
    fn test_add_mismatch() {
        let err = plain("1 lb").try_add(&plain("1 ft")).unwrap_err();
        assert_eq!(err.error_code(), "DIMENSION_MISMATCH");

        let err = plain("1 lb").try_add(2.0).unwrap_err();
        assert_eq!(err.error_code(), "DIMENSION_MISMATCH");
    }

    #[test]
    fn test_add_raw_number_to_dimensionless() {
        let q = plain("0.5").try_add(0.25).unwrap();
        assert_eq!(q.magnitude(), 0.75);
        assert!(q.is_dimensionless());

        let q = plain("0.5").rsub(2.0).unwrap();
        assert_eq!(q.magnitude(), 1.5);
    }

    #[test]
    fn test_add_keeps_left_configuration() {
        let left = plain("1 ft").with_digits(1);
        let right = plain("2 ft").with_digits(4);
        assert_eq!(left.try_add(&right).unwrap().digits(), 1);
    }

    #[test]
    fn test_mul_digits_and_order() {
        let left = plain("5 lb/ft^2").with_order(["lb", "ft"]);
        let right = plain("7.0 ft^3").with_digits(4);
        let product = left.try_mul(&right).unwrap();
        assert_eq!(product.digits(), 4);
        assert_eq!(product.to_string(), "35.0000 lb * ft");

        let product = plain("7.0 ft^3").try_mul(&left).unwrap();
        assert_eq!(
            product.display().order,
            Some(vec!["lb".to_string(), "ft".to_string()])
        );
    }

    #[test]
    fn test_mul_by_number_keeps_configuration() {
        let q = plain("35 lb*ft").with_order(["lb", "ft"]);
        assert_eq!(q.try_mul(0.2).unwrap().to_string(), "7.000 lb * ft");
    }

    #[test]
    fn test_div_and_rdiv() {
        let q = plain("224 lb/ft^2").try_div(&plain("2.24 lb/kg")).unwrap();
        assert_eq!(q.to_string(), "100.000 kg / ft^2");

        let q = plain("0.9144 m / yd").rdiv(1.0).unwrap();
        assert_eq!(q.to_string(), "1.094 yd / m");
    }

    #[test]
    fn test_div_by_zero() {
        assert!(plain("1 ft").try_div(0.0).is_err());
        assert!(plain("1 ft").try_div(&plain("0 sec")).is_err());
        assert!(plain("0 ft").rdiv(1.0).is_err());
    }

    #[test]
    fn test_pow() {
        let q = plain("3 ft").try_pow(2.0).unwrap();
        assert_eq!(q.to_string(), "9.000 ft^2");

        let q = plain("2 ft/sec").powi(-1).unwrap();
        assert_eq!(q.to_string(), "0.500 sec / ft");

        let q = plain("2 ft").powi(0).unwrap();
        assert!(q.is_dimensionless());
        assert_eq!(q.magnitude(), 1.0);

        let err = plain("4 ft^2").try_pow(0.5).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_OPERATION");
    }

    #[test]
    fn test_neg_leaves_operand_untouched() {
        let q = plain("2 lb");
        let n = -&q;
        assert_eq!(n.magnitude(), -2.0);
        assert_eq!(q.magnitude(), 2.0);
        assert_eq!(n.dimensions(), q.dimensions());
    }

    #[test]
    fn test_scalar_conversions() {
        let ratio = plain("-2.7");
        assert_eq!(ratio.abs().unwrap(), 2.7);
        assert_eq!(ratio.trunc().unwrap(), -2);
        assert_eq!(f64::try_from(&ratio).unwrap(), -2.7);

        let length = plain("2.7 ft");
        assert!(length.abs().is_err());
        assert!(length.trunc().is_err());
        assert!(length.to_f64().is_err());
    }
}
