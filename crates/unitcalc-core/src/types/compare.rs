//! Ordering between quantities
//!
//! Quantities only compare against quantities with identical dimensions.
//! A dimensionless quantity may also compare against a raw number.
//! `<` and `<=` are the negations of `>=` and `>`, so a comparison that
//! cannot be made fails in every direction.

use super::{Operand, Quantity};
use crate::error::{QuantityError, QuantityResult};

impl Quantity {
    /// Structural equality of the dimension maps
    pub fn same_dimensions(&self, other: &Quantity) -> bool {
        self.dimensions == other.dimensions
    }

    /// `self > rhs`
    pub fn try_gt<'a>(&self, rhs: impl Into<Operand<'a>>) -> QuantityResult<bool> {
        let rhs = self.comparable_magnitude(rhs.into())?;
        Ok(self.magnitude > rhs)
    }

    /// `self >= rhs`
    pub fn try_ge<'a>(&self, rhs: impl Into<Operand<'a>>) -> QuantityResult<bool> {
        let rhs = self.comparable_magnitude(rhs.into())?;
        Ok(self.magnitude >= rhs)
    }

    /// `self < rhs`, defined as `!(self >= rhs)`
    pub fn try_lt<'a>(&self, rhs: impl Into<Operand<'a>>) -> QuantityResult<bool> {
        Ok(!self.try_ge(rhs)?)
    }

    /// `self <= rhs`, defined as `!(self > rhs)`
    pub fn try_le<'a>(&self, rhs: impl Into<Operand<'a>>) -> QuantityResult<bool> {
        Ok(!self.try_gt(rhs)?)
    }

    fn comparable_magnitude(&self, rhs: Operand<'_>) -> QuantityResult<f64> {
        match rhs {
            Operand::Number(n) if self.is_dimensionless() => Ok(n),
            Operand::Number(n) => Err(QuantityError::dimension_mismatch(format!(
                "cannot compare dimensioned quantity {} with raw number {n}",
                Operand::Quantity(self)
            ))),
            Operand::Quantity(q) if self.same_dimensions(q) => Ok(q.magnitude),
            Operand::Quantity(q) => Err(QuantityError::dimension_mismatch(format!(
                "cannot compare {} with {}: dimensions differ",
                Operand::Quantity(self),
                Operand::Quantity(q)
            ))),
        }
    }
}
