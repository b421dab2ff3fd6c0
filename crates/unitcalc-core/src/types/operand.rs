//! Right-hand operands of the arithmetic and comparison engines

use std::fmt;

use super::format::Markup;
use super::Quantity;

/// Either a raw number or a borrowed quantity.
///
/// Each engine operation matches on this tag and keeps the
/// (quantity, number) and (quantity, quantity) rules in separate arms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operand<'a> {
    Number(f64),
    Quantity(&'a Quantity),
}

impl From<f64> for Operand<'_> {
    fn from(n: f64) -> Self {
        Operand::Number(n)
    }
}

impl From<i32> for Operand<'_> {
    fn from(n: i32) -> Self {
        Operand::Number(f64::from(n))
    }
}

impl<'a> From<&'a Quantity> for Operand<'a> {
    fn from(q: &'a Quantity) -> Self {
        Operand::Quantity(q)
    }
}

impl fmt::Display for Operand<'_> {
    /// Plain text, for error messages
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Number(n) => write!(f, "{n}"),
            Operand::Quantity(q) => {
                let plain = q.display().clone().with_markup(Markup::Plain);
                f.write_str(&q.format_with(&plain))
            }
        }
    }
}
