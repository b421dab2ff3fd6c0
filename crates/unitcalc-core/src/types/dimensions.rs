//! Dimension maps: unit symbol -> nonzero integer exponent

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A compound unit such as `{lb: 1, ft: -2}` (pounds per square foot).
///
/// Symbols are opaque, case-sensitive strings. No entry ever holds a zero
/// exponent; an empty map is a dimensionless value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, i32>", into = "BTreeMap<String, i32>")]
pub struct Dimensions(BTreeMap<String, i32>);

impl Dimensions {
    /// Dimensionless
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A single symbol raised to `exponent`
    pub fn single(symbol: impl Into<String>, exponent: i32) -> Self {
        let mut dims = Self::new();
        if exponent != 0 {
            dims.0.insert(symbol.into(), exponent);
        }
        dims
    }

    pub fn is_dimensionless(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn exponent(&self, symbol: &str) -> Option<i32> {
        self.0.get(symbol).copied()
    }

    /// Entries in alphabetical symbol order
    pub fn iter(&self) -> impl Iterator<Item = (&str, i32)> {
        self.0.iter().map(|(s, e)| (s.as_str(), *e))
    }

    /// Positive-exponent entries
    pub fn numerator(&self) -> impl Iterator<Item = (&str, i32)> {
        self.iter().filter(|(_, e)| *e > 0)
    }

    /// Negative-exponent entries, reported with their absolute exponent
    pub fn denominator(&self) -> impl Iterator<Item = (&str, i32)> {
        self.iter().filter(|(_, e)| *e < 0).map(|(s, e)| (s, e.saturating_neg()))
    }

    /// Add `delta` to the exponent of `symbol`, dropping the entry if it
    /// cancels to zero. Returns `None` on exponent overflow.
    pub fn accumulate(&mut self, symbol: &str, delta: i32) -> Option<()> {
        let current = self.exponent(symbol).unwrap_or(0);
        let updated = current.checked_add(delta)?;
        if updated == 0 {
            self.0.remove(symbol);
        } else {
            self.0.insert(symbol.to_string(), updated);
        }
        Some(())
    }

    /// Exponents summed per symbol (dimensions of a product)
    pub fn multiply(&self, other: &Dimensions) -> Option<Dimensions> {
        self.combine(other, 1)
    }

    /// Right-hand exponents subtracted (dimensions of a quotient)
    pub fn divide(&self, other: &Dimensions) -> Option<Dimensions> {
        self.combine(other, -1)
    }

    /// Every exponent multiplied by `power`
    pub fn powi(&self, power: i32) -> Option<Dimensions> {
        let mut result = Dimensions::new();
        for (symbol, exponent) in self.iter() {
            result.accumulate(symbol, exponent.checked_mul(power)?)?;
        }
        Some(result)
    }

    /// Every exponent negated
    pub fn inverse(&self) -> Option<Dimensions> {
        self.powi(-1)
    }

    fn combine(&self, other: &Dimensions, sign: i32) -> Option<Dimensions> {
        let mut result = self.clone();
        for (symbol, exponent) in other.iter() {
            result.accumulate(symbol, exponent.checked_mul(sign)?)?;
        }
        Some(result)
    }
}

impl FromIterator<(String, i32)> for Dimensions {
    /// Repeated symbols accumulate. Overflowing entries saturate.
    fn from_iter<I: IntoIterator<Item = (String, i32)>>(iter: I) -> Self {
        let mut dims = Dimensions::new();
        for (symbol, exponent) in iter {
            let current = dims.exponent(&symbol).unwrap_or(0);
            let updated = current.saturating_add(exponent);
            if updated == 0 {
                dims.0.remove(&symbol);
            } else {
                dims.0.insert(symbol, updated);
            }
        }
        dims
    }
}

impl From<BTreeMap<String, i32>> for Dimensions {
    fn from(map: BTreeMap<String, i32>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Dimensions> for BTreeMap<String, i32> {
    fn from(dims: Dimensions) -> Self {
        dims.0
    }
}

impl fmt::Display for Dimensions {
    /// Literal form, e.g. `ft^-2*lb`. Empty for dimensionless values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (symbol, exponent) in self.iter() {
            if !first {
                f.write_str("*")?;
            }
            first = false;
            if exponent == 1 {
                write!(f, "{symbol}")?;
            } else {
                write!(f, "{symbol}^{exponent}")?;
            }
        }
        Ok(())
    }
}
