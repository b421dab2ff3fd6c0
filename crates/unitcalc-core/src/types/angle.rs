//! Angles stored in degrees
//!
//! Report tables show angles in degrees while trigonometry wants radians.
//! [`Degrees`] keeps the degree value for display and hands out radians for
//! computation.

use std::cmp::Ordering;
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use super::format::MAX_DIGITS;

/// Default decimal places for a non-integral angle
pub const DEFAULT_ANGLE_DIGITS: usize = 1;

/// Integral angles within this distance render without decimals
const INTEGRAL_TOLERANCE: f64 = 1e-4;

/// A dimensionless angle measured in degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Degrees {
    degrees: f64,
    #[serde(deserialize_with = "super::format::bounded_digits")]
    digits: usize,
}

impl Degrees {
    pub fn new(degrees: f64) -> Self {
        Self {
            degrees,
            digits: DEFAULT_ANGLE_DIGITS,
        }
    }

    pub fn from_radians(radians: f64) -> Self {
        Self::new(radians * 180.0 / PI)
    }

    pub fn with_digits(mut self, digits: usize) -> Self {
        self.digits = digits;
        self
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    pub fn digits(&self) -> usize {
        self.digits
    }

    pub fn is_finite(&self) -> bool {
        self.degrees.is_finite()
    }

    /// The scalar value of an angle
    pub fn radians(&self) -> f64 {
        PI * self.degrees / 180.0
    }

    pub fn sin(&self) -> f64 {
        self.radians().sin()
    }

    pub fn cos(&self) -> f64 {
        self.radians().cos()
    }

    pub fn tan(&self) -> f64 {
        self.radians().tan()
    }

    /// Add an angle given in radians
    pub fn add_radians(self, radians: f64) -> Self {
        Self::new(self.degrees + radians * 180.0 / PI)
    }
}

impl PartialEq for Degrees {
    fn eq(&self, other: &Self) -> bool {
        self.degrees == other.degrees
    }
}

impl PartialOrd for Degrees {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.degrees.partial_cmp(&other.degrees)
    }
}

impl fmt::Display for Degrees {
    /// `\ensuremath{45 ^{\circ}}`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.degrees.trunc();
        if (whole - self.degrees).abs() < INTEGRAL_TOLERANCE {
            // `+ 0.0` folds -0 into 0
            write!(f, r"\ensuremath{{{:.0} ^{{\circ}}}}", whole + 0.0)
        } else {
            write!(
                f,
                r"\ensuremath{{{:.*} ^{{\circ}}}}",
                self.digits.min(MAX_DIGITS),
                self.degrees
            )
        }
    }
}

impl Add for Degrees {
    type Output = Degrees;

    fn add(self, rhs: Degrees) -> Degrees {
        Degrees::new(self.degrees + rhs.degrees)
    }
}

/// A bare number added to an angle is taken to be in radians.
impl Add<f64> for Degrees {
    type Output = Degrees;

    fn add(self, radians: f64) -> Degrees {
        self.add_radians(radians)
    }
}

impl Sub for Degrees {
    type Output = Degrees;

    fn sub(self, rhs: Degrees) -> Degrees {
        self + (-rhs)
    }
}

impl Sub<f64> for Degrees {
    type Output = Degrees;

    fn sub(self, radians: f64) -> Degrees {
        self.add_radians(-radians)
    }
}

impl Neg for Degrees {
    type Output = Degrees;

    fn neg(self) -> Degrees {
        Degrees::new(-self.degrees)
    }
}

impl Mul<f64> for Degrees {
    type Output = Degrees;

    fn mul(self, factor: f64) -> Degrees {
        Degrees {
            degrees: self.degrees * factor,
            digits: self.digits,
        }
    }
}

impl Mul<Degrees> for f64 {
    type Output = Degrees;

    fn mul(self, angle: Degrees) -> Degrees {
        angle * self
    }
}

impl Div<f64> for Degrees {
    type Output = Degrees;

    fn div(self, divisor: f64) -> Degrees {
        Degrees {
            degrees: self.degrees / divisor,
            digits: self.digits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_radians() {
        assert!((Degrees::new(45.0).radians() - PI / 4.0).abs() < 1e-12);
        assert!((Degrees::new(180.0).radians() - PI).abs() < 1e-12);
        assert!((Degrees::new(45.0).tan() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(Degrees::new(45.0).to_string(), r"\ensuremath{45 ^{\circ}}");
        assert_eq!(Degrees::new(-30.0).to_string(), r"\ensuremath{-30 ^{\circ}}");
        assert_eq!(
            Degrees::new(22.26).to_string(),
            r"\ensuremath{22.3 ^{\circ}}"
        );
        assert_eq!(
            Degrees::new(22.26).with_digits(2).to_string(),
            r"\ensuremath{22.26 ^{\circ}}"
        );
        assert_eq!(Degrees::new(30.00001).to_string(), r"\ensuremath{30 ^{\circ}}");
        assert_eq!(Degrees::new(29.99999).to_string(), r"\ensuremath{30.0 ^{\circ}}");
    }

    #[test]
    fn test_display_large_and_negative_zero() {
        assert_eq!(
            Degrees::new(1e19).to_string(),
            r"\ensuremath{10000000000000000000 ^{\circ}}"
        );
        assert_eq!(Degrees::new(-0.00001).to_string(), r"\ensuremath{0 ^{\circ}}");
        assert!(Degrees::new(1e19).is_finite());
        assert!(!(Degrees::new(f64::MAX) * 10.0).is_finite());
    }

    #[test]
    fn test_copy_keeps_digits() {
        let a = Degrees::new(19.8).with_digits(3);
        let b = a;
        assert_eq!(b.digits(), 3);
        assert_eq!(b.degrees(), 19.8);
    }

    #[test]
    fn test_add_degrees_and_radians() {
        let sum = Degrees::new(45.0) + Degrees::new(10.0);
        assert_eq!(sum.degrees(), 55.0);

        let sum = Degrees::new(45.0) + PI / 4.0;
        assert!((sum.degrees() - 90.0).abs() < 1e-9);

        let explicit = Degrees::new(45.0).add_radians(PI / 4.0);
        assert_eq!(explicit, sum);
    }

    #[test]
    fn test_sum_resets_digits() {
        let sum = Degrees::new(10.0).with_digits(3) + Degrees::new(1.5);
        assert_eq!(sum.digits(), DEFAULT_ANGLE_DIGITS);
    }

    #[test]
    fn test_neg_and_scale() {
        assert_eq!((-Degrees::new(30.0)).degrees(), -30.0);
        assert_eq!((Degrees::new(30.0) / 2.0).degrees(), 15.0);
        assert_eq!((0.5 * Degrees::new(50.0)).degrees(), 25.0);
        assert!(Degrees::new(30.0) < Degrees::new(31.0));
    }
}
