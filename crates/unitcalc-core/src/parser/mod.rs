//! Quantity literal and calculator line parsing using pest

mod ast;

pub use ast::{Ast, BinaryOp, CompareOp, Expr};

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use tracing::debug;

use crate::error::{QuantityError, QuantityResult};
use crate::types::Dimensions;

#[derive(Parser)]
#[grammar = "parser/grammar.pest"]
pub struct UnitsParser;

/// Parse a quantity literal such as `"1.0 lb/ft^2"` into its magnitude and
/// dimension map.
///
/// The leading run of `-`, `.` and digits is the magnitude. Everything after
/// it, with whitespace removed, is the unit expression.
pub fn parse_literal(literal: &str) -> QuantityResult<(f64, Dimensions)> {
    let text = literal.trim_start();
    let prefix = UnitsParser::parse(Rule::magnitude, text)
        .ok()
        .and_then(|mut pairs| pairs.next())
        .ok_or_else(|| QuantityError::parse(literal, "missing numeric magnitude"))?;

    let magnitude: f64 = prefix.as_str().parse().map_err(|_| {
        QuantityError::parse(
            literal,
            format!("'{}' is not a valid number", prefix.as_str()),
        )
    })?;
    if !magnitude.is_finite() {
        return Err(QuantityError::parse(
            literal,
            format!("magnitude '{}' is out of range", prefix.as_str()),
        ));
    }

    let remainder: String = text[prefix.as_span().end()..]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if remainder.is_empty() {
        return Ok((magnitude, Dimensions::new()));
    }

    let dimensions = parse_unit_expression(&remainder)
        .map_err(|reason| QuantityError::parse(literal, reason))?;
    debug!(literal, magnitude, dimensions = %dimensions, "parsed quantity literal");
    Ok((magnitude, dimensions))
}

/// Parse a whitespace-free unit expression such as `lb/ft^2` or
/// `L*atm/mol/K`. Terms accumulate left to right; a `/` negates only the
/// term that follows it.
pub fn parse_unit_expression(expression: &str) -> Result<Dimensions, String> {
    let pairs = UnitsParser::parse(Rule::unit_expression, expression)
        .map_err(|e| format!("invalid unit expression '{expression}': {}", e.variant.message()))?;

    let mut dimensions = Dimensions::new();
    let mut sign = 1;
    for pair in pairs.flatten() {
        match pair.as_rule() {
            Rule::times => sign = 1,
            Rule::per => sign = -1,
            Rule::unit_term => {
                let (symbol, exponent) = build_unit_term(pair)?;
                dimensions
                    .accumulate(&symbol, sign * exponent)
                    .ok_or_else(|| format!("exponent of '{symbol}' overflows"))?;
            }
            _ => {}
        }
    }
    Ok(dimensions)
}

fn build_unit_term(pair: Pair<'_, Rule>) -> Result<(String, i32), String> {
    let mut symbol = String::new();
    let mut exponent = 1;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::symbol => symbol = inner.as_str().to_string(),
            Rule::exponent => {
                exponent = inner
                    .as_str()
                    .parse()
                    .map_err(|_| format!("exponent '{}' is out of range", inner.as_str()))?;
            }
            _ => {}
        }
    }
    Ok((symbol, exponent))
}

/// Parse a calculator line
pub fn parse_line(input: &str) -> QuantityResult<Ast> {
    let pairs = UnitsParser::parse(Rule::line, input)
        .map_err(|e| QuantityError::syntax(input, e.variant.message().to_string()))?;
    ast::build_ast(pairs, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dims(entries: &[(&str, i32)]) -> Dimensions {
        entries.iter().map(|(s, e)| (s.to_string(), *e)).collect()
    }

    #[test]
    fn test_parse_simple_literal() {
        let (m, d) = parse_literal("1.0 lb/ft^2").unwrap();
        assert_eq!(m, 1.0);
        assert_eq!(d, dims(&[("lb", 1), ("ft", -2)]));
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let (m, d) = parse_literal("  1 lb / ft ^ 2").unwrap();
        assert_eq!(m, 1.0);
        assert_eq!(d, dims(&[("lb", 1), ("ft", -2)]));
    }

    #[test]
    fn test_dimensionless_literal() {
        let (m, d) = parse_literal("-0.25").unwrap();
        assert_eq!(m, -0.25);
        assert!(d.is_dimensionless());

        let (m, _) = parse_literal(".5").unwrap();
        assert_eq!(m, 0.5);
    }

    #[test]
    fn test_division_applies_to_next_term_only() {
        let (_, d) = parse_literal("8.314 L*atm/mol/K").unwrap();
        assert_eq!(d, dims(&[("L", 1), ("atm", 1), ("mol", -1), ("K", -1)]));

        let (_, d) = parse_literal("1 lb/ft*sec").unwrap();
        assert_eq!(d, dims(&[("lb", 1), ("ft", -1), ("sec", 1)]));
    }

    #[test]
    fn test_terms_cancel() {
        let (_, d) = parse_literal("3 ft*lb/ft").unwrap();
        assert_eq!(d, dims(&[("lb", 1)]));

        let (_, d) = parse_literal("3 ft/ft").unwrap();
        assert!(d.is_dimensionless());
    }

    #[test]
    fn test_explicit_exponents() {
        let (_, d) = parse_literal("2 ft^-2*lb").unwrap();
        assert_eq!(d, dims(&[("lb", 1), ("ft", -2)]));

        let (_, d) = parse_literal("2 m^+3/s^2").unwrap();
        assert_eq!(d, dims(&[("m", 3), ("s", -2)]));
    }

    #[test]
    fn test_symbols_are_case_sensitive() {
        let (_, d) = parse_literal("1 K*k").unwrap();
        assert_eq!(d, dims(&[("K", 1), ("k", 1)]));
    }

    #[test]
    fn test_malformed_magnitude() {
        for literal in ["lb", "", ".", "1-2 ft", "--3", " / ft"] {
            let err = parse_literal(literal).unwrap_err();
            assert_eq!(err.error_code(), "PARSE_ERROR", "literal {literal:?}");
        }
    }

    #[test]
    fn test_overflowing_magnitude() {
        let literal = format!("1{} ft", "0".repeat(400));
        let err = parse_literal(&literal).unwrap_err();
        assert_eq!(err.error_code(), "PARSE_ERROR");
        assert!(err.to_string().contains("out of range"));

        let (m, _) = parse_literal(&format!("1{} ft", "0".repeat(300))).unwrap();
        assert!(m.is_finite());
    }

    #[test]
    fn test_malformed_unit_expression() {
        for literal in ["1 lb/", "1 lb//ft", "1 ft^", "1 ft^x", "1 ft^2^3", "1 *ft"] {
            let err = parse_literal(literal).unwrap_err();
            assert_eq!(err.error_code(), "PARSE_ERROR", "literal {literal:?}");
        }
    }

    #[test]
    fn test_parse_line() {
        assert!(parse_line("[2 lb/ft^2] * [3 ft]").is_ok());
        assert!(parse_line("x = 10").is_ok());
        assert!(parse_line("").is_ok());
        assert!(parse_line("1 +").is_err());
    }
}
