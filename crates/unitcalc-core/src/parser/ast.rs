//! Abstract Syntax Tree definitions

use pest::iterators::{Pair, Pairs};

use super::{parse_literal, Rule};
use crate::error::{QuantityError, QuantityResult};
use crate::types::Dimensions;

/// Top-level AST node for a line
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// Empty line
    Empty,
    /// Variable assignment: name = expr
    Assignment { name: String, expr: Box<Expr> },
    /// Expression to evaluate
    Expression(Expr),
    /// Comparison: left > right
    Comparison {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Raw numeric literal
    Number(f64),
    /// Bracketed quantity literal: [2 lb/ft^2]
    Quantity {
        magnitude: f64,
        dimensions: Dimensions,
    },
    /// Variable reference
    Variable(String),
    /// Unary minus
    Negate(Box<Expr>),
    /// Binary operation
    BinaryOp {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Function call: abs(x), deg(45)
    FunctionCall { name: String, args: Vec<Expr> },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

/// Failure while building the tree. Literal errors keep their own kind;
/// everything else becomes a syntax error on the whole line.
enum BuildError {
    Syntax(String),
    Quantity(QuantityError),
}

impl From<&str> for BuildError {
    fn from(reason: &str) -> Self {
        BuildError::Syntax(reason.to_string())
    }
}

impl From<String> for BuildError {
    fn from(reason: String) -> Self {
        BuildError::Syntax(reason)
    }
}

impl From<QuantityError> for BuildError {
    fn from(e: QuantityError) -> Self {
        BuildError::Quantity(e)
    }
}

type BuildResult<T> = Result<T, BuildError>;

/// Build AST from parsed pairs
pub fn build_ast(pairs: Pairs<'_, Rule>, input: &str) -> QuantityResult<Ast> {
    let syntax = |e: BuildError| match e {
        BuildError::Syntax(reason) => QuantityError::syntax(input, reason),
        BuildError::Quantity(e) => e,
    };

    for pair in pairs {
        if pair.as_rule() != Rule::line {
            continue;
        }
        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::assignment => return build_assignment(inner.into_inner()).map_err(syntax),
                Rule::comparison => return build_comparison(inner.into_inner()).map_err(syntax),
                _ => {}
            }
        }
        return Ok(Ast::Empty);
    }
    Ok(Ast::Empty)
}

fn build_assignment(mut pairs: Pairs<'_, Rule>) -> BuildResult<Ast> {
    let name = pairs
        .next()
        .ok_or("Expected identifier")?
        .as_str()
        .to_string();

    let expr_pair = pairs.next().ok_or("Expected expression")?;
    let expr = build_calculation(expr_pair.into_inner())?;

    Ok(Ast::Assignment {
        name,
        expr: Box::new(expr),
    })
}

fn build_comparison(mut pairs: Pairs<'_, Rule>) -> BuildResult<Ast> {
    let left_pair = pairs.next().ok_or("Expected expression")?;
    let left = build_calculation(left_pair.into_inner())?;

    let Some(op_pair) = pairs.next() else {
        return Ok(Ast::Expression(left));
    };
    let op = match op_pair.as_rule() {
        Rule::greater => CompareOp::Greater,
        Rule::greater_equal => CompareOp::GreaterEqual,
        Rule::less => CompareOp::Less,
        Rule::less_equal => CompareOp::LessEqual,
        rule => return Err(format!("Unexpected comparison operator: {rule:?}").into()),
    };
    let right_pair = pairs.next().ok_or("Expected right-hand expression")?;
    let right = build_calculation(right_pair.into_inner())?;

    Ok(Ast::Comparison {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

fn build_calculation(pairs: Pairs<'_, Rule>) -> BuildResult<Expr> {
    let mut terms: Vec<Expr> = Vec::new();
    let mut ops: Vec<BinaryOp> = Vec::new();

    for pair in pairs {
        match pair.as_rule() {
            Rule::term => terms.push(build_term(pair)?),
            Rule::add => ops.push(BinaryOp::Add),
            Rule::subtract => ops.push(BinaryOp::Subtract),
            Rule::multiply => ops.push(BinaryOp::Multiply),
            Rule::divide => ops.push(BinaryOp::Divide),
            Rule::power => ops.push(BinaryOp::Power),
            _ => {}
        }
    }

    // Build expression tree with precedence
    if terms.is_empty() {
        return Err("Empty expression".into());
    }

    // Pass 1: Power
    process_ops(&mut terms, &mut ops, &[BinaryOp::Power]);

    // Pass 2: Multiply, Divide
    process_ops(
        &mut terms,
        &mut ops,
        &[BinaryOp::Multiply, BinaryOp::Divide],
    );

    // Pass 3: Add, Subtract
    process_ops(&mut terms, &mut ops, &[BinaryOp::Add, BinaryOp::Subtract]);

    if terms.len() != 1 {
        return Err("Failed to reduce expression".into());
    }

    Ok(terms.remove(0))
}

fn process_ops(terms: &mut Vec<Expr>, ops: &mut Vec<BinaryOp>, target_ops: &[BinaryOp]) {
    let mut i = 0;
    while i < ops.len() {
        if target_ops.contains(&ops[i]) {
            let op = ops.remove(i);
            let left = terms.remove(i);
            let right = terms.remove(i);

            terms.insert(
                i,
                Expr::BinaryOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            );
        } else {
            i += 1;
        }
    }
}

/// A term is an atom preceded by any number of unary minus signs
fn build_term(pair: Pair<'_, Rule>) -> BuildResult<Expr> {
    let mut negations = 0;
    let mut atom = None;
    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::negate => negations += 1,
            _ => atom = Some(build_atom(inner)?),
        }
    }

    let mut expr = atom.ok_or("Expected value")?;
    for _ in 0..negations {
        expr = Expr::Negate(Box::new(expr));
    }
    Ok(expr)
}

fn build_atom(pair: Pair<'_, Rule>) -> BuildResult<Expr> {
    match pair.as_rule() {
        Rule::number => {
            let n: f64 = pair.as_str().parse().map_err(|e| format!("{e}"))?;
            if !n.is_finite() {
                return Err(QuantityError::parse(pair.as_str(), "number is out of range").into());
            }
            Ok(Expr::Number(n))
        }
        Rule::quantity_literal => {
            let body = pair.into_inner().next().ok_or("Expected quantity literal")?;
            let (magnitude, dimensions) = parse_literal(body.as_str())?;
            Ok(Expr::Quantity {
                magnitude,
                dimensions,
            })
        }
        Rule::variable_ref => Ok(Expr::Variable(pair.as_str().to_string())),
        Rule::function_call => build_function_call(pair),
        Rule::parenthesized => {
            let inner = pair.into_inner().next().ok_or("Expected expression")?;
            build_calculation(inner.into_inner())
        }
        rule => Err(format!("Unexpected rule: {rule:?}").into()),
    }
}

fn build_function_call(pair: Pair<'_, Rule>) -> BuildResult<Expr> {
    let mut inner = pair.into_inner();
    let name = inner
        .next()
        .ok_or("Expected function name")?
        .as_str()
        .to_string();

    let mut args = Vec::new();
    for arg_pair in inner {
        if arg_pair.as_rule() == Rule::calculation {
            args.push(build_calculation(arg_pair.into_inner())?);
        }
    }

    Ok(Expr::FunctionCall { name, args })
}
