//! Expression evaluation engine

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{QuantityError, QuantityResult};
use crate::parser::{Ast, BinaryOp, CompareOp, Expr};
use crate::types::format::MAX_DIGITS;
use crate::types::{Degrees, DisplayConfig, Quantity};

/// Result of evaluating a calculator expression
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(f64),
    Quantity(Quantity),
    Angle(Degrees),
    Bool(bool),
}

impl Value {
    /// Numeric value of a raw number or a dimensionless quantity
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Quantity(q) if q.is_dimensionless() => Some(q.magnitude()),
            _ => None,
        }
    }

    pub fn as_quantity(&self) -> Option<&Quantity> {
        match self {
            Value::Quantity(q) => Some(q),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Render for output. Raw numbers take their digit count from `config`;
    /// quantities and angles carry their own.
    pub fn render(&self, config: &DisplayConfig) -> String {
        match self {
            Value::Number(n) => format!("{:.*}", config.digits.min(MAX_DIGITS), n),
            Value::Quantity(q) => q.to_string(),
            Value::Angle(a) => a.to_string(),
            Value::Bool(b) => b.to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Quantity(_) => "quantity",
            Value::Angle(_) => "angle",
            Value::Bool(_) => "boolean",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&DisplayConfig::default()))
    }
}

impl From<Quantity> for Value {
    fn from(q: Quantity) -> Self {
        Value::Quantity(q)
    }
}

impl From<Degrees> for Value {
    fn from(a: Degrees) -> Self {
        Value::Angle(a)
    }
}

/// Evaluation context with variables and the display configuration applied
/// to quantity literals
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    pub(crate) variables: HashMap<String, Value>,
    pub(crate) display: DisplayConfig,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_display(display: DisplayConfig) -> Self {
        Self {
            variables: HashMap::new(),
            display,
        }
    }

    /// Get a variable value
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.variables.get(name)
    }

    /// Set a variable
    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Clear all variables
    pub fn clear_variables(&mut self) {
        self.variables.clear();
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn set_display(&mut self, display: DisplayConfig) {
        self.display = display;
    }
}

/// Evaluate an AST node. Assignments store the value under the name and
/// return it.
pub fn evaluate(ast: &Ast, ctx: &mut EvalContext) -> QuantityResult<Option<Value>> {
    match ast {
        Ast::Empty => Ok(None),
        Ast::Assignment { name, expr } => {
            let value = eval_expr(expr, ctx)?;
            debug!(name = %name, value = %value, "assign");
            ctx.set_variable(name.clone(), value.clone());
            Ok(Some(value))
        }
        Ast::Expression(expr) => eval_expr(expr, ctx).map(Some),
        Ast::Comparison { op, left, right } => {
            let lval = eval_expr(left, ctx)?;
            let rval = eval_expr(right, ctx)?;
            eval_comparison(*op, &lval, &rval).map(|b| Some(Value::Bool(b)))
        }
    }
}

fn eval_expr(expr: &Expr, ctx: &EvalContext) -> QuantityResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Quantity {
            magnitude,
            dimensions,
        } => Quantity::from_parts(*magnitude, dimensions.clone(), ctx.display.clone())
            .map(Value::Quantity),

        Expr::Variable(name) => ctx
            .get_variable(name)
            .cloned()
            .ok_or_else(|| QuantityError::UnknownVariable { name: name.clone() }),

        Expr::Negate(inner) => match eval_expr(inner, ctx)? {
            Value::Number(n) => Ok(Value::Number(-n)),
            Value::Quantity(q) => Ok(Value::Quantity(-q)),
            Value::Angle(a) => Ok(Value::Angle(-a)),
            Value::Bool(_) => Err(QuantityError::invalid_operation("cannot negate a boolean")),
        },

        Expr::BinaryOp { op, left, right } => {
            let lval = eval_expr(left, ctx)?;
            let rval = eval_expr(right, ctx)?;
            eval_binary_op(*op, lval, rval)
        }

        Expr::FunctionCall { name, args } => {
            let evaluated_args = args
                .iter()
                .map(|a| eval_expr(a, ctx))
                .collect::<QuantityResult<Vec<_>>>()?;
            trace!(function = %name, arity = evaluated_args.len(), "call");
            eval_function(name, &evaluated_args)
        }
    }
}

fn unsupported(op: &str, left: &Value, right: &Value) -> QuantityError {
    QuantityError::invalid_operation(format!(
        "cannot {op} {} and {}",
        left.kind(),
        right.kind()
    ))
}

fn finite(n: f64) -> QuantityResult<Value> {
    if n.is_finite() {
        Ok(Value::Number(n))
    } else {
        Err(QuantityError::invalid_operation(format!(
            "result {n} is not finite"
        )))
    }
}

fn finite_angle(a: Degrees) -> QuantityResult<Value> {
    if a.is_finite() {
        Ok(Value::Angle(a))
    } else {
        Err(QuantityError::invalid_operation(format!(
            "angle {} is not finite",
            a.degrees()
        )))
    }
}

fn eval_binary_op(op: BinaryOp, left: Value, right: Value) -> QuantityResult<Value> {
    use BinaryOp::*;

    match (&left, &right) {
        (Value::Number(l), Value::Number(r)) => match op {
            Add => finite(l + r),
            Subtract => finite(l - r),
            Multiply => finite(l * r),
            Divide if *r == 0.0 => Err(QuantityError::invalid_operation("division by zero")),
            Divide => finite(l / r),
            Power => finite(l.powf(*r)),
        },

        (Value::Quantity(q), Value::Number(n)) => match op {
            Add => q.try_add(*n),
            Subtract => q.try_sub(*n),
            Multiply => q.try_mul(*n),
            Divide => q.try_div(*n),
            Power => q.try_pow(*n),
        }
        .map(Value::Quantity),

        (Value::Number(n), Value::Quantity(q)) => match op {
            Add => q.try_add(*n),
            Subtract => q.rsub(*n),
            Multiply => q.try_mul(*n),
            Divide => q.rdiv(*n),
            Power => return Err(unsupported("raise", &left, &right)),
        }
        .map(Value::Quantity),

        (Value::Quantity(a), Value::Quantity(b)) => match op {
            Add => a.try_add(b),
            Subtract => a.try_sub(b),
            Multiply => a.try_mul(b),
            Divide => a.try_div(b),
            Power => a.try_pow(b.to_f64()?),
        }
        .map(Value::Quantity),

        (Value::Angle(a), Value::Angle(b)) => match op {
            Add => finite_angle(*a + *b),
            Subtract => finite_angle(*a - *b),
            _ => Err(unsupported(verb(op), &left, &right)),
        },

        (Value::Angle(a), Value::Number(n)) => match op {
            Add => finite_angle(*a + *n),
            Subtract => finite_angle(*a - *n),
            Multiply => finite_angle(*a * *n),
            Divide if *n == 0.0 => Err(QuantityError::invalid_operation(format!(
                "division of {a} by zero"
            ))),
            Divide => finite_angle(*a / *n),
            Power => Err(unsupported("raise", &left, &right)),
        },

        (Value::Number(n), Value::Angle(a)) => match op {
            Add => finite_angle(*a + *n),
            Multiply => finite_angle(*n * *a),
            _ => Err(unsupported(verb(op), &left, &right)),
        },

        _ => Err(unsupported(verb(op), &left, &right)),
    }
}

fn verb(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "add",
        BinaryOp::Subtract => "subtract",
        BinaryOp::Multiply => "multiply",
        BinaryOp::Divide => "divide",
        BinaryOp::Power => "raise",
    }
}

fn eval_comparison(op: CompareOp, left: &Value, right: &Value) -> QuantityResult<bool> {
    use CompareOp::*;

    match (left, right) {
        (Value::Quantity(q), Value::Number(n)) => match op {
            Greater => q.try_gt(*n),
            GreaterEqual => q.try_ge(*n),
            Less => q.try_lt(*n),
            LessEqual => q.try_le(*n),
        },
        (Value::Quantity(a), Value::Quantity(b)) => match op {
            Greater => a.try_gt(b),
            GreaterEqual => a.try_ge(b),
            Less => a.try_lt(b),
            LessEqual => a.try_le(b),
        },
        // Mirrored: `n > q` is `q < n`
        (Value::Number(n), Value::Quantity(q)) => match op {
            Greater => q.try_lt(*n),
            GreaterEqual => q.try_le(*n),
            Less => q.try_gt(*n),
            LessEqual => q.try_ge(*n),
        },
        (Value::Number(l), Value::Number(r)) => Ok(ordered(op, l, r)),
        (Value::Angle(l), Value::Angle(r)) => Ok(ordered(op, l, r)),
        _ => Err(unsupported("compare", left, right)),
    }
}

fn ordered<T: PartialOrd>(op: CompareOp, l: &T, r: &T) -> bool {
    match op {
        CompareOp::Greater => l > r,
        CompareOp::GreaterEqual => l >= r,
        CompareOp::Less => l < r,
        CompareOp::LessEqual => l <= r,
    }
}

fn eval_function(name: &str, args: &[Value]) -> QuantityResult<Value> {
    let lower = name.to_lowercase();
    match (lower.as_str(), args) {
        ("abs", [Value::Number(n)]) => Ok(Value::Number(n.abs())),
        ("abs", [Value::Quantity(q)]) => q.abs().map(Value::Number),
        ("abs", [Value::Angle(a)]) => Ok(Value::Angle(
            Degrees::new(a.degrees().abs()).with_digits(a.digits()),
        )),

        ("trunc", [Value::Number(n)]) => Ok(Value::Number(n.trunc())),
        ("trunc", [Value::Quantity(q)]) => q.trunc().map(|t| Value::Number(t as f64)),

        ("float", [Value::Number(n)]) => Ok(Value::Number(*n)),
        ("float", [Value::Quantity(q)]) => q.to_f64().map(Value::Number),
        ("float", [Value::Angle(a)]) => Ok(Value::Number(a.radians())),

        ("sqrt", [arg]) => {
            let n = scalar_arg(name, arg)?;
            if n < 0.0 {
                return Err(QuantityError::invalid_operation(format!(
                    "cannot take the square root of negative number {n}"
                )));
            }
            Ok(Value::Number(n.sqrt()))
        }

        ("deg", [arg]) => finite_angle(Degrees::new(scalar_arg(name, arg)?)),
        ("rad", [arg]) => finite_angle(Degrees::from_radians(scalar_arg(name, arg)?)),

        ("sin" | "cos" | "tan", [arg]) => {
            let radians = match arg {
                Value::Angle(a) => a.radians(),
                other => scalar_arg(name, other)?,
            };
            let result = match lower.as_str() {
                "sin" => radians.sin(),
                "cos" => radians.cos(),
                _ => radians.tan(),
            };
            finite(result)
        }

        ("digits", [value, Value::Number(n)]) => {
            if n.fract() != 0.0 || *n < 0.0 {
                return Err(QuantityError::invalid_operation(format!(
                    "digits needs a non-negative integer, got {n}"
                )));
            }
            if *n > MAX_DIGITS as f64 {
                return Err(QuantityError::invalid_operation(format!(
                    "digits {n} exceeds the maximum of {MAX_DIGITS}"
                )));
            }
            let digits = *n as usize;
            match value {
                Value::Quantity(q) => Ok(Value::Quantity(q.clone().with_digits(digits))),
                Value::Angle(a) => Ok(Value::Angle(a.with_digits(digits))),
                Value::Number(m) => {
                    Quantity::dimensionless(*m).map(|q| Value::Quantity(q.with_digits(digits)))
                }
                Value::Bool(_) => Err(QuantityError::invalid_operation(
                    "digits cannot be applied to a boolean",
                )),
            }
        }

        ("abs" | "trunc" | "float" | "sqrt" | "deg" | "rad" | "sin" | "cos" | "tan", [_]) => {
            Err(QuantityError::invalid_operation(format!(
                "{name} is not defined for {}",
                args[0].kind()
            )))
        }
        ("abs" | "trunc" | "float" | "sqrt" | "deg" | "rad" | "sin" | "cos" | "tan", _) => {
            Err(QuantityError::invalid_operation(format!(
                "{name} expects 1 argument, got {}",
                args.len()
            )))
        }
        ("digits", _) => Err(QuantityError::invalid_operation(
            "digits expects a value and a digit count",
        )),

        _ => Err(QuantityError::invalid_operation(format!(
            "unknown function: {name}"
        ))),
    }
}

/// Raw number or dimensionless quantity argument
fn scalar_arg(function: &str, arg: &Value) -> QuantityResult<f64> {
    match arg {
        Value::Number(n) => Ok(*n),
        Value::Quantity(q) => q.to_f64(),
        other => Err(QuantityError::invalid_operation(format!(
            "{function} is not defined for {}",
            other.kind()
        ))),
    }
}
