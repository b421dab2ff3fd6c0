//! unitcalc-core: Dimensional quantity engine for unitcalc
//!
//! This crate parses quantity literals such as `"1.0 lb/ft^2"`, performs
//! dimension-checked arithmetic on them and renders the results as plain
//! text or LaTeX. It has no UI dependencies; the `unitcalc` CLI is a thin
//! shell around [`Calculator`].
//!
//! # Example
//!
//! ```
//! use unitcalc_core::{Calculator, DisplayConfig, Quantity};
//!
//! // Quantities directly
//! let pressure = Quantity::parse("2 lb/ft^2").unwrap().with_display(DisplayConfig::plain());
//! let width = Quantity::parse("3 ft").unwrap();
//! assert_eq!(pressure.try_mul(&width).unwrap().to_string(), "6.000 lb / ft");
//!
//! // Or through the calculator
//! let mut calc = Calculator::new();
//! calc.set_display(DisplayConfig::plain());
//! calc.eval("v = [10 mi/h] * [5280 ft/mi] / [3600 sec/h]").unwrap();
//! let speed = calc.eval("v").unwrap().unwrap();
//! assert_eq!(speed.to_string(), "14.667 ft / sec");
//! ```

pub mod error;
pub mod eval;
pub mod params;
pub mod parser;
pub mod types;

pub use error::{QuantityError, QuantityResult};
pub use eval::{EvalContext, Value};
pub use params::Parameters;
pub use parser::{parse_line, parse_literal, Ast, BinaryOp, CompareOp, Expr};
pub use types::{Degrees, Dimensions, DisplayConfig, Markup, Operand, Quantity};

/// Line-oriented calculator over quantities, angles and numbers
pub struct Calculator {
    context: EvalContext,
    parameters: Parameters,
    lines: Vec<LineResult>,
}

/// Result of evaluating a single line
#[derive(Debug, Clone)]
pub struct LineResult {
    pub input: String,
    /// `None` for blank and comment-only lines
    pub value: QuantityResult<Option<Value>>,
}

impl Calculator {
    /// Create a calculator with the default display configuration
    pub fn new() -> Self {
        Self::with_parameters(Parameters::default())
    }

    /// Create a calculator whose variables start out as the document's
    /// parameters, using the document's display configuration
    pub fn with_parameters(parameters: Parameters) -> Self {
        let mut calc = Self {
            context: EvalContext::with_display(parameters.display().clone()),
            parameters,
            lines: Vec::new(),
        };
        calc.seed_parameters();
        calc
    }

    /// Display configuration for quantity literals and raw numbers
    pub fn set_display(&mut self, display: DisplayConfig) {
        self.context.set_display(display);
    }

    pub fn display(&self) -> &DisplayConfig {
        self.context.display()
    }

    /// Evaluate a single line and store the result
    pub fn eval(&mut self, input: &str) -> QuantityResult<Option<Value>> {
        let result =
            parse_line(input).and_then(|ast| eval::evaluate(&ast, &mut self.context));

        self.lines.push(LineResult {
            input: input.to_string(),
            value: result.clone(),
        });

        result
    }

    pub fn variable(&self, name: &str) -> Option<&Value> {
        self.context.get_variable(name)
    }

    /// Get all line results
    pub fn lines(&self) -> &[LineResult] {
        &self.lines
    }

    /// Clear all lines and variables. Parameters are restored.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.context.clear_variables();
        self.seed_parameters();
    }

    fn seed_parameters(&mut self) {
        for (name, value) in self.parameters.iter() {
            self.context.set_variable(name, value.clone());
        }
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}
