//! Parameter documents
//!
//! Design inputs live in a JSON file next to the calculation:
//!
//! ```json
//! {
//!   "display": { "digits": 3, "order": ["lb", "ft"], "markup": "plain" },
//!   "values": {
//!     "H": "6 ft",
//!     "K_a": { "literal": "0.2834", "digits": 4 },
//!     "beta": { "degrees": 86 },
//!     "n_courses": 9
//!   }
//! }
//! ```
//!
//! Every literal is parsed when the document loads, and every bad entry is
//! reported in a single error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::debug;

use crate::error::{QuantityError, QuantityResult};
use crate::eval::Value;
use crate::types::angle::DEFAULT_ANGLE_DIGITS;
use crate::types::format::check_digits;
use crate::types::{Degrees, DisplayConfig, Quantity};

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamDocument {
    #[serde(default)]
    display: DisplayConfig,
    #[serde(default)]
    values: BTreeMap<String, serde_json::Value>,
}

/// One entry of the `values` table as written in the file
#[derive(Deserialize)]
#[serde(untagged)]
enum ParamEntry {
    Number(f64),
    Literal(String),
    Quantity {
        literal: String,
        digits: Option<usize>,
    },
    Angle {
        degrees: f64,
        digits: Option<usize>,
    },
}

impl ParamEntry {
    /// Problems are reported as plain text; the caller prefixes the name
    fn into_value(self, display: &DisplayConfig) -> Result<Value, String> {
        let parse = |literal: &str| {
            Quantity::parse_with(literal, display.clone()).map_err(|e| e.to_string())
        };
        match self {
            ParamEntry::Number(n) => Ok(Value::Number(n)),
            ParamEntry::Literal(literal) => parse(&literal).map(Value::Quantity),
            ParamEntry::Quantity { literal, digits } => {
                let quantity = parse(&literal)?;
                Ok(Value::Quantity(match digits {
                    Some(digits) => quantity.with_digits(check_digits(digits)?),
                    None => quantity,
                }))
            }
            ParamEntry::Angle { degrees, digits } => {
                let digits = check_digits(digits.unwrap_or(DEFAULT_ANGLE_DIGITS))?;
                Ok(Value::Angle(Degrees::new(degrees).with_digits(digits)))
            }
        }
    }
}

/// Named design inputs loaded from a parameter document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    display: DisplayConfig,
    values: BTreeMap<String, Value>,
}

impl Parameters {
    /// Parse a JSON parameter document
    pub fn from_json_str(json: &str) -> QuantityResult<Self> {
        let document: ParamDocument =
            serde_json::from_str(json).map_err(|e| QuantityError::SerializationError {
                reason: e.to_string(),
            })?;

        let mut values = BTreeMap::new();
        let mut problems = Vec::new();
        for (name, raw) in document.values {
            let entry = match serde_json::from_value::<ParamEntry>(raw) {
                Ok(entry) => entry,
                Err(_) => {
                    problems.push(format!(
                        "{name}: expected a number, a literal string, {{\"literal\", \"digits\"}} or {{\"degrees\", \"digits\"}}"
                    ));
                    continue;
                }
            };
            match entry.into_value(&document.display) {
                Ok(value) => {
                    values.insert(name, value);
                }
                Err(e) => problems.push(format!("{name}: {e}")),
            }
        }

        if !problems.is_empty() {
            return Err(QuantityError::InvalidParameters { problems });
        }

        debug!(count = values.len(), "loaded parameters");
        Ok(Self {
            display: document.display,
            values,
        })
    }

    /// Read and parse a parameter document from disk
    pub fn from_path(path: impl AsRef<Path>) -> QuantityResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            QuantityError::file_error("read", path.display().to_string(), e.to_string())
        })?;
        debug!(path = %path.display(), "reading parameter document");
        Self::from_json_str(&content)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// The named parameter as a quantity
    pub fn quantity(&self, name: &str) -> QuantityResult<&Quantity> {
        match self.lookup(name)? {
            Value::Quantity(q) => Ok(q),
            other => Err(wrong_kind(name, "quantity", other)),
        }
    }

    /// The named parameter as a raw number. Dimensionless quantities
    /// qualify.
    pub fn number(&self, name: &str) -> QuantityResult<f64> {
        match self.lookup(name)? {
            Value::Number(n) => Ok(*n),
            Value::Quantity(q) if q.is_dimensionless() => Ok(q.magnitude()),
            other => Err(wrong_kind(name, "number", other)),
        }
    }

    /// The named parameter as an angle
    pub fn angle(&self, name: &str) -> QuantityResult<Degrees> {
        match self.lookup(name)? {
            Value::Angle(a) => Ok(*a),
            other => Err(wrong_kind(name, "angle", other)),
        }
    }

    /// Fail with every name in `names` that the document does not define
    pub fn require(&self, names: &[&str]) -> QuantityResult<()> {
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.values.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(QuantityError::MissingParameters { names: missing })
        }
    }

    /// Parameter names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Display configuration applied to the document's literals
    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn lookup(&self, name: &str) -> QuantityResult<&Value> {
        self.values
            .get(name)
            .ok_or_else(|| QuantityError::MissingParameters {
                names: vec![name.to_string()],
            })
    }
}

impl FromStr for Parameters {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}

fn wrong_kind(name: &str, expected: &str, found: &Value) -> QuantityError {
    let found = match found {
        Value::Number(_) => "a number",
        Value::Quantity(_) => "a quantity",
        Value::Angle(_) => "an angle",
        Value::Bool(_) => "a boolean",
    };
    QuantityError::invalid_parameter(name, format!("expected {expected}, found {found}"))
}
