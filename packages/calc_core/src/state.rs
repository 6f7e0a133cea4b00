//! The calculator's input state, as a plain serializable value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::key::Operator;

/// Operator remembered between presses. `Equals` is stored like any other
/// operator but never dispatched to the arithmetic service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PendingOperator {
    Apply(Operator),
    Equals,
}

impl fmt::Display for PendingOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apply(op) => write!(f, "{op}"),
            Self::Equals => write!(f, "="),
        }
    }
}

impl FromStr for PendingOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Self::Equals),
            other => other.parse::<Operator>().map(Self::Apply),
        }
    }
}

impl From<PendingOperator> for String {
    fn from(op: PendingOperator) -> Self {
        op.to_string()
    }
}

impl TryFrom<String> for PendingOperator {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Display buffer, pending operand and operator, and the fresh-entry flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatorState {
    /// Number being entered or the last result. Never empty.
    pub display: String,
    /// Captured at the first operator press, then replaced by each result.
    /// Serialized through its display form so `NaN` survives.
    #[serde(default, with = "operand_text")]
    pub pending_operand: Option<f64>,
    #[serde(default)]
    pub pending_operator: Option<PendingOperator>,
    /// Next digit starts a new number instead of appending.
    #[serde(default)]
    pub fresh_entry: bool,
}

impl Default for CalculatorState {
    fn default() -> Self {
        Self {
            display: "0".to_string(),
            pending_operand: None,
            pending_operator: None,
            fresh_entry: false,
        }
    }
}

impl CalculatorState {
    pub fn input_digit(&mut self, digit: char) {
        if self.fresh_entry {
            self.display = digit.to_string();
            self.fresh_entry = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    pub fn input_decimal(&mut self) {
        if self.fresh_entry {
            self.display = "0.".to_string();
            self.fresh_entry = false;
        } else if !self.display.contains('.') {
            self.display.push('.');
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

mod operand_text {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::number::{format_number, parse_operand};

    pub fn serialize<S: Serializer>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => serializer.serialize_some(&format_number(*v)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        let text = Option::<String>::deserialize(deserializer)?;
        Ok(text.map(|t| parse_operand(&t)))
    }
}
