//! Keypad keys and the four dispatchable operators.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An arithmetic operator the service can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub const ALL: [Operator; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Keypad label.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    /// Operation name, as used on the wire.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" | "add" => Ok(Self::Add),
            "-" | "subtract" => Ok(Self::Subtract),
            "*" | "multiply" => Ok(Self::Multiply),
            "/" | "divide" => Ok(Self::Divide),
            _ => Err(format!("unknown operator: {s}")),
        }
    }
}

/// A single key press on the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A decimal digit, always in `0..=9`.
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    Clear,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digit(d) => write!(f, "{d}"),
            Self::Decimal => write!(f, "."),
            Self::Operator(op) => write!(f, "{op}"),
            Self::Equals => write!(f, "="),
            Self::Clear => write!(f, "Clear"),
        }
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(d) = s.parse::<u8>() {
            if s.len() == 1 {
                return Ok(Self::Digit(d));
            }
        }
        match s {
            "." => Ok(Self::Decimal),
            "=" => Ok(Self::Equals),
            "C" | "c" | "clear" | "Clear" => Ok(Self::Clear),
            other => other
                .parse::<Operator>()
                .map(Self::Operator)
                .map_err(|_| format!("unknown key: {other}")),
        }
    }
}

/// The fixed 4x4 keypad, row by row. `Clear` sits on its own row below it.
pub const KEYPAD: [[Key; 4]; 4] = [
    [
        Key::Digit(7),
        Key::Digit(8),
        Key::Digit(9),
        Key::Operator(Operator::Divide),
    ],
    [
        Key::Digit(4),
        Key::Digit(5),
        Key::Digit(6),
        Key::Operator(Operator::Multiply),
    ],
    [
        Key::Digit(1),
        Key::Digit(2),
        Key::Digit(3),
        Key::Operator(Operator::Subtract),
    ],
    [
        Key::Digit(0),
        Key::Decimal,
        Key::Equals,
        Key::Operator(Operator::Add),
    ],
];
