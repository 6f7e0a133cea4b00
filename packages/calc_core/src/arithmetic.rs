//! The arithmetic service boundary.
//!
//! The state machine never computes anything itself: every operator press
//! that needs a result becomes a call on an [`ArithmeticService`]. Any
//! failure reported here is shown as `NaN` by the calculator.

use std::future::Future;

use crate::key::Operator;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("arithmetic backend unavailable: {0}")]
    Unavailable(String),

    #[error("arithmetic backend error: {0}")]
    Backend(String),
}

impl ArithmeticError {
    pub fn error_code(&self) -> &str {
        match self {
            Self::DivisionByZero => "division_by_zero",
            Self::Unavailable(_) => "unavailable",
            Self::Backend(_) => "backend",
        }
    }

    /// Rebuild an error from its wire code.
    pub fn from_code(code: &str, message: &str) -> Self {
        match code {
            "division_by_zero" => Self::DivisionByZero,
            "unavailable" => Self::Unavailable(message.to_string()),
            _ => Self::Backend(message.to_string()),
        }
    }
}

impl Operator {
    /// Evaluate `a op b` in IEEE-754 arithmetic. Overflow yields an infinity
    /// and `NaN` operands yield `NaN`; only a zero divisor is an error.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        match self {
            Self::Add => Ok(a + b),
            Self::Subtract => Ok(a - b),
            Self::Multiply => Ok(a * b),
            Self::Divide if b == 0.0 => Err(ArithmeticError::DivisionByZero),
            Self::Divide => Ok(a / b),
        }
    }
}

/// Four binary operations, each resolved asynchronously.
pub trait ArithmeticService: Send + Sync + 'static {
    fn add(&self, a: f64, b: f64) -> impl Future<Output = Result<f64, ArithmeticError>> + Send;

    fn subtract(&self, a: f64, b: f64)
    -> impl Future<Output = Result<f64, ArithmeticError>> + Send;

    fn multiply(&self, a: f64, b: f64)
    -> impl Future<Output = Result<f64, ArithmeticError>> + Send;

    /// Fails with [`ArithmeticError::DivisionByZero`] when `b == 0`.
    fn divide(&self, a: f64, b: f64) -> impl Future<Output = Result<f64, ArithmeticError>> + Send;
}

/// Dispatch one operator to the matching service call.
pub async fn evaluate<S: ArithmeticService>(
    service: &S,
    operator: Operator,
    a: f64,
    b: f64,
) -> Result<f64, ArithmeticError> {
    match operator {
        Operator::Add => service.add(a, b).await,
        Operator::Subtract => service.subtract(a, b).await,
        Operator::Multiply => service.multiply(a, b).await,
        Operator::Divide => service.divide(a, b).await,
    }
}

/// In-process service.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalArithmetic;

impl ArithmeticService for LocalArithmetic {
    async fn add(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        Operator::Add.apply(a, b)
    }

    async fn subtract(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        Operator::Subtract.apply(a, b)
    }

    async fn multiply(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        Operator::Multiply.apply(a, b)
    }

    async fn divide(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        Operator::Divide.apply(a, b)
    }
}
