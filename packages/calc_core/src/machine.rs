//! Input state machine: key presses in, display updates and arithmetic
//! requests out.
//!
//! The machine is synchronous. An operator press that needs a result returns
//! [`Transition::Compute`]; the caller runs the request against an
//! [`ArithmeticService`](crate::ArithmeticService) and hands the outcome back
//! through [`Calculator::complete`]. Only one request may be outstanding.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::arithmetic::ArithmeticError;
use crate::key::{Key, Operator};
use crate::number::{format_number, parse_operand};
use crate::state::{CalculatorState, PendingOperator};

/// Identifies one arithmetic request issued by a [`Calculator`].
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "calc-{}", self.0)
    }
}

/// One call the caller must make on the arithmetic service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArithmeticRequest {
    pub id: RequestId,
    pub operator: Operator,
    pub lhs: f64,
    pub rhs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// State changed locally; nothing to compute.
    Updated,
    /// The machine is now loading until this request completes.
    Compute(ArithmeticRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// Unknown or superseded request (e.g. cleared while loading).
    Discarded,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("calculation {0} still in flight")]
    Busy(RequestId),

    #[error("invalid digit: {0}")]
    InvalidDigit(u8),
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: RequestId,
    next: PendingOperator,
}

/// The calculator's input state plus the single in-flight request.
#[derive(Debug, Clone)]
pub struct Calculator {
    state: CalculatorState,
    in_flight: Option<InFlight>,
    next_id: u64,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::from_state(CalculatorState::default())
    }

    /// Resume from a previously captured state. Nothing is in flight.
    pub fn from_state(state: CalculatorState) -> Self {
        Self {
            state,
            in_flight: None,
            next_id: 1,
        }
    }

    pub fn state(&self) -> &CalculatorState {
        &self.state
    }

    pub fn display(&self) -> &str {
        &self.state.display
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Apply one key press.
    ///
    /// While a request is in flight only `Clear` is accepted; it drops the
    /// request so its completion is discarded.
    pub fn press(&mut self, key: Key) -> Result<Transition, InputError> {
        if let Some(in_flight) = self.in_flight {
            if key != Key::Clear {
                return Err(InputError::Busy(in_flight.id));
            }
        }

        match key {
            Key::Digit(d) => {
                let digit = char::from_digit(u32::from(d), 10).ok_or(InputError::InvalidDigit(d))?;
                self.state.input_digit(digit);
                Ok(Transition::Updated)
            }
            Key::Decimal => {
                self.state.input_decimal();
                Ok(Transition::Updated)
            }
            Key::Clear => {
                if let Some(dropped) = self.in_flight.take() {
                    debug!(request = %dropped.id, "clear dropped in-flight calculation");
                }
                self.state.clear();
                Ok(Transition::Updated)
            }
            Key::Operator(op) => Ok(self.perform_operation(PendingOperator::Apply(op))),
            Key::Equals => Ok(self.perform_operation(PendingOperator::Equals)),
        }
    }

    fn perform_operation(&mut self, next: PendingOperator) -> Transition {
        let input = parse_operand(&self.state.display);

        match (self.state.pending_operand, self.state.pending_operator) {
            (None, _) => {
                self.state.pending_operand = Some(input);
            }
            (Some(lhs), Some(PendingOperator::Apply(operator))) => {
                let id = RequestId(self.next_id);
                self.next_id += 1;
                self.in_flight = Some(InFlight { id, next });
                debug!(request = %id, %operator, lhs, rhs = input, "dispatching calculation");
                return Transition::Compute(ArithmeticRequest {
                    id,
                    operator,
                    lhs,
                    rhs: input,
                });
            }
            (Some(_), Some(PendingOperator::Equals)) => {
                // "=" carries the typed value forward without a service call
                self.state.display = format_number(input);
                self.state.pending_operand = Some(input);
            }
            (Some(_), None) => {}
        }

        self.state.fresh_entry = true;
        self.state.pending_operator = Some(next);
        Transition::Updated
    }

    /// Apply the outcome of a request issued by [`Calculator::press`].
    /// Every error is shown as `NaN`.
    pub fn complete(
        &mut self,
        id: RequestId,
        outcome: Result<f64, ArithmeticError>,
    ) -> Completion {
        let in_flight = match self.in_flight {
            Some(in_flight) if in_flight.id == id => in_flight,
            _ => {
                debug!(request = %id, "discarding stale calculation result");
                return Completion::Discarded;
            }
        };
        self.in_flight = None;

        let result = outcome.unwrap_or_else(|e| {
            warn!(request = %id, error = %e, code = e.error_code(), "calculation failed");
            f64::NAN
        });

        self.state.display = format_number(result);
        self.state.pending_operand = Some(result);
        self.state.fresh_entry = true;
        self.state.pending_operator = Some(in_flight.next);
        Completion::Applied
    }
}
