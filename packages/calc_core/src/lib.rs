//! Calc Core - keypad calculator input state machine
//!
//! This crate owns the calculator's input handling: the display buffer, the
//! pending operand and operator, and the fresh-entry flag. Arithmetic itself
//! is delegated to an [`ArithmeticService`], which may live in-process
//! ([`LocalArithmetic`]) or behind a network boundary.
//! It has no UI or HTTP dependencies.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use calc_core::{Key, LocalArithmetic, spawn_session};
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = spawn_session(Arc::new(LocalArithmetic));
//!
//!     for label in ["5", "+", "3", "="] {
//!         let key: Key = label.parse().unwrap();
//!         session.press_settled(key).await.unwrap();
//!     }
//!
//!     let snapshot = session.snapshot().await.unwrap();
//!     assert_eq!(snapshot.state.display, "8");
//! }
//! ```

pub mod arithmetic;
pub mod key;
pub mod machine;
pub mod number;
pub mod session;
pub mod state;

pub use arithmetic::{ArithmeticError, ArithmeticService, LocalArithmetic, evaluate};
pub use key::{KEYPAD, Key, Operator};
pub use machine::{ArithmeticRequest, Calculator, Completion, InputError, RequestId, Transition};
pub use number::{format_number, parse_operand};
pub use session::{SessionError, SessionHandle, Snapshot, spawn_session, spawn_session_with_state};
pub use state::{CalculatorState, PendingOperator};
