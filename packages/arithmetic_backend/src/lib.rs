// Library interface for arithmetic_backend
// Exposes the calculator's arithmetic over HTTP: routes to serve it and a
// client implementing `calc_core::ArithmeticService` against them.

pub mod client;
pub mod server;
pub mod wire;

pub use client::HttpArithmetic;
pub use server::{create_router, serve};
pub use wire::{ErrorResponse, OperandsRequest, ResultResponse};
