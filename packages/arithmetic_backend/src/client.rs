use calc_core::{ArithmeticError, ArithmeticService, Operator};
use reqwest::StatusCode;
use tracing::debug;

use crate::wire::{ErrorResponse, OperandsRequest, ResultResponse};

/// [`ArithmeticService`] backed by an arithmetic backend reachable over HTTP.
#[derive(Debug, Clone)]
pub struct HttpArithmetic {
    client: reqwest::Client,
    base_url: String,
}

impl HttpArithmetic {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn call(&self, operator: Operator, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        let url = format!("{}/api/{}", self.base_url, operator.name());
        debug!(%url, a, b, "calling arithmetic backend");

        let resp = self
            .client
            .post(&url)
            .json(&OperandsRequest { a, b })
            .send()
            .await
            .map_err(from_reqwest)?;

        match resp.status() {
            status if status.is_success() => {
                let body: ResultResponse = resp.json().await.map_err(from_reqwest)?;
                Ok(body.result)
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let body: ErrorResponse = resp.json().await.map_err(from_reqwest)?;
                Err(body.into())
            }
            status => {
                let text = resp.text().await.unwrap_or_default();
                Err(ArithmeticError::Backend(format!("{status} {text}")))
            }
        }
    }
}

fn from_reqwest(err: reqwest::Error) -> ArithmeticError {
    if err.is_connect() {
        ArithmeticError::Unavailable(err.to_string())
    } else {
        ArithmeticError::Backend(err.to_string())
    }
}

impl ArithmeticService for HttpArithmetic {
    async fn add(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        self.call(Operator::Add, a, b).await
    }

    async fn subtract(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        self.call(Operator::Subtract, a, b).await
    }

    async fn multiply(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        self.call(Operator::Multiply, a, b).await
    }

    async fn divide(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        self.call(Operator::Divide, a, b).await
    }
}
