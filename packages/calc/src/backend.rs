use arithmetic_backend::HttpArithmetic;
use calc_core::{ArithmeticError, ArithmeticService, LocalArithmetic};
use tracing::info;

use crate::config::{BackendFileConfig, BackendKind};

/// The arithmetic service selected by configuration.
#[derive(Debug, Clone)]
pub enum Backend {
    Local(LocalArithmetic),
    Http(HttpArithmetic),
}

impl Backend {
    pub fn from_config(fc: &BackendFileConfig) -> Self {
        match fc.kind {
            BackendKind::Local => {
                info!("using in-process arithmetic");
                Self::Local(LocalArithmetic)
            }
            BackendKind::Http => {
                info!(url = %fc.url, "using HTTP arithmetic backend");
                Self::Http(HttpArithmetic::new(fc.url.clone()))
            }
        }
    }
}

impl ArithmeticService for Backend {
    async fn add(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        match self {
            Self::Local(s) => s.add(a, b).await,
            Self::Http(s) => s.add(a, b).await,
        }
    }

    async fn subtract(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        match self {
            Self::Local(s) => s.subtract(a, b).await,
            Self::Http(s) => s.subtract(a, b).await,
        }
    }

    async fn multiply(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        match self {
            Self::Local(s) => s.multiply(a, b).await,
            Self::Http(s) => s.multiply(a, b).await,
        }
    }

    async fn divide(&self, a: f64, b: f64) -> Result<f64, ArithmeticError> {
        match self {
            Self::Local(s) => s.divide(a, b).await,
            Self::Http(s) => s.divide(a, b).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_backend_from_config() {
        let local = Backend::from_config(&BackendFileConfig::default());
        assert!(matches!(local, Backend::Local(_)));

        let http = Backend::from_config(&BackendFileConfig {
            kind: BackendKind::Http,
            url: "http://10.0.0.2:7878/".to_string(),
        });
        match http {
            Backend::Http(client) => assert_eq!(client.base_url(), "http://10.0.0.2:7878"),
            other => panic!("expected http backend, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn local_backend_computes() {
        let backend = Backend::Local(LocalArithmetic);
        assert_eq!(backend.multiply(9.0, 2.0).await, Ok(18.0));
        assert_eq!(
            backend.divide(1.0, 0.0).await,
            Err(ArithmeticError::DivisionByZero)
        );
    }
}
