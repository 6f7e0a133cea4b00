//! JSON bodies shared by the server and the client.
//!
//! Finite numbers are plain JSON numbers. `NaN` and the infinities have no
//! JSON form, so they travel as their display text (`"NaN"`, `"Infinity"`,
//! `"-Infinity"`).

use calc_core::ArithmeticError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperandsRequest {
    #[serde(with = "number")]
    pub a: f64,
    #[serde(with = "number")]
    pub b: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultResponse {
    #[serde(with = "number")]
    pub result: f64,
}

/// Body of every 422 reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&ArithmeticError> for ErrorResponse {
    fn from(err: &ArithmeticError) -> Self {
        Self {
            error: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<ErrorResponse> for ArithmeticError {
    fn from(resp: ErrorResponse) -> Self {
        ArithmeticError::from_code(&resp.error, &resp.message)
    }
}

mod number {
    use calc_core::format_number;
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else {
            serializer.serialize_str(&format_number(*value))
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(text) => text
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("not a number: {text:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_numbers_stay_json_numbers() {
        let json = serde_json::to_string(&OperandsRequest { a: 5.0, b: -0.25 }).unwrap();
        assert_eq!(json, r#"{"a":5.0,"b":-0.25}"#);
        let back: OperandsRequest = serde_json::from_str(r#"{"a":5,"b":-0.25}"#).unwrap();
        assert_eq!(back, OperandsRequest { a: 5.0, b: -0.25 });
    }

    #[test]
    fn non_finite_numbers_travel_as_text() {
        let json = serde_json::to_string(&ResultResponse {
            result: f64::INFINITY,
        })
        .unwrap();
        assert_eq!(json, r#"{"result":"Infinity"}"#);
        let back: ResultResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.result, f64::INFINITY);

        let req: OperandsRequest = serde_json::from_str(r#"{"a":"NaN","b":"-Infinity"}"#).unwrap();
        assert!(req.a.is_nan());
        assert_eq!(req.b, f64::NEG_INFINITY);
    }

    #[test]
    fn other_text_is_rejected() {
        assert!(serde_json::from_str::<OperandsRequest>(r#"{"a":"five","b":1}"#).is_err());
    }

    #[test]
    fn error_response_serde() {
        let resp = ErrorResponse::from(&ArithmeticError::DivisionByZero);
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(
            json,
            r#"{"error":"division_by_zero","message":"division by zero"}"#
        );
        let back: ErrorResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(ArithmeticError::from(back), ArithmeticError::DivisionByZero);
    }

    #[test]
    fn unknown_code_maps_to_backend_error() {
        let resp = ErrorResponse {
            error: "teapot".to_string(),
            message: "short and stout".to_string(),
        };
        assert_eq!(
            ArithmeticError::from(resp),
            ArithmeticError::Backend("short and stout".to_string())
        );
    }
}
