use crate::services::arithmetic::FibTerm;
use serde::Serialize;

/// Success half of the response envelope, shared by `/health` and `/bfhl`.
///
/// Failures are rendered by `service_core::error::AppError`.
#[derive(Debug, Serialize)]
pub struct Envelope {
    pub is_success: bool,
    pub official_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<OperationResult>,
}

impl Envelope {
    pub fn health(official_email: &str) -> Self {
        Self {
            is_success: true,
            official_email: official_email.to_string(),
            data: None,
        }
    }

    pub fn with_data(official_email: &str, data: OperationResult) -> Self {
        Self {
            is_success: true,
            official_email: official_email.to_string(),
            data: Some(data),
        }
    }
}

/// The `data` payload, one shape per operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OperationResult {
    /// fibonacci. Every term is an exact JSON integer; from F(94) on the
    /// digits exceed `u64` and are written out in full.
    Sequence(Vec<FibTerm>),
    /// prime
    Integers(Vec<i64>),
    /// hcf, lcm
    Integer(i64),
    /// AI
    Text(String),
}
