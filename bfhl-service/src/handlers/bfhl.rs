use crate::dtos::{Envelope, Operation, OperationResult};
use crate::services::arithmetic::{self, ArithmeticError};
use crate::services::providers::{first_word, TextProvider};
use crate::startup::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use service_core::error::AppError;

pub const INVALID_JSON_BODY: &str = "Invalid JSON body";
pub const BODY_TOO_LARGE: &str = "Request body too large";

#[tracing::instrument(skip(state, payload))]
pub async fn bfhl(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope>, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::validation(BODY_TOO_LARGE)
        } else {
            AppError::validation(INVALID_JSON_BODY)
        }
    })?;

    let operation = Operation::from_body(&body)?;
    let data = dispatch(operation, state.text_provider.as_ref()).await?;

    Ok(Json(Envelope::with_data(&state.config.official_email, data)))
}

/// Run a validated operation.
///
/// Arithmetic runs on the blocking pool: trial division over large inputs
/// can take seconds and must not hold a runtime worker. The AI branch makes
/// one attempt only; a provider failure surfaces as an internal error.
pub async fn dispatch(
    operation: Operation,
    text_provider: &dyn TextProvider,
) -> Result<OperationResult, AppError> {
    let kind = operation.kind();

    let result = match operation {
        Operation::Fibonacci(n) => {
            run_blocking(move || Ok(OperationResult::Sequence(arithmetic::fibonacci(n)))).await?
        }
        Operation::Prime(values) => {
            run_blocking(move || {
                Ok(OperationResult::Integers(arithmetic::filter_primes(&values)))
            })
            .await?
        }
        Operation::Hcf(values) => {
            run_blocking(move || arithmetic::hcf(&values).map(OperationResult::Integer)).await?
        }
        Operation::Lcm(values) => {
            run_blocking(move || arithmetic::lcm(&values).map(OperationResult::Integer)).await?
        }
        Operation::Ai(prompt) => {
            let text = text_provider.generate(&prompt).await.map_err(|e| {
                AppError::InternalError(
                    anyhow::Error::new(e)
                        .context(format!("{} provider call failed", text_provider.name())),
                )
            })?;
            OperationResult::Text(first_word(text.as_deref()))
        }
    };

    tracing::debug!(operation = %kind, "Operation completed");
    Ok(result)
}

async fn run_blocking<F>(compute: F) -> Result<OperationResult, AppError>
where
    F: FnOnce() -> Result<OperationResult, ArithmeticError> + Send + 'static,
{
    tokio::task::spawn_blocking(compute)
        .await
        .map_err(|e| AppError::InternalError(e.into()))?
        .map_err(|e| AppError::InternalError(anyhow::Error::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::arithmetic::FibTerm;
    use crate::services::providers::mock::MockTextProvider;
    use crate::services::UNKNOWN_ANSWER;

    #[tokio::test]
    async fn dispatches_arithmetic_operations() {
        let provider = MockTextProvider::default();

        assert_eq!(
            dispatch(Operation::Fibonacci(3), &provider).await.unwrap(),
            OperationResult::Sequence(vec![
                FibTerm::from(0),
                FibTerm::from(1),
                FibTerm::from(1)
            ])
        );
        assert_eq!(
            dispatch(Operation::Prime(vec![1, 2, 3, 4, 5, 6]), &provider)
                .await
                .unwrap(),
            OperationResult::Integers(vec![2, 3, 5])
        );
        assert_eq!(
            dispatch(Operation::Hcf(vec![12, 18]), &provider)
                .await
                .unwrap(),
            OperationResult::Integer(6)
        );
        assert_eq!(
            dispatch(Operation::Lcm(vec![4, 6]), &provider)
                .await
                .unwrap(),
            OperationResult::Integer(12)
        );
    }

    #[tokio::test]
    async fn ai_keeps_first_word() {
        let provider = MockTextProvider::new("Mumbai is the capital of Maharashtra.");
        assert_eq!(
            dispatch(Operation::Ai("Capital of Maharashtra?".into()), &provider)
                .await
                .unwrap(),
            OperationResult::Text("Mumbai".into())
        );
    }

    #[tokio::test]
    async fn ai_without_text_is_unknown() {
        let provider = MockTextProvider::empty();
        assert_eq!(
            dispatch(Operation::Ai("anything".into()), &provider)
                .await
                .unwrap(),
            OperationResult::Text(UNKNOWN_ANSWER.into())
        );
    }

    #[tokio::test]
    async fn provider_failure_is_internal() {
        let provider = MockTextProvider::failing("quota exceeded");
        let err = dispatch(Operation::Ai("anything".into()), &provider)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }

    #[tokio::test]
    async fn negative_hcf_keeps_remainder_sign() {
        let provider = MockTextProvider::default();
        assert_eq!(
            dispatch(Operation::Hcf(vec![4, -6]), &provider)
                .await
                .unwrap(),
            OperationResult::Integer(-2)
        );
    }

    #[tokio::test]
    async fn lcm_overflow_is_internal() {
        let provider = MockTextProvider::default();
        let err = dispatch(Operation::Lcm(vec![i64::MAX, i64::MAX - 1]), &provider)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
