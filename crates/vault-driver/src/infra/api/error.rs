use {hyper::StatusCode, serde::Serialize, vault::ErrorKind};

/// Error body returned by every vault route.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Error {
    pub kind: String,
    pub description: String,
    /// Whether the same request may succeed with adjusted limits.
    pub retryable: bool,
}

#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct VaultError(#[from] pub vault::Error);

impl From<vault::ValidationError> for VaultError {
    fn from(error: vault::ValidationError) -> Self {
        Self(error.into())
    }
}

impl From<VaultError> for (StatusCode, axum::Json<Error>) {
    fn from(VaultError(error): VaultError) -> Self {
        let status = match (&error, error.kind()) {
            (vault::Error::Lifecycle(vault::LifecycleError::NotRegistered(_)), _) => {
                StatusCode::NOT_FOUND
            }
            (_, ErrorKind::Validation | ErrorKind::Convergence) => StatusCode::BAD_REQUEST,
            (_, ErrorKind::Lifecycle) => StatusCode::CONFLICT,
            (_, ErrorKind::Slippage) => StatusCode::PRECONDITION_FAILED,
            (_, ErrorKind::Ledger) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(?error, "vault API error");
        } else {
            tracing::debug!(?error, "vault API error");
        }
        let body = Error {
            kind: error.kind().to_string(),
            description: error.to_string(),
            retryable: error.is_retryable(),
        };
        (status, axum::Json(body))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, number::U256, primitive_types::H160};

    fn status(error: impl Into<vault::Error>) -> (StatusCode, String) {
        let (status, body) = <(StatusCode, axum::Json<Error>)>::from(VaultError(error.into()));
        (status, body.0.kind)
    }

    #[test]
    fn maps_error_kinds_to_status_codes() {
        let pool = H160([1; 20]);
        assert_eq!(
            status(vault::LifecycleError::NotRegistered(pool)),
            (StatusCode::NOT_FOUND, "lifecycle".to_owned())
        );
        assert_eq!(
            status(vault::LifecycleError::PoolPaused(pool)),
            (StatusCode::CONFLICT, "lifecycle".to_owned())
        );
        assert_eq!(
            status(vault::ValidationError::NoAmounts),
            (StatusCode::BAD_REQUEST, "validation".to_owned())
        );
        assert_eq!(
            status(vault::ConvergenceError::Invariant),
            (StatusCode::BAD_REQUEST, "convergence".to_owned())
        );
        assert_eq!(
            status(vault::SlippageError::BptAmountOutBelowMin {
                amount: U256::one(),
                limit: U256::from(2),
            }),
            (StatusCode::PRECONDITION_FAILED, "slippage".to_owned())
        );
        assert_eq!(
            status(vault::LedgerError::InsufficientSupply),
            (StatusCode::INTERNAL_SERVER_ERROR, "ledger".to_owned())
        );
    }
}
