//! Classifies alloy errors into retry, backoff and refresh decisions.

use std::time::Duration;

use alloy::{
    contract::Error as ContractError,
    providers::PendingTransactionError,
    transports::{RpcError, TransportErrorKind},
};

const RATE_LIMIT_PATTERNS: [&str; 3] = ["rate limit", "too many requests", "request limit"];

fn mentions_rate_limit(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    RATE_LIMIT_PATTERNS
        .iter()
        .any(|pattern| lowered.contains(pattern))
}

pub(crate) fn is_retryable_rpc_error(err: &RpcError<TransportErrorKind>) -> bool {
    match err {
        RpcError::Transport(kind) => match kind {
            TransportErrorKind::MissingBatchResponse(_) | TransportErrorKind::BackendGone => true,
            TransportErrorKind::HttpError(http) => {
                http.is_rate_limit_err() || http.is_temporarily_unavailable()
            }
            TransportErrorKind::Custom(custom) => mentions_rate_limit(&custom.to_string()),
            _ => false,
        },
        RpcError::ErrorResp(payload) => payload.is_retry_err(),
        RpcError::NullResp => true,
        RpcError::DeserError { text, .. } => mentions_rate_limit(text),
        _ => false,
    }
}

pub(crate) fn should_refresh_rpc_error(err: &RpcError<TransportErrorKind>) -> bool {
    matches!(
        err,
        RpcError::Transport(TransportErrorKind::BackendGone)
            | RpcError::Transport(TransportErrorKind::PubsubUnavailable)
    )
}

/// Some providers return `{"rate": {"backoff_seconds": n}}` in the error data.
pub(crate) fn rpc_backoff_hint(err: &RpcError<TransportErrorKind>) -> Option<Duration> {
    let RpcError::ErrorResp(payload) = err else {
        return None;
    };

    let Ok(data) = payload.try_data_as::<serde_json::Value>()? else {
        return None;
    };

    let backoff_seconds = data["rate"]["backoff_seconds"].as_f64()?;
    Some(Duration::from_secs(backoff_seconds.ceil() as u64))
}

fn pending_tx_transport(err: &PendingTransactionError) -> Option<&RpcError<TransportErrorKind>> {
    match err {
        PendingTransactionError::TransportError(inner) => Some(inner),
        _ => None,
    }
}

pub(crate) fn is_retryable_contract_error(err: &ContractError) -> bool {
    // A revert is deterministic; sending it again changes nothing.
    if err.as_revert_data().is_some() {
        return false;
    }

    match err {
        ContractError::TransportError(inner) => is_retryable_rpc_error(inner),
        ContractError::PendingTransactionError(inner) => {
            pending_tx_transport(inner).is_some_and(is_retryable_rpc_error)
        }
        _ => false,
    }
}

pub(crate) fn contract_error_backoff_hint(err: &ContractError) -> Option<Duration> {
    match err {
        ContractError::TransportError(inner) => rpc_backoff_hint(inner),
        ContractError::PendingTransactionError(inner) => {
            pending_tx_transport(inner).and_then(rpc_backoff_hint)
        }
        _ => None,
    }
}

pub(crate) fn should_refresh_contract_error(err: &ContractError) -> bool {
    match err {
        ContractError::TransportError(inner) => should_refresh_rpc_error(inner),
        ContractError::PendingTransactionError(inner) => {
            pending_tx_transport(inner).is_some_and(should_refresh_rpc_error)
        }
        _ => false,
    }
}

/// JSON-RPC code some providers use for "limit exceeded".
const LIMIT_EXCEEDED_CODE: i64 = -32005;

/// True only when the node refused the request before looking at it, so
/// nothing can have been broadcast and sending again cannot duplicate the
/// transaction. Timeouts and dropped connections are not refusals.
pub(crate) fn is_refused_send_error(err: &ContractError) -> bool {
    match err {
        ContractError::TransportError(RpcError::Transport(TransportErrorKind::HttpError(http))) => {
            http.is_rate_limit_err()
        }
        ContractError::TransportError(RpcError::ErrorResp(payload)) => {
            payload.code == 429 || payload.code == LIMIT_EXCEEDED_CODE
        }
        _ => false,
    }
}
