use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use ivx_catalog::FetchError;

pub fn fetch_error_to_response(err: FetchError) -> axum::response::Response {
    match err {
        FetchError::Api { status, message } => json_error(error_status(status), message),
        err if err.is_transient() => json_error(StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        err => json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

/// Upstream status to forward. Anything that is not a 4xx/5xx becomes 502.
fn error_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status)
        .ok()
        .filter(|s| s.is_client_error() || s.is_server_error())
        .unwrap_or(StatusCode::BAD_GATEWAY)
}

/// `{ "error": "<message>" }` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16) -> FetchError {
        FetchError::Api {
            status,
            message: "upstream said no".to_string(),
        }
    }

    #[test]
    fn transient_failures_are_service_unavailable() {
        assert_eq!(
            fetch_error_to_response(FetchError::Network).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            fetch_error_to_response(FetchError::Transport("refused".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            fetch_error_to_response(FetchError::Decode("bad body".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn upstream_error_statuses_pass_through() {
        assert_eq!(fetch_error_to_response(api(404)).status(), StatusCode::NOT_FOUND);
        assert_eq!(fetch_error_to_response(api(503)).status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn non_error_upstream_statuses_become_bad_gateway() {
        for status in [200, 204, 302, 99, 1000] {
            assert_eq!(
                fetch_error_to_response(api(status)).status(),
                StatusCode::BAD_GATEWAY,
                "status {status}"
            );
        }
    }
}
