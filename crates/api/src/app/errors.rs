use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use preset_export_pipeline::ExportError;

pub fn export_error_to_response(err: ExportError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        ExportError::Unauthenticated => json_error(StatusCode::UNAUTHORIZED, "unauthenticated", message),
        ExportError::Unauthorized => json_error(StatusCode::FORBIDDEN, "forbidden", message),
        ExportError::DependencyUnavailable(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "dependency_unavailable", message)
        }
        ExportError::Empty => json_error(StatusCode::NOT_FOUND, "empty_export", message),
        ExportError::Csv(_) | ExportError::Io(_) => {
            tracing::error!(error = %message, "export failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "export_failed", message)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_export_errors_to_status_codes() {
        let cases = [
            (ExportError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (ExportError::Unauthorized, StatusCode::FORBIDDEN),
            (ExportError::dependency("A product catalog"), StatusCode::INTERNAL_SERVER_ERROR),
            (ExportError::Empty, StatusCode::NOT_FOUND),
        ];
        for (err, status) in cases {
            assert_eq!(export_error_to_response(err).status(), status);
        }
    }
}
