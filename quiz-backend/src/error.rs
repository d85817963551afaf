use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unsupported file type: .{ext}. Allowed types: .pdf, .txt")]
    UnsupportedFileType { ext: String },

    #[error("Document content is too short. Please provide a document with more content.")]
    DocumentTooShort,

    #[error("File too large. Maximum size is {max_mb}MB.")]
    PayloadTooLarge { max_mb: usize },

    #[error("Text extraction failed: {0}")]
    Extraction(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_)
            | Error::UnsupportedFileType { .. }
            | Error::DocumentTooShort
            | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Multipart(err) => err.status(),
            Error::Reqwest(_) => StatusCode::BAD_GATEWAY,
            Error::Config(_) | Error::Extraction(_) | Error::Internal(_) | Error::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let error_message = match &self {
            Error::Config(_) | Error::Io(_) | Error::Internal(_) => {
                tracing::error!(error = %self, "request failed");
                "An unexpected error occurred".to_string()
            }
            Error::BadRequest(msg) => msg.clone(),
            Error::Reqwest(err) => format!("External service error: {}", err),
            Error::Multipart(err) => err.body_text(),
            other => other.to_string(),
        };

        let body = Json(json!({ "success": false, "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn upload_errors_map_to_client_statuses() {
        assert_eq!(
            Error::UnsupportedFileType { ext: "docx".into() }.status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::DocumentTooShort.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::PayloadTooLarge { max_mb: 10 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            Error::Extraction("pdftotext missing".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unsupported_type_message_lists_allowed_types() {
        let msg = Error::UnsupportedFileType { ext: "docx".into() }.to_string();
        assert_eq!(msg, "Unsupported file type: .docx. Allowed types: .pdf, .txt");
    }

    #[tokio::test]
    async fn bad_request_body_carries_bare_message() {
        let resp = Error::BadRequest("No document file provided".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "No document file provided");
    }
}
