use anyhow::anyhow;
use reqwest::header;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Errors of the storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The adapter setup is missing or malformed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The arguments of an operation are invalid, no remote call was made.
    #[error("validation error: {0}")]
    Validation(String),

    /// The remote service, or the way to reach it, failed.
    #[error("remote error")]
    Remote(#[from] AirtableClientError),
}

/// Error of the HTTP exchanges with the Airtable API.
#[derive(Error, Debug)]
pub enum AirtableClientError {
    /// Airtable has returned a technical error.
    #[error("remote server technical error")]
    RemoteServerTechnical(#[source] anyhow::Error),

    /// Airtable responded it cannot fulfill our request.
    #[error("remote server logical error")]
    RemoteServerLogical(#[source] anyhow::Error),

    /// Could not reach Airtable.
    #[error("remote server unreachable")]
    RemoteServerUnreachable(#[source] anyhow::Error),

    /// Unhandled status code
    #[error("unhandled status code: {0}, response text: {1}")]
    UnhandledStatusCode(StatusCode, String),

    /// Could not parse response.
    #[error("json parsing failed")]
    JsonParseFailed(#[source] anyhow::Error),

    /// The url of a query could not be computed.
    #[error("invalid endpoint")]
    InvalidEndpoint(#[source] anyhow::Error),

    /// HTTP client creation error
    #[error("HTTP client creation failed")]
    HttpClientCreation(#[source] anyhow::Error),
}

/// Error payload returned by Airtable, either `{"error": "NOT_FOUND"}` or
/// `{"error": {"type": "...", "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct AirtableErrorMessage {
    error: AirtableErrorDetail,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AirtableErrorDetail {
    Typed {
        #[serde(rename = "type")]
        error_type: String,
        #[serde(default)]
        message: Option<String>,
    },
    Code(String),
}

impl AirtableClientError {
    /// Create an `AirtableClientError` from a response.
    ///
    /// This method is meant to be used after handling query-specific cases leaving only
    /// 4xx or 5xx status codes.
    /// Otherwise, it will return an `UnhandledStatusCode` error.
    pub async fn from_response(response: Response) -> Self {
        ErrorResponse::read(response).await.into()
    }
}

/// Status and body of a response that was not handled by a query.
pub(crate) struct ErrorResponse {
    status: StatusCode,
    is_json: bool,
    body: String,
}

impl ErrorResponse {
    /// Read the whole response.
    pub(crate) async fn read(response: Response) -> Self {
        let status = response.status();
        let is_json = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .is_some_and(|ct| ct.starts_with(JSON_CONTENT_TYPE));
        let body = response.text().await.unwrap_or_default();

        Self {
            status,
            is_json,
            body,
        }
    }

    /// Code of the Airtable error: the `type` of a typed error or the bare code.
    pub(crate) fn airtable_error_code(&self) -> Option<String> {
        if !self.is_json {
            return None;
        }

        match serde_json::from_str::<AirtableErrorMessage>(&self.body).ok()?.error {
            AirtableErrorDetail::Typed { error_type, .. } => Some(error_type),
            AirtableErrorDetail::Code(code) => Some(code),
        }
    }

    fn root_cause(&self) -> String {
        let canonical_reason = self.status.canonical_reason().unwrap_or_default().to_lowercase();

        if self.is_json {
            let json_value: serde_json::Value =
                serde_json::from_str(&self.body).unwrap_or_default();

            match serde_json::from_value::<AirtableErrorMessage>(json_value.clone()) {
                Ok(AirtableErrorMessage {
                    error:
                        AirtableErrorDetail::Typed {
                            error_type,
                            message: Some(message),
                        },
                }) => format!("{canonical_reason}: {error_type}: {message}"),
                Ok(AirtableErrorMessage {
                    error: AirtableErrorDetail::Typed { error_type, .. },
                }) => format!("{canonical_reason}: {error_type}"),
                Ok(AirtableErrorMessage {
                    error: AirtableErrorDetail::Code(code),
                }) => format!("{canonical_reason}: {code}"),
                Err(_) if json_value.is_null() => canonical_reason,
                Err(_) => format!("{canonical_reason}: {json_value}"),
            }
        } else {
            format!("{canonical_reason}: {}", self.body)
        }
    }
}

impl From<ErrorResponse> for AirtableClientError {
    fn from(response: ErrorResponse) -> Self {
        if response.status.is_client_error() {
            Self::RemoteServerLogical(anyhow!(response.root_cause()))
        } else if response.status.is_server_error() {
            Self::RemoteServerTechnical(anyhow!(response.root_cause()))
        } else {
            Self::UnhandledStatusCode(response.status, response.body)
        }
    }
}

#[cfg(test)]
mod tests {
    use http::response::Builder as HttpResponseBuilder;
    use serde_json::json;

    use super::*;

    fn build_json_response<T: serde::Serialize>(status_code: u16, body: &T) -> Response {
        HttpResponseBuilder::new()
            .status(status_code)
            .header(header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(serde_json::to_string(body).unwrap())
            .unwrap()
            .into()
    }

    fn build_text_response<T: Into<String>>(status_code: u16, body: T) -> Response {
        HttpResponseBuilder::new()
            .status(status_code)
            .body(body.into())
            .unwrap()
            .into()
    }

    macro_rules! assert_error_text_contains {
        ($error: expr, $expected_message: literal) => {
            let error = &$error;
            assert!(
                format!("{error:?}").contains($expected_message),
                "Expected error message to contain '{}'\ngot '{error:?}'",
                $expected_message,
            );
        };
    }

    #[tokio::test]
    async fn test_4xx_errors_are_handled_as_remote_server_logical() {
        let response = build_text_response(404, "record not found");
        let handled_error = AirtableClientError::from_response(response).await;

        assert!(
            matches!(handled_error, AirtableClientError::RemoteServerLogical(..)),
            "Expected error to be RemoteServerLogical\ngot '{handled_error:?}'",
        );
        assert_error_text_contains!(handled_error, "not found: record not found");
    }

    #[tokio::test]
    async fn test_5xx_errors_are_handled_as_remote_server_technical() {
        let response = build_text_response(503, "try again later");
        let handled_error = AirtableClientError::from_response(response).await;

        assert!(
            matches!(handled_error, AirtableClientError::RemoteServerTechnical(..)),
            "Expected error to be RemoteServerTechnical\ngot '{handled_error:?}'",
        );
        assert_error_text_contains!(handled_error, "service unavailable: try again later");
    }

    #[tokio::test]
    async fn test_non_4xx_or_5xx_errors_are_handled_as_unhandled_status_code() {
        let response = build_text_response(302, "redirected");
        let handled_error = AirtableClientError::from_response(response).await;

        assert!(
            matches!(
                handled_error,
                AirtableClientError::UnhandledStatusCode(StatusCode::FOUND, ref text) if text == "redirected"
            ),
            "Expected error to be UnhandledStatusCode\ngot '{handled_error:?}'",
        );
    }

    #[tokio::test]
    async fn test_root_cause_of_typed_airtable_error() {
        let response = build_json_response(
            422,
            &json!({
                "error": {
                    "type": "INVALID_FILTER_BY_FORMULA",
                    "message": "The formula for filtering records is invalid"
                }
            }),
        );

        let root_cause = ErrorResponse::read(response).await.root_cause();

        assert_eq!(
            "unprocessable entity: INVALID_FILTER_BY_FORMULA: The formula for filtering records is invalid",
            root_cause
        );
    }

    #[tokio::test]
    async fn test_root_cause_of_typed_airtable_error_without_message() {
        let response = build_json_response(
            403,
            &json!({ "error": { "type": "INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND" } }),
        );

        let root_cause = ErrorResponse::read(response).await.root_cause();

        assert_eq!(
            "forbidden: INVALID_PERMISSIONS_OR_MODEL_NOT_FOUND",
            root_cause
        );
    }

    #[tokio::test]
    async fn test_root_cause_of_airtable_error_code() {
        let response = build_json_response(404, &json!({ "error": "NOT_FOUND" }));

        let root_cause = ErrorResponse::read(response).await.root_cause();

        assert_eq!("not found: NOT_FOUND", root_cause);
    }

    #[tokio::test]
    async fn test_root_cause_of_unknown_json_body() {
        let response = build_json_response(500, &json!({ "whatever": 42 }));

        let root_cause = ErrorResponse::read(response).await.root_cause();

        assert_eq!(r#"internal server error: {"whatever":42}"#, root_cause);
    }

    #[tokio::test]
    async fn test_root_cause_of_empty_json_body() {
        let response = HttpResponseBuilder::new()
            .status(400)
            .header(header::CONTENT_TYPE, "application/json")
            .body("")
            .unwrap()
            .into();

        let root_cause = ErrorResponse::read(response).await.root_cause();

        assert_eq!("bad request", root_cause);
    }

    #[tokio::test]
    async fn test_airtable_error_code_of_typed_and_bare_errors() {
        let typed = build_json_response(
            404,
            &json!({ "error": { "type": "TABLE_NOT_FOUND", "message": "Could not find table" } }),
        );
        let bare = build_json_response(404, &json!({ "error": "NOT_FOUND" }));
        let text = build_text_response(404, r#"{"error": "NOT_FOUND"}"#);

        assert_eq!(
            Some("TABLE_NOT_FOUND".to_string()),
            ErrorResponse::read(typed).await.airtable_error_code()
        );
        assert_eq!(
            Some("NOT_FOUND".to_string()),
            ErrorResponse::read(bare).await.airtable_error_code()
        );
        assert_eq!(None, ErrorResponse::read(text).await.airtable_error_code());
    }

    #[test]
    fn test_remote_error_converts_into_storage_error() {
        let error: StorageError =
            AirtableClientError::RemoteServerUnreachable(anyhow!("connection refused")).into();

        assert!(matches!(
            error,
            StorageError::Remote(AirtableClientError::RemoteServerUnreachable(_))
        ));
    }
}
