/*
 * Responsibility
 * - AppError: the one failure type every handler, extractor and middleware
 *   raises
 * - Classification: AppError -> (status, ProblemPayload); the IntoResponse
 *   impl below is the only place a failure is serialized
 * - Conversions from component errors (codec, token, policy, repo, axum
 *   rejections)
 */
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::{AccessDenied, TokenError};
use crate::services::strict_enum::InvalidEnumValue;

/// `type` member of every problem payload. Not a resolvable URL.
pub const PROBLEM_TYPE: &str = "about:blank";

pub const PROBLEM_CONTENT_TYPE: &str = "application/problem+json";

/// Why a request failed. Attached to error responses as an extension so
/// outer layers (and tests) can tell failures apart without parsing bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEnumValue,
    ValidationFailed,
    InvalidPageNumber,
    InvalidParameter,
    MalformedBody,
    BadCredentials,
    Unauthenticated,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    Conflict,
    Unclassified,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::InvalidEnumValue => "invalid_enum_value",
            FailureKind::ValidationFailed => "validation_failed",
            FailureKind::InvalidPageNumber => "invalid_page_number",
            FailureKind::InvalidParameter => "invalid_parameter",
            FailureKind::MalformedBody => "malformed_body",
            FailureKind::BadCredentials => "bad_credentials",
            FailureKind::Unauthenticated => "unauthenticated",
            FailureKind::Forbidden => "forbidden",
            FailureKind::NotFound => "not_found",
            FailureKind::MethodNotAllowed => "method_not_allowed",
            FailureKind::Conflict => "conflict",
            FailureKind::Unclassified => "unclassified",
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidEnumValue(#[from] InvalidEnumValue),

    #[error("validation failed: {}", .0.join("; "))]
    ValidationFailed(Vec<String>),

    #[error("{message}")]
    InvalidPageNumber { provided: i64, message: String },

    #[error("{message}")]
    InvalidParameter { provided: Value, message: String },

    #[error("malformed body: {0}")]
    MalformedBody(String),

    #[error("Invalid email or password")]
    BadCredentials,

    #[error("unauthenticated")]
    Unauthenticated,

    #[error("forbidden")]
    Forbidden,

    #[error("{resource} not found")]
    NotFound { resource: &'static str },

    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    Unclassified(String),
}

impl AppError {
    pub fn invalid_page(provided: i64) -> Self {
        Self::InvalidPageNumber {
            provided,
            message: "The value for 'page' must be greater than zero".to_string(),
        }
    }

    pub fn invalid_id(provided: i64) -> Self {
        Self::InvalidParameter {
            provided: json!(provided),
            message: "Invalid ID parameter, must be a positive integer".to_string(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            AppError::InvalidEnumValue(_) => FailureKind::InvalidEnumValue,
            AppError::ValidationFailed(_) => FailureKind::ValidationFailed,
            AppError::InvalidPageNumber { .. } => FailureKind::InvalidPageNumber,
            AppError::InvalidParameter { .. } => FailureKind::InvalidParameter,
            AppError::MalformedBody(_) => FailureKind::MalformedBody,
            AppError::BadCredentials => FailureKind::BadCredentials,
            AppError::Unauthenticated => FailureKind::Unauthenticated,
            AppError::Forbidden => FailureKind::Forbidden,
            AppError::NotFound { .. } => FailureKind::NotFound,
            AppError::MethodNotAllowed => FailureKind::MethodNotAllowed,
            AppError::Conflict(_) => FailureKind::Conflict,
            AppError::Unclassified(_) => FailureKind::Unclassified,
        }
    }

    /// Build the problem payload for this failure.
    ///
    /// Arms are ordered most specific first; each failure maps to exactly one
    /// payload.
    pub fn problem(&self) -> ProblemPayload {
        match self {
            AppError::InvalidEnumValue(e) => ProblemPayload::new(
                StatusCode::BAD_REQUEST,
                "Invalid value for enum",
                e.message.clone(),
            )
            .with("enumType", json!(e.enum_type))
            .with("providedValue", json!(e.provided_value))
            .with("allowedValues", json!(e.allowed_values)),

            AppError::ValidationFailed(errors) => ProblemPayload::new(
                StatusCode::BAD_REQUEST,
                "validation error",
                "One or more validation errors occurred.",
            )
            .with("errors", json!(errors)),

            AppError::InvalidPageNumber { provided, message } => ProblemPayload::new(
                StatusCode::BAD_REQUEST,
                "Invalid parameter",
                message.clone(),
            )
            .with("providedValue", json!(provided)),

            AppError::InvalidParameter { provided, message } => ProblemPayload::new(
                StatusCode::BAD_REQUEST,
                "Invalid parameter",
                message.clone(),
            )
            .with("providedValue", provided.clone()),

            AppError::MalformedBody(detail) => ProblemPayload::new(
                StatusCode::BAD_REQUEST,
                "Error deserializing body",
                detail.clone(),
            ),

            // Same payload whether the email exists or not.
            AppError::BadCredentials => ProblemPayload::new(
                StatusCode::UNAUTHORIZED,
                "Credential error",
                "Invalid email or password",
            ),

            AppError::Unauthenticated => ProblemPayload::new(
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "A valid bearer token is required",
            ),

            AppError::Forbidden => ProblemPayload::new(
                StatusCode::FORBIDDEN,
                "Forbidden",
                "You do not have permission to access this resource",
            ),

            AppError::NotFound { resource } => ProblemPayload::new(
                StatusCode::NOT_FOUND,
                "Not found",
                format!("{resource} not found"),
            ),

            AppError::MethodNotAllowed => ProblemPayload::new(
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed",
                "The requested method is not supported for this resource",
            ),

            AppError::Conflict(detail) => {
                ProblemPayload::new(StatusCode::CONFLICT, "Conflict", detail.clone())
            }

            AppError::Unclassified(message) => ProblemPayload::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
                first_line(message),
            ),
        }
    }
}

/// Normalized JSON error body (RFC 9457 shape).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemPayload {
    #[serde(rename = "type")]
    pub problem_type: &'static str,
    pub title: &'static str,
    pub status: u16,
    pub detail: String,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl ProblemPayload {
    fn new(status: StatusCode, title: &'static str, detail: impl Into<String>) -> Self {
        Self {
            problem_type: PROBLEM_TYPE,
            title,
            status: status.as_u16(),
            detail: detail.into(),
            extensions: Map::new(),
        }
    }

    fn with(mut self, key: &str, value: Value) -> Self {
        self.extensions.insert(key.to_string(), value);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

fn first_line(message: &str) -> String {
    let line = message.lines().next().unwrap_or_default();
    line.trim().to_string()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let problem = self.problem();
        let status = problem.status_code();

        if status.is_server_error() {
            tracing::error!(kind = kind.as_str(), error = %self, "request failed");
        } else {
            tracing::warn!(kind = kind.as_str(), detail = %problem.detail, "request rejected");
        }

        let mut response = (
            status,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static(PROBLEM_CONTENT_TYPE),
            )],
            Json(problem),
        )
            .into_response();

        if kind == FailureKind::Unauthenticated {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response.extensions_mut().insert(kind);
        response
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match &e {
            RepoError::InvalidPage(page) => AppError::invalid_page(*page),
            RepoError::Conflict(detail) => AppError::Conflict(detail.clone()),
            RepoError::Db(_) | RepoError::InvalidRow(_) => AppError::Unclassified(e.to_string()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::Unauthenticated
    }
}

impl From<AccessDenied> for AppError {
    fn from(_: AccessDenied) -> Self {
        AppError::Forbidden
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidParameter {
            provided: Value::Null,
            message: rejection.body_text(),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidParameter {
            provided: Value::Null,
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::json;

    use super::*;
    use crate::domain::Role;

    async fn render(err: AppError) -> (StatusCode, Option<FailureKind>, String, Value) {
        let response = err.into_response();
        let status = response.status();
        let kind = response.extensions().get::<FailureKind>().copied();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap();
        (status, kind, content_type, body)
    }

    #[tokio::test]
    async fn invalid_enum_value_lists_the_whole_enumeration() {
        let err = Role::decode(&json!("manager")).unwrap_err();
        let (status, kind, content_type, body) = render(err.into()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind, Some(FailureKind::InvalidEnumValue));
        assert_eq!(content_type, PROBLEM_CONTENT_TYPE);
        assert_eq!(
            body,
            json!({
                "type": "about:blank",
                "title": "Invalid value for enum",
                "status": 400,
                "detail": "Value 'manager' not valid for enum Role",
                "enumType": "Role",
                "providedValue": "manager",
                "allowedValues": ["ADMIN", "EDITOR"],
            })
        );
    }

    #[tokio::test]
    async fn non_text_enum_token_reports_null_provided_value() {
        let err = Role::decode(&json!({"role": "ADMIN"})).unwrap_err();
        let (_, _, _, body) = render(err.into()).await;
        assert_eq!(body["providedValue"], Value::Null);
        assert_eq!(body["detail"], "Invalid token for enum Role: Object");
    }

    #[tokio::test]
    async fn validation_errors_keep_their_order() {
        let err = AppError::ValidationFailed(vec!["first".into(), "second".into()]);
        let (status, kind, _, body) = render(err).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind, Some(FailureKind::ValidationFailed));
        assert_eq!(body["title"], "validation error");
        assert_eq!(body["errors"], json!(["first", "second"]));
    }

    #[tokio::test]
    async fn page_and_parameter_failures_share_a_shape() {
        let (status, kind, _, body) = render(AppError::invalid_page(0)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind, Some(FailureKind::InvalidPageNumber));
        assert_eq!(body["title"], "Invalid parameter");
        assert_eq!(body["providedValue"], 0);

        let (status, kind, _, body) = render(AppError::invalid_id(-4)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind, Some(FailureKind::InvalidParameter));
        assert_eq!(body["title"], "Invalid parameter");
        assert_eq!(body["providedValue"], -4);
    }

    #[tokio::test]
    async fn malformed_body_has_no_extensions() {
        let (status, _, _, body) = render(AppError::MalformedBody("EOF".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "type": "about:blank",
                "title": "Error deserializing body",
                "status": 400,
                "detail": "EOF",
            })
        );
    }

    #[tokio::test]
    async fn credential_failure_is_generic() {
        let (status, kind, _, body) = render(AppError::BadCredentials).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(kind, Some(FailureKind::BadCredentials));
        assert_eq!(body["title"], "Credential error");
        assert_eq!(body["detail"], "Invalid email or password");
    }

    #[tokio::test]
    async fn auth_failures_are_distinct() {
        let response = AppError::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );

        let (status, kind, _, body) = render(AppError::Forbidden).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(kind, Some(FailureKind::Forbidden));
        assert_eq!(body.as_object().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn unsupported_method_is_a_problem() {
        let (status, kind, content_type, body) = render(AppError::MethodNotAllowed).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(kind, Some(FailureKind::MethodNotAllowed));
        assert_eq!(content_type, PROBLEM_CONTENT_TYPE);
        assert_eq!(body["title"], "Method not allowed");
        assert_eq!(body["status"], 405);
    }

    #[tokio::test]
    async fn unclassified_detail_is_the_first_line_only() {
        let err = AppError::Unclassified("pool timed out\n   at frame 0\n   at frame 1".into());
        let (status, kind, _, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(kind, Some(FailureKind::Unclassified));
        assert_eq!(body["title"], "Internal server error");
        assert_eq!(body["detail"], "pool timed out");
    }

    #[test]
    fn repo_errors_map_to_their_kinds() {
        assert_eq!(
            AppError::from(RepoError::InvalidPage(-1)).kind(),
            FailureKind::InvalidPageNumber
        );
        assert_eq!(
            AppError::from(RepoError::Conflict("dup".into())).kind(),
            FailureKind::Conflict
        );
    }
}
