//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes an `invalid_request` error whose
//! `details` carry `{field, code}` (plus the rejected `value` where useful).
//! Extractor configs route malformed JSON bodies, query strings and path
//! segments through the same envelope.

use actix_web::{HttpRequest, error::JsonPayloadError, error::PathError, error::QueryPayloadError};
use actix_web::web;
use serde_json::json;

use crate::domain::{
    AdValidationError, CommentValidationError, Error, LoginValidationError, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidNumber,
    InvalidJson,
    InvalidQuery,
    InvalidPath,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidJson => "invalid_json",
            ErrorCode::InvalidQuery => "invalid_query",
            ErrorCode::InvalidPath => "invalid_path",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code,
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code("missing_field")
}

pub(crate) fn invalid_number_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a whole number"))
        .with_value(ErrorCode::InvalidNumber, value)
}

/// Parse an optional integer query parameter; blank values count as absent.
pub(crate) fn parse_optional_i64(value: Option<&str>, field: FieldName) -> Result<Option<i64>, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i64>()
            .map(Some)
            .map_err(|_| invalid_number_error(field, raw)),
    }
}

pub(crate) fn ad_validation_error(err: AdValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn comment_validation_error(err: CommentValidationError) -> Error {
    ValidationError::new(err.field(), err.to_string()).with_code(err.code())
}

pub(crate) fn login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match &err {
        LoginValidationError::EmptyUsername => ("username", "empty_username"),
        LoginValidationError::InvalidUsername(inner) => ("username", username_code(inner)),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
        LoginValidationError::PasswordTooShort { .. } => ("password", "password_too_short"),
    };
    ValidationError::new(field, err.to_string()).with_code(code)
}

fn username_code(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::UsernameTooLong { .. } => "username_too_long",
        UserValidationError::UsernameInvalidCharacters => "username_invalid_characters",
        _ => "invalid_username",
    }
}

fn extractor_error(code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({ "code": code.as_str() }))
}

/// JSON body whose extraction error is held back until the handler has run
/// its permission checks.
pub(crate) type JsonBody<T> = Result<web::Json<T>, actix_web::Error>;

/// Unwrap a deferred JSON body, restoring the `invalid_json` error built by
/// [`json_config`].
pub(crate) fn json_body<T>(body: JsonBody<T>) -> Result<T, Error> {
    body.map(web::Json::into_inner).map_err(|err| {
        err.as_error::<Error>().cloned().unwrap_or_else(|| {
            extractor_error(ErrorCode::InvalidJson, format!("invalid JSON body: {err}"))
        })
    })
}

/// JSON body config rejecting malformed payloads with `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        extractor_error(ErrorCode::InvalidJson, format!("invalid JSON body: {err}"))
            .into()
    })
}

/// Query string config rejecting malformed parameters with `invalid_request`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        extractor_error(ErrorCode::InvalidQuery, format!("invalid query string: {err}"))
            .into()
    })
}

/// Path config rejecting malformed segments with `invalid_request`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err: PathError, _req: &HttpRequest| {
        extractor_error(ErrorCode::InvalidPath, format!("invalid path parameter: {err}"))
            .into()
    })
}
