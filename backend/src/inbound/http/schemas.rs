//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay free of `ToSchema`; the wrappers here mirror their
//! serialised shape and are registered under the domain type's name.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Credentials were rejected or no session is present.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The requester may not perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The resource does not exist, or the page is out of range.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request conflicts with existing state, such as a taken username.
    #[schema(rename = "conflict")]
    Conflict,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "missing required field: title")]
    message: String,
    /// Correlates the failure with server logs.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level context, e.g. `{"field":"title","code":"missing_field"}`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[rstest]
    fn schemas_are_named_after_domain_types() {
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
    }

    #[rstest]
    #[case("invalid_request")]
    #[case("unauthorized")]
    #[case("forbidden")]
    #[case("not_found")]
    #[case("conflict")]
    #[case("service_unavailable")]
    #[case("internal_error")]
    fn error_code_schema_lists_every_code(#[case] code: &str) {
        assert!(
            schema_to_json::<ErrorCodeSchema>().contains(code),
            "missing {code}"
        );
    }

    #[rstest]
    fn error_schema_uses_wire_field_names() {
        let json = schema_to_json::<ErrorSchema>();
        assert!(json.contains("traceId"), "schema should use traceId");
        assert!(json.contains("details"));
    }
}
