//! Comment HTTP handlers, nested under an ad.
//!
//! ```text
//! GET    /api/v1/ads/{ad_id}/comments
//! POST   /api/v1/ads/{ad_id}/comments {"text":"Is it still available?"}
//! GET    /api/v1/ads/{ad_id}/comments/{id}
//! PUT    /api/v1/ads/{ad_id}/comments/{id}
//! PATCH  /api/v1/ads/{ad_id}/comments/{id}
//! DELETE /api/v1/ads/{ad_id}/comments/{id}
//! ```
//!
//! The list is not scoped to `ad_id`; single-comment routes look comments
//! up by `id` alone.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AdId, Comment, CommentAction, CommentId, CommentText, Error, Requester};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, JsonBody, ad_validation_error, comment_validation_error, json_body,
    missing_field_error,
};

const TEXT: FieldName = FieldName::new("text");

/// Writable comment fields.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CommentPayload {
    #[schema(example = "Is it still available?")]
    pub text: Option<String>,
}

impl CommentPayload {
    fn required_text(self) -> Result<CommentText, Error> {
        let text = self.text.ok_or_else(|| missing_field_error(TEXT))?;
        CommentText::new(&text).map_err(comment_validation_error)
    }

    fn optional_text(self) -> Result<Option<CommentText>, Error> {
        self.text
            .as_deref()
            .map(CommentText::new)
            .transpose()
            .map_err(comment_validation_error)
    }
}

/// Comment representation returned by every comment endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    #[schema(example = 12)]
    pub id: i64,
    /// Parent ad id.
    #[schema(example = 7)]
    pub ad: i64,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub author: String,
    pub text: String,
    #[schema(example = "2026-02-01T11:00:00+00:00")]
    pub created_at: String,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id().get(),
            ad: comment.ad().get(),
            author: comment.author().to_string(),
            text: comment.text().as_ref().to_owned(),
            created_at: comment.created_at().to_rfc3339(),
        }
    }
}

fn ad_id(raw: i64) -> Result<AdId, Error> {
    AdId::new(raw).map_err(ad_validation_error)
}

fn comment_id(raw: i64) -> Result<CommentId, Error> {
    CommentId::new(raw).map_err(comment_validation_error)
}

async fn resolve_requester(
    state: &HttpState,
    session: &SessionContext,
) -> Result<Requester, Error> {
    session.requester(state.profile.as_ref()).await
}

/// List every comment.
#[utoipa::path(
    get,
    path = "/api/v1/ads/{ad_id}/comments",
    params(("ad_id" = i64, Path, description = "Ad identifier")),
    responses(
        (status = 200, description = "All comments", body = [CommentResponse]),
        (status = 403, description = "Not authenticated", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments"
)]
#[get("/ads/{ad_id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    ad_id(path.into_inner())?;
    let requester = resolve_requester(&state, &session).await?;
    let comments = state.comments.list(&requester).await?;
    Ok(web::Json(comments.into_iter().map(CommentResponse::from).collect()))
}

/// Comment on an ad as the caller.
#[utoipa::path(
    post,
    path = "/api/v1/ads/{ad_id}/comments",
    params(("ad_id" = i64, Path, description = "Ad identifier")),
    request_body = CommentPayload,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not authenticated", body = ErrorSchema),
        (status = 404, description = "Ad not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "createComment"
)]
#[post("/ads/{ad_id}/comments")]
pub async fn create_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: JsonBody<CommentPayload>,
) -> ApiResult<HttpResponse> {
    let ad = ad_id(path.into_inner())?;
    let requester = resolve_requester(&state, &session).await?;
    CommentAction::Create.policy().check(&requester)?;
    let text = json_body(payload)?.required_text()?;
    let comment = state.comments_command.create(&requester, ad, text).await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// Fetch one comment.
#[utoipa::path(
    get,
    path = "/api/v1/ads/{ad_id}/comments/{id}",
    params(
        ("ad_id" = i64, Path, description = "Ad identifier"),
        ("id" = i64, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Comment", body = CommentResponse),
        (status = 403, description = "Not authenticated", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "getComment"
)]
#[get("/ads/{ad_id}/comments/{id}")]
pub async fn get_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i64, i64)>,
) -> ApiResult<web::Json<CommentResponse>> {
    let (_, id) = path.into_inner();
    let id = comment_id(id)?;
    let requester = resolve_requester(&state, &session).await?;
    let comment = state.comments.retrieve(&requester, id).await?;
    Ok(web::Json(comment.into()))
}

/// Replace a comment's text.
#[utoipa::path(
    put,
    path = "/api/v1/ads/{ad_id}/comments/{id}",
    params(
        ("ad_id" = i64, Path, description = "Ad identifier"),
        ("id" = i64, Path, description = "Comment identifier")
    ),
    request_body = CommentPayload,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not authenticated", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "updateComment"
)]
#[put("/ads/{ad_id}/comments/{id}")]
pub async fn update_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i64, i64)>,
    payload: JsonBody<CommentPayload>,
) -> ApiResult<web::Json<CommentResponse>> {
    let (_, id) = path.into_inner();
    let id = comment_id(id)?;
    let requester = resolve_requester(&state, &session).await?;
    CommentAction::Update.policy().check(&requester)?;
    let text = json_body(payload)?.required_text()?;
    let comment = state
        .comments_command
        .update(&requester, id, Some(text))
        .await?;
    Ok(web::Json(comment.into()))
}

/// Change a comment's text if supplied.
#[utoipa::path(
    patch,
    path = "/api/v1/ads/{ad_id}/comments/{id}",
    params(
        ("ad_id" = i64, Path, description = "Ad identifier"),
        ("id" = i64, Path, description = "Comment identifier")
    ),
    request_body = CommentPayload,
    responses(
        (status = 200, description = "Comment updated", body = CommentResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not authenticated", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "patchComment"
)]
#[patch("/ads/{ad_id}/comments/{id}")]
pub async fn patch_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i64, i64)>,
    payload: JsonBody<CommentPayload>,
) -> ApiResult<web::Json<CommentResponse>> {
    let (_, id) = path.into_inner();
    let id = comment_id(id)?;
    let requester = resolve_requester(&state, &session).await?;
    CommentAction::PartialUpdate.policy().check(&requester)?;
    let text = json_body(payload)?.optional_text()?;
    let comment = state.comments_command.update(&requester, id, text).await?;
    Ok(web::Json(comment.into()))
}

/// Delete a comment.
#[utoipa::path(
    delete,
    path = "/api/v1/ads/{ad_id}/comments/{id}",
    params(
        ("ad_id" = i64, Path, description = "Ad identifier"),
        ("id" = i64, Path, description = "Comment identifier")
    ),
    responses(
        (status = 204, description = "Comment deleted"),
        (status = 403, description = "Not authenticated", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/ads/{ad_id}/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (_, id) = path.into_inner();
    let id = comment_id(id)?;
    let requester = resolve_requester(&state, &session).await?;
    state.comments_command.destroy(&requester, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "comments_tests.rs"]
mod tests;
