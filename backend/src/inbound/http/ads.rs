//! Ad HTTP handlers.
//!
//! ```text
//! GET    /api/v1/ads?title=bike&category=sport&price_min=10&price_max=90&page=2
//! GET    /api/v1/ads/me
//! GET    /api/v1/ads/{id}
//! POST   /api/v1/ads {"title":"Bike","description":"","price":50,"category":"sport"}
//! PUT    /api/v1/ads/{id}
//! PATCH  /api/v1/ads/{id}
//! DELETE /api/v1/ads/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use pagination::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use url::Url;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{AdPage, ListAdsRequest};
use crate::domain::{
    Ad, AdAction, AdContent, AdDescription, AdFilter, AdId, AdPatch, AdTitle, AdUpdate, Category,
    Error, Price, Requester,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, JsonBody, ad_validation_error, json_body, missing_field_error,
    parse_optional_i64,
};

const TITLE: FieldName = FieldName::new("title");
const PRICE: FieldName = FieldName::new("price");
const CATEGORY: FieldName = FieldName::new("category");
const PRICE_MIN: FieldName = FieldName::new("price_min");
const PRICE_MAX: FieldName = FieldName::new("price_max");

/// Writable ad fields.
///
/// `POST` and `PUT` require `title`, `price` and `category`; a missing
/// `description` is stored as empty. `PATCH` accepts any subset.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdPayload {
    #[schema(example = "Mountain bike")]
    pub title: Option<String>,
    #[schema(example = "Barely used, new tyres")]
    pub description: Option<String>,
    #[schema(example = 250)]
    pub price: Option<i64>,
    #[schema(example = "sport")]
    pub category: Option<String>,
}

impl AdPayload {
    fn into_content(self) -> Result<AdContent, Error> {
        let title = self.title.ok_or_else(|| missing_field_error(TITLE))?;
        let price = self.price.ok_or_else(|| missing_field_error(PRICE))?;
        let category = self.category.ok_or_else(|| missing_field_error(CATEGORY))?;
        Ok(AdContent {
            title: AdTitle::new(&title).map_err(ad_validation_error)?,
            description: AdDescription::new(self.description.as_deref().unwrap_or_default())
                .map_err(ad_validation_error)?,
            price: Price::new(price).map_err(ad_validation_error)?,
            category: Category::new(&category).map_err(ad_validation_error)?,
        })
    }

    fn into_patch(self) -> Result<AdPatch, Error> {
        Ok(AdPatch {
            title: self
                .title
                .as_deref()
                .map(AdTitle::new)
                .transpose()
                .map_err(ad_validation_error)?,
            description: self
                .description
                .as_deref()
                .map(AdDescription::new)
                .transpose()
                .map_err(ad_validation_error)?,
            price: self
                .price
                .map(Price::new)
                .transpose()
                .map_err(ad_validation_error)?,
            category: self
                .category
                .as_deref()
                .map(Category::new)
                .transpose()
                .map_err(ad_validation_error)?,
        })
    }
}

/// Ad representation returned by every ad endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdResponse {
    #[schema(example = 7)]
    pub id: i64,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub author: String,
    pub title: String,
    pub description: String,
    pub price: i64,
    pub category: String,
    #[schema(example = "2026-02-01T11:00:00+00:00")]
    pub created_at: String,
}

impl From<Ad> for AdResponse {
    fn from(ad: Ad) -> Self {
        let content = ad.content();
        Self {
            id: ad.id().get(),
            author: ad.author().to_string(),
            title: content.title.as_ref().to_owned(),
            description: content.description.as_ref().to_owned(),
            price: content.price.get(),
            category: content.category.as_ref().to_owned(),
            created_at: ad.created_at().to_rfc3339(),
        }
    }
}

/// Paginated ad list: `{count, next, previous, results}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdPageResponse {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<AdResponse>,
}

impl From<Page<AdResponse>> for AdPageResponse {
    fn from(page: Page<AdResponse>) -> Self {
        Self {
            count: page.count,
            next: page.next,
            previous: page.previous,
            results: page.results,
        }
    }
}

/// Query parameters accepted by the ad list endpoints.
///
/// Values arrive as strings so malformed numbers surface as field-level
/// validation errors rather than opaque query parse failures.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdListParams {
    /// 1-based page number; defaults to 1.
    pub page: Option<String>,
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    /// Exact category.
    pub category: Option<String>,
    /// Inclusive lower price bound.
    pub price_min: Option<String>,
    /// Inclusive upper price bound.
    pub price_max: Option<String>,
}

impl AdListParams {
    fn into_request(self, requester: Requester) -> Result<ListAdsRequest, Error> {
        let page = PageRequest::parse(self.page.as_deref())?;
        let filter = AdFilter::new(
            self.title.as_deref(),
            self.category.as_deref(),
            parse_optional_i64(self.price_min.as_deref(), PRICE_MIN)?,
            parse_optional_i64(self.price_max.as_deref(), PRICE_MAX)?,
        )
        .map_err(ad_validation_error)?;
        Ok(ListAdsRequest {
            requester,
            filter,
            page,
        })
    }
}

/// Absolute URL of the current request, used as the base for page links.
pub(crate) fn request_url(req: &HttpRequest) -> Result<Url, Error> {
    let info = req.connection_info();
    let raw = format!("{}://{}{}", info.scheme(), info.host(), req.uri());
    Url::parse(&raw).map_err(|err| Error::internal(format!("invalid request url `{raw}`: {err}")))
}

fn page_response(req: &HttpRequest, page: AdPage) -> Result<AdPageResponse, Error> {
    let base = request_url(req)?;
    let results = page.ads.into_iter().map(AdResponse::from).collect();
    let envelope = Page::assemble(page.page, page.size, page.total, results, &base)?;
    Ok(envelope.into())
}

fn ad_id(raw: i64) -> Result<AdId, Error> {
    AdId::new(raw).map_err(ad_validation_error)
}

/// Surface a rejected body only to callers allowed to change the ad; anyone
/// else gets the permission error.
async fn authorized_payload<T>(
    state: &HttpState,
    requester: &Requester,
    id: AdId,
    action: AdAction,
    parsed: Result<T, Error>,
) -> Result<T, Error> {
    match parsed {
        Ok(value) => {
            action.policy().check(requester)?;
            Ok(value)
        }
        Err(invalid) => {
            state.ads_command.authorize(requester, id, action).await?;
            Err(invalid)
        }
    }
}

/// List ads across all authors, four per page.
#[utoipa::path(
    get,
    path = "/api/v1/ads",
    params(AdListParams),
    responses(
        (status = 200, description = "Page of ads", body = AdPageResponse),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 404, description = "Invalid page", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "listAds",
    security([])
)]
#[get("/ads")]
pub async fn list_ads(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<AdListParams>,
) -> ApiResult<web::Json<AdPageResponse>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let request = params.into_inner().into_request(requester)?;
    let page = state.ads.list(request).await?;
    Ok(web::Json(page_response(&req, page)?))
}

/// List the caller's own ads.
#[utoipa::path(
    get,
    path = "/api/v1/ads/me",
    params(AdListParams),
    responses(
        (status = 200, description = "Page of the caller's ads", body = AdPageResponse),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 403, description = "Not authenticated", body = ErrorSchema),
        (status = 404, description = "Invalid page", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "listMyAds"
)]
#[get("/ads/me")]
pub async fn list_my_ads(
    req: HttpRequest,
    state: web::Data<HttpState>,
    session: SessionContext,
    params: web::Query<AdListParams>,
) -> ApiResult<web::Json<AdPageResponse>> {
    let requester = session.requester(state.profile.as_ref()).await?;
    let request = params.into_inner().into_request(requester)?;
    let page = state.ads.list_mine(request).await?;
    Ok(web::Json(page_response(&req, page)?))
}

/// Fetch one ad.
#[utoipa::path(
    get,
    path = "/api/v1/ads/{id}",
    params(("id" = i64, Path, description = "Ad identifier")),
    responses(
        (status = 200, description = "Ad", body = AdResponse),
        (status = 404, description = "Ad not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "getAd",
    security([])
)]
#[get("/ads/{id}")]
pub async fn get_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<web::Json<AdResponse>> {
    let id = ad_id(path.into_inner())?;
    let requester = session.requester(state.profile.as_ref()).await?;
    let ad = state.ads.retrieve(&requester, id).await?;
    Ok(web::Json(ad.into()))
}

/// Publish a new ad authored by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/ads",
    request_body = AdPayload,
    responses(
        (status = 201, description = "Ad created", body = AdResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not authenticated", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "createAd"
)]
#[post("/ads")]
pub async fn create_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: JsonBody<AdPayload>,
) -> ApiResult<HttpResponse> {
    let requester = session.requester(state.profile.as_ref()).await?;
    // Permission failures take precedence over payload errors.
    AdAction::Create.policy().check(&requester)?;
    let content = json_body(payload)?.into_content()?;
    let ad = state.ads_command.create(&requester, content).await?;
    Ok(HttpResponse::Created().json(AdResponse::from(ad)))
}

/// Replace every writable field of an ad.
#[utoipa::path(
    put,
    path = "/api/v1/ads/{id}",
    params(("id" = i64, Path, description = "Ad identifier")),
    request_body = AdPayload,
    responses(
        (status = 200, description = "Ad updated", body = AdResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the owner or an administrator", body = ErrorSchema),
        (status = 404, description = "Ad not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "updateAd"
)]
#[put("/ads/{id}")]
pub async fn update_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: JsonBody<AdPayload>,
) -> ApiResult<web::Json<AdResponse>> {
    let id = ad_id(path.into_inner())?;
    let requester = session.requester(state.profile.as_ref()).await?;
    let parsed = json_body(payload).and_then(AdPayload::into_content);
    let update = AdUpdate::Replace(
        authorized_payload(&state, &requester, id, AdAction::Update, parsed).await?,
    );
    let ad = state.ads_command.update(&requester, id, update).await?;
    Ok(web::Json(ad.into()))
}

/// Change any subset of an ad's writable fields.
#[utoipa::path(
    patch,
    path = "/api/v1/ads/{id}",
    params(("id" = i64, Path, description = "Ad identifier")),
    request_body = AdPayload,
    responses(
        (status = 200, description = "Ad updated", body = AdResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the owner or an administrator", body = ErrorSchema),
        (status = 404, description = "Ad not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "patchAd"
)]
#[patch("/ads/{id}")]
pub async fn patch_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
    payload: JsonBody<AdPayload>,
) -> ApiResult<web::Json<AdResponse>> {
    let id = ad_id(path.into_inner())?;
    let requester = session.requester(state.profile.as_ref()).await?;
    let parsed = json_body(payload).and_then(AdPayload::into_patch);
    let update = AdUpdate::Patch(
        authorized_payload(&state, &requester, id, AdAction::PartialUpdate, parsed).await?,
    );
    let ad = state.ads_command.update(&requester, id, update).await?;
    Ok(web::Json(ad.into()))
}

/// Delete an ad and its comments.
#[utoipa::path(
    delete,
    path = "/api/v1/ads/{id}",
    params(("id" = i64, Path, description = "Ad identifier")),
    responses(
        (status = 204, description = "Ad deleted"),
        (status = 403, description = "Not the owner or an administrator", body = ErrorSchema),
        (status = 404, description = "Ad not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["ads"],
    operation_id = "deleteAd"
)]
#[delete("/ads/{id}")]
pub async fn delete_ad(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = ad_id(path.into_inner())?;
    let requester = session.requester(state.profile.as_ref()).await?;
    state.ads_command.destroy(&requester, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "ads_tests.rs"]
mod tests;
