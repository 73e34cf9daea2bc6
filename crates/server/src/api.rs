//! HTTP surface of the catalog: routes, the response envelope and error mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::warn;

use vitrine_core::errors::{ApplicationError, DomainError, InterfaceError};

use crate::catalog::dto::{
    CategoriesResponse, CompareProductsRequest, ComparisonResponse, CreateProductRequest,
    CreateSpecificationValueRequest, CreatedProductResponse, CreatedResponse, DeletedResponse,
    PaginationQuery, ProductSummaryDto, ProductWithSpecificationsResponse, ProductsPageResponse,
    SpecificationGroupsResponse, SpecificationsQuery, SpecificationsResponse,
    UpdateProductRequest, UpdatedResponse,
};
use crate::catalog::CatalogService;

#[derive(Clone)]
pub struct ApiState {
    pub catalog: CatalogService,
}

pub fn router(catalog: CatalogService) -> Router {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/categories/{category_public_id}/products", get(list_products_by_category))
        .route("/products", get(list_products).post(create_product))
        .route("/products/compare", post(compare_products))
        .route("/products/specifications", post(create_specification_value))
        .route(
            "/products/{public_id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{public_id}/specifications", get(get_product_with_specifications))
        .route("/specifications", get(list_specifications))
        .route("/specifications/groups", get(list_specification_groups))
        .with_state(ApiState { catalog })
}

/// Successful responses wrap their payload as `{"status": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: &'static str,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self { status: "success", data }
    }
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    status: &'static str,
    message: &'a str,
    data: Option<()>,
}

#[derive(Debug)]
pub struct ApiError(InterfaceError);

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::Conflict { .. } => StatusCode::CONFLICT,
            InterfaceError::UnprocessableEntity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        let correlation_id = uuid::Uuid::new_v4().to_string();
        warn!(
            event_name = "catalog.request.failed",
            correlation_id = %correlation_id,
            error = %error,
            "catalog request failed"
        );
        Self(error.into_interface(correlation_id))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::from(ApplicationError::from(DomainError::validation(rejection.body_text())))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::from(ApplicationError::from(DomainError::validation(rejection.body_text())))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope { status: "error", message: self.0.client_message(), data: None };
        (self.status_code(), Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;
type CreatedResult<T> = Result<(StatusCode, Json<Envelope<T>>), ApiError>;

fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope::success(data)))
}

fn created<T>(data: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(Envelope::success(data))))
}

async fn list_categories(State(state): State<ApiState>) -> ApiResult<CategoriesResponse> {
    ok(state.catalog.list_categories().await?)
}

async fn create_product(
    State(state): State<ApiState>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> CreatedResult<CreatedProductResponse> {
    let Json(request) = payload?;
    created(state.catalog.create_product(request).await?)
}

async fn compare_products(
    State(state): State<ApiState>,
    payload: Result<Json<CompareProductsRequest>, JsonRejection>,
) -> ApiResult<ComparisonResponse> {
    let Json(request) = payload?;
    ok(state.catalog.compare_products(request).await?)
}

async fn get_product(
    State(state): State<ApiState>,
    Path(public_id): Path<String>,
) -> ApiResult<ProductSummaryDto> {
    ok(state.catalog.get_product(public_id).await?)
}

async fn update_product(
    State(state): State<ApiState>,
    Path(public_id): Path<String>,
    payload: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> ApiResult<UpdatedResponse> {
    let Json(request) = payload?;
    ok(state.catalog.update_product(public_id, request).await?)
}

async fn delete_product(
    State(state): State<ApiState>,
    Path(public_id): Path<String>,
) -> ApiResult<DeletedResponse> {
    ok(state.catalog.delete_product(public_id).await?)
}

async fn list_products(
    State(state): State<ApiState>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> ApiResult<ProductsPageResponse> {
    let Query(query) = query?;
    ok(state.catalog.list_products(query).await?)
}

async fn list_products_by_category(
    State(state): State<ApiState>,
    Path(category_public_id): Path<String>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> ApiResult<ProductsPageResponse> {
    let Query(query) = query?;
    ok(state.catalog.list_products_by_category(category_public_id, query).await?)
}

async fn get_product_with_specifications(
    State(state): State<ApiState>,
    Path(public_id): Path<String>,
) -> ApiResult<ProductWithSpecificationsResponse> {
    ok(state.catalog.get_product_with_specifications(public_id).await?)
}

async fn create_specification_value(
    State(state): State<ApiState>,
    payload: Result<Json<CreateSpecificationValueRequest>, JsonRejection>,
) -> CreatedResult<CreatedResponse> {
    let Json(request) = payload?;
    created(state.catalog.create_specification_value(request).await?)
}

async fn list_specifications(
    State(state): State<ApiState>,
    query: Result<Query<SpecificationsQuery>, QueryRejection>,
) -> ApiResult<SpecificationsResponse> {
    let Query(query) = query?;
    ok(state.catalog.list_specifications(query.specification_group_public_id).await?)
}

async fn list_specification_groups(
    State(state): State<ApiState>,
) -> ApiResult<SpecificationGroupsResponse> {
    ok(state.catalog.list_specification_groups().await?)
}
