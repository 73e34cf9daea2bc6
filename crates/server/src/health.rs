//! Readiness endpoint served on the health port, separate from the catalog API.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};
use vitrine_core::comparison::SpecificationKind;
use vitrine_db::DbPool;

#[derive(Clone)]
pub struct HealthState {
    db_pool: DbPool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    Degraded,
}

/// Row counts of the catalog tables. Comparable kinds counts the specifications stored under one
/// of the comparison engine's fixed ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub categories: i64,
    pub specification_groups: i64,
    pub specifications: i64,
    pub comparable_kinds: i64,
    pub products: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: Readiness,
    pub database: Readiness,
    /// Set when every comparable kind is stored, i.e. any two products in a category can be
    /// compared on their shared specifications.
    pub comparison_ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub checked_at: String,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(health)).with_state(HealthState { db_pool })
}

pub async fn spawn(bind_address: &str, port: u16, db_pool: DbPool) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(db_pool)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let checked_at = Utc::now().to_rfc3339();

    match catalog_stats(&state.db_pool).await {
        Ok(stats) => {
            let comparison_ready = stats.comparable_kinds == SpecificationKind::ALL.len() as i64;
            let payload = HealthResponse {
                status: Readiness::Ready,
                database: Readiness::Ready,
                comparison_ready,
                catalog: Some(stats),
                detail: None,
                checked_at,
            };
            (StatusCode::OK, Json(payload))
        }
        Err(error) => {
            let payload = HealthResponse {
                status: Readiness::Degraded,
                database: Readiness::Degraded,
                comparison_ready: false,
                catalog: None,
                detail: Some(format!("catalog query failed: {error}")),
                checked_at,
            };
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload))
        }
    }
}

async fn catalog_stats(pool: &DbPool) -> Result<CatalogStats, sqlx::Error> {
    let kind_ids = SpecificationKind::ALL.iter().map(|kind| kind.id().0);
    let (min_kind, max_kind) = (kind_ids.clone().min(), kind_ids.max());

    let (categories, specification_groups, specifications, comparable_kinds, products): (
        i64,
        i64,
        i64,
        i64,
        i64,
    ) = sqlx::query_as(
        "SELECT (SELECT COUNT(1) FROM category),
                (SELECT COUNT(1) FROM specification_group),
                (SELECT COUNT(1) FROM specification),
                (SELECT COUNT(1) FROM specification WHERE id BETWEEN ?1 AND ?2),
                (SELECT COUNT(1) FROM product)",
    )
    .bind(min_kind)
    .bind(max_kind)
    .fetch_one(pool)
    .await?;

    Ok(CatalogStats { categories, specification_groups, specifications, comparable_kinds, products })
}
