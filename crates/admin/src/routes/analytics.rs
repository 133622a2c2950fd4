//! Dashboard analytics handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::services::analytics::{AnalyticsService, MonthlyRevenue, Summary, TopProduct};
use crate::state::AppState;

/// `GET /api/analytics/summary` - revenue and order counts.
#[instrument(skip(state, _admin))]
pub async fn summary(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Summary>> {
    let summary = AnalyticsService::new(state.pool()).summary().await?;
    Ok(Json(summary))
}

/// `GET /api/analytics/monthly` - monthly revenue series.
#[instrument(skip(state, _admin))]
pub async fn monthly(
    _admin: RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<MonthlyRevenue>>> {
    let series = AnalyticsService::new(state.pool()).monthly_revenue().await?;
    Ok(Json(series))
}

/// Query for `GET /api/analytics/top-products`.
#[derive(Debug, Deserialize)]
pub struct TopQuery {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

const fn default_limit() -> usize {
    10
}

/// `GET /api/analytics/top-products` - best sellers by units.
#[instrument(skip(state, _admin))]
pub async fn top_products(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<Vec<TopProduct>>> {
    let ranked = AnalyticsService::new(state.pool())
        .top_products(query.limit.min(50))
        .await?;

    Ok(Json(ranked))
}
