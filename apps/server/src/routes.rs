use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use lapline_provider_core::LoadOptions;
use model::{DriversResponse, RaceDataResponse, ScheduleResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ScheduleQuery {
    pub year: i32,
}

#[derive(Debug, Deserialize)]
pub struct DriversQuery {
    pub year: i32,
    pub gp: String,
    pub session: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RaceDataQuery {
    pub year: i32,
    pub gp: String,
    pub d1: String,
    pub d2: Option<String>,
    pub session: Option<String>,
    pub stride: Option<usize>,
}

pub async fn home() -> Json<Value> {
    Json(json!({ "message": "lapline api running. go to /api/race-data for telemetry data" }))
}

/// Championship events for a year, test days left out.
pub async fn schedule(
    State(state): State<AppState>,
    query: Result<Query<ScheduleQuery>, QueryRejection>,
) -> Result<Json<ScheduleResponse>, ApiError> {
    let Query(q) = query?;
    let events = state
        .provider
        .event_schedule(q.year)
        .await?
        .into_iter()
        .filter(|e| !e.is_testing())
        .map(|e| e.name)
        .collect();
    Ok(Json(ScheduleResponse { events }))
}

pub async fn drivers(
    State(state): State<AppState>,
    query: Result<Query<DriversQuery>, QueryRejection>,
) -> Result<Json<DriversResponse>, ApiError> {
    let Query(q) = query?;
    let kind = state.session_kind(q.session.as_deref())?;
    let id = state.provider.resolve_session(q.year, &q.gp, kind).await?;
    let session = state.provider.load(&id, LoadOptions::metadata()).await?;
    Ok(Json(DriversResponse { drivers: session.driver_list().to_vec() }))
}

pub async fn race_data(
    State(state): State<AppState>,
    query: Result<Query<RaceDataQuery>, QueryRejection>,
) -> Result<Json<RaceDataResponse>, ApiError> {
    let Query(q) = query?;
    let kind = state.session_kind(q.session.as_deref())?;
    let stride = state.stride(q.stride)?;
    let d1 = q.d1.trim();
    let d2 = q.d2.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let id = state.provider.resolve_session(q.year, &q.gp, kind).await?;
    let session = state.provider.load(&id, LoadOptions::full()).await?;
    let circuit = session
        .circuit_info()
        .ok_or_else(|| ApiError::Internal(format!("No circuit info available for {id}")))?;

    let response = analysis::build_response(&session, circuit, d1, d2, stride)?;
    info!(
        session = %id,
        d1,
        d2 = d2.unwrap_or("-"),
        stride = stride.get(),
        samples = response.driver1.data.len(),
        "Served race data"
    );
    Ok(Json(response))
}
