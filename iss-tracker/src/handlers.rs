//! HTTP handlers for the ephemeris API

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use iss_core::{EphemerisSet, Header, Metadata, Page, Speed, StateVector, SubPoint};
use serde::{Serialize, Serializer};
use serde_json::{Value, json};
use std::sync::Arc;

use crate::error::AppError;
use crate::geo;
use crate::state::AppState;

type ApiResult<T> = Result<T, AppError>;

/// Raw `limit` / `offset` query parameters, validated by [`Page::parse`].
///
/// Repeated keys keep their first value.
#[derive(Debug, Default, PartialEq)]
pub struct EpochsQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl EpochsQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "limit" => &mut query.limit,
                "offset" => &mut query.offset,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }
}

#[derive(Debug, Serialize)]
pub struct Location {
    #[serde(flatten)]
    pub sub_point: SubPoint,
    /// Structured address, or null when nothing was found
    pub geo: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct LocationReport {
    pub closest_epoch: String,
    #[serde(serialize_with = "whole_seconds_as_integer")]
    pub seconds_from_now: f64,
    pub location: Location,
    pub speed: Speed,
}

/// Whole offsets (the exact-epoch case is always 0) go out as integers.
fn whole_seconds_as_integer<S: Serializer>(seconds: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if seconds.fract() == 0.0 && seconds.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*seconds as i64)
    } else {
        serializer.serialize_f64(*seconds)
    }
}

async fn loaded(state: &AppState) -> ApiResult<Arc<EphemerisSet>> {
    Ok(state.store.require().await?)
}

/// GET /
pub async fn all_data(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let set = loaded(&state).await?;
    Ok(Json(json!({ "ndm": set.document() })))
}

/// GET /epochs
pub async fn list_epochs(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Json<Vec<String>>> {
    let set = loaded(&state).await?;
    let params = EpochsQuery::from_pairs(pairs);
    let page = Page::parse(params.limit.as_deref(), params.offset.as_deref())?;

    let epochs = set
        .list_epochs(page)
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(Json(epochs))
}

/// GET /epochs/{epoch}
pub async fn epoch_state(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<StateVector>> {
    let set = loaded(&state).await?;
    Ok(Json(set.require_epoch(&epoch)?.clone()))
}

/// GET /epochs/{epoch}/speed
pub async fn epoch_speed(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<Speed>> {
    let set = loaded(&state).await?;
    Ok(Json(iss_core::speed(set.require_epoch(&epoch)?)))
}

/// GET /epochs/{epoch}/location
pub async fn epoch_location(
    State(state): State<AppState>,
    Path(epoch): Path<String>,
) -> ApiResult<Json<LocationReport>> {
    let set = loaded(&state).await?;
    let vector = set.require_epoch(&epoch)?;
    Ok(Json(build_report(&state, vector, 0.0).await?))
}

/// GET /now
pub async fn now(State(state): State<AppState>) -> ApiResult<Json<LocationReport>> {
    let set = loaded(&state).await?;
    let nearest = set
        .find_nearest_to(Utc::now())
        .ok_or(iss_core::EphemerisError::EmptyStore)?;

    tracing::debug!(
        "Nearest epoch {} is {:.1}s from now",
        nearest.vector.epoch,
        nearest.seconds_offset
    );
    Ok(Json(build_report(&state, nearest.vector, nearest.seconds_offset).await?))
}

async fn build_report(
    state: &AppState,
    vector: &StateVector,
    seconds_from_now: f64,
) -> ApiResult<LocationReport> {
    let sub_point = iss_core::sub_point(vector)?;
    let geo = geo::locate(
        state.geocoder.as_ref(),
        sub_point.latitude,
        sub_point.longitude,
        state.geocode_timeout,
    )
    .await;

    Ok(LocationReport {
        closest_epoch: vector.epoch.clone(),
        seconds_from_now,
        location: Location { sub_point, geo },
        speed: iss_core::speed(vector),
    })
}

/// GET /comment
pub async fn comments(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let set = loaded(&state).await?;
    Ok(Json(set.comments().to_vec()))
}

/// GET /header
pub async fn header(State(state): State<AppState>) -> ApiResult<Json<Header>> {
    let set = loaded(&state).await?;
    Ok(Json(set.header().clone()))
}

/// GET /metadata
pub async fn metadata(State(state): State<AppState>) -> ApiResult<Json<Metadata>> {
    let set = loaded(&state).await?;
    Ok(Json(set.metadata().clone()))
}

/// DELETE /delete-data
pub async fn delete_data(State(state): State<AppState>) -> &'static str {
    state.refresh.wipe().await;
    "Data deleted from instance\n"
}

/// POST /post-data
pub async fn post_data(State(state): State<AppState>) -> ApiResult<&'static str> {
    state.refresh.refresh().await?;
    Ok("Data refreshed\n")
}

/// GET /help
pub async fn help() -> &'static str {
    HELP_TEXT
}

pub const HELP_TEXT: &str = "\
These are the endpoints of the iss-tracker API.

Note that if the data is empty, all data GET requests
return a string message with a 404 status.

\t/ GET Return the entire data set in JSON form.
\t/epochs GET Return a list of all epochs in JSON form.
\t\tint:limit The maximum number of epochs to return.
\t\tint:offset What epoch to start from, zero-indexed.
\t/epochs/<epoch> GET Return the state vector for an epoch
\t\tin JSON form. Returns a string error message with a
\t\t404 status if no such record.
\t/epochs/<epoch>/speed GET Return the instantaneous speed
\t\tfor an epoch in JSON form.
\t/epochs/<epoch>/location GET Return latitude, longitude,
\t\taltitude and geoposition for an epoch.
\t/now GET Return location and speed for the epoch nearest
\t\tto the current time.
\t/comment GET Return the comment list of the data set.
\t/header GET Return the header of the data set.
\t/metadata GET Return the metadata of the data set.
\t/delete-data DELETE Clear all data in the instance.
\t/post-data POST Update and overwrite all data.
\t/help GET Return this message.
";
