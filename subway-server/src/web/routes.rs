//! HTTP route handlers.

use axum::body::Bytes;
use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::de::DeserializeOwned;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::domain::{LineId, StationId};
use crate::service::{NewLine, ServiceError};
use crate::stations::StationError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", post(create_station).get(list_stations))
        .route("/stations/:id", axum::routing::delete(delete_station))
        .route("/lines", post(create_line).get(list_lines))
        .route(
            "/lines/:id",
            get(get_line).put(update_line).delete(delete_line),
        )
        .route(
            "/lines/:id/sections",
            post(add_section).delete(remove_section),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Parse a JSON body, turning any failure into a 400.
fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {e}"),
    })
}

/// Unwrap a numeric path id. Anything that is not an id names no resource.
fn path_id(path: Result<Path<u64>, PathRejection>) -> Result<u64, AppError> {
    path.map(|Path(id)| id).map_err(|e| AppError::NotFound {
        message: e.body_text(),
    })
}

/// Respond with 201 and a `Location` header.
fn created<T: serde::Serialize>(location: String, body: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(body),
    )
        .into_response()
}

async fn create_station(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: CreateStationRequest = parse_json(&body)?;
    let record = state.service.create_station(&req.name).await?;
    Ok(created(
        format!("/stations/{}", record.id),
        StationResponse::from(record),
    ))
}

async fn list_stations(State(state): State<AppState>) -> Json<Vec<StationResponse>> {
    let stations = state.service.list_stations().await;
    Json(stations.into_iter().map(StationResponse::from).collect())
}

async fn delete_station(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(id)?;
    state.service.delete_station(StationId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_line(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let req: CreateLineRequest = parse_json(&body)?;
    let view = state
        .service
        .create_line(NewLine {
            name: req.name,
            color: req.color,
            up_station: req.up_station_id,
            down_station: req.down_station_id,
            distance: req.distance,
        })
        .await?;
    Ok(created(format!("/lines/{}", view.id), LineResponse::from(view)))
}

async fn list_lines(State(state): State<AppState>) -> Result<Json<Vec<LineResponse>>, AppError> {
    let lines = state.service.list_lines().await?;
    Ok(Json(lines.into_iter().map(LineResponse::from).collect()))
}

async fn get_line(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<LineResponse>, AppError> {
    let id = path_id(id)?;
    let view = state.service.get_line(LineId(id)).await?;
    Ok(Json(view.into()))
}

async fn update_line(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<Json<LineResponse>, AppError> {
    let id = path_id(id)?;
    let req: UpdateLineRequest = parse_json(&body)?;
    let view = state
        .service
        .update_line(LineId(id), &req.name, &req.color)
        .await?;
    Ok(Json(view.into()))
}

async fn delete_line(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(id)?;
    state.service.delete_line(LineId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_section(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    body: Bytes,
) -> Result<Response, AppError> {
    let id = path_id(id)?;
    let req: AddSectionRequest = parse_json(&body)?;
    let view = state
        .service
        .add_section(
            LineId(id),
            req.up_station_id,
            req.down_station_id,
            req.distance,
        )
        .await?;
    Ok(created(format!("/lines/{}", view.id), LineResponse::from(view)))
}

async fn remove_section(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
    query: Result<Query<RemoveSectionQuery>, QueryRejection>,
) -> Result<StatusCode, AppError> {
    let id = path_id(id)?;
    let Query(query) = query.map_err(|e| AppError::BadRequest {
        message: e.body_text(),
    })?;
    state
        .service
        .remove_station(LineId(id), query.station_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        let message = e.to_string();
        match e {
            ServiceError::Station(StationError::NotFound(_)) | ServiceError::LineNotFound(_) => {
                AppError::NotFound { message }
            }
            ServiceError::Topology(ref t) if t.is_integrity_fault() => {
                AppError::Internal { message }
            }
            ServiceError::Storage(_) => AppError::Internal { message },
            ServiceError::Station(_)
            | ServiceError::Topology(_)
            | ServiceError::DuplicateLineName(_)
            | ServiceError::EmptyLineName
            | ServiceError::StationInUse { .. } => AppError::BadRequest { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, %message, "request failed");
        } else {
            warn!(%status, %message, "request rejected");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TopologyError;
    use crate::store::StoreError;

    fn status_of(e: ServiceError) -> StatusCode {
        AppError::from(e).into_response().status()
    }

    #[test]
    fn validation_failures_are_bad_requests() {
        for e in [
            TopologyError::InvalidDistance(0),
            TopologyError::SameStation(StationId(1)),
            TopologyError::BothStationsExist {
                up: StationId(1),
                down: StationId(2),
            },
            TopologyError::NeitherStationExists {
                up: StationId(1),
                down: StationId(2),
            },
            TopologyError::DistanceTooLarge {
                existing: 1,
                requested: 1,
            },
            TopologyError::DistanceOverflow,
            TopologyError::SingleSegmentRemaining,
            TopologyError::StationNotOnLine(StationId(1)),
        ] {
            assert_eq!(status_of(ServiceError::Topology(e)), StatusCode::BAD_REQUEST);
        }
        assert_eq!(
            status_of(ServiceError::DuplicateLineName("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ServiceError::Station(StationError::DuplicateName("x".into()))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn missing_resources_are_not_found() {
        assert_eq!(
            status_of(ServiceError::LineNotFound(LineId(1))),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ServiceError::Station(StationError::NotFound(StationId(1)))),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn integrity_faults_are_server_errors() {
        assert_eq!(
            status_of(ServiceError::Topology(TopologyError::BrokenChain("x"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(ServiceError::Storage(StoreError::Snapshot {
                message: "disk".into()
            })),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
