//! Movie routes.
//!
//! ## Routes
//!
//! - `GET /movies`: every movie, or those matching `?genre=` (case-insensitive).
//! - `GET /movies/:id`: one movie, 404 when unknown.
//! - `POST /movies`: create from a full payload, 201 with the generated id.
//! - `PATCH /movies/:id`: merge a partial payload into an existing movie.
//! - `OPTIONS /movies/:id`: preflight advertising the mutating methods.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header::ACCESS_CONTROL_ALLOW_METHODS;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use marquee_catalog::MovieService;
use marquee_protocol::Movie;
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::access_control::{access_control, OriginCheck, OriginPolicy, PREFLIGHT_METHODS};
use crate::error::ApiError;

/// Query string accepted by `GET /movies`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub genre: Option<String>,
}

impl ListQuery {
    /// Pick the filter out of raw query pairs. Unknown keys are ignored and
    /// the first `genre` wins when the key repeats.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let genre = pairs
            .into_iter()
            .find(|(key, _)| key == "genre")
            .map(|(_, value)| value);
        Self { genre }
    }
}

/// Build the movie `Router` with access control applied to every route.
pub fn router(service: Arc<MovieService>, policy: OriginPolicy) -> Router {
    Router::new()
        .route("/movies", get(list_movies).post(create_movie))
        .route(
            "/movies/:id",
            get(get_movie).patch(update_movie).options(preflight),
        )
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(middleware::from_fn_with_state(
                    Arc::new(policy),
                    access_control,
                )),
        )
        .with_state(service)
}

async fn list_movies(
    State(service): State<Arc<MovieService>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Json<Vec<Movie>> {
    // listing never fails; an unreadable query string means no filter
    let query = query
        .map(|Query(pairs)| ListQuery::from_pairs(pairs))
        .unwrap_or_default();
    Json(service.list(query.genre.as_deref()))
}

async fn get_movie(
    State(service): State<Arc<MovieService>>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    Ok(Json(service.get(&id)?))
}

async fn create_movie(
    State(service): State<Arc<MovieService>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Movie>), ApiError> {
    let Json(payload) = payload?;
    let movie = service.create(&payload)?;
    Ok((StatusCode::CREATED, Json(movie)))
}

async fn update_movie(
    State(service): State<Arc<MovieService>>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Movie>, ApiError> {
    let Json(payload) = payload?;
    Ok(Json(service.update(&id, &payload)?))
}

async fn preflight(Extension(check): Extension<OriginCheck>) -> Response {
    let mut response = StatusCode::OK.into_response();
    if check.permitted {
        response.headers_mut().insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(PREFLIGHT_METHODS),
        );
    }
    response
}
