use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Serialize;

use crate::models::WeatherRecord;
use crate::weather::WeatherLookup;
use crate::web::{LookupForm, status_for};

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: &'static str,
    pub message: String,
}

pub fn router() -> Router<WeatherLookup> {
    Router::new().route("/weather", get(get_weather))
}

async fn get_weather(
    State(lookup): State<WeatherLookup>,
    Query(params): Query<LookupForm>,
) -> Result<Json<WeatherRecord>, (StatusCode, Json<ApiError>)> {
    params.run(&lookup).await.map(Json).map_err(|err| {
        (
            status_for(&err),
            Json(ApiError {
                error: err.kind(),
                message: err.user_message(),
            }),
        )
    })
}
