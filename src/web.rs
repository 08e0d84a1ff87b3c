use anyhow::{Context, Result};
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::Html,
    routing::get,
};
use serde::Deserialize;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::models::LocationQuery;
use crate::weather::WeatherLookup;
use crate::{WeatherError, api, pages};

const MAX_FORM_BYTES: usize = 16 * 1024;

/// Fields submitted by the lookup form, also accepted as query parameters by the API
#[derive(Debug, Default, Clone, Deserialize)]
pub struct LookupForm {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub country: Option<String>,
}

impl LookupForm {
    pub fn query(&self) -> crate::Result<LocationQuery> {
        LocationQuery::from_parts(&self.location, self.country.as_deref())
    }

    /// Validate the fields and run the full lookup
    pub async fn run(&self, lookup: &WeatherLookup) -> crate::Result<crate::WeatherRecord> {
        lookup.lookup_query(&self.query()?).await
    }
}

/// HTTP status a failed lookup is reported with
pub(crate) fn status_for(err: &WeatherError) -> StatusCode {
    match err {
        WeatherError::LocationNotFound { .. } => StatusCode::NOT_FOUND,
        WeatherError::Provider { .. } => StatusCode::BAD_GATEWAY,
        WeatherError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn router(lookup: WeatherLookup) -> Router {
    Router::new()
        .route("/", get(show_form).post(submit_form))
        .route("/healthz", get(healthz))
        .nest("/api", api::router())
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(lookup)
}

pub async fn run(config: &ServerConfig, lookup: WeatherLookup) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, router(lookup))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server failed")?;

    tracing::info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

async fn show_form() -> Html<String> {
    Html(pages::render_index(&LookupForm::default(), None))
}

async fn submit_form(
    State(lookup): State<WeatherLookup>,
    Form(form): Form<LookupForm>,
) -> (StatusCode, Html<String>) {
    let outcome = form.run(&lookup).await;
    let status = match &outcome {
        Ok(_) => StatusCode::OK,
        Err(err) => status_for(err),
    };
    (status, Html(pages::render_index(&form, Some(&outcome))))
}

async fn healthz() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for() {
        assert_eq!(
            status_for(&WeatherError::location_not_found("x")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&WeatherError::provider("x")),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_form_query() {
        let form = LookupForm {
            location: " Toronto ".to_string(),
            country: Some("CA".to_string()),
        };
        assert_eq!(form.query().unwrap().as_str(), "Toronto,CA");
        assert!(LookupForm::default().query().is_err());
    }
}
