use crate::config::{AppConfig, MapConfig};
use crate::data::Dataset;
use crate::encoding::ColorScale;
use crate::error::AppError;
use crate::processing::aggregate;
use crate::render::{render, MapView};
use crate::resolve::resolve;
use crate::templates::{self, INDEX};
use crate::types::{ClickEvent, Coordinate, MatchKind, School};
use anyhow::Result;
use axum::{
    extract::State,
    response::{Html, Json},
    routing::{get, post},
    Router,
};
use minijinja::context;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const PAGE_TITLE: &str = "Count of Australian Schools 2023, by Local Government Area";
pub const PANEL_HEADING: &str = "Click an area to display School Names";
pub const GENERIC_ERROR: &str = "An error occurred while processing your request.";

pub struct AppState {
    pub dataset: Dataset,
    pub map: MapConfig,
    pub colors: ColorScale,
}

impl AppState {
    pub fn new(config: &AppConfig, dataset: Dataset) -> Self {
        Self {
            dataset,
            map: config.map,
            colors: ColorScale::new(config.encoding),
        }
    }
}

/// Contents of the results panel after a click.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Panel {
    /// Nothing to show; the page keeps whatever it displayed before.
    Idle,
    Resolved {
        clicked: Coordinate,
        match_kind: MatchKind,
        lga_name: String,
        state: String,
        school_names: Vec<String>,
    },
    Error {
        message: String,
    },
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/map", get(map_handler))
        .route("/api/click", post(click_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start_server(config: AppConfig, dataset: Dataset) -> Result<()> {
    let addr = SocketAddr::new(config.server.host, config.server.port);
    let state = Arc::new(AppState::new(&config, dataset));
    let app = router(state);

    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let page = templates::environment().get_template(INDEX)?.render(context! {
        title => PAGE_TITLE,
        panel_heading => PANEL_HEADING,
        width => state.map.width,
        height => state.map.height,
    })?;
    Ok(Html(page))
}

async fn map_handler(State(state): State<Arc<AppState>>) -> Result<Json<MapView>, AppError> {
    let schools = state.dataset.load_schools()?;
    let aggregates = aggregate(&schools);
    let view = render(&aggregates, &state.map, &state.colors)?;
    Ok(Json(view))
}

async fn click_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<Panel>, AppError> {
    tracing::info!("Map interaction detected: {}", payload);

    let event: ClickEvent = serde_json::from_value(payload)
        .map_err(|e| AppError::BadRequest(format!("Invalid click payload: {}", e)))?;
    let schools = state.dataset.load_schools()?;

    Ok(Json(panel_for(&event, &schools)))
}

/// Only marker clicks drive resolution; background clicks are logged and dropped.
pub fn panel_for(event: &ClickEvent, schools: &[School]) -> Panel {
    let Some(clicked) = event.last_object_clicked else {
        if let Some(c) = event.last_clicked {
            tracing::info!("Background click at ({}, {}), no marker hit", c.lat, c.lng);
        }
        return Panel::Idle;
    };
    tracing::info!("Marker clicked at ({}, {})", clicked.lat, clicked.lng);

    let aggregates = aggregate(schools);
    match resolve(clicked, &aggregates, schools) {
        Ok(res) => Panel::Resolved {
            clicked,
            match_kind: res.kind,
            lga_name: res.lga.lga_name,
            state: res.lga.state,
            school_names: res.school_names,
        },
        Err(e) => {
            tracing::info!("Error in processing: {}", e);
            Panel::Error {
                message: GENERIC_ERROR.to_string(),
            }
        }
    }
}
