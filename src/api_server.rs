//! REST API for contracts and games
//!
//! Routes mirror what the admin UI calls: `/contract` for rentals (with a
//! `search` sub-route and status actions) and `/game` for the catalog.

use std::time::Duration;

use axum::{
    extract::{FromRequest, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info};

use crate::error::{RentalError, Result};
use crate::models::{Contract, Game};
use crate::service::RentalService;

/// API State - Shared between handlers
#[derive(Clone)]
pub struct ApiState {
    pub service: RentalService,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub search_term: Option<String>,
}

/// JSON body extractor whose rejections go through `RentalError`
#[derive(FromRequest)]
#[from_request(via(Json), rejection(RentalError))]
pub struct ApiJson<T>(pub T);

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: "game-rental".to_string(),
    })
}

async fn list_contracts(State(state): State<ApiState>) -> Result<Json<Vec<Contract>>> {
    Ok(Json(state.service.list_contracts().await?))
}

async fn search_contracts(
    State(state): State<ApiState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Contract>>> {
    let contracts = state
        .service
        .search_contracts(params.search_term.as_deref())
        .await?;
    Ok(Json(contracts))
}

async fn get_contract(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<Contract>> {
    Ok(Json(state.service.get_contract(&id).await?))
}

async fn create_contract(
    State(state): State<ApiState>,
    ApiJson(contract): ApiJson<Contract>,
) -> Result<(StatusCode, Json<Contract>)> {
    let created = state.service.create_contract(contract).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_contract(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    ApiJson(contract): ApiJson<Contract>,
) -> Result<StatusCode> {
    state.service.update_contract(&id, contract).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_contract(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service.remove_contract(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn activate_contract(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service.activate_contract(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn complete_contract(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service.complete_contract(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn cancel_contract(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.service.cancel_contract(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_games(State(state): State<ApiState>) -> Result<Json<Vec<Game>>> {
    Ok(Json(state.service.list_games().await?))
}

async fn get_game(State(state): State<ApiState>, Path(id): Path<String>) -> Result<Json<Game>> {
    Ok(Json(state.service.get_game(&id).await?))
}

/// Create the API router
pub fn create_router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health_check))
        .route("/contract", get(list_contracts).post(create_contract))
        .route("/contract/search", get(search_contracts))
        .route(
            "/contract/:id",
            get(get_contract).put(update_contract).delete(remove_contract),
        )
        .route("/contract/:id/activate", put(activate_contract))
        .route("/contract/:id/complete", put(complete_contract))
        .route("/contract/:id/cancel", put(cancel_contract))
        .route("/game", get(list_games))
        .route("/game/:id", get(get_game))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API until Ctrl+C or SIGTERM
pub async fn start_server(address: &str, state: ApiState) -> std::io::Result<()> {
    let app = create_router(state);

    let listener = TcpListener::bind(address).await?;
    info!("Game rental API listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
