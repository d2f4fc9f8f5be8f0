use std::sync::Arc;

use axum::{
    Router, debug_handler,
    http::{HeaderValue, Method},
    response::IntoResponse,
    routing::get,
};
use chatrelay::{AppState, session::Hub, ws};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cors = match dotenv::var("CORS_ORIGIN") {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET, Method::POST]),
        Err(_) => CorsLayer::permissive(),
    };

    let app_state = AppState {
        hub: Arc::new(Hub::default()),
    };

    let app = Router::new()
        .route("/", get(health))
        .route("/ws", get(ws::relay_ws))
        .with_state(app_state)
        .layer(cors);

    let port = dotenv::var("PORT").unwrap_or_else(|_| "3001".to_owned());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

#[debug_handler]
async fn health() -> impl IntoResponse {
    "Backend is running"
}
