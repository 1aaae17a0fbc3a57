use board_server::board::StationService;
use board_server::config::ServerConfig;
use board_server::dbrest::{DbRestClient, MockProvider, TransitProvider};
use board_server::web::{AppState, create_router};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[tokio::main]
async fn main() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServerConfig::from_env().expect("Invalid configuration");

    match config.mock_dir.as_deref() {
        Some(dir) => {
            info!(dir = %dir.display(), "serving mock fixtures");
            let provider = MockProvider::from_dir(dir).expect("Failed to load mock fixtures");
            serve(provider, &config).await;
        }
        None => {
            info!(base_url = %config.upstream.base_url, "using db-rest upstream");
            let provider =
                DbRestClient::new(config.upstream.clone()).expect("Failed to create db-rest client");
            serve(provider, &config).await;
        }
    }
}

async fn serve<P: TransitProvider + 'static>(provider: P, config: &ServerConfig) {
    let service = StationService::new(provider, config.service.clone());
    let state = AppState::new(service, config.max_search_limit);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    info!(addr = %config.bind_addr, "station board server listening");
    info!("  GET /health");
    info!("  GET /api/stations/autocomplete?q=<query>&limit=<n>");
    info!("  GET /api/stations/:station_id/board?minutes=<n>");

    axum::serve(listener, app).await.expect("Server error");
}
