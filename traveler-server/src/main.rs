use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use traveler_server::domain::StopArea;
use traveler_server::entry::ConfigEntry;
use traveler_server::integration::Integration;
use traveler_server::platform::{Platform, SensorPlatform};
use traveler_server::web::{AppState, create_router};

fn env_or_exit(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| {
        eprintln!("Error: {name} not set");
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // One configuration entry built from the environment
    let url = std::env::var("SNCF_URL").unwrap_or_else(|_| "https://api.sncf.com/v1".to_string());
    let api_key = env_or_exit("SNCF_API_KEY");
    let region = std::env::var("SNCF_REGION").unwrap_or_else(|_| "sncf".to_string());
    let from = env_or_exit("SNCF_FROM");
    let to = env_or_exit("SNCF_TO");
    let last_journey = std::env::var("SNCF_LAST_JOURNEY")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let from = StopArea::parse(&from).unwrap_or_else(|e| {
        eprintln!("Error: SNCF_FROM: {e}");
        std::process::exit(1);
    });
    let to = StopArea::parse(&to).unwrap_or_else(|e| {
        eprintln!("Error: SNCF_TO: {e}");
        std::process::exit(1);
    });

    let entry = ConfigEntry {
        entry_id: "default".to_string(),
        url,
        api_key,
        region,
        from,
        to,
        last_journey,
        refresh_interval_secs: 120,
        journey_count: 1,
    };

    let sensors = Arc::new(SensorPlatform::new());
    let platforms: Vec<Arc<dyn Platform>> = vec![sensors.clone()];
    let integration = Arc::new(Integration::new(platforms));

    // Fail fast: a failed first refresh fails startup
    if let Err(e) = integration.setup_entry(&entry).await {
        eprintln!("Failed to set up entry: {e}");
        std::process::exit(1);
    }

    let app = create_router(AppState::new(integration, sensors));

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    tracing::info!(%addr, "journey monitor listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind listener");
    axum::serve(listener, app).await.expect("server error");
}
