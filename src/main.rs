use tokio::net::TcpListener;
use tracing::{info, warn};
use link_summarizer::{
    config::Config,
    api::routes::create_router,
    logging::setup_logging,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging();

    // Load configuration
    let config = Config::load()?;
    let server_addr = config.server_addr;
    info!(model = %config.model.model_id, api_base = %config.model.api_base, "Loaded configuration");
    if !config.web.verify_tls {
        warn!("TLS certificate verification is disabled for website fetches; set WEB_VERIFY_TLS=true to enable it");
    }

    // Create application state
    let app_state = AppState::new(&config)?;

    // Build the router with routes
    let app = create_router(app_state);

    // Create the listener
    let listener = TcpListener::bind(server_addr).await?;

    // Start the server
    info!(%server_addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
