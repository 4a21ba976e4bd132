use scheduling_client::config::Config;
use scheduling_client::mock_api::{self, MockState};

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cfg = Config::from_env()?;
    let state = MockState::from_config(&cfg)?;
    let app = mock_api::router(state);

    tracing::info!(admin = %cfg.mock_admin_email, "Listening on http://{}/api", cfg.mock_bind_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.mock_bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
