use quiz_api::{config::Settings, server::app::run_server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let settings = Settings::load()?;
    let store = settings.storage.open().await?;
    run_server(settings.server, store).await
}
