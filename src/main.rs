use anyhow::Context;
use productapp::Application;
use productapp_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load productapp settings")?;
    productapp_telemetry::init(&settings.telemetry);

    tracing::info!(
        env = ?settings.environment,
        db = %settings.database.url,
        "productapp bootstrap starting"
    );

    let app = Application::build(settings).await?;
    tracing::info!("productapp bootstrap complete");

    app.serve(productapp_http::shutdown_signal()).await
}
