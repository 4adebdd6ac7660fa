use anyhow::Context;
use clap::{Parser, Subcommand};
use productapp::Application;
use productapp_kernel::settings::Settings;

/// Operate the productapp service
#[derive(Debug, Parser)]
#[command(name = "productapp-cli", version, about)]
struct Cli {
    /// Override `database.url` from the layered configuration
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply migrations and serve HTTP until Ctrl-C
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// List registered modules and the migrations they contribute
    Modules,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load().with_context(|| "failed to load productapp settings")?;
    if let Some(url) = cli.database_url {
        settings.database.url = url;
    }
    productapp_telemetry::init(&settings.telemetry);

    tracing::info!(env = ?settings.environment, command = ?cli.command, "productapp-cli starting");

    let app = Application::build(settings).await?;

    match cli.command {
        Command::Serve => app.serve(productapp_http::shutdown_signal()).await?,
        Command::Migrate => {
            let applied = app.migrate().await?;
            println!("applied {} migration(s)", applied);
        }
        Command::Modules => {
            let migrations = app.registry().collect_migrations();
            for module in app.registry().modules() {
                let ids: Vec<&str> = migrations
                    .iter()
                    .filter(|(owner, _)| owner == module.name())
                    .map(|(_, migration)| migration.id)
                    .collect();
                println!("{:<12} migrations: [{}]", module.name(), ids.join(", "));
            }
        }
    }

    Ok(())
}
