use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_kernel::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "shelf", version, about = "Book catalogue service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override `server.host`
        #[arg(long)]
        host: Option<String>,
        /// Override `server.port`
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print every registered route
    Routes,
    /// Print the resolved settings as JSON
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load().with_context(|| "failed to load shelf settings")?;

    match cli.command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            shelf_telemetry::init(&settings.telemetry)?;
            tracing::info!(
                env = ?settings.environment,
                addr = %settings.server.bind_addr(),
                "shelf serve starting"
            );
            shelf_app::serve(settings).await
        }
        Command::Routes => {
            let registry = shelf_app::build_registry()?;
            let prefix = settings.server.api_prefix.as_str();
            for (module, route) in registry.route_table() {
                println!(
                    "{:<7} {:<28} {}.{}",
                    route.method,
                    format!("{}{}", prefix, route.path),
                    module,
                    route.action
                );
            }
            Ok(())
        }
        Command::Config => {
            let rendered = serde_json::to_string_pretty(&settings)
                .context("failed to render settings")?;
            println!("{}", rendered);
            Ok(())
        }
    }
}
