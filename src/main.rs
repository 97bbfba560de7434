use clap::{Parser, Subcommand};
use linkforge::admin::{self, AdminCommands};
use linkforge::config::Config;
use linkforge::error::AppResult;
use linkforge::server;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// linkforge - URL shortener and request log service
#[derive(Parser, Debug)]
#[command(name = "linkforge")]
#[command(version)]
#[command(about = "URL shortener and request log service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Server {
        /// Host to bind to (overrides SERVER_HOST env var)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides SERVER_PORT env var)
        #[arg(long)]
        port: Option<u16>,

        /// Run migrations on startup
        #[arg(long)]
        migrate: bool,
    },

    /// Administrative commands
    Admin {
        #[command(subcommand)]
        admin_command: AdminCommands,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    init_tracing();

    let config = Config::from_env()?;

    match cli.command {
        Commands::Server { host, port, migrate } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);

            // Follow CLI overrides unless BASE_URL pins the public address
            let mut config = config;
            if std::env::var("BASE_URL").is_err() {
                config.url.base_url = format!("http://{}:{}", host, port);
            }

            server::run_server(config, addr, migrate).await
        }
        Commands::Admin { admin_command } => admin::run(config, admin_command).await,
    }
}
