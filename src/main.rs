use std::process::ExitCode;
use std::sync::Arc;

use chess_nav::config::DEFAULT_AUTH_TIMEOUT_MS;
use chess_nav::{
    ConfigError, HttpSessionOracle, NavConfig, NavigationOrigin, NavigationRequest, OracleError, RouteTable,
    RouteTableError, RouteTarget, Router, SessionOracle,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("route table error: {0}")]
    Routes(#[from] RouteTableError),
    #[error("session oracle setup failed: {0}")]
    Oracle(#[from] OracleError),
    #[error("invalid JSON output: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "chess-nav", about = "Resolve chess client navigations against the session check")]
struct Cli {
    #[arg(long, env = "CHESS_API_URL")]
    api_url: Option<String>,

    #[arg(long, env = "CHESS_AUTH_TIMEOUT_MS", default_value_t = DEFAULT_AUTH_TIMEOUT_MS)]
    auth_timeout_ms: u64,

    #[arg(long, env = "CHESS_SESSION_COOKIE")]
    session_cookie: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Navigate to each path in turn and print the committed route as JSON.
    Resolve {
        #[arg(required = true)]
        paths: Vec<String>,
        #[arg(long, value_enum, default_value_t = OriginArg::User)]
        origin: OriginArg,
    },
    /// Run one session check and print the verdict.
    Check,
    /// Print the route table.
    Routes,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OriginArg {
    User,
    Programmatic,
    InitialLoad,
}

impl From<OriginArg> for NavigationOrigin {
    fn from(value: OriginArg) -> Self {
        match value {
            OriginArg::User => Self::User,
            OriginArg::Programmatic => Self::Programmatic,
            OriginArg::InitialLoad => Self::InitialLoad,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: failed to read .env: {e}");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let table = RouteTable::app()?;

    match cli.command {
        Command::Routes => {
            for route in table.routes() {
                let target = match &route.target {
                    RouteTarget::View(view) => view.to_string(),
                    RouteTarget::Redirect(to) => format!("-> {to}"),
                };
                let access = if route.requires_auth { "auth" } else { "public" };
                println!("{:<20} {:<14} {access}", route.pattern(), target);
            }
        }
        Command::Check => {
            let config = nav_config(cli.api_url.as_deref(), cli.auth_timeout_ms, cli.session_cookie.as_deref())?;
            let oracle = HttpSessionOracle::from_config(&config)?;
            let checked = tokio::time::timeout(config.auth_timeout, oracle.check_session()).await;
            let report = match checked {
                Ok(Ok(verdict)) => json!({ "url": oracle.url(), "authenticated": verdict.is_authenticated() }),
                Ok(Err(e)) => json!({ "url": oracle.url(), "authenticated": false, "error": e.to_string() }),
                Err(_) => json!({
                    "url": oracle.url(),
                    "authenticated": false,
                    "error": OracleError::Timeout(config.auth_timeout).to_string(),
                }),
            };
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::Resolve { paths, origin } => {
            let config = nav_config(cli.api_url.as_deref(), cli.auth_timeout_ms, cli.session_cookie.as_deref())?;
            let oracle = Arc::new(HttpSessionOracle::from_config(&config)?);
            let router = Router::new(table, oracle, config.auth_timeout);
            for path in paths {
                let outcome = router
                    .navigate(NavigationRequest::new(path, origin.into()))
                    .await;
                if let Some(route) = outcome.route() {
                    println!("{}", serde_json::to_string(route)?);
                }
            }
        }
    }
    Ok(())
}

fn nav_config(api_url: Option<&str>, auth_timeout_ms: u64, session_cookie: Option<&str>) -> Result<NavConfig, CliError> {
    Ok(NavConfig::build(api_url.unwrap_or_default(), auth_timeout_ms, session_cookie)?)
}
