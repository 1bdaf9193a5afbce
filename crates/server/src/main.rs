use std::fmt;
use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use server::{AppState, create_router};
use services::analysis::AnalysisService;
use services::catalog::CatalogService;
use services::evaluation::EvaluationService;
use services::flow::SessionFlowService;
use storage::sqlite::SqliteSessionStore;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPort { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPort { raw } => write!(f, "invalid --port value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p server -- [--db <sqlite_url>] [--passages <csv>] [--port <port>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:trainer.db?mode=rwc");
    eprintln!("  --passages data/passages.csv");
    eprintln!("  --port 3000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRAINER_ANALYZE_URL   external analysis endpoint (optional)");
    eprintln!("  TRAINER_EVALUATE_URL  external evaluation endpoint (optional)");
    eprintln!("  RUST_LOG              tracing filter, e.g. server=debug");
}

struct Args {
    db_url: String,
    passages_path: String,
    port: u16,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = "sqlite:trainer.db?mode=rwc".to_owned();
        let mut passages_path = "data/passages.csv".to_owned();
        let mut port = 3000;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_url = require_value(args, "--db")?,
                "--passages" => passages_path = require_value(args, "--passages")?,
                "--port" => {
                    let value = require_value(args, "--port")?;
                    port = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidPort { raw: value.clone() })?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            passages_path,
            port,
        })
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let catalog = CatalogService::from_path(&args.passages_path)?;
    tracing::info!(
        path = %args.passages_path,
        count = catalog.passages().len(),
        "catalog loaded"
    );

    // Open + migrate SQLite at startup so services stay connection-agnostic.
    let store = SqliteSessionStore::connect(&args.db_url).await?;
    store.migrate().await?;

    let analysis = AnalysisService::from_env();
    let evaluation = EvaluationService::from_env();
    tracing::info!(
        analysis_endpoint = analysis.enabled(),
        evaluation_endpoint = evaluation.enabled(),
        "gateways configured"
    );

    let flow = SessionFlowService::new(analysis.clone(), evaluation.clone(), Arc::new(store));
    let restored = flow.restore().await?;
    if restored.is_some() {
        tracing::info!("restored a persisted session");
    }

    let state =
        AppState::new(catalog, analysis, evaluation, flow).with_restored_session(restored);
    let router = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "server failed");
            ExitCode::FAILURE
        }
    }
}
