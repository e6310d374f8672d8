//! Import employee records from an HR spreadsheet export (CSV).
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

use hr_assistant::domain::EmployeeImporter;
use hr_assistant::domain::import::DEFAULT_IMPORT_PASSWORD;
use hr_assistant::outbound::persistence::{
    DbPool, DieselEmployeeRepository, PoolConfig, run_pending_migrations,
};
use hr_assistant::outbound::security::Argon2PasswordHasher;

/// `import-hr-data` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "import-hr-data",
    about = "Create or update employees from a CSV export",
    version
)]
struct CliArgs {
    /// CSV file, `;` or `,` separated, UTF-8 or Windows-1252.
    #[arg(value_name = "path")]
    csv_path: PathBuf,
    /// Password given to newly created accounts.
    #[arg(long = "default-password", value_name = "password", default_value = DEFAULT_IMPORT_PASSWORD)]
    default_password: String,
    /// Database connection URL. Falls back to `HR_ASSISTANT_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let bytes = std::fs::read(&args.csv_path).map_err(|error| {
        io::Error::other(format!("read {}: {error}", args.csv_path.display()))
    })?;

    let database_url = resolve_database_url(args.database_url)?;
    run_pending_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("run migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let importer = EmployeeImporter::new(
        Arc::new(DieselEmployeeRepository::new(pool)),
        Arc::new(Argon2PasswordHasher),
        args.default_password,
    );
    let summary = importer
        .import(&bytes)
        .await
        .map_err(|error| io::Error::other(format!("import failed: {error}")))?;

    println!("created={}", summary.created);
    println!("updated={}", summary.updated);
    println!("skipped={}", summary.skipped);
    println!("errors={}", summary.errors);
    println!("total={}", summary.total);
    Ok(())
}

fn resolve_database_url(cli_value: Option<String>) -> io::Result<String> {
    cli_value
        .or_else(|| std::env::var("HR_ASSISTANT_DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| io::Error::other("pass --database-url or set HR_ASSISTANT_DATABASE_URL"))
}
