//! Reduce composed employee names to their first part.
//!
//! Lists the planned renames; writes them only with `--yes`.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

use hr_assistant::domain::NameSimplifier;
use hr_assistant::outbound::persistence::{DbPool, DieselEmployeeRepository, PoolConfig};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "simplify-names",
    about = "Keep only the first part of composed first and last names",
    version
)]
struct CliArgs {
    /// Apply the renames instead of only listing them.
    #[arg(long)]
    yes: bool,
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
    let database_url = args
        .database_url
        .or_else(|| std::env::var("HR_ASSISTANT_DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| io::Error::other("pass --database-url or set HR_ASSISTANT_DATABASE_URL"))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let simplifier = NameSimplifier::new(Arc::new(DieselEmployeeRepository::new(pool)));
    let changes = simplifier
        .plan()
        .await
        .map_err(|error| io::Error::other(format!("list employees: {error}")))?;

    if changes.is_empty() {
        println!("no composed names found");
        return Ok(());
    }
    for change in &changes {
        println!("{}: {} -> {}", change.id, change.before, change.after);
    }

    if !args.yes {
        println!("{} employee(s) would be renamed; rerun with --yes to apply", changes.len());
        return Ok(());
    }
    let applied = simplifier
        .apply(&changes)
        .await
        .map_err(|error| io::Error::other(format!("apply renames: {error}")))?;
    println!("renamed={applied}");
    Ok(())
}
