//! Report whether the hosted assistant is reachable and whether the
//! built-in responder answers.
//!
//! Reads the same `HR_ASSISTANT_*` settings as the server. Exits with an
//! error only when the built-in responder produces an empty reply; an
//! unreachable assistant is reported but tolerated, as in the server.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::sync::Arc;

use clap::Parser;
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

use hr_assistant::domain::ports::{AssistantGateway, EmployeeRepository};
use hr_assistant::domain::{EmployeeId, FallbackResponder};
use hr_assistant::outbound::assistant::HttpAssistantGateway;
use hr_assistant::outbound::persistence::{DbPool, DieselEmployeeRepository};
use hr_assistant::settings::AppSettings;

const DEFAULT_PROMPT: &str = "Bonjour, peux-tu te présenter en une phrase ?";

#[derive(Debug, Clone, Parser)]
#[command(
    name = "check-assistant",
    about = "Check assistant connectivity and the built-in responder",
    version
)]
struct CliArgs {
    /// Prompt sent to both responders.
    #[arg(long, default_value = DEFAULT_PROMPT)]
    prompt: String,
    /// Answer the built-in prompt as this employee.
    #[arg(long, value_name = "id")]
    employee: Option<String>,
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
    let settings = load_settings()?;

    check_gateway(&settings, &args.prompt).await?;
    check_fallback(&settings, &args).await
}

/// Settings from `HR_ASSISTANT_*`; CLI flags belong to this tool, not to
/// the settings layer.
fn load_settings() -> io::Result<AppSettings> {
    AppSettings::load_from_iter([OsString::from("check-assistant")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))
}

async fn check_gateway(settings: &AppSettings, prompt: &str) -> io::Result<()> {
    let endpoint = settings.assistant_endpoint().map_err(io::Error::other)?;
    let Some(endpoint) = endpoint else {
        println!("assistant: not configured (endpoint, agent id and thread id are all required)");
        return Ok(());
    };
    println!("assistant: endpoint={}", endpoint.endpoint);
    println!("assistant: agent_id={}", endpoint.agent_id);
    println!("assistant: thread_id={}", endpoint.thread_id);
    println!("assistant: api_key_set={}", endpoint.api_key.is_some());
    println!("assistant: api_version={}", endpoint.api_version);

    let gateway = HttpAssistantGateway::new(endpoint)
        .map_err(|error| io::Error::other(format!("build assistant client: {error}")))?;
    match gateway.probe().await {
        Ok(report) => println!(
            "assistant: probe ok (agent {}, thread {})",
            report.agent_name.as_deref().unwrap_or(&report.agent_id),
            report.thread_id
        ),
        Err(error) => {
            println!("assistant: probe failed: {error}");
            return Ok(());
        }
    }
    match gateway.submit(prompt).await {
        Ok(reply) => println!("assistant: reply={reply}"),
        Err(error) => println!("assistant: submit failed: {error}"),
    }
    Ok(())
}

async fn check_fallback(settings: &AppSettings, args: &CliArgs) -> io::Result<()> {
    let pool_config = settings.pool_config().map_err(io::Error::other)?;
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;
    let employees = Arc::new(DieselEmployeeRepository::new(pool));

    let requester = match &args.employee {
        Some(raw) => {
            let id = EmployeeId::new(raw.as_str()).map_err(io::Error::other)?;
            let found = employees
                .find_by_id(&id)
                .await
                .map_err(|error| io::Error::other(format!("load employee: {error}")))?;
            if found.is_none() {
                println!("fallback: employee {id} not found; answering anonymously");
            }
            found
        }
        None => None,
    };

    let reply = FallbackResponder::new(employees)
        .respond(&args.prompt, requester.as_ref())
        .await
        .map_err(|error| io::Error::other(format!("built-in responder: {error}")))?;
    if reply.trim().is_empty() {
        return Err(io::Error::other("built-in responder produced an empty reply"));
    }
    println!("fallback: reply={reply}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;

    const ASSISTANT_VARS: [&str; 4] = [
        "HR_ASSISTANT_ASSISTANT_ENDPOINT",
        "HR_ASSISTANT_ASSISTANT_AGENT_ID",
        "HR_ASSISTANT_ASSISTANT_THREAD_ID",
        "HR_ASSISTANT_DATABASE_URL",
    ];

    #[test]
    fn unset_assistant_loads_as_not_configured() {
        let _guard = lock_env(ASSISTANT_VARS.map(|name| (name, None::<&str>)));
        let settings = load_settings().expect("settings load without any variable");
        assert!(settings.assistant_endpoint().expect("valid").is_none());
    }

    #[test]
    fn prompt_defaults_to_the_introduction() {
        let args = CliArgs::try_parse_from(["check-assistant"]).expect("defaults parse");
        assert_eq!(args.prompt, DEFAULT_PROMPT);
        assert!(args.employee.is_none());
    }
}
