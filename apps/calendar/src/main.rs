use std::{future::Future, io, path::PathBuf, sync::Arc};

mod backend_bridge;
mod config;
mod controller;
mod output;
mod repl;
mod session;
mod ui;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{CalendarApi, CalendarClient};
use tracing_subscriber::EnvFilter;

use crate::{
    controller::events::UiEvent, output::print_one, output::print_out, repl::parse_month,
    session::Session, ui::render,
};

#[derive(Parser, Debug)]
#[command(name = "tax-calendar", version, about = "US tax obligations calendar")]
struct Cli {
    #[arg(long, global = true, help = "Backend API base URL, e.g. http://127.0.0.1:8000/api")]
    api_url: Option<String>,
    #[arg(long, global = true, help = "Path to a TOML config file")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive filter session (default).
    Interactive,
    Health,
    States,
    Counties {
        state: String,
    },
    Cities {
        state: String,
        county: String,
    },
    Search {
        query: String,
    },
    /// Apply filters once and print the resulting page.
    Calendar {
        #[arg(long)]
        state: Option<String>,
        #[arg(long, requires = "state")]
        county: Option<String>,
        #[arg(long, requires = "county")]
        city: Option<String>,
        #[arg(long, value_parser = parse_month)]
        month: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = config::load_settings(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        settings.api_base_url = url.clone();
    }
    init_tracing(&settings.log_filter);

    let client = CalendarClient::with_timeout(&settings.api_base_url, settings.request_timeout())
        .with_context(|| format!("cannot use backend '{}'", settings.api_base_url))?;
    tracing::debug!(base_url = %client.base_url(), "calendar client ready");
    let api: Arc<dyn CalendarApi> = Arc::new(client);

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Interactive => {
            let mut session = Session::start(api);
            repl::run(
                &mut session,
                io::stdin().lock(),
                io::stdout().lock(),
                repl::RESPONSE_WAIT,
            )?;
        }
        Command::Calendar {
            state,
            county,
            city,
            month,
        } => {
            let mut session = Session::start(api);
            session.dispatch_and_wait(UiEvent::Init)?;
            if let Some(state) = state {
                session.dispatch_and_wait(UiEvent::StateSelected(state.to_ascii_uppercase()))?;
            }
            if let Some(county) = county {
                session.dispatch_and_wait(UiEvent::CountySelected(county))?;
            }
            if let Some(city) = city {
                session.dispatch(UiEvent::CitySelected(city))?;
            }
            if let Some(month) = month {
                session.dispatch(UiEvent::DateRangeSelected(month))?;
            }
            session.dispatch_and_wait(UiEvent::ApplyFilters)?;

            let state = session.state();
            print_one(cli.json, &state.merged, |_| render(state).to_string())?;
        }
        Command::Health => {
            let health = block_on(api.get_health())?;
            print_one(cli.json, health, |h| {
                format!(
                    "status={} database={} obligations={}",
                    h.status.as_deref().unwrap_or("-"),
                    h.database.as_deref().unwrap_or("-"),
                    h.obligations_count.unwrap_or(0)
                )
            })?;
        }
        Command::States => {
            let states = block_on(api.get_states())?;
            print_out(cli.json, &states, |s| format!("{} - {}", s.code, s.name))?;
        }
        Command::Counties { state } => {
            let counties = block_on(api.get_counties(&state.to_ascii_uppercase()))?;
            print_out(cli.json, &counties, |c| c.name.clone())?;
        }
        Command::Cities { state, county } => {
            let cities = block_on(api.get_cities(&state.to_ascii_uppercase(), &county))?;
            print_out(cli.json, &cities, |c| c.name.clone())?;
        }
        Command::Search { query } => {
            let matches = block_on(api.search_locations(&query))?;
            print_out(cli.json, &matches, |m| {
                format!("{} ({} obrigações)", m.display, m.count)
            })?;
        }
    }
    Ok(())
}

/// Runs one backend call for the direct list commands.
fn block_on<T>(call: impl Future<Output = client_core::Result<T>>) -> Result<T> {
    let rt = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    Ok(rt.block_on(call)?)
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
