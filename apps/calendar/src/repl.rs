//! Line-oriented interactive front end over [`Session`].

use std::{
    io::{BufRead, Write},
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::{
    controller::events::UiEvent,
    session::Session,
    ui::{render, text::option_lines},
};

const HELP: &str = "\
Comandos:
  state <código>       seleciona o estado (vazio limpa)
  county <nome>        seleciona o condado
  city <nome>          seleciona a cidade
  month <AAAA-MM>      define o período (vazio limpa)
  apply                aplica os filtros
  clear                limpa todos os filtros
  search <texto>       busca localidades
  pick <n>             usa o resultado n da busca
  list <states|counties|cities>
  show                 mostra a página
  help                 esta ajuda
  quit                 sair";

/// How long a command waits for its answers before the page is drawn anyway.
pub const RESPONSE_WAIT: Duration = Duration::from_secs(3);

const PENDING_NOTICE: &str = "(aguardando o backend; use 'show' para atualizar)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListTarget {
    States,
    Counties,
    Cities,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Event(UiEvent),
    List(ListTarget),
    Show,
    Help,
    Quit,
}

/// Accepts `YYYY-MM`; also used as the clap value parser for `--month`.
pub fn parse_month(raw: &str) -> Result<String, String> {
    let value = raw.trim();
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d")
        .map(|_| value.to_string())
        .map_err(|_| format!("invalid month '{value}', expected YYYY-MM"))
}

/// `Ok(None)` for blank lines.
pub fn parse_line(line: &str) -> Result<Option<ReplCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "state" => ReplCommand::Event(UiEvent::StateSelected(rest.to_ascii_uppercase())),
        "county" => ReplCommand::Event(UiEvent::CountySelected(rest.to_string())),
        "city" => ReplCommand::Event(UiEvent::CitySelected(rest.to_string())),
        "month" => {
            let value = if rest.is_empty() {
                String::new()
            } else {
                parse_month(rest)?
            };
            ReplCommand::Event(UiEvent::DateRangeSelected(value))
        }
        "apply" => ReplCommand::Event(UiEvent::ApplyFilters),
        "clear" => ReplCommand::Event(UiEvent::ClearFilters),
        "search" => ReplCommand::Event(UiEvent::SearchRequested(rest.to_string())),
        "pick" => {
            let index = rest
                .parse::<usize>()
                .map_err(|_| format!("pick expects a result number, got '{rest}'"))?;
            ReplCommand::Event(UiEvent::LocationPicked(index))
        }
        "list" => match rest {
            "states" => ReplCommand::List(ListTarget::States),
            "counties" => ReplCommand::List(ListTarget::Counties),
            "cities" => ReplCommand::List(ListTarget::Cities),
            other => return Err(format!("unknown list '{other}'")),
        },
        "show" => ReplCommand::Show,
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(Some(command))
}

/// Reads commands until `quit` or end of input. A command waits at most `wait`
/// for its answers; late answers are picked up before the next command.
pub fn run(
    session: &mut Session,
    input: impl BufRead,
    mut out: impl Write,
    wait: Duration,
) -> Result<()> {
    session.dispatch(UiEvent::Init)?;
    settle(session, &mut out, wait)?;
    writeln!(out, "Digite 'help' para ver os comandos.")?;

    for line in input.lines() {
        let line = line.context("failed to read command line")?;
        session.poll()?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(out, "{message}")?;
                continue;
            }
        };

        match command {
            ReplCommand::Event(event) => {
                session.dispatch(event)?;
                settle(session, &mut out, wait)?;
            }
            ReplCommand::List(target) => {
                let filters = render(session.state()).filters;
                let control = match target {
                    ListTarget::States => &filters.state,
                    ListTarget::Counties => &filters.county,
                    ListTarget::Cities => &filters.city,
                };
                if control.options.is_empty() {
                    writeln!(out, "{}", control.placeholder)?;
                }
                for line in option_lines(control) {
                    writeln!(out, "{line}")?;
                }
            }
            ReplCommand::Show => write!(out, "{}", render(session.state()))?,
            ReplCommand::Help => writeln!(out, "{HELP}")?,
            ReplCommand::Quit => break,
        }
        out.flush()?;
    }
    Ok(())
}

fn settle(session: &mut Session, out: &mut impl Write, wait: Duration) -> Result<()> {
    let idle = session.wait_idle_for(wait)?;
    write!(out, "{}", render(session.state()))?;
    if !idle {
        writeln!(out, "{PENDING_NOTICE}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/repl_tests.rs"]
mod tests;
