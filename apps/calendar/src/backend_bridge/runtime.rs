//! Backend worker: owns a tokio runtime and answers every command with one event.

use std::{sync::Arc, thread};

use client_core::CalendarApi;
use crossbeam_channel::{Receiver, Sender};

use crate::{
    backend_bridge::commands::BackendCommand,
    controller::events::{RequestId, UiError, UiErrorContext, UiEvent},
};

/// Starts the worker thread. Each command runs as its own task, so a slow call
/// never holds back the ones queued after it; results arrive in completion order.
pub fn launch(
    api: Arc<dyn CalendarApi>,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                let api = Arc::clone(&api);
                let ui_tx = ui_tx.clone();
                tokio::spawn(async move {
                    let event = execute(api.as_ref(), cmd).await;
                    if ui_tx.send(event).is_err() {
                        tracing::debug!("ui loop gone; dropping backend result");
                    }
                });
            }
        });
        // Dropping the runtime cancels calls still pending when the queue closed.
    })
}

pub async fn execute(api: &dyn CalendarApi, cmd: BackendCommand) -> UiEvent {
    tracing::info!(command = cmd.name(), "backend: executing");
    match cmd {
        BackendCommand::CheckHealth => match api.get_health().await {
            Ok(health) => UiEvent::HealthLoaded(health),
            Err(err) => UiEvent::HealthFailed(UiError::from_client_error(
                UiErrorContext::Health,
                &err,
            )),
        },
        BackendCommand::LoadStates => match api.get_states().await {
            Ok(states) => UiEvent::StatesLoaded(states),
            Err(err) => failed(None, UiErrorContext::States, &err),
        },
        BackendCommand::LoadCounties {
            request,
            state_code,
        } => match api.get_counties(&state_code).await {
            Ok(counties) => UiEvent::CountiesLoaded { request, counties },
            Err(err) => failed(Some(request), UiErrorContext::Counties, &err),
        },
        BackendCommand::LoadCities {
            request,
            state_code,
            county,
        } => match api.get_cities(&state_code, &county).await {
            Ok(cities) => UiEvent::CitiesLoaded { request, cities },
            Err(err) => failed(Some(request), UiErrorContext::Cities, &err),
        },
        BackendCommand::LoadObligations { request, filters } => {
            match api.get_obligations(&filters).await {
                Ok(response) => UiEvent::ObligationsLoaded { request, response },
                Err(err) => failed(Some(request), UiErrorContext::Obligations, &err),
            }
        }
        BackendCommand::SearchLocations { request, query } => {
            match api.search_locations(&query).await {
                Ok(matches) => UiEvent::SearchCompleted { request, matches },
                Err(err) => failed(Some(request), UiErrorContext::Search, &err),
            }
        }
    }
}

fn failed(
    request: Option<RequestId>,
    context: UiErrorContext,
    err: &client_core::ClientError,
) -> UiEvent {
    tracing::debug!(context = context.as_str(), "backend: request failed: {err}");
    UiEvent::LoadFailed {
        request,
        error: UiError::from_client_error(context, err),
    }
}

#[cfg(test)]
#[path = "tests/runtime_tests.rs"]
mod tests;
