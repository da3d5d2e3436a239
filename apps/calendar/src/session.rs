//! UI loop state: owns the view state and the channels to the backend worker.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use anyhow::{bail, Context, Result};
use client_core::CalendarApi;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::{
    backend_bridge::{commands::BackendCommand, runtime},
    controller::{
        events::UiEvent,
        orchestration::dispatch_backend_command,
        reducer::{reduce, Transition, ViewState},
    },
};

const COMMAND_QUEUE_CAPACITY: usize = 64;
const EVENT_QUEUE_CAPACITY: usize = 256;

pub struct Session {
    state: ViewState,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    in_flight: usize,
}

impl Session {
    pub fn start(api: Arc<dyn CalendarApi>) -> Self {
        let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(COMMAND_QUEUE_CAPACITY);
        let (ui_tx, ui_rx) = bounded::<UiEvent>(EVENT_QUEUE_CAPACITY);
        // Detached: a hung backend call must not block exit.
        runtime::launch(api, cmd_rx, ui_tx);
        Self {
            state: ViewState::default(),
            cmd_tx,
            ui_rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn dispatch(&mut self, event: UiEvent) -> Result<()> {
        let Transition { state, commands } = reduce(&self.state, event);
        self.state = state;
        for cmd in commands {
            dispatch_backend_command(&self.cmd_tx, cmd)?;
            self.in_flight += 1;
        }
        Ok(())
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Blocks until every queued command has been answered and reduced.
    pub fn wait_idle(&mut self) -> Result<()> {
        while self.in_flight > 0 {
            let event = self
                .ui_rx
                .recv()
                .context("backend worker stopped before answering")?;
            self.receive(event)?;
        }
        Ok(())
    }

    /// Like [`Session::wait_idle`] but gives up after `budget`. Returns whether
    /// every command was answered.
    pub fn wait_idle_for(&mut self, budget: Duration) -> Result<bool> {
        let deadline = Instant::now() + budget;
        while self.in_flight > 0 {
            match self.ui_rx.recv_deadline(deadline) {
                Ok(event) => self.receive(event)?,
                Err(RecvTimeoutError::Timeout) => return Ok(false),
                Err(RecvTimeoutError::Disconnected) => {
                    bail!("backend worker stopped before answering")
                }
            }
        }
        Ok(true)
    }

    /// Reduces whatever answers have already arrived, without blocking.
    pub fn poll(&mut self) -> Result<()> {
        while self.in_flight > 0 {
            match self.ui_rx.try_recv() {
                Ok(event) => self.receive(event)?,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    bail!("backend worker stopped before answering")
                }
            }
        }
        Ok(())
    }

    fn receive(&mut self, event: UiEvent) -> Result<()> {
        self.in_flight -= 1;
        self.dispatch(event)
    }

    pub fn dispatch_and_wait(&mut self, event: UiEvent) -> Result<()> {
        self.dispatch(event)?;
        self.wait_idle()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
