//! Command orchestration from reducer output to the backend command queue.

use anyhow::{bail, Result};
use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(cmd_tx: &Sender<BackendCommand>, cmd: BackendCommand) -> Result<()> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => bail!("backend command queue is full; dropped {cmd_name}"),
        Err(TrySendError::Disconnected(_)) => {
            bail!("backend worker disconnected (possible startup/runtime failure); dropped {cmd_name}")
        }
    }
}
