//! Lock-free hand-off of models between a control thread and the audio
//! thread.
//!
//! Models are built (and dropped) on the control side. The audio thread only
//! moves the boxed model in and out of bounded queues, so it never allocates
//! one. It only frees one if the [`ModelSender`] is dropped while a model is
//! still queued: the model it replaces then has nowhere to go.

use super::LoadedModel;
use crate::prelude::*;
use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};

/// Creates a connected sender/receiver pair.
pub(crate) fn channel() -> (ModelSender, ModelReceiver) {
    let (install_tx, install_rx) = crossbeam_channel::bounded(MODEL_HANDOFF_QUEUE_SIZE);
    let (retire_tx, retire_rx) = crossbeam_channel::bounded(MODEL_HANDOFF_QUEUE_SIZE);

    (
        ModelSender { install_tx, retire_rx },
        ModelReceiver { install_rx, retire_tx },
    )
}

/// The control-side end of a model hand-off.
///
/// Replaced models come back through [`collect_retired()`](Self::collect_retired),
/// which should be called regularly: while the retire queue is full, the
/// audio thread leaves newly sent models pending.
#[derive(Debug)]
pub struct ModelSender {
    install_tx: Sender<LoadedModel>,
    retire_rx: Receiver<LoadedModel>,
}

impl ModelSender {
    /// Queues `model` for installation at the start of the next processing
    /// call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HandoffClosed`] if the install queue is full or the
    /// receiving effect has been dropped.
    pub fn send(&self, model: LoadedModel) -> Result<()> {
        if self.retire_rx.is_full() {
            tracing::warn!("model retire queue is full; call collect_retired()");
        }

        match self.install_tx.try_send(model) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                tracing::warn!("model install queue is full, dropping model");
                Err(Error::HandoffClosed)
            }
            Err(TrySendError::Disconnected(_)) => Err(Error::HandoffClosed),
        }
    }

    /// Drops every model the audio thread has retired, returning how many
    /// there were.
    pub fn collect_retired(&self) -> usize {
        self.retire_rx.try_iter().count()
    }

    /// The number of sent models not yet installed.
    pub fn pending(&self) -> usize {
        self.install_tx.len()
    }
}

/// The audio-side end of a model hand-off, owned by the effect.
#[derive(Debug)]
pub(crate) struct ModelReceiver {
    install_rx: Receiver<LoadedModel>,
    retire_tx: Sender<LoadedModel>,
}

impl ModelReceiver {
    /// Swaps in a pending model, if there is one, and sends the replaced
    /// model back for the control side to drop. Returns whether a model was
    /// installed.
    ///
    /// Nothing is installed while `current` would have nowhere to go.
    pub(crate) fn receive(&self, current: &mut Option<LoadedModel>) -> bool {
        if current.is_some() && self.retire_tx.is_full() {
            return false;
        }

        match self.install_rx.try_recv() {
            Ok(model) => {
                if let Some(old) = current.replace(model) {
                    // if the sender is gone, the old model is dropped here
                    let _ = self.retire_tx.try_send(old);
                }
                true
            }
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => false,
        }
    }
}
