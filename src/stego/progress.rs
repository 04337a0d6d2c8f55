// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Per-call stage tracking and cooperative cancellation.
//!
//! A [`Progress`] handle is created by the caller and passed into the
//! pipeline; clones share the same state, so a UI thread can read the stage
//! or request cancellation while a worker runs. Nothing here is global.
//!
//! ```text
//! Idle -> PreparingPayload -> Embedding | Extracting -> Finalizing -> Succeeded
//!                                                                  \-> Failed
//! ```

use core::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use tracing::debug;

use super::error::StegoError;

/// Pipeline stage of one encode or decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Stage {
    Idle = 0,
    PreparingPayload = 1,
    Embedding = 2,
    Extracting = 3,
    Finalizing = 4,
    Succeeded = 5,
    Failed = 6,
}

impl Stage {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::PreparingPayload,
            2 => Self::Embedding,
            3 => Self::Extracting,
            4 => Self::Finalizing,
            5 => Self::Succeeded,
            6 => Self::Failed,
            _ => Self::Idle,
        }
    }

    /// `Succeeded` or `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

#[derive(Debug, Default)]
struct State {
    stage: AtomicU8,
    cancelled: AtomicBool,
}

/// Shared stage + cancellation handle for a single call.
#[derive(Debug, Clone, Default)]
pub struct Progress {
    state: Arc<State>,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage.
    pub fn stage(&self) -> Stage {
        Stage::from_u8(self.state.stage.load(Ordering::Acquire))
    }

    /// Request cancellation. Takes effect at the next stage boundary.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.cancelled.load(Ordering::Acquire)
    }

    /// Return [`StegoError::Cancelled`] if cancellation was requested.
    pub fn check_cancelled(&self) -> Result<(), StegoError> {
        if self.is_cancelled() {
            Err(StegoError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Move to `stage`, unless the call has been cancelled.
    pub(crate) fn enter(&self, stage: Stage) -> Result<(), StegoError> {
        self.check_cancelled()?;
        debug!(?stage, "pipeline stage");
        self.state.stage.store(stage as u8, Ordering::Release);
        Ok(())
    }

    /// Record the terminal stage for `result` and pass it through.
    pub(crate) fn finish<T>(&self, result: Result<T, StegoError>) -> Result<T, StegoError> {
        let stage = if result.is_ok() { Stage::Succeeded } else { Stage::Failed };
        self.state.stage.store(stage as u8, Ordering::Release);
        result
    }
}
