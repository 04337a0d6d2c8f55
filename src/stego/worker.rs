// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Background execution of encode/decode calls.
//!
//! Key derivation alone takes a noticeable fraction of a second, so
//! interactive callers run the pipeline off their main thread. A [`Job`]
//! owns the worker thread plus a [`Progress`] handle for polling the stage
//! and requesting cancellation.

use std::thread::{self, JoinHandle};

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::stego::error::StegoError;
use crate::stego::payload::FileEntry;
use crate::stego::pipeline::{self, DecodeOptions, EncodeOutput};
use crate::stego::progress::{Progress, Stage};

/// Owned inputs for a background encode.
pub struct EncodeRequest {
    pub file: FileEntry,
    /// Cover image bytes; `None` for quick mode.
    pub carrier: Option<Vec<u8>>,
    pub note: Zeroizing<String>,
    pub password: Option<Zeroizing<String>>,
}

/// Owned inputs for a background decode.
pub struct DecodeRequest {
    pub carrier: Vec<u8>,
    pub note: Zeroizing<String>,
    pub password: Option<Zeroizing<String>>,
}

/// A running pipeline call.
///
/// Dropping a job without waiting on it cancels the worker.
#[derive(Debug)]
pub struct Job<T> {
    handle: Option<JoinHandle<Result<T, StegoError>>>,
    progress: Progress,
}

impl<T> Job<T> {
    /// Stage the worker has reached.
    pub fn stage(&self) -> Stage {
        self.progress.stage()
    }

    /// Ask the worker to stop at its next stage boundary.
    pub fn cancel(&self) {
        self.progress.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Block until the worker is done.
    ///
    /// A panic on the worker is re-raised on the calling thread.
    pub fn wait(mut self) -> Result<T, StegoError> {
        let handle = self.handle.take().ok_or(StegoError::WorkerUnavailable)?;
        match handle.join() {
            Ok(result) => result,
            Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}

impl<T> Drop for Job<T> {
    fn drop(&mut self) {
        if self.handle.is_some() && !self.progress.stage().is_terminal() {
            debug!(stage = ?self.progress.stage(), "job abandoned, cancelling worker");
            self.progress.cancel();
        }
    }
}

/// Start an encode on a new thread.
pub fn spawn_encode(request: EncodeRequest) -> Result<Job<EncodeOutput>, StegoError> {
    spawn("pxstego-encode", move |progress| {
        pipeline::encode_with_progress(
            &request.file,
            request.carrier.as_deref(),
            &request.note,
            request.password.as_deref().map(String::as_str),
            progress,
        )
    })
}

/// Start a decode on a new thread using the default decoder variants.
pub fn spawn_decode(request: DecodeRequest) -> Result<Job<FileEntry>, StegoError> {
    spawn("pxstego-decode", move |progress| {
        pipeline::decode_with(
            &request.carrier,
            &request.note,
            request.password.as_deref().map(String::as_str),
            &DecodeOptions::default(),
            progress,
        )
    })
}

fn spawn<T, F>(name: &str, work: F) -> Result<Job<T>, StegoError>
where
    T: Send + 'static,
    F: FnOnce(&Progress) -> Result<T, StegoError> + Send + 'static,
{
    let progress = Progress::new();
    let shared = progress.clone();
    let handle = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || work(&shared))
        .map_err(|e| {
            warn!(error = %e, "failed to spawn worker thread");
            StegoError::WorkerUnavailable
        })?;
    Ok(Job {
        handle: Some(handle),
        progress,
    })
}
