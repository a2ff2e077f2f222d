//! Background view computation with last-request-wins semantics
//!
//! For corpora large enough that a view no longer fits in a UI tick, views
//! are computed on a dedicated thread. Every submission gets a new
//! generation number; the worker only computes the newest queued request and
//! the consumer only ever sees the view for the newest generation.

use crate::config::GraphConfig;
use crate::space::VectorSpace;
use crate::types::EntityId;
use crate::view::{build_view, ThemeView};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;
use tracing::debug;

/// Worker errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum WorkerError {
    #[error("View worker has stopped")]
    Disconnected,
}

pub type WorkerResult<T> = Result<T, WorkerError>;

struct ViewRequest {
    generation: u64,
    active: Vec<EntityId>,
    config: GraphConfig,
}

struct ViewResponse {
    generation: u64,
    view: ThemeView,
}

/// Handle to the background view thread
pub struct ViewWorker {
    requests: Option<Sender<ViewRequest>>,
    responses: Receiver<ViewResponse>,
    latest: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl ViewWorker {
    /// Start a worker over an immutable, shared corpus
    pub fn spawn(space: Arc<VectorSpace>) -> Self {
        let (request_tx, request_rx) = mpsc::channel::<ViewRequest>();
        let (response_tx, response_rx) = mpsc::channel::<ViewResponse>();
        let latest = Arc::new(AtomicU64::new(0));
        let worker_latest = Arc::clone(&latest);

        let handle = std::thread::spawn(move || {
            while let Ok(mut request) = request_rx.recv() {
                // Skip everything but the newest queued request
                while let Ok(newer) = request_rx.try_recv() {
                    debug!("Superseded view request {}", request.generation);
                    request = newer;
                }
                if request.generation < worker_latest.load(Ordering::Acquire) {
                    continue;
                }

                let view = build_view(&space, &request.active, &request.config);

                if request.generation < worker_latest.load(Ordering::Acquire) {
                    debug!("Dropped stale view {}", request.generation);
                    continue;
                }
                let response = ViewResponse {
                    generation: request.generation,
                    view,
                };
                if response_tx.send(response).is_err() {
                    break;
                }
            }
        });

        ViewWorker {
            requests: Some(request_tx),
            responses: response_rx,
            latest,
            handle: Some(handle),
        }
    }

    /// Queue a view computation; supersedes every earlier submission
    pub fn submit(&self, active: Vec<EntityId>, config: GraphConfig) -> WorkerResult<u64> {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let request = ViewRequest {
            generation,
            active,
            config,
        };
        self.requests
            .as_ref()
            .ok_or(WorkerError::Disconnected)?
            .send(request)
            .map_err(|_| WorkerError::Disconnected)?;
        Ok(generation)
    }

    /// Generation of the newest submission (0 if none)
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Block until the view for the newest submission is ready
    pub fn recv_latest(&self) -> WorkerResult<ThemeView> {
        loop {
            let response = self.responses.recv().map_err(|_| WorkerError::Disconnected)?;
            if response.generation == self.latest_generation() {
                return Ok(response.view);
            }
        }
    }

    /// Non-blocking variant of [`recv_latest`](Self::recv_latest)
    pub fn try_latest(&self) -> WorkerResult<Option<ThemeView>> {
        loop {
            match self.responses.try_recv() {
                Ok(response) if response.generation == self.latest_generation() => {
                    return Ok(Some(response.view))
                }
                Ok(_) => continue,
                Err(mpsc::TryRecvError::Empty) => return Ok(None),
                Err(mpsc::TryRecvError::Disconnected) => return Err(WorkerError::Disconnected),
            }
        }
    }
}

impl Drop for ViewWorker {
    fn drop(&mut self) {
        // Closing the request channel ends the worker loop
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
