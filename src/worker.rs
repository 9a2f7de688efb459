//! Runs backend calls off the UI thread and hands results back over a channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::api::{HistoryEntry, SearchBackend, SearchMode, SearchReply};
use crate::error::ApiError;

/// A search the state has accepted and numbered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub generation: u64,
    pub vcs: Vec<String>,
    pub mode: SearchMode,
}

/// A finished backend call.
#[derive(Debug)]
pub enum WorkerEvent {
    Search {
        ticket: SearchTicket,
        result: Result<SearchReply, ApiError>,
    },
    History {
        generation: u64,
        result: Result<Vec<HistoryEntry>, ApiError>,
    },
}

type Waker = Arc<dyn Fn() + Send + Sync>;

pub struct Worker {
    backend: Arc<dyn SearchBackend>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
    waker: Option<Waker>,
}

impl Worker {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            tx,
            rx,
            waker: None,
        }
    }

    /// Called from the worker thread after each event is queued, so the UI
    /// can schedule a repaint.
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn spawn_search(&self, ticket: SearchTicket) {
        let backend = Arc::clone(&self.backend);
        self.spawn(move || {
            let result = backend.search(&ticket.vcs, ticket.mode);
            if let Err(e) = &result {
                log::error!("Search {} failed: {e}", ticket.generation);
            }
            WorkerEvent::Search { ticket, result }
        });
    }

    pub fn spawn_history(&self, generation: u64) {
        let backend = Arc::clone(&self.backend);
        self.spawn(move || {
            let result = backend.history();
            if let Err(e) = &result {
                log::error!("History loading error: {e}");
            }
            WorkerEvent::History { generation, result }
        });
    }

    fn spawn(&self, job: impl FnOnce() -> WorkerEvent + Send + 'static) {
        let tx = self.tx.clone();
        let waker = self.waker.clone();
        thread::spawn(move || {
            // receiver gone means the app is shutting down
            if tx.send(job()).is_ok() {
                if let Some(wake) = waker {
                    wake();
                }
            }
        });
    }

    /// Next finished event, without blocking.
    pub fn try_recv(&self) -> Option<WorkerEvent> {
        self.rx.try_recv().ok()
    }

    /// Block until the next event arrives.
    pub fn recv(&self) -> Option<WorkerEvent> {
        self.rx.recv().ok()
    }
}
