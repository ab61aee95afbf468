//! Background workers.

use std::sync::mpsc;
use std::thread;

pub mod expiry_watcher;

pub use expiry_watcher::{
    AlertSink, ExpirySource, ExpiryWatcher, ExpiryWatcherConfig, TracingAlertSink,
};

/// Handle to control and join a background worker thread.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn new(shutdown: mpsc::Sender<()>, join: thread::JoinHandle<()>) -> Self {
        Self {
            shutdown,
            join: Some(join),
        }
    }

    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}
