//! Background autosave thread.
//!
//! # Responsibility
//! - Run a persistence task on a fixed interval until stopped.
//!
//! # Invariants
//! - The thread is always joined when its `Autosave` owner is stopped or dropped.
//! - Task failures are logged and never end the loop.
//! - Stop latency is bounded by the poll tick, not the save interval.

use crate::store::{StoreError, StoreResult};
use log::{error, info, warn};
use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const AUTOSAVE_THREAD_NAME: &str = "libris-autosave";

/// Owned handle to a running autosave thread.
pub struct Autosave {
    stop: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl Autosave {
    /// Spawns the autosave thread.
    ///
    /// `task` runs every `interval`; the stop flag is checked every `poll`.
    ///
    /// # Errors
    /// - `StoreError::Io` when the OS refuses to spawn the thread.
    pub fn spawn<F, E>(interval: Duration, poll: Duration, mut task: F) -> StoreResult<Self>
    where
        F: FnMut() -> Result<usize, E> + Send + 'static,
        E: Error,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);

        let worker = thread::Builder::new()
            .name(AUTOSAVE_THREAD_NAME.to_string())
            .spawn(move || {
                let mut last_run = Instant::now();
                while !thread_stop.load(Ordering::Acquire) {
                    thread::sleep(poll);
                    if thread_stop.load(Ordering::Acquire) || last_run.elapsed() < interval {
                        continue;
                    }
                    last_run = Instant::now();
                    match task() {
                        Ok(records) => info!(
                            "event=autosave module=service status=ok records={records}"
                        ),
                        Err(err) => {
                            error!("event=autosave module=service status=error error={err}")
                        }
                    }
                }
            })
            .map_err(|err| StoreError::io(AUTOSAVE_THREAD_NAME, err))?;

        info!(
            "event=autosave_start module=service status=ok interval_ms={} poll_ms={}",
            interval.as_millis(),
            poll.as_millis()
        );
        Ok(Self {
            stop,
            worker: Some(worker),
        })
    }

    /// Signals the thread and waits for it to exit.
    pub fn stop(mut self) {
        self.stop_and_join();
    }

    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    fn stop_and_join(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("event=autosave_stop module=service status=error error=thread_panicked");
                return;
            }
            info!("event=autosave_stop module=service status=ok");
        }
    }
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}
