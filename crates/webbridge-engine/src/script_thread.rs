//! Dedicated script-engine thread
//!
//! The script engine must only ever be touched from one thread. A
//! `ScriptThread` owns that thread and a FIFO task queue feeding it; any other
//! thread hands work over with [`dispatch`](ScriptThread::dispatch). Embeddings
//! whose webview already owns a UI thread use that instead; headless hosts and
//! tests use this.
//!
//! Shutdown closes the queue. Tasks already queued still run, then the thread
//! exits and is joined.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, JoinHandle, ThreadId};

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;
use webbridge_sdk::ScriptTask;

/// Thread owning the script engine
pub struct ScriptThread {
    name: String,
    thread_id: ThreadId,
    tx: Mutex<Option<Sender<ScriptTask>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl ScriptThread {
    /// Spawn the thread
    pub fn spawn(name: &str) -> io::Result<Self> {
        let (tx, rx) = channel::unbounded::<ScriptTask>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || Self::run_loop(rx))?;

        Ok(Self {
            name: name.to_string(),
            thread_id: handle.thread().id(),
            tx: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Thread name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the caller is on the script thread
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    /// Whether the queue still accepts tasks
    pub fn is_running(&self) -> bool {
        self.tx.lock().is_some()
    }

    /// Queue `task`. Returns `false` once the thread is shut down.
    pub fn dispatch(&self, task: ScriptTask) -> bool {
        let sent = match self.tx.lock().as_ref() {
            Some(tx) => tx.send(task).is_ok(),
            None => false,
        };
        if !sent {
            log::warn!("{}: dropping task queued after shutdown", self.name);
        }
        sent
    }

    /// Run `f` on the script thread and wait for its result.
    ///
    /// Runs inline when already on the script thread. Returns `None` if the
    /// thread is shut down or `f` panicked.
    pub fn run<R, F>(&self, f: F) -> Option<R>
    where
        R: Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        if self.is_current() {
            return Some(f());
        }
        let (done_tx, done_rx) = channel::bounded(1);
        let queued = self.dispatch(Box::new(move || {
            let _ = done_tx.send(f());
        }));
        if !queued {
            return None;
        }
        done_rx.recv().ok()
    }

    /// Wait until every task queued so far has run
    pub fn flush(&self) -> bool {
        self.run(|| ()).is_some()
    }

    /// Close the queue and join the thread. Idempotent.
    pub fn shutdown(&self) {
        self.tx.lock().take();
        let handle = self.handle.lock().take();
        if let Some(handle) = handle {
            if self.is_current() {
                return;
            }
            if handle.join().is_err() {
                log::error!("{}: script thread panicked", self.name);
            }
        }
    }

    fn run_loop(rx: Receiver<ScriptTask>) {
        while let Ok(task) = rx.recv() {
            if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                log::error!("script task panicked");
            }
        }
    }
}

impl Drop for ScriptThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}
