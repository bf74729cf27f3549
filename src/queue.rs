//! Single-consumer task queues.
//!
//! A [`TaskQueue`] owns one worker thread that runs submitted closures in order. Callers either
//! fire and forget with [`TaskQueue::post`] or block on [`TaskQueue::run`] until their closure
//! has finished. The driver keeps one queue as its main thread and every window keeps one for
//! its events.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle, ThreadId};

use async_channel::{Receiver, Sender};
use futures::channel::oneshot;
use tracing::{debug, error, warn};

use crate::error::{HeadlessError, Result};
use crate::logging::panic_message;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// A named worker thread draining a queue of closures.
#[derive(Debug)]
pub struct TaskQueue {
    name: String,
    sender: Sender<Task>,
    worker: ThreadId,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskQueue {
    /// Starts a queue whose worker thread is called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::Spawn`] when the thread cannot be created.
    pub fn spawn(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let (sender, receiver) = async_channel::unbounded::<Task>();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || drain(&receiver))
            .map_err(HeadlessError::Spawn)?;
        debug!(queue = %name, "task queue started");

        Ok(Self {
            name,
            sender,
            worker: handle.thread().id(),
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Name of the worker thread.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the calling thread is this queue's worker.
    #[must_use]
    pub fn is_worker_thread(&self) -> bool {
        thread::current().id() == self.worker
    }

    /// Whether the queue stopped accepting tasks.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Enqueues `task` without waiting for it.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::QueueClosed`] after [`TaskQueue::close`].
    pub fn post(&self, task: impl FnOnce() + Send + 'static) -> Result<()> {
        self.sender.send_blocking(Box::new(task)).map_err(|_| {
            warn!(queue = %self.name, "task posted to a closed queue");
            HeadlessError::QueueClosed
        })
    }

    /// Runs `task` on the worker and waits for its result.
    ///
    /// Called from the worker itself the task runs inline, so nested calls cannot deadlock.
    ///
    /// # Errors
    ///
    /// Returns [`HeadlessError::QueueClosed`] when the queue is closed or the task panicked.
    pub fn run<T, F>(&self, task: F) -> Result<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        if self.is_worker_thread() {
            return Ok(task());
        }

        let (done, result) = oneshot::channel();
        self.post(move || {
            let _ = done.send(task());
        })?;
        futures::executor::block_on(result).map_err(|_| HeadlessError::QueueClosed)
    }

    /// Stops accepting tasks and waits for the queued ones to finish.
    ///
    /// Closing from the worker thread only stops the queue, the worker exits once it returns.
    pub fn close(&self) {
        if !self.sender.close() {
            return;
        }
        debug!(queue = %self.name, "task queue closed");
        if self.is_worker_thread() {
            return;
        }
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = handle else {
            return;
        };
        if handle.join().is_err() {
            error!(queue = %self.name, "task queue worker terminated abnormally");
        }
    }
}

impl Drop for TaskQueue {
    fn drop(&mut self) {
        self.close();
    }
}

fn drain(receiver: &Receiver<Task>) {
    while let Ok(task) = receiver.recv_blocking() {
        if let Err(payload) = catch_unwind(AssertUnwindSafe(task)) {
            error!(
                thread = thread::current().name().unwrap_or("unnamed"),
                message = %panic_message(payload.as_ref()),
                "queued task panicked"
            );
        }
    }
}
