//! Cross-thread command queue bound to the owning UI thread.
//!
//! All widget and engine calls happen on one thread. Work arriving from
//! anywhere else (collection changes, IPC callbacks) is submitted here and
//! drained by the owning thread's event loop, in submission order. There
//! is no priority and no cancellation; after quiesce, submissions are
//! dropped and the queue drains to nothing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use crate::components::RootComponent;

/// A deferred unit of work for the owning thread.
#[derive(Debug, Clone)]
pub enum WebViewCommand {
    /// Mount a root component via the engine contract.
    AddRootComponent(RootComponent),
    /// Unmount the root component at the selector.
    RemoveRootComponent(String),
    /// Deliver a message received from the hosted script context.
    HostMessage(String),
}

/// FIFO work queue with quiesce-on-dispose semantics.
#[derive(Default)]
pub struct Dispatcher {
    queue: Mutex<VecDeque<WebViewCommand>>,
    quiesced: AtomicBool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a command from any thread. Returns immediately. Dropped
    /// silently after quiesce.
    pub fn submit(&self, command: WebViewCommand) {
        if self.quiesced.load(Ordering::Acquire) {
            return;
        }
        if let Ok(mut queue) = self.queue.lock() {
            queue.push_back(command);
        }
    }

    /// Take all pending commands, in submission order. Owning thread only.
    pub fn drain(&self) -> Vec<WebViewCommand> {
        if self.quiesced.load(Ordering::Acquire) {
            return Vec::new();
        }
        match self.queue.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Stop accepting work and discard anything still queued.
    pub fn quiesce(&self) {
        self.quiesced.store(true, Ordering::Release);
        if let Ok(mut queue) = self.queue.lock() {
            queue.clear();
        }
    }

    pub fn is_quiesced(&self) -> bool {
        self.quiesced.load(Ordering::Acquire)
    }
}
