use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::sync::broadcast::{Receiver, Sender};

/// Broadcasts a one-shot shutdown signal to every listener created from it.
///
/// The signal is sticky: a listener created after [ShutdownHandle::shutdown] has been called still
/// observes it.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    sender: Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl Default for ShutdownHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownHandle {
    pub fn new() -> Self {
        Self {
            sender: tokio::sync::broadcast::channel(1).0,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn shutdown(&self) {
        if self.triggered.swap(true, Ordering::SeqCst) {
            log::trace!("Shutdown already requested");
            return;
        }

        if let Err(e) = self.sender.send(()) {
            // Will fail if nobody is listening for a shutdown signal, in which case the log message
            // can be ignored.
            log::warn!("Failed to send shutdown signal: {e:?}");
        }
    }

    pub fn is_shutdown(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub fn new_listener(&self) -> DelegatedShutdownListener {
        DelegatedShutdownListener::new(self.sender.subscribe(), self.triggered.clone())
    }
}

#[derive(Debug)]
pub struct DelegatedShutdownListener {
    receiver: Receiver<()>,
    triggered: Arc<AtomicBool>,
}

impl Clone for DelegatedShutdownListener {
    fn clone(&self) -> Self {
        Self {
            receiver: self.receiver.resubscribe(),
            triggered: self.triggered.clone(),
        }
    }
}

impl DelegatedShutdownListener {
    pub(crate) fn new(receiver: Receiver<()>, triggered: Arc<AtomicBool>) -> Self {
        Self {
            receiver,
            triggered,
        }
    }

    /// Point in time check if the shutdown signal has been received. If this returns true then no
    /// new work should be started.
    pub fn should_shutdown(&mut self) -> bool {
        if self.triggered.load(Ordering::SeqCst) {
            return true;
        }

        match self.receiver.try_recv() {
            Ok(_) => true,
            Err(TryRecvError::Closed) => true,
            // If the receiver is empty or lagged then we should not shutdown.
            Err(_) => false,
        }
    }

    /// Wait for the shutdown signal to be received. It is safe to race this with another future so
    /// that the shutdown signal can be used to cancel other work in progress.
    ///
    /// Resolves immediately if the signal was sent before this listener started waiting, or if
    /// the [ShutdownHandle] has been dropped.
    pub async fn wait_for_shutdown(&mut self) {
        if self.triggered.load(Ordering::SeqCst) {
            return;
        }

        loop {
            match self.receiver.recv().await {
                Ok(()) | Err(RecvError::Closed) => return,
                Err(RecvError::Lagged(_)) => {
                    if self.triggered.load(Ordering::SeqCst) {
                        return;
                    }
                }
            }
        }
    }
}
