//! Background work for the slow collaborators (decode, rasterize, OCR).
//!
//! The UI thread starts a [`Job`] and polls it once per frame. Results carry
//! a ticket naming what they were computed for, and the editor drops any
//! result whose ticket no longer matches.

use futures::channel::oneshot;
use uuid::Uuid;

/// A page load. Only the most recently requested load may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestTicket {
    pub generation: u64,
}

/// An OCR pass over one page of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTicket {
    pub document: Uuid,
    pub page: Uuid,
    pub page_index: usize,
}

#[derive(Debug)]
pub enum JobPoll<T> {
    Pending,
    Ready(T),
    /// The worker went away without answering
    Lost,
}

/// A computation running on its own thread.
#[derive(Debug)]
pub struct Job<T> {
    name: String,
    receiver: oneshot::Receiver<T>,
}

impl<T: Send + 'static> Job<T> {
    pub fn spawn(name: impl Into<String>, work: impl FnOnce() -> T + Send + 'static) -> Self {
        let name = name.into();
        let (sender, receiver) = oneshot::channel();
        let thread = std::thread::Builder::new().name(name.clone());
        let spawned = thread.spawn(move || {
            // The receiver may have been dropped; nothing to do then.
            let _ = sender.send(work());
        });
        if let Err(err) = spawned {
            log::warn!("Could not start job {name}: {err}");
        } else {
            log::debug!("Job {name} started");
        }
        Self { name, receiver }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Non-blocking check, meant to be called once per frame.
    pub fn poll(&mut self) -> JobPoll<T> {
        match self.receiver.try_recv() {
            Ok(Some(value)) => JobPoll::Ready(value),
            Ok(None) => JobPoll::Pending,
            Err(oneshot::Canceled) => JobPoll::Lost,
        }
    }

    /// Block until the job answers.
    pub fn wait(self) -> Option<T> {
        futures::executor::block_on(self.receiver).ok()
    }
}
