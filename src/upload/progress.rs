use super::UploadEvent;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::mpsc::Sender;

/// Counts request body bytes as the transport pulls them and reports the
/// rounded percentage whenever it goes up.
pub struct ProgressTracker {
    total: u64,
    sent: AtomicU64,
    reported: AtomicU8,
    events: Sender<UploadEvent>,
}

impl ProgressTracker {
    pub fn new(total: u64, events: Sender<UploadEvent>) -> Self {
        Self {
            total,
            sent: AtomicU64::new(0),
            reported: AtomicU8::new(0),
            events,
        }
    }

    pub fn advance(&self, bytes: u64) {
        let sent = self.sent.fetch_add(bytes, Ordering::SeqCst) + bytes;
        let percent = percentage(sent, self.total);
        let previous = self.reported.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            // the receiver is gone once the job has been dropped
            let _ = self.events.send(UploadEvent::Progress(percent));
        }
    }

    #[cfg(test)]
    pub fn reported(&self) -> u8 {
        self.reported.load(Ordering::SeqCst)
    }
}

fn percentage(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let sent = sent.min(total);
    ((sent * 100 + total / 2) / total) as u8
}
