use std::collections::VecDeque;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    expires_at: Instant,
}

/// Transient notifications shown over the current screen.
#[derive(Debug)]
pub struct Notifications {
    ttl: Duration,
    toasts: VecDeque<Toast>,
}

const MAX_VISIBLE: usize = 4;

impl Notifications {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            toasts: VecDeque::new(),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Info, message.into());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(ToastKind::Error, message.into());
    }

    fn push(&mut self, kind: ToastKind, message: String) {
        // The same message twice in a row only refreshes its timer.
        if let Some(last) = self.toasts.back_mut() {
            if last.kind == kind && last.message == message {
                last.expires_at = Instant::now() + self.ttl;
                return;
            }
        }
        self.toasts.push_back(Toast {
            kind,
            message,
            expires_at: Instant::now() + self.ttl,
        });
        while self.toasts.len() > MAX_VISIBLE {
            self.toasts.pop_front();
        }
    }

    /// Drops expired toasts and returns the ones still visible.
    pub fn visible(&mut self, now: Instant) -> impl Iterator<Item = &Toast> {
        self.toasts.retain(|toast| toast.expires_at > now);
        self.toasts.iter()
    }

    pub fn dismiss(&mut self, index: usize) {
        self.toasts.remove(index);
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
