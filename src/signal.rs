//! Control requests from the configuration side to the frame loop.
//!
//! A single-slot mailbox built on `critical-section`: only the most recent
//! request matters, so a newer one overwrites whatever is still pending.
//! The scheduler drains it between frames, never mid-frame.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::config::EffectConfig;

/// What the frame loop should do next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlRequest {
    /// Replace the running animation
    Apply(EffectConfig),
    /// Stop the running animation
    Cancel,
}

/// Latest-wins control mailbox, safe to share with interrupt context.
pub struct ControlSignal {
    inner: Mutex<RefCell<Option<ControlRequest>>>,
}

impl ControlSignal {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(None)),
        }
    }

    fn post(&self, request: ControlRequest) {
        critical_section::with(|cs| {
            self.inner.borrow(cs).replace(Some(request));
        });
    }

    /// Request a switch to `config`
    pub fn apply(&self, config: EffectConfig) {
        self.post(ControlRequest::Apply(config));
    }

    /// Request the running animation to stop
    pub fn cancel(&self) {
        self.post(ControlRequest::Cancel);
    }

    /// Take the pending request, leaving the mailbox empty
    pub fn take(&self) -> Option<ControlRequest> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().take())
    }

    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().is_some())
    }
}

impl Default for ControlSignal {
    fn default() -> Self {
        Self::new()
    }
}
