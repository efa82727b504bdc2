//! Pause/resume/abort signalling between the operator task and the scan task.
//!
//! The signal is a tri-state cell with exactly one writer (the operator
//! channel) and one reader (the scan controller). [`ControlSignal`] is the
//! writer half; [`ControlWatch`] is the reader half. The two halves wrap a
//! `tokio::sync::watch` channel, so the reader observes every transition
//! atomically and a blocked reader wakes as soon as the state changes —
//! no polling loop anywhere.
//!
//! `Stopped` is terminal: once set, every further transition request is
//! ignored.

use tokio::sync::watch;

/// Scan execution state as requested by the operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    /// The scan may advance.
    Running,
    /// The scan must hold at its next suspension point until resumed.
    Paused,
    /// The scan must terminate at its next suspension point. Terminal.
    Stopped,
}

/// Writer half of the control signal, held by the operator channel.
#[derive(Debug)]
pub struct ControlSignal {
    tx: watch::Sender<ControlState>,
}

impl ControlSignal {
    /// Create a new signal in the `Running` state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ControlState::Running);
        Self { tx }
    }

    /// Create a reader half observing this signal.
    pub fn watch(&self) -> ControlWatch {
        ControlWatch {
            rx: self.tx.subscribe(),
        }
    }

    /// Request a pause. No-op if already paused or stopped.
    pub fn pause(&self) {
        self.transition(ControlState::Paused);
    }

    /// Request a resume. No-op if already running or stopped.
    pub fn resume(&self) {
        self.transition(ControlState::Running);
    }

    /// Request a stop. Idempotent and irreversible for this scan.
    pub fn stop(&self) {
        self.transition(ControlState::Stopped);
    }

    /// Non-blocking snapshot of the current state.
    pub fn current(&self) -> ControlState {
        *self.tx.borrow()
    }

    fn transition(&self, next: ControlState) {
        self.tx.send_if_modified(|state| {
            if *state == ControlState::Stopped || *state == next {
                return false;
            }
            *state = next;
            true
        });
    }
}

impl Default for ControlSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Reader half of the control signal, held by the scan controller.
#[derive(Debug)]
pub struct ControlWatch {
    rx: watch::Receiver<ControlState>,
}

impl ControlWatch {
    /// Non-blocking snapshot of the current state.
    pub fn current(&self) -> ControlState {
        *self.rx.borrow()
    }

    /// Block until the state is `Running` or `Stopped` and return it.
    ///
    /// This is the controller's single suspension point: a paused scan
    /// holds here (indefinitely, if need be) and wakes on the next
    /// transition. If the writer half is dropped while paused, the scan
    /// can never be resumed, so the closed channel reads as `Stopped`.
    pub async fn wait_until_runnable(&mut self) -> ControlState {
        loop {
            match *self.rx.borrow_and_update() {
                ControlState::Paused => {}
                state => return state,
            }
            if self.rx.changed().await.is_err() {
                return ControlState::Stopped;
            }
        }
    }
}
