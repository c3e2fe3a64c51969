//! Device module seam — the icon/callback capability set the routines drive.

use std::fmt;

// ── Error type ──

/// Errors raised by a device module.
#[derive(Debug)]
pub enum DeviceError {
    /// Icon index outside `0..ICON_COUNT`.
    InvalidIcon(usize),
    /// The device module is no longer accepting calls.
    Disconnected,
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::InvalidIcon(i) => {
                write!(f, "Invalid icon index {i} (expected 0..{ICON_COUNT})")
            }
            DeviceError::Disconnected => write!(f, "Device module disconnected"),
        }
    }
}

impl std::error::Error for DeviceError {}

pub type Result<T> = std::result::Result<T, DeviceError>;

/// Number of controllable icons (and buttons) on the panel.
pub const ICON_COUNT: usize = 4;

/// Event handler registered with a device module.
///
/// Receives the integer event code. Errors are handed back to whoever
/// delivered the event, unmodified.
pub type Callback = Box<dyn FnMut(i32) -> Result<()>>;

/// Reject indices the device would not accept.
pub fn check_index(index: usize) -> Result<()> {
    if index < ICON_COUNT {
        Ok(())
    } else {
        Err(DeviceError::InvalidIcon(index))
    }
}

// ── Trait ──

/// Capability set of the device module.
///
/// Methods take `&self`: implementations are shared handles (the dispatcher
/// keeps one inside the callback it registers on the same device).
pub trait IconPanel {
    /// Set the display state of one icon. Fire-and-forget.
    fn set_icon_state(&self, index: usize, on: bool) -> Result<()>;

    /// Remove every registered callback. Safe when none are registered.
    fn clear_callbacks(&self) -> Result<()>;

    /// Register a handler invoked with the event code of each device event.
    fn add_callback(&self, handler: Callback) -> Result<()>;

    /// Emit a human-readable status line on the device's log output.
    fn log_line(&self, line: &str) {
        log::info!("{line}");
    }
}

// ── Mock device for testing ──

/// Recording mock device for unit and integration tests.
///
/// Always compiled (zero runtime cost), hidden from public docs.
#[doc(hidden)]
pub mod mock {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// One observed call on the mock, in call order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        SetIcon(usize, bool),
        ClearCallbacks,
        AddCallback,
        Log(String),
    }

    #[derive(Default)]
    struct State {
        calls: RefCell<Vec<Call>>,
        callbacks: RefCell<Vec<Callback>>,
        /// If set, `set_icon_state` fails once this many calls have succeeded.
        fail_after: Cell<Option<usize>>,
        set_icon_count: Cell<usize>,
    }

    /// Cloneable handle; clones share the same recorded state.
    #[derive(Clone, Default)]
    pub struct MockPanel {
        state: Rc<State>,
    }

    impl MockPanel {
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of every call recorded so far.
        pub fn calls(&self) -> Vec<Call> {
            self.state.calls.borrow().clone()
        }

        /// Only the `set_icon_state` calls, as `(index, on)` pairs.
        pub fn icon_calls(&self) -> Vec<(usize, bool)> {
            self.state
                .calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::SetIcon(i, on) => Some((*i, *on)),
                    _ => None,
                })
                .collect()
        }

        /// Only the lines passed to `log_line`.
        pub fn log_lines(&self) -> Vec<String> {
            self.state
                .calls
                .borrow()
                .iter()
                .filter_map(|c| match c {
                    Call::Log(l) => Some(l.clone()),
                    _ => None,
                })
                .collect()
        }

        pub fn clear_calls(&self) {
            self.state.calls.borrow_mut().clear();
        }

        pub fn callback_count(&self) -> usize {
            self.state.callbacks.borrow().len()
        }

        /// Make `set_icon_state` return `Disconnected` after `n` successful calls.
        pub fn fail_after(&self, n: usize) {
            self.state.fail_after.set(Some(n));
        }

        /// Deliver an event code to every registered callback, in registration order.
        ///
        /// The callback list is detached during delivery so handlers may call
        /// back into the panel. Handlers added during delivery are kept; a
        /// `clear_callbacks` during delivery drops the detached ones.
        pub fn fire(&self, code: i32) -> Result<()> {
            let mut active = std::mem::take(&mut *self.state.callbacks.borrow_mut());
            let cleared_before = self.clear_count();
            let mut result = Ok(());
            for cb in active.iter_mut() {
                if let Err(e) = cb(code) {
                    result = Err(e);
                    break;
                }
            }
            let mut slot = self.state.callbacks.borrow_mut();
            if self.clear_count() == cleared_before {
                let added = std::mem::take(&mut *slot);
                active.extend(added);
                *slot = active;
            }
            result
        }

        fn clear_count(&self) -> usize {
            self.state
                .calls
                .borrow()
                .iter()
                .filter(|c| **c == Call::ClearCallbacks)
                .count()
        }
    }

    impl IconPanel for MockPanel {
        fn set_icon_state(&self, index: usize, on: bool) -> Result<()> {
            check_index(index)?;
            let done = self.state.set_icon_count.get();
            if self.state.fail_after.get().is_some_and(|n| done >= n) {
                return Err(DeviceError::Disconnected);
            }
            self.state.set_icon_count.set(done + 1);
            self.state.calls.borrow_mut().push(Call::SetIcon(index, on));
            Ok(())
        }

        fn clear_callbacks(&self) -> Result<()> {
            self.state.callbacks.borrow_mut().clear();
            self.state.calls.borrow_mut().push(Call::ClearCallbacks);
            Ok(())
        }

        fn add_callback(&self, handler: Callback) -> Result<()> {
            self.state.callbacks.borrow_mut().push(handler);
            self.state.calls.borrow_mut().push(Call::AddCallback);
            Ok(())
        }

        fn log_line(&self, line: &str) {
            self.state
                .calls
                .borrow_mut()
                .push(Call::Log(line.to_string()));
        }
    }
}
