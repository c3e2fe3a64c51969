//! Event dispatcher — maps an integer event code onto exactly one routine.
//!
//! Codes form an open set: 0, 1 and 2 select specific routines and every
//! other value, negative ones included, selects the random routine. An
//! unrecognized code is valid input, never an error.

use std::fmt;

use rand::Rng;

use crate::device::{Callback, IconPanel, Result};
use crate::pacing::{Pacer, Pacing};
use crate::routine;

/// The routine an event code selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routine {
    Toggle,
    SetAll(bool),
    SetRandom,
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Routine::Toggle => write!(f, "toggle"),
            Routine::SetAll(true) => write!(f, "set all on"),
            Routine::SetAll(false) => write!(f, "set all off"),
            Routine::SetRandom => write!(f, "set random"),
        }
    }
}

/// Which routine `code` selects. Total over `i32`.
pub fn route(code: i32) -> Routine {
    match code {
        0 => Routine::Toggle,
        1 => Routine::SetAll(true),
        2 => Routine::SetAll(false),
        _ => Routine::SetRandom,
    }
}

/// Owns everything the routines need and runs one per event.
pub struct Dispatcher<P, S, R> {
    panel: P,
    pacer: S,
    rng: R,
    pacing: Pacing,
}

impl<P: IconPanel, S: Pacer, R: Rng> Dispatcher<P, S, R> {
    pub fn new(panel: P, pacer: S, rng: R, pacing: Pacing) -> Self {
        Self {
            panel,
            pacer,
            rng,
            pacing,
        }
    }

    /// Log the received code, then run the routine it selects to completion.
    ///
    /// Returns the routine that ran. Device errors propagate unmodified.
    pub fn dispatch(&mut self, code: i32) -> Result<Routine> {
        self.panel.log_line(&format!("Callback: num={code}"));
        let selected = route(code);
        log::debug!("event {code} -> {selected}");
        match selected {
            Routine::Toggle => routine::toggle(&self.panel, &mut self.pacer, &self.pacing)?,
            Routine::SetAll(on) => routine::set_all(&self.panel, on)?,
            Routine::SetRandom => {
                routine::set_random(&self.panel, &mut self.pacer, &self.pacing, &mut self.rng)?
            }
        }
        Ok(selected)
    }

    #[cfg(test)]
    pub(crate) fn pacer(&self) -> &S {
        &self.pacer
    }
}

impl<P, S, R> Dispatcher<P, S, R>
where
    P: IconPanel + 'static,
    S: Pacer + 'static,
    R: Rng + 'static,
{
    /// Wrap the dispatcher as a device callback.
    pub fn into_callback(mut self) -> Callback {
        Box::new(move |code| self.dispatch(code).map(|_| ()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::mock::{Call, MockPanel};
    use crate::pacing::mock::RecordingPacer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dispatcher(panel: &MockPanel) -> Dispatcher<MockPanel, RecordingPacer, StdRng> {
        Dispatcher::new(
            panel.clone(),
            RecordingPacer::new(),
            StdRng::seed_from_u64(99),
            Pacing::default(),
        )
    }

    // ── route ──

    #[test]
    fn route_known_codes() {
        assert_eq!(route(0), Routine::Toggle);
        assert_eq!(route(1), Routine::SetAll(true));
        assert_eq!(route(2), Routine::SetAll(false));
    }

    #[test]
    fn route_everything_else_is_random() {
        for code in [3, 4, 5, 100, -1, i32::MIN, i32::MAX] {
            assert_eq!(route(code), Routine::SetRandom, "code {code}");
        }
    }

    #[test]
    fn routine_display() {
        assert_eq!(Routine::Toggle.to_string(), "toggle");
        assert_eq!(Routine::SetAll(true).to_string(), "set all on");
        assert_eq!(Routine::SetAll(false).to_string(), "set all off");
        assert_eq!(Routine::SetRandom.to_string(), "set random");
    }

    // ── dispatch ──

    #[test]
    fn dispatch_logs_code_first() {
        let panel = MockPanel::new();
        let mut d = dispatcher(&panel);
        d.dispatch(1).unwrap();
        assert_eq!(panel.calls()[0], Call::Log("Callback: num=1".into()));
    }

    #[test]
    fn dispatch_zero_runs_full_toggle() {
        let panel = MockPanel::new();
        let mut d = dispatcher(&panel);
        assert_eq!(d.dispatch(0).unwrap(), Routine::Toggle);
        let calls = panel.icon_calls();
        assert_eq!(calls.len(), 40);
        assert_eq!(calls[0], (0, false));
        assert_eq!(calls[4], (0, true));
        assert_eq!(d.pacer().pauses.len(), 40);
    }

    #[test]
    fn dispatch_one_and_two_set_all() {
        let panel = MockPanel::new();
        let mut d = dispatcher(&panel);
        d.dispatch(1).unwrap();
        assert_eq!(
            panel.icon_calls(),
            vec![(0, true), (1, true), (2, true), (3, true)]
        );
        panel.clear_calls();
        d.dispatch(2).unwrap();
        assert_eq!(
            panel.icon_calls(),
            vec![(0, false), (1, false), (2, false), (3, false)]
        );
        assert!(d.pacer().pauses.is_empty(), "set all has no pacing");
    }

    #[test]
    fn dispatch_unknown_code_runs_random_only() {
        let panel = MockPanel::new();
        let mut d = dispatcher(&panel);
        assert_eq!(d.dispatch(5).unwrap(), Routine::SetRandom);
        assert_eq!(panel.icon_calls().len(), 50);
        // Only the callback line: no "Setting all" status from set_all
        assert_eq!(panel.log_lines(), vec!["Callback: num=5".to_string()]);
    }

    #[test]
    fn dispatch_negative_code_runs_random() {
        let panel = MockPanel::new();
        let mut d = dispatcher(&panel);
        assert_eq!(d.dispatch(-3).unwrap(), Routine::SetRandom);
        assert_eq!(panel.icon_calls().len(), 50);
    }

    #[test]
    fn dispatch_propagates_device_error() {
        let panel = MockPanel::new();
        panel.fail_after(2);
        let mut d = dispatcher(&panel);
        assert!(d.dispatch(1).is_err());
        assert_eq!(panel.icon_calls().len(), 2);
    }

    #[test]
    fn into_callback_dispatches() {
        let panel = MockPanel::new();
        let mut cb = dispatcher(&panel).into_callback();
        cb(2).unwrap();
        assert_eq!(panel.icon_calls().len(), 4);
    }
}
