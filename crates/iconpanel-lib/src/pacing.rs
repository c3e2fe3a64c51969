//! Pacing delays between icon updates.

use std::time::Duration;

use crate::config::Config;

/// Delay after each icon update in the toggle routine.
pub const TOGGLE_DELAY: Duration = Duration::from_millis(200);

/// Delay after each icon update in the random routine.
pub const RANDOM_DELAY: Duration = Duration::from_millis(100);

/// Blocking pause between state-changing calls.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Sleeps the calling thread for the full delay.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Per-routine pacing delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub toggle: Duration,
    pub random: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Pacing {
            toggle: TOGGLE_DELAY,
            random: RANDOM_DELAY,
        }
    }
}

impl Pacing {
    /// No delays at all (tests, `--fast`).
    pub fn none() -> Self {
        Pacing {
            toggle: Duration::ZERO,
            random: Duration::ZERO,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Pacing {
            toggle: Duration::from_millis(config.toggle_delay_ms),
            random: Duration::from_millis(config.random_delay_ms),
        }
    }
}

/// Recording pacer for tests.
#[doc(hidden)]
pub mod mock {
    use super::*;

    /// Records every requested delay instead of sleeping.
    #[derive(Debug, Default)]
    pub struct RecordingPacer {
        pub pauses: Vec<Duration>,
    }

    impl RecordingPacer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn total(&self) -> Duration {
            self.pauses.iter().sum()
        }
    }

    impl Pacer for RecordingPacer {
        fn pause(&mut self, delay: Duration) {
            self.pauses.push(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn default_pacing_matches_constants() {
        let p = Pacing::default();
        assert_eq!(p.toggle, Duration::from_millis(200));
        assert_eq!(p.random, Duration::from_millis(100));
    }

    #[test]
    fn pacing_from_config() {
        let config = Config {
            toggle_delay_ms: 5,
            random_delay_ms: 7,
            ..Config::default()
        };
        let p = Pacing::from_config(&config);
        assert_eq!(p.toggle, Duration::from_millis(5));
        assert_eq!(p.random, Duration::from_millis(7));
    }

    #[test]
    fn default_config_gives_default_pacing() {
        assert_eq!(Pacing::from_config(&Config::default()), Pacing::default());
    }

    #[test]
    fn thread_pacer_blocks() {
        let start = Instant::now();
        ThreadPacer.pause(Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn recording_pacer_sums() {
        let mut p = mock::RecordingPacer::new();
        p.pause(Duration::from_millis(100));
        p.pause(Duration::from_millis(200));
        assert_eq!(p.total(), Duration::from_millis(300));
    }
}
