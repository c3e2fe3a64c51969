//! `run` subcommand — bootstrap the dispatcher on a terminal panel and feed it events.

use std::io::BufRead;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use iconpanel_lib::bootstrap;
use iconpanel_lib::device::IconPanel;
use iconpanel_lib::dispatch::Dispatcher;
use iconpanel_lib::pacing::{Pacing, ThreadPacer};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{Config, RUNNING, Result, TerminalPanel};

/// How often the prompt loop checks the shutdown flag while waiting for input.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// One line of interactive input.
#[derive(Debug, PartialEq)]
pub(super) enum InputLine {
    Code(i32),
    Quit,
    Blank,
    Invalid(String),
}

pub(super) fn parse_line(line: &str) -> InputLine {
    let line = line.trim();
    if line.is_empty() {
        return InputLine::Blank;
    }
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return InputLine::Quit;
    }
    match line.parse::<i32>() {
        Ok(code) => InputLine::Code(code),
        Err(_) => InputLine::Invalid(line.to_string()),
    }
}

pub(super) fn cmd_run(
    config: &Config,
    events: Option<Vec<i32>>,
    fast: bool,
    seed: Option<u64>,
) -> Result<()> {
    config.check()?;
    let pacing = if fast {
        Pacing::none()
    } else {
        Pacing::from_config(config)
    };
    let rng = match seed.or(config.seed) {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let panel = TerminalPanel::new(config.show_icons);
    let dispatcher = Dispatcher::new(panel.clone(), ThreadPacer, rng, pacing);
    bootstrap::install(&panel, dispatcher)?;

    match events {
        Some(codes) => {
            for code in codes {
                if !RUNNING.load(Ordering::SeqCst) {
                    break;
                }
                press_and_drain(&panel, code);
            }
        }
        None => {
            println!("Enter event codes (0 toggle, 1 all on, 2 all off, other random), q to quit");
            let lines = spawn_stdin_reader();
            while RUNNING.load(Ordering::SeqCst) {
                let line = match lines.recv_timeout(INPUT_POLL) {
                    Ok(line) => line?,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => break,
                };
                match parse_line(&line) {
                    InputLine::Code(code) => press_and_drain(&panel, code),
                    InputLine::Quit => break,
                    InputLine::Blank => {}
                    InputLine::Invalid(s) => log::warn!("not an event code: {s:?}"),
                }
            }
            if !RUNNING.load(Ordering::SeqCst) {
                log::info!("interrupted, exiting");
            }
        }
    }
    Ok(())
}

/// Read stdin lines on a detached thread so the prompt loop can notice Ctrl+C
/// while no input arrives. The channel closes at EOF or after a read error.
fn spawn_stdin_reader() -> mpsc::Receiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

/// Queue one press and deliver everything pending. Handler failures are
/// reported on the panel's log output and on the error log.
fn press_and_drain(panel: &TerminalPanel, code: i32) {
    panel.press(code);
    log::debug!("{} event(s) queued", panel.pending());
    while let Some((code, result)) = panel.deliver_next() {
        if let Err(e) = result {
            panel.log_line(&format!("EXCEPTION: {e}"));
            log::error!("event {code} failed: {e}");
        }
    }
}
