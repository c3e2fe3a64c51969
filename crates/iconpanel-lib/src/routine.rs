//! Icon routines — toggle passes, set-all, random flicker.
//!
//! Each routine is a plain function over the device seam and a [`Pacer`].
//! Device failures stop the routine and propagate unmodified.

use rand::Rng;

use crate::device::{ICON_COUNT, IconPanel, Result};
use crate::pacing::{Pacer, Pacing};

/// Number of full passes over the icons in [`toggle`].
pub const TOGGLE_PASSES: usize = 10;

/// Number of random updates in [`set_random`].
pub const RANDOM_STEPS: usize = 50;

/// Sweep all icons `TOGGLE_PASSES` times, alternating off/on per pass.
///
/// The first pass turns every icon off. The pacer runs after each single
/// icon update, not once per pass.
pub fn toggle(panel: &impl IconPanel, pacer: &mut impl Pacer, pacing: &Pacing) -> Result<()> {
    let mut on = false;
    for pass in 0..TOGGLE_PASSES {
        log::debug!("toggle pass {pass}: {}", on_off(on));
        for index in 0..ICON_COUNT {
            panel.set_icon_state(index, on)?;
            pacer.pause(pacing.toggle);
        }
        on = !on;
    }
    Ok(())
}

/// Report the target state on the device log, then set every icon to it.
pub fn set_all(panel: &impl IconPanel, on: bool) -> Result<()> {
    panel.log_line(&format!("Setting all to {}", on_off(on)));
    for index in 0..ICON_COUNT {
        panel.set_icon_state(index, on)?;
    }
    Ok(())
}

/// Apply `RANDOM_STEPS` independent uniform (icon, state) picks.
pub fn set_random(
    panel: &impl IconPanel,
    pacer: &mut impl Pacer,
    pacing: &Pacing,
    rng: &mut impl Rng,
) -> Result<()> {
    for _ in 0..RANDOM_STEPS {
        let index = rng.gen_range(0..ICON_COUNT);
        let on = rng.gen_bool(0.5);
        log::trace!("random: icon {index} -> {}", on_off(on));
        panel.set_icon_state(index, on)?;
        pacer.pause(pacing.random);
    }
    Ok(())
}

fn on_off(on: bool) -> &'static str {
    if on { "on" } else { "off" }
}
