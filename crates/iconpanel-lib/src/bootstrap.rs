//! Startup wiring — make the dispatcher the device's only event handler.

use rand::Rng;

use crate::device::{IconPanel, Result};
use crate::dispatch::Dispatcher;
use crate::pacing::Pacer;

/// Clear any previously registered callbacks, then register `dispatcher`.
///
/// Call once at startup, before the device can deliver events.
pub fn install<D, P, S, R>(device: &D, dispatcher: Dispatcher<P, S, R>) -> Result<()>
where
    D: IconPanel,
    P: IconPanel + 'static,
    S: Pacer + 'static,
    R: Rng + 'static,
{
    device.clear_callbacks()?;
    device.add_callback(dispatcher.into_callback())?;
    log::debug!("dispatcher registered");
    Ok(())
}
