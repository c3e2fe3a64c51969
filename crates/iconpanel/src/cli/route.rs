//! `route` subcommand — show which routine an event code selects.

use iconpanel_lib::dispatch;

use super::{Result, RouteOutput};

pub(super) fn cmd_route(code: i32, json: bool) -> Result<()> {
    let routine = dispatch::route(code);
    if json {
        let output = RouteOutput {
            code,
            routine: routine.to_string(),
        };
        let text = serde_json::to_string_pretty(&output).map_err(std::io::Error::other)?;
        println!("{text}");
        return Ok(());
    }
    println!("{code} -> {routine}");
    Ok(())
}
