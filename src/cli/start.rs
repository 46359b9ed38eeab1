use chrono::{DateTime, FixedOffset};
use colored::Colorize;
use snafu::ResultExt;

use crate::cli::util::{open_config, system_clock};
use crate::clock::Clock;
use crate::config::ConfigStore;
use crate::error::logit_error::ConfigSnafu;
use crate::error::Result;

pub fn run() -> Result<()> {
    let mut config = open_config()?;
    start_timer(&mut config, &system_clock())?;
    println!("{}", "Started to measure time.".green());
    Ok(())
}

/// Save "now" as the snapshot later `log` calls measure from.
pub fn start_timer(
    config: &mut dyn ConfigStore,
    clock: &dyn Clock,
) -> Result<DateTime<FixedOffset>> {
    let now = clock.now();
    config.set_snapshot(now).context(ConfigSnafu)?;
    tracing::debug!(snapshot = %now, "snapshot saved");
    Ok(now)
}
