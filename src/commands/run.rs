use anyhow::Result;

use crate::commands::{CommandReport, fetch, render};

/// The scheduled-job entry point: fetch then render. The render half
/// runs even when fetch reported issues so an older history still gets
/// published.
pub fn run() -> Result<CommandReport> {
    let mut report = CommandReport::new("run");
    report.merge(fetch::run()?);
    report.merge(render::run()?);
    Ok(report)
}
