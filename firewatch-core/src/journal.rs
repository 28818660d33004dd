use crate::context::RunContext;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::warn;

/// Append one self-contained, newline-terminated line to the journal.
///
/// The file is opened, appended, and closed per line; concurrent
/// invocations may interleave lines. A journal write failure must never
/// mask the run's primary outcome, so it is reported through tracing only.
pub fn record(ctx: &RunContext, line: &str) {
    if let Err(e) = append_line(ctx, line) {
        warn!(
            "Failed to append journal line to {}: {}",
            ctx.log_path.display(),
            e
        );
    }
}

/// Journal a diagnostic message, prefixed with the run's start stamp.
/// Only active in verbose mode; diagnostics are also echoed to stdout.
pub fn diagnostic(ctx: &RunContext, msg: &str) {
    if !ctx.debug {
        return;
    }
    let line = format!("{}: {}", ctx.started, msg);
    println!("{}", line);
    record(ctx, &line);
}

fn append_line(ctx: &RunContext, line: &str) -> std::io::Result<()> {
    if let Some(parent) = ctx.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&ctx.log_path)?;
    writeln!(file, "{}", line)
}
