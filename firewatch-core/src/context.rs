use chrono::Local;
use std::path::PathBuf;

/// Wall-clock stamp format used for every journal line of one invocation.
const STAMP_FORMAT: &str = "%a %b %d %H:%M:%S %Z %Y";

/// Per-invocation state, built once at process start and passed explicitly.
/// Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Verbose diagnostics requested on the command line.
    pub debug: bool,
    /// Process-start wall-clock time; all journal lines of the run carry
    /// this same stamp.
    pub started: String,
    /// Where journal lines are appended.
    pub log_path: PathBuf,
}

impl RunContext {
    pub fn new(debug: bool) -> Self {
        Self::with_log_path(debug, default_log_path())
    }

    pub fn with_log_path(debug: bool, log_path: PathBuf) -> Self {
        Self {
            debug,
            started: Local::now().format(STAMP_FORMAT).to_string(),
            log_path,
        }
    }
}

/// Journal location: `logs/integrations.log` under the installation root,
/// the parent of the directory holding the executable. Falls back to the
/// current directory when the executable path cannot be resolved.
pub fn default_log_path() -> PathBuf {
    let root = std::env::current_exe()
        .ok()
        .and_then(|exe| {
            exe.parent()
                .and_then(|bin_dir| bin_dir.parent())
                .map(|root| root.to_path_buf())
        })
        .unwrap_or_else(|| PathBuf::from("."));
    root.join("logs").join("integrations.log")
}
