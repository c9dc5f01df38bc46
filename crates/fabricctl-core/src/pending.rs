// ── Pending-config report ──
//
// Renders the controller's config-preview response into the text file a
// reviewer reads before deploy: one block per switch, each closed by a
// delimiter line.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use fabricctl_api::types::PendingSwitchConfig;

use crate::error::CoreError;

pub const DELIMITER_WIDTH: usize = 80;
const NOTHING_PENDING: &str = "(no pending configuration)";

pub fn render(pending: &[PendingSwitchConfig]) -> String {
    let delimiter = "=".repeat(DELIMITER_WIDTH);
    let mut out = String::new();
    for switch in pending {
        let hostname = switch
            .switch_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&switch.switch_id);
        let _ = writeln!(out, "{hostname} ({})", switch.switch_id);
        let lines = switch.pending_config.lines();
        if lines.is_empty() {
            out.push_str(NOTHING_PENDING);
            out.push('\n');
        }
        for line in lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str(&delimiter);
        out.push('\n');
    }
    out
}

/// Pending line count across all switches.
pub fn line_count(pending: &[PendingSwitchConfig]) -> usize {
    pending.iter().map(|s| s.pending_config.lines().len()).sum()
}

pub fn write(path: &Path, pending: &[PendingSwitchConfig]) -> Result<(), CoreError> {
    fs::write(path, render(pending)).map_err(|source| CoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
