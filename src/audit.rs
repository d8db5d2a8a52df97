//! Append-only log of successfully updated issues.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::error;

/// Appends one `Updated Issue: {key}` line. Logging failures are reported
/// but never fail the update that triggered them.
pub fn record_update(path: &Path, issue_key: &str) {
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| writeln!(file, "Updated Issue: {issue_key}"));
    if let Err(err) = result {
        error!("Failed to append to updated-issues log: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::record_update;
    use tempfile::tempdir;

    #[test]
    fn appends_one_line_per_update() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("updated_issues.log");

        record_update(&path, "PROJ-1");
        record_update(&path, "PROJ-2");

        let content = std::fs::read_to_string(&path).expect("log content");
        assert_eq!(content, "Updated Issue: PROJ-1\nUpdated Issue: PROJ-2\n");
    }
}
