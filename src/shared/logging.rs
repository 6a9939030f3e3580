use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn session_log_path(state_root: &Path) -> PathBuf {
    state_root.join("logs/session.log")
}

pub fn append_session_log_line(state_root: &Path, line: &str) -> std::io::Result<()> {
    let path = session_log_path(state_root);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    let stamp = Local::now().format("%Y-%m-%dT%H:%M:%S%z");
    writeln!(file, "{stamp} {line}")
}
