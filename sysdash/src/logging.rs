//! File logging. The terminal belongs to the TUI, so tracing output goes to
//! $XDG_STATE_HOME/sysdash/sysdash.log (fallback: the local data dir).

use std::{
    fs::{self, OpenOptions},
    io,
    path::PathBuf,
    sync::Mutex,
};

use tracing_subscriber::EnvFilter;

/// Filter directives, e.g. `SYSDASH_LOG=sysdash=debug`.
pub const LOG_ENV: &str = "SYSDASH_LOG";

pub fn log_path() -> PathBuf {
    let base = std::env::var_os("XDG_STATE_HOME")
        .map(PathBuf::from)
        .or_else(dirs_next::data_local_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("sysdash").join("sysdash.log")
}

/// Install the global subscriber. Returns where logs are written.
pub fn init() -> io::Result<PathBuf> {
    let path = log_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    Ok(path)
}
