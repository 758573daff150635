//! File sink for the fmt layer.

use std::fs::{File, OpenOptions};
use std::sync::Mutex;

use super::config::FileConfig;
use super::error::LoggerError;

/// Opens the configured log file, creating parent directories as needed
///
/// The returned `Mutex<File>` is a `MakeWriter`, so concurrent events are
/// written whole.
pub(crate) fn open_log_file(config: &FileConfig) -> Result<Mutex<File>, LoggerError> {
    let open_err = |source| LoggerError::OpenFile {
        path: config.path.clone(),
        source,
    };

    if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(open_err)?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if config.append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }

    let file = options.open(&config.path).map_err(open_err)?;
    Ok(Mutex::new(file))
}
