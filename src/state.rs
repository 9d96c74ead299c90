//! Persisted digest sequence state.
//!
//! A small JSON file holds the next unused digest sequence number. It
//! is only advanced after a digest file has been written.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::Result;

#[derive(Debug, Serialize, Deserialize)]
struct StateFile {
    next_sequence: u64,
}

/// Digest sequence state backed by a JSON file.
#[derive(Debug, Clone)]
pub struct DigestState {
    path: PathBuf,
    start_sequence: u64,
}

impl DigestState {
    /// Create a state handle for the given file path.
    ///
    /// `start_sequence` is used when the file does not exist yet.
    pub fn new<P: AsRef<Path>>(path: P, start_sequence: u64) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            start_sequence,
        }
    }

    /// The sequence number the next digest should use.
    ///
    /// A missing state file yields the configured start sequence. A
    /// malformed file is logged and treated as missing.
    pub fn next_sequence(&self) -> u64 {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return self.start_sequence,
        };
        match serde_json::from_str::<StateFile>(&content) {
            Ok(state) => state.next_sequence,
            Err(e) => {
                warn!(
                    "Malformed state file {}: {}; starting from {}",
                    self.path.display(),
                    e,
                    self.start_sequence
                );
                self.start_sequence
            }
        }
    }

    /// Record that `used` was consumed; the next digest gets `used + 1`.
    pub fn advance(&self, used: u64) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let state = StateFile {
            next_sequence: used + 1,
        };
        let json = serde_json::to_string_pretty(&state)
            .expect("state serialization cannot fail");
        fs::write(&self.path, json)?;
        Ok(())
    }
}
