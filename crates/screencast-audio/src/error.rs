//! Audio errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Could not start the playback pump: {0}")]
    PumpSpawn(#[from] std::io::Error),
}
