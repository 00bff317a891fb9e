use std::io;
use thiserror::Error;

/// things that can go wrong while setting up or running a session
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("bad keyboard mapping: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("load of {len} bytes at {offset:#06X} overruns {size} bytes of core memory")]
    OutOfBounds { offset: u16, len: usize, size: usize },

    #[error("execution core failed: {0}")]
    Core(#[from] CoreError),

    #[error("audio device failed: {0}")]
    Audio(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// a keyboard mapping that can't be latched unambiguously
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("expected 16 key bindings, got {0}")]
    WrongKeyCount(usize),

    #[error("key id {0:#04x} is not in 0x0..=0xf")]
    KeyIdOutOfRange(u8),

    #[error("key id {0:#04x} is bound more than once")]
    DuplicateId(u8),

    #[error("physical key {0:?} is bound more than once")]
    DuplicateKey(char),
}

/// raised by an execution core from one of its entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("{0}")]
    Fault(String),
}
