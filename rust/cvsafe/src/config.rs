//! Process-wide settings of the wrapper layer.

use std::sync::OnceLock;

use cvsafe_common::{Result, error::Error, verify_arg};

/// Default upper bound on the number of elements accepted by
/// [`Sequence::from_slice`](crate::Sequence::from_slice).
pub const DEFAULT_MAX_SEQUENCE_LEN: usize = 1 << 28;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Largest slice a sequence may be built from.
    pub max_sequence_len: usize,

    /// Emit `trace` records whenever an owned native handle is acquired or released.
    pub trace_handles: bool,

    /// Re-query the native length right after bulk construction and fail with
    /// `SizeMismatch` if it differs from the supplied slice.
    pub verify_sequence_construction: bool,
}

static DEFAULT_CONFIG: BridgeConfig = BridgeConfig {
    max_sequence_len: DEFAULT_MAX_SEQUENCE_LEN,
    trace_handles: false,
    verify_sequence_construction: true,
};

static INSTALLED: OnceLock<BridgeConfig> = OnceLock::new();

impl Default for BridgeConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl BridgeConfig {
    /// Creates a fully specified configuration, validating it first.
    pub fn with_all_parameters(
        max_sequence_len: usize,
        trace_handles: bool,
        verify_sequence_construction: bool,
    ) -> Result<Self> {
        let config = Self {
            max_sequence_len,
            trace_handles,
            verify_sequence_construction,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(max_sequence_len, self.max_sequence_len > 0);
        verify_arg!(
            max_sequence_len,
            self.max_sequence_len <= isize::MAX as usize
        );
        Ok(())
    }
}

/// Installs the process-wide configuration.
///
/// Can succeed only once; later calls fail with `InvalidOperation` and leave the
/// installed configuration untouched.
pub fn install(config: BridgeConfig) -> Result<()> {
    config.validate()?;
    INSTALLED
        .set(config)
        .map_err(|_| Error::invalid_operation("config::install: configuration already installed"))
}

/// Returns the installed configuration, or the defaults if none was installed.
pub fn current() -> &'static BridgeConfig {
    INSTALLED.get().unwrap_or(&DEFAULT_CONFIG)
}
