//! Shared defaults.

use std::time::Duration;

/// Items shown per grid cell before the rest is summarized as overflow.
pub const DEFAULT_CELL_LIMIT: usize = 4;

/// Per-call limit for provider subprocesses.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Provider binaries are looked up as `unical-provider-<name>`.
pub const PROVIDER_BINARY_PREFIX: &str = "unical-provider-";
