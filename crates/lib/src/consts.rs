//! Names shared across the crate.

pub const APP_NAME: &str = "partwright";

/// Project file holding the part descriptors.
pub const PROJECT_FILENAME: &str = "parts.yaml";

/// Environment variable overriding the project directory.
pub const PROJECT_DIR_ENV: &str = "PARTWRIGHT_PROJECT_DIR";

pub const PARTS_DIRNAME: &str = "parts";
pub const STAGE_DIRNAME: &str = "stage";
pub const PRIME_DIRNAME: &str = "prime";

pub const SOURCE_DIRNAME: &str = "src";
pub const BUILD_DIRNAME: &str = "build";
pub const INSTALL_DIRNAME: &str = "install";

/// Per-part persisted step status.
pub const STATE_FILENAME: &str = "state.json";

pub const LOCK_FILENAME: &str = ".partwright.lock";
