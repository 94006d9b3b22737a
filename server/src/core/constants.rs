// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "QFilter";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "qfilter";

/// Unix-style dotfile folder name
pub const APP_DOT_FOLDER: &str = ".qfilter";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name
pub const CONFIG_FILE_NAME: &str = "qfilter.json";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "QFILTER_CONFIG";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "QFILTER_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "QFILTER_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "QFILTER_LOG";

// =============================================================================
// Environment Variables - Filters
// =============================================================================

/// Environment variable for the filter error mode (reject or skip)
pub const ENV_ON_ERROR: &str = "QFILTER_ON_ERROR";

/// Environment variable to toggle rejection of unknown operator tokens
pub const ENV_STRICT_OPERATORS: &str = "QFILTER_STRICT_OPERATORS";

/// Environment variable for the maximum number of filters per request
pub const ENV_MAX_FILTERS: &str = "QFILTER_MAX_FILTERS";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 5390;

/// Default request body limit (1 MB)
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Maximum predicates accepted by the render endpoint
pub const MAX_RENDER_PREDICATES: u64 = 500;

/// Seconds in-flight requests get to finish after shutdown is triggered
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;
