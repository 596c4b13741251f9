// LogcatLens - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogcatLens";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "LogcatLens";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Line classification
// =============================================================================

/// Prefix of the banner lines logcat prints between buffers
/// (e.g. `--------- beginning of system`).
pub const LOGCAT_BANNER_PREFIX: &str = "---------";

/// Prefix of the comment header lines written by the save format.
pub const COMMENT_PREFIX: &str = "#";

/// Every prefix that marks a line as a header/separator rather than a record.
pub const HEADER_MARKERS: &[&str] = &[LOGCAT_BANNER_PREFIX, COMMENT_PREFIX];

// =============================================================================
// Save format placeholders
// =============================================================================

/// Date written when a record carries no date.
pub const PLACEHOLDER_DATE: &str = "01-01";

/// Time written when a record carries no time.
pub const PLACEHOLDER_TIME: &str = "00:00:00.000";

/// Value written (right-aligned) for an empty PID or TID.
pub const PLACEHOLDER_ID: &str = "?";

/// Tag written when a record carries an empty tag.
pub const PLACEHOLDER_TAG: &str = "Unknown";

/// Column width PID and TID are right-aligned to.
pub const ID_COLUMN_WIDTH: usize = 5;

// =============================================================================
// Filter history
// =============================================================================

/// Default number of entries remembered per filter field.
pub const DEFAULT_HISTORY_SIZE: usize = 50;

/// Smallest configurable history size.
pub const MIN_HISTORY_SIZE: usize = 1;

/// Largest configurable history size.
pub const MAX_HISTORY_SIZE: usize = 500;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a log line included in debug output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Extension appended to the destination path while a save is in flight.
pub const SAVE_TEMP_EXTENSION: &str = "tmp";
