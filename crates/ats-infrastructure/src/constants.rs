//! Infrastructure layer constants

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "ats.toml";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "ATS";

// ============================================================================
// TOKEN CONSTANTS
// ============================================================================

/// Access token lifetime in seconds (1 hour)
pub const ACCESS_TOKEN_TTL_SECS: i64 = 3600;

/// Refresh token lifetime in months (1 year)
pub const REFRESH_TOKEN_TTL_MONTHS: u32 = 12;

// ============================================================================
// CREDENTIAL CONSTANTS
// ============================================================================

/// bcrypt cost for password hashing
///
/// Tuned to tens of milliseconds per call; the cost is deliberate and must
/// not be reduced for convenience.
pub const BCRYPT_COST: u32 = 12;

/// Length of generated recovery and resetting codes
pub const RECOVERY_CODE_LENGTH: usize = 16;
