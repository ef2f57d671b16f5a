//! Provider layer constants

// ============================================================================
// DOCUMENT STORE CONSTANTS
// ============================================================================

/// Collection holding user documents
pub const USERS_COLLECTION: &str = "users";

/// Insert attempts before the save sentinel is returned
///
/// Manual id allocation races with concurrent writers; each duplicate-key
/// conflict triggers one recompute-and-retry.
pub const MAX_SAVE_ATTEMPTS: u32 = 5;

/// MongoDB server error code for a duplicate key write
pub const DUPLICATE_KEY_CODE: i32 = 11000;

// ============================================================================
// RELATIONAL STORE CONSTANTS
// ============================================================================

/// Table holding user rows
pub const USERS_TABLE: &str = "users";
