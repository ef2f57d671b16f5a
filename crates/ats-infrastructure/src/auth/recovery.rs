//! Opaque one-time code generation
//!
//! Codes are random alphanumeric strings. Length and charset are policy
//! of this layer, not of the data layer - the repositories store whatever
//! opaque value they are handed.

use rand::Rng;

use crate::constants::RECOVERY_CODE_LENGTH;

/// Characters used for recovery and resetting codes
const CODE_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random one-time code
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..RECOVERY_CODE_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..CODE_CHARSET.len());
            CODE_CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_length_and_charset() {
        let code = generate_code();
        assert_eq!(code.len(), RECOVERY_CODE_LENGTH);
        assert!(code.bytes().all(|b| CODE_CHARSET.contains(&b)));
    }

    #[test]
    fn test_codes_are_random() {
        assert_ne!(generate_code(), generate_code());
    }
}
