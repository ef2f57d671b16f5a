//! Error handling types
//!
//! Every service-level failure is represented as a message plus an HTTP-style
//! status class so the transport layer can map it mechanically. Backend
//! "not found" is never an error: lookups return `Ok(None)` and business
//! logic branches on the absence explicitly.

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Auth Token Service
#[derive(Error, Debug)]
pub enum Error {
    /// Request is well-formed but semantically invalid (duplicate username,
    /// bad update payload, malformed token on a public query)
    #[error("{message}")]
    Validation {
        /// Description of the validation failure
        message: String,
    },

    /// Token is missing, invalid, or its subject does not match the target
    #[error("{message}")]
    Unauthorized {
        /// Description of the authorization failure
        message: String,
    },

    /// Authentication failed (bad credentials, or an unresolvable subject
    /// during token issuance)
    #[error("{message}")]
    Forbidden {
        /// Description of the authentication failure
        message: String,
    },

    /// A referenced entity does not exist
    #[error("{resource} does not exist")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Database-related error (connectivity, query failure, decode failure)
    #[error("Database error: {message}")]
    Database {
        /// Description of the database error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Signing key material could not be read or parsed
    #[error("Key material error: {message}")]
    KeyMaterial {
        /// Description of the key material error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Password hashing or verification failed
    #[error("Password hashing error: {message}")]
    PasswordHash {
        /// Description of the hashing error
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

impl Error {
    /// Create a validation error (400)
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an unauthorized error (401)
    pub fn unauthorized<S: Into<String>>(message: S) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a forbidden error (403)
    pub fn forbidden<S: Into<String>>(message: S) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a not found error (404)
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a database error (500)
    pub fn database<S: Into<String>>(message: S) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// Create a database error with source (500)
    pub fn database_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Database {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a key material error (500)
    pub fn key_material<S: Into<String>>(message: S) -> Self {
        Self::KeyMaterial {
            message: message.into(),
            source: None,
        }
    }

    /// Create a key material error with source (500)
    pub fn key_material_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::KeyMaterial {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a password hashing error (500)
    pub fn password_hash<S: Into<String>>(message: S) -> Self {
        Self::PasswordHash {
            message: message.into(),
        }
    }

    /// Create a configuration error (500)
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error (500)
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status class this error maps to at the transport boundary
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Database { .. }
            | Self::KeyMaterial { .. }
            | Self::PasswordHash { .. }
            | Self::Config { .. }
            | Self::Internal { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        assert_eq!(Error::validation("bad payload").status(), 400);
        assert_eq!(Error::unauthorized("invalid token").status(), 401);
        assert_eq!(Error::forbidden("bad credentials").status(), 403);
        assert_eq!(Error::not_found("User").status(), 404);
        assert_eq!(Error::database("timeout").status(), 500);
        assert_eq!(Error::key_material("missing pem").status(), 500);
        assert_eq!(Error::internal("oops").status(), 500);
    }

    #[test]
    fn test_not_found_message() {
        let err = Error::not_found("User");
        assert_eq!(err.to_string(), "User does not exist");
    }

    #[test]
    fn test_database_error_keeps_backend_text() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "socket timed out");
        let err = Error::database_with_source("connection lost", io);
        assert!(err.to_string().contains("connection lost"));
        assert_eq!(err.status(), 500);
    }
}
