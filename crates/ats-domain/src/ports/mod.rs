//! Domain port interfaces
//!
//! Ports define the contracts external layers must implement, following
//! the dependency inversion principle: the domain declares the interface,
//! providers and infrastructure supply the implementation.
//!
//! - [`UserRepository`] - persistence boundary, implemented per backend
//! - [`RecoveryMailer`] - outbound recovery-code dispatch collaborator

mod mailer;
mod repository;

pub use mailer::RecoveryMailer;
pub use repository::{UserRepository, SAVE_FAILED};
