//! Recovery mailer providers

mod null;

pub use null::NullMailer;
