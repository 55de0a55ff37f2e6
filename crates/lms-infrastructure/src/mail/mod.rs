//! Outbound mail

pub mod smtp_notifier;

pub use smtp_notifier::{LogNotifier, SmtpNotifier};
