//! Outbound ports other than storage

pub mod identity_provider;
pub mod notifier;

pub use identity_provider::IdentityProvider;
pub use notifier::Notifier;

#[cfg(any(test, feature = "test-support"))]
pub use identity_provider::MockIdentityProvider;
#[cfg(any(test, feature = "test-support"))]
pub use notifier::MockNotifier;
