//! # LMS Security
//! 
//! Verification of bearer tokens issued by the external identity provider.

pub mod jwt;

pub use jwt::{Claims, TokenError, TokenVerifier};
