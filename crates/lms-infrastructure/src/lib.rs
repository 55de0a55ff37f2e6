//! # LMS Infrastructure
//! 
//! PostgreSQL repositories, the identity provider client, and outbound mail.

pub mod database;
pub mod identity;
pub mod mail;

pub use database::{
    create_pool, run_migrations, PgCourseRepository, PgEnrollmentRepository, PgGroupRepository,
    PgUserRepository,
};
pub use identity::HttpIdentityProvider;
pub use mail::{LogNotifier, SmtpNotifier};
