//! HTTP handlers

pub mod health;
pub mod profile;
pub mod users;
pub mod groups;
pub mod courses;
pub mod search;
pub mod enrollments;
pub mod dashboard;
