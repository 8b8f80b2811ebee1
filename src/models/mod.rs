//! Data models shared between the API and repository layers

pub mod book;
pub mod feedback;
pub mod loan;
pub mod notification;
pub mod user;
