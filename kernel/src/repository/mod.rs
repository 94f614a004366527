pub mod auth;
pub mod booking;
pub mod enrollment;
pub mod health;
pub mod room;
pub mod ticket;

#[cfg(any(test, feature = "test-utils"))]
pub mod in_memory;
