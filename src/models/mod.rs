pub mod schedule;
pub mod supporter;
