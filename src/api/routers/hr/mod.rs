pub mod contracts;
pub mod roles;
