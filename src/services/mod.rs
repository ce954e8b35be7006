pub mod aspect;
pub mod bfl;
pub mod session;
pub mod transport;
