pub mod edit;
pub mod job;
