pub mod exception;
pub mod result;
