pub mod upload;
pub mod validation;
