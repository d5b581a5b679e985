pub mod store;
pub mod transcoder;
pub mod upload;
