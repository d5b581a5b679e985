pub mod downloads;
pub mod videos;
