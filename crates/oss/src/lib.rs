pub mod auth;
pub mod bucket;
pub mod client;
pub mod options;

pub use bucket::{Bucket, ObjectBody};
pub use client::{Client, Config};
pub use options::PutOption;
