//! Asynchronous drive upload pipeline.
//!
//! `Uploader` drives file uploads end to end: read the file, optionally
//! re-encode it client-side, POST it as multipart to the drive API, and
//! report byte-level progress into a shared registry the UI can observe.

pub mod account;
pub mod config;
pub mod error;
pub mod logging;
pub mod notify;
pub mod transcode;
pub mod transport;
pub mod uploader;

pub use error::UploadError;
pub use uploader::{UploadRegistry, Uploader};
