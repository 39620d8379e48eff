pub mod batch;
pub mod config;
pub mod console;
pub mod error;
pub mod file_storage;
pub mod image_compressor;
pub mod object_url;
