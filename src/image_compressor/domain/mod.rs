pub mod compressed_result;
pub mod compression_options;
pub mod compressor_trait;
pub mod error;
pub mod file_size;
pub mod quality;
pub mod source_image;
