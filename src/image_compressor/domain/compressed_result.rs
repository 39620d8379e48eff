use std::sync::Arc;

use super::file_size::{format_file_size, format_reduction};

/// Output of one compression pass for a specific source and quality.
#[derive(Debug, Clone)]
pub struct CompressedResult {
    pub data: Arc<[u8]>,
    pub original_size: u64,
    /// Quality fraction the bytes were actually produced with.
    pub quality: f32,
    pub used_fallback: bool,
}

impl CompressedResult {
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn is_smaller(&self) -> bool {
        self.size() < self.original_size
    }

    /// e.g. `"512 KB (reduction: 50.0%)"`
    pub fn summary(&self) -> String {
        format!(
            "{} (reduction: {}%)",
            format_file_size(self.size()),
            format_reduction(self.original_size, self.size())
        )
    }
}
