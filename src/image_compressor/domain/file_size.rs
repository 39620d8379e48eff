const UNIT: f64 = 1024.0;
const SIZES: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human readable size with at most two decimals and no trailing zeros,
/// e.g. `1536` -> `"1.5 KB"`. Anything past gigabytes stays in GB.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= UNIT && unit < SIZES.len() - 1 {
        value /= UNIT;
        unit += 1;
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZES[unit])
}

/// Size reduction in percent, one decimal. An empty original reports no reduction.
pub fn format_reduction(original: u64, compressed: u64) -> String {
    let ratio = if original == 0 {
        0.0
    } else {
        (1.0 - compressed as f64 / original as f64) * 100.0
    };
    format!("{:.1}", ratio)
}
