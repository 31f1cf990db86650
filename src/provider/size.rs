/// Render a byte count as a human-readable binary-unit string.
///
/// Sizes below 1024 are reported in bytes; everything above uses 1024-based
/// units with one decimal digit (`"1.5 KB"`, `"2.0 MB"`). Index entries
/// carry this string instead of a raw count, so the exact format is part of
/// the output contract.
pub fn format_size(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }
    let exp = ((bytes as f64).ln() / (UNIT as f64).ln()) as u32;
    let prefix = char::from(b"KMGTPE"[(exp - 1) as usize]);
    format!("{:.1} {}B", bytes as f64 / (UNIT as f64).powi(exp as i32), prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_below_one_kilobyte_are_plain() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(1), "1 B");
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn binary_unit_boundaries() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1.0 MB");
        assert_eq!(format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn rounding_keeps_one_decimal() {
        assert_eq!(format_size(1126), "1.1 KB");
        assert_eq!(format_size(10 * 1024 * 1024 + 512 * 1024), "10.5 MB");
    }
}
