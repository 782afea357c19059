/// Renders a byte count with a binary unit suffix.
///
/// Sizes below 1 KB are printed as raw bytes; larger sizes use two decimals.
///
/// # Examples
/// ```
/// use tidemark::utils::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 bytes");
/// assert_eq!(format_bytes(2048), "2.00 KB");
/// assert_eq!(format_bytes(5_242_880), "5.00 MB");
/// assert_eq!(format_bytes(8_796_093_440), "8.19 GB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    match bytes {
        b if b >= GB => format!("{:.2} GB", b as f64 / GB as f64),
        b if b >= MB => format!("{:.2} MB", b as f64 / MB as f64),
        b if b >= KB => format!("{:.2} KB", b as f64 / KB as f64),
        _ => format!("{} bytes", bytes),
    }
}
