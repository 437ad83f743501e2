//! Display formatting for sizes, numbers and resource names

const KB: u64 = 1024;
const MB: u64 = KB * 1024;
const GB: u64 = MB * 1024;

/// Longest label produced by [`filename_label`]
pub const MAX_LABEL_CHARS: usize = 60;

/// Format a byte count with the largest unit it reaches (`2048` → `2 KB`)
///
/// Thresholds are inclusive: exactly 1024 bytes is `1 KB`, not `1,024 B`.
pub fn format_bytes(bytes: u64) -> String {
    let units = [(GB, "GB"), (MB, "MB"), (KB, "KB")];

    for (threshold, unit) in units {
        if bytes >= threshold {
            return format!("{} {}", format_number(bytes as f64 / threshold as f64), unit);
        }
    }

    format!("{} B", format_number(bytes as f64))
}

/// Format a number with `,` grouping and at most two fraction digits
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }

    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let mut out = String::new();
    if value < 0.0 && cents > 0 {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));

    if fraction != 0 {
        if fraction % 10 == 0 {
            out.push_str(&format!(".{}", fraction / 10));
        } else {
            out.push_str(&format!(".{:02}", fraction));
        }
    }
    out
}

/// Milliseconds for display (`1234.5` → `1,234.5 ms`)
pub fn format_ms(ms: f64) -> String {
    format!("{} ms", format_number(ms))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Short name for a request URL
///
/// Query and fragment are dropped; the last path segment is used, or the one
/// before it when the URL ends in `/`.
pub fn filename_label(url: &str) -> String {
    let stripped = url
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();

    let segments: Vec<&str> = stripped.split('/').collect();
    let name = match segments.as_slice() {
        [.., prev, last] if last.is_empty() && !prev.is_empty() => *prev,
        [.., last] if !last.is_empty() => *last,
        _ => stripped,
    };

    name.chars().take(MAX_LABEL_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(2048), "2 KB");
        assert_eq!(format_bytes(500), "500 B");
        assert_eq!(format_bytes(1_572_864), "1.5 MB");
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1024), "1 KB");
        assert_eq!(format_bytes(1023), "1,023 B");
        assert_eq!(format_bytes(3 * GB), "3 GB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.0), "1,234,567");
        assert_eq!(format_number(1.25), "1.25");
        assert_eq!(format_number(1.2), "1.2");
        assert_eq!(format_number(0.004), "0");
        assert_eq!(format_number(-1500.5), "-1,500.5");
        assert_eq!(format_number(f64::NAN), "0");
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(1234.5), "1,234.5 ms");
    }

    #[test]
    fn test_filename_label() {
        assert_eq!(filename_label("https://a.test/js/app.js?v=3"), "app.js");
        assert_eq!(filename_label("https://a.test/docs/"), "docs");
        assert_eq!(filename_label("https://example.com/"), "example.com");
        assert_eq!(filename_label("https://a.test/img.png#frag"), "img.png");
        assert_eq!(filename_label("data"), "data");
    }

    #[test]
    fn test_filename_label_truncates() {
        let long = format!("https://a.test/{}.js", "x".repeat(100));
        let label = filename_label(&long);
        assert_eq!(label.chars().count(), MAX_LABEL_CHARS);
        assert!(label.starts_with("xxx"));
    }
}
