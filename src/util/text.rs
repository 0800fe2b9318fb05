//! Text formatting helpers for user-facing messages

/// Format a count with thousands separators: `1234567` -> `"1,234,567"`
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// "1 row" / "2,500 rows"
pub fn pluralize_rows(n: usize) -> String {
    if n == 1 {
        "1 row".to_string()
    } else {
        format!("{} rows", format_count(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(100000), "100,000");
    }

    #[test]
    fn test_pluralize_rows() {
        assert_eq!(pluralize_rows(1), "1 row");
        assert_eq!(pluralize_rows(0), "0 rows");
        assert_eq!(pluralize_rows(2500), "2,500 rows");
    }
}
