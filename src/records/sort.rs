//! Comparators for record views

use std::cmp::Ordering;

/// A comparator selected from a screen's fixed set of sort options
pub trait Comparator<R> {
    fn compare(&self, a: &R, b: &R) -> Ordering;
}

/// Numeric ordering that treats NaN as greater than every number
pub fn by_number(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Case-insensitive lexicographic ordering, falling back to exact bytes
pub fn by_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_by_text_ignores_case() {
        assert_eq!(by_text("allison", "Makenna"), Ordering::Less);
        assert_eq!(by_text("Zed", "adam"), Ordering::Greater);
        assert_eq!(by_text("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_by_number() {
        assert_eq!(by_number(1.5, 2.0), Ordering::Less);
        assert_eq!(by_number(440.0, 440.0), Ordering::Equal);
    }
}
