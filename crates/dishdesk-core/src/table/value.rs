//! Cell values and the comparison/matching rules the row processor applies to them.

use std::cmp::Ordering;
use std::fmt;

/// Placeholder shown for empty cells.
pub const EMPTY_PLACEHOLDER: &str = "-";

/// A single displayable cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Pre-rendered content (badges, composed labels). Displayed as-is but never
    /// stringified for search or filtering, so it always matches.
    Rendered(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn rendered(value: impl Into<String>) -> Self {
        CellValue::Rendered(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, CellValue::Rendered(_))
    }

    /// Whether this value, used as a filter, means "no filter".
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// String coercion used by search and filter comparison.
    ///
    /// Returns `None` for pre-rendered content.
    pub fn coerce_string(&self) -> Option<String> {
        match self {
            CellValue::Null => Some(String::new()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(format_float(*f)),
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Rendered(_) => None,
        }
    }

    /// Case-insensitive substring search. `needle_lower` must already be lowercase.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        match self.coerce_string() {
            Some(s) => s.to_lowercase().contains(needle_lower),
            None => true,
        }
    }

    /// Filter match: text against text is a case-insensitive substring test,
    /// every other pairing compares the coerced strings for equality.
    pub fn matches_filter(&self, filter: &CellValue) -> bool {
        match (self, filter) {
            (CellValue::Rendered(_), _) | (_, CellValue::Rendered(_)) => true,
            (CellValue::Text(cell), CellValue::Text(wanted)) => {
                cell.to_lowercase().contains(&wanted.to_lowercase())
            }
            _ => self.coerce_string() == filter.coerce_string(),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Text(_) => 3,
            CellValue::Rendered(_) => 4,
        }
    }

    /// Total order used for sorting.
    ///
    /// Values of the same kind use their natural ordering (numbers compare
    /// numerically across `Int`/`Float`). Mixed kinds order as
    /// null < bool < number < text < rendered.
    pub fn sort_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Int(a), CellValue::Float(b)) => (*a as f64).total_cmp(b),
            (CellValue::Float(a), CellValue::Int(b)) => a.total_cmp(&(*b as f64)),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Rendered(a), CellValue::Rendered(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Integral floats print without a fractional part (`12.0` -> `12`).
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str(EMPTY_PLACEHOLDER),
            CellValue::Bool(b) => write!(f, "{}", if *b { "Yes" } else { "No" }),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => f.write_str(&format_float(*v)),
            CellValue::Text(s) if s.is_empty() => f.write_str(EMPTY_PLACEHOLDER),
            CellValue::Text(s) | CellValue::Rendered(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(i64::from(value))
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_case_insensitive() {
        let value = CellValue::text("Margherita Pizza");
        assert!(value.matches_search("pizza"));
        assert!(value.matches_search("rita p"));
        assert!(!value.matches_search("burger"));
    }

    #[test]
    fn test_rendered_always_matches() {
        let value = CellValue::rendered("[PAID]");
        assert!(value.matches_search("anything"));
        assert!(value.matches_filter(&CellValue::text("nope")));
    }

    #[test]
    fn test_filter_text_uses_contains() {
        let value = CellValue::text("Delivered");
        assert!(value.matches_filter(&CellValue::text("deliv")));
        assert!(!value.matches_filter(&CellValue::text("pending")));
    }

    #[test]
    fn test_filter_non_text_uses_equality() {
        assert!(CellValue::Int(12).matches_filter(&CellValue::text("12")));
        assert!(!CellValue::Int(12).matches_filter(&CellValue::text("1")));
        assert!(CellValue::Float(12.0).matches_filter(&CellValue::Int(12)));
        assert!(CellValue::Bool(true).matches_filter(&CellValue::text("true")));
    }

    #[test]
    fn test_blank_filters() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::text("").is_blank());
        assert!(!CellValue::Int(0).is_blank());
    }

    #[test]
    fn test_sort_cmp_numbers_across_kinds() {
        assert_eq!(CellValue::Int(3).sort_cmp(&CellValue::Float(2.5)), Ordering::Greater);
        assert_eq!(CellValue::Float(2.0).sort_cmp(&CellValue::Int(2)), Ordering::Equal);
    }

    #[test]
    fn test_sort_cmp_mixed_kinds_is_total() {
        assert_eq!(CellValue::Null.sort_cmp(&CellValue::Int(0)), Ordering::Less);
        assert_eq!(CellValue::text("a").sort_cmp(&CellValue::Int(99)), Ordering::Greater);
    }

    #[test]
    fn test_display_placeholder() {
        assert_eq!(CellValue::Null.to_string(), "-");
        assert_eq!(CellValue::text("").to_string(), "-");
        assert_eq!(CellValue::Float(9.5).to_string(), "9.5");
        assert_eq!(CellValue::Float(10.0).to_string(), "10");
    }
}
