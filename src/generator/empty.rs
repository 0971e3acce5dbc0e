//! Zero-value strategy.

use chrono::{DateTime, Utc};

use super::ValueGenerator;

/// Returns the zero value of every kind and the first enum literal.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyValueGenerator;

impl ValueGenerator for EmptyValueGenerator {
    fn get_string(&self) -> String { String::new() }
    fn get_integer(&self) -> i32 { 0 }
    fn get_long(&self) -> i64 { 0 }
    fn get_double(&self) -> f64 { 0.0 }
    fn get_boolean(&self) -> bool { false }

    /// The Unix epoch.
    fn get_date_time(&self) -> DateTime<Utc> { DateTime::<Utc>::UNIX_EPOCH }

    fn get_enum<'a>(&self, literals: &'a [String]) -> &'a str {
        literals.first().map(String::as_str).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_values() {
        let g = EmptyValueGenerator;
        assert_eq!(g.get_string(), "");
        assert_eq!(g.get_long(), 0);
        assert_eq!(g.get_double(), 0.0);
        assert_eq!(g.get_date_time().timestamp(), 0);
    }

    #[test]
    fn test_first_literal() {
        let literals = vec!["NEW".to_string(), "USED".to_string()];
        assert_eq!(EmptyValueGenerator.get_enum(&literals), "NEW");
    }
}
