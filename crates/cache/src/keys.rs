use chrono::NaiveDate;

/// Matches every cached performance-query result.
pub const PERFORMANCE_PATTERN: &str = "index:performance:*";

/// Matches every cached composition-changes result.
pub const CHANGES_PATTERN: &str = "index:changes:*";

/// Cache key for a performance query over `[start, end]`.
pub fn performance_key(start: NaiveDate, end: NaiveDate) -> String {
    format!("index:performance:{start}:{end}")
}

/// Cache key for a single date's composition.
pub fn composition_key(date: NaiveDate) -> String {
    format!("index:composition:{date}")
}

/// Cache key for a composition-changes query over `[start, end]`.
pub fn changes_key(start: NaiveDate, end: NaiveDate) -> String {
    format!("index:changes:{start}:{end}")
}
