use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

/// Calendar date and generation instant for one unit of synthesis.
///
/// The date drives every seed; `generated_at` only stamps the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisContext {
    pub date: NaiveDate,
    pub generated_at: DateTime<Utc>,
}

impl SynthesisContext {
    /// Current local calendar date, stamped with the current instant
    pub fn now() -> Self {
        Self {
            date: Local::now().date_naive(),
            generated_at: Utc::now(),
        }
    }

    /// Pinned date, stamped at that date's UTC midnight
    pub fn for_date(date: NaiveDate) -> Self {
        Self {
            date,
            generated_at: date.and_time(chrono::NaiveTime::MIN).and_utc(),
        }
    }
}

/// Sum of the symbol's UTF-16 code units
pub fn symbol_code_sum(symbol: &str) -> i64 {
    symbol.encode_utf16().map(i64::from).sum()
}

/// `year*10000 + month*100 + day`
pub fn date_seed(date: NaiveDate) -> i64 {
    date.year() as i64 * 10000 + date.month() as i64 * 100 + date.day() as i64
}

/// Seed for one symbol on one calendar day
pub fn derive_seed(symbol: &str, date: NaiveDate) -> i64 {
    symbol_code_sum(symbol) + date_seed(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_seed() {
        let date = NaiveDate::from_ymd_opt(2025, 10, 17).unwrap();
        assert_eq!(date_seed(date), 20251017);
    }

    #[test]
    fn test_derive_seed_adds_code_sum() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
        // 'T' 84 + 'C' 67 + 'S' 83
        assert_eq!(symbol_code_sum("TCS"), 234);
        assert_eq!(derive_seed("TCS", date), 20250102 + 234);
    }

    #[test]
    fn test_seed_changes_at_date_rollover() {
        let d1 = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_ne!(derive_seed("INFY", d1), derive_seed("INFY", d2));
    }

    #[test]
    fn test_for_date_is_pinned() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 4).unwrap();
        let ctx = SynthesisContext::for_date(date);
        assert_eq!(ctx, SynthesisContext::for_date(date));
        assert_eq!(ctx.generated_at.date_naive(), date);
    }
}
