//! Common types used throughout the Faro workspace.

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// An entity identifier, typically a ticker symbol like "AAPL".
pub type Ticker = String;

/// Days between 0001-01-01 (CE) and 1970-01-01, the epoch of polars `Date`.
pub const CE_TO_UNIX_EPOCH_DAYS: i32 = 719_163;

/// Canonical column names of the long-format panel.
pub mod columns {
    /// Trading date.
    pub const DATE: &str = "date";
    /// Entity identifier.
    pub const TICKER: &str = "ticker";
    /// Opening price.
    pub const OPEN: &str = "open";
    /// Session high.
    pub const HIGH: &str = "high";
    /// Session low.
    pub const LOW: &str = "low";
    /// Raw closing price.
    pub const CLOSE: &str = "close";
    /// Split/dividend adjusted close.
    pub const ADJ_CLOSE: &str = "adj_close";
    /// Traded share volume.
    pub const VOLUME: &str = "volume";
    /// One-day trailing return of the canonical price.
    pub const RET_1D: &str = "ret_1d";
}

/// Name of the forward-return label column for a horizon of `h` days.
pub fn fwd_ret_column(h: usize) -> String {
    format!("fwd_ret_{h}d")
}

/// Convert a polars `Date` physical value (days since the Unix epoch).
pub fn date_from_epoch_days(days: i32) -> Option<Date> {
    Date::from_num_days_from_ce_opt(days + CE_TO_UNIX_EPOCH_DAYS)
}

/// Convert a date to its polars `Date` physical value.
pub fn date_to_epoch_days(date: Date) -> i32 {
    use chrono::Datelike;
    date.num_days_from_ce() - CE_TO_UNIX_EPOCH_DAYS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fwd_ret_column() {
        assert_eq!(fwd_ret_column(5), "fwd_ret_5d");
        assert_eq!(fwd_ret_column(20), "fwd_ret_20d");
    }

    #[test]
    fn test_epoch_days_roundtrip() {
        let epoch = Date::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_epoch_days(epoch), 0);
        assert_eq!(date_from_epoch_days(0), Some(epoch));

        let date = Date::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(date_from_epoch_days(date_to_epoch_days(date)), Some(date));
    }
}
