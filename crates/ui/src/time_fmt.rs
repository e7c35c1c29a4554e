use chrono::{DateTime, Utc};

/// Display form of a journal or material date.
#[must_use]
pub fn format_date(value: DateTime<Utc>) -> String {
    value.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use elevate_core::time::fixed_now;

    #[test]
    fn dates_render_year_month_day() {
        assert_eq!(format_date(fixed_now()), "2023-11-14");
    }
}
