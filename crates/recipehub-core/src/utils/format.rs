use chrono::{DateTime, Utc};

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Split `text` on `separator`, trimming each piece and dropping empty ones.
pub fn split_trimmed(text: &str, separator: char) -> Vec<String> {
    text.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Format a timestamp as a calendar date
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Human-readable age of a timestamp relative to now ("5m ago", "2d ago").
pub fn age_display(since: &DateTime<Utc>) -> String {
    age_display_at(since, &Utc::now())
}

fn age_display_at(since: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let minutes = (*now - *since).num_minutes();
    if minutes < 1 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 1440 {
        let hours = minutes / 60;
        if minutes % 60 >= 30 {
            format!("{}h ago", hours + 1)
        } else {
            format!("{}h ago", hours)
        }
    } else {
        let days = minutes / 1440;
        if (minutes % 1440) / 60 >= 12 {
            format!("{}d ago", days + 1)
        } else {
            format!("{}d ago", days)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        // Multi-byte characters count as one
        assert_eq!(truncate_string("crème brûlée", 8), "crème...");
    }

    #[test]
    fn test_split_trimmed() {
        assert_eq!(
            split_trimmed(" 2 cups flour \n\n1 tsp salt\n", '\n'),
            vec!["2 cups flour", "1 tsp salt"]
        );
        assert_eq!(split_trimmed("vegan, quick,, dinner ", ','), vec!["vegan", "quick", "dinner"]);
        assert!(split_trimmed("  ", ',').is_empty());
    }

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(format_date(&date), "Mar 09, 2024");
    }

    #[test]
    fn test_age_display() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(age_display_at(&now, &now), "just now");
        assert_eq!(age_display_at(&(now + Duration::minutes(5)), &now), "just now");
        assert_eq!(age_display_at(&(now - Duration::minutes(5)), &now), "5m ago");
        assert_eq!(age_display_at(&(now - Duration::minutes(90)), &now), "2h ago");
        assert_eq!(age_display_at(&(now - Duration::minutes(80)), &now), "1h ago");
        assert_eq!(age_display_at(&(now - Duration::hours(36)), &now), "2d ago");
        assert_eq!(age_display_at(&(now - Duration::hours(30)), &now), "1d ago");
    }
}
