/// Helper utilities for display formatting

use chrono::{DateTime, Local, NaiveDateTime};

/// Format a server `created_at` value for display.
///
/// The moderator API sends ISO-8601 strings, sometimes with an offset and
/// sometimes as a naive timestamp (`2024-05-01T12:30:00.123456`). Anything
/// unparseable is shown as-is.
pub fn format_created_at(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return "N/A".to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        let local: DateTime<Local> = dt.into();
        return local.format("%Y-%m-%d %H:%M").to_string();
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, pattern) {
            return naive.format("%Y-%m-%d %H:%M").to_string();
        }
    }

    raw.to_string()
}

/// Truncate string with ellipsis (character based, safe for Cyrillic names)
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// First letter of a name, uppercased, used as an avatar fallback
pub fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

/// Render a ratio as a fixed-width text bar, e.g. `[#####-----]`
pub fn text_bar(used: u32, total: u32, width: usize) -> String {
    let filled = if total == 0 {
        0
    } else {
        ((used.min(total) as usize) * width) / total as usize
    };
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Optional text with a placeholder
pub fn or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "-",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_created_at_naive() {
        assert_eq!(
            format_created_at(Some("2024-05-01T12:30:00.123456")),
            "2024-05-01 12:30"
        );
        assert_eq!(format_created_at(Some("2024-05-01T08:05:09")), "2024-05-01 08:05");
    }

    #[test]
    fn test_format_created_at_fallbacks() {
        assert_eq!(format_created_at(None), "N/A");
        assert_eq!(format_created_at(Some("yesterday")), "yesterday");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("Санкт-Петербург", 8), "Санкт...");
    }

    #[test]
    fn test_initial() {
        assert_eq!(initial("мария"), "М");
        assert_eq!(initial(""), "?");
    }

    #[test]
    fn test_text_bar() {
        assert_eq!(text_bar(0, 15, 5), "[-----]");
        assert_eq!(text_bar(15, 15, 5), "[#####]");
        assert_eq!(text_bar(6, 15, 5), "[##---]");
        assert_eq!(text_bar(3, 0, 4), "[----]");
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some("@alex")), "@alex");
        assert_eq!(or_dash(Some("")), "-");
        assert_eq!(or_dash(None), "-");
    }
}
