//! Small display helpers shared by front ends

/// Cut `text` to at most `max_chars` characters, appending `...` when
/// anything was removed
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars).collect();
    truncated.push_str("...");
    truncated
}

/// `640 students`, `1.2k students`
pub fn format_students(count: u32) -> String {
    if count >= 1000 {
        format!("{:.1}k students", count as f64 / 1000.0)
    } else {
        format!("{} students", count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingBand {
    High,
    Medium,
    Low,
}

impl RatingBand {
    pub fn for_rating(rating: f32) -> Self {
        if rating >= 4.5 {
            RatingBand::High
        } else if rating >= 3.5 {
            RatingBand::Medium
        } else {
            RatingBand::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingBand::High => "high",
            RatingBand::Medium => "medium",
            RatingBand::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_text("a longer sentence", 8), "a longer...");
    }

    #[test]
    fn test_truncate_text_counts_characters() {
        assert_eq!(truncate_text("日本語のテキスト", 3), "日本語...");
    }

    #[test]
    fn test_format_students() {
        assert_eq!(format_students(0), "0 students");
        assert_eq!(format_students(999), "999 students");
        assert_eq!(format_students(1000), "1.0k students");
        assert_eq!(format_students(15420), "15.4k students");
    }

    #[test]
    fn test_rating_band_thresholds() {
        assert_eq!(RatingBand::for_rating(4.9), RatingBand::High);
        assert_eq!(RatingBand::for_rating(4.5), RatingBand::High);
        assert_eq!(RatingBand::for_rating(4.4), RatingBand::Medium);
        assert_eq!(RatingBand::for_rating(3.5), RatingBand::Medium);
        assert_eq!(RatingBand::for_rating(3.4), RatingBand::Low);
    }
}
