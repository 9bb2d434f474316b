use mahir_lib::study::{ChangeTally, Score};

/// ANSI color codes
#[allow(dead_code)]
pub struct Color;

#[allow(dead_code)]
impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

/// Wrap text in a color when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Highlight color of a term's example: green for score 3, magenta otherwise
pub fn highlight_color(score: Score) -> &'static str {
    if score == Score::Known {
        Color::GREEN
    } else {
        Color::MAGENTA
    }
}

pub fn score_color(score: Score) -> &'static str {
    match score {
        Score::New => Color::CYAN,
        Score::Weak => Color::RED,
        Score::Familiar => Color::YELLOW,
        Score::Known => Color::GREEN,
        Score::Mastered => Color::BLUE,
    }
}

/// Lines listing score changes, aligned in two columns
pub fn format_changes(changes: &ChangeTally) -> Vec<String> {
    let width = changes.keys().map(|k| k.len()).max().unwrap_or(4).max(4);
    changes
        .iter()
        .map(|(change, amount)| format!("{:<width$}  {}", change, amount, width = width))
        .collect()
}

/// Render a duration in seconds as `h:mm:ss`
pub fn format_duration(secs: i64) -> String {
    let secs = secs.max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// A horizontal rule under a table header
pub fn rule(width: usize) -> String {
    "\u{2500}".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paint_respects_color_flag() {
        assert_eq!(paint("x", Color::RED, false), "x");
        assert_eq!(paint("x", Color::RED, true), "\x1b[31mx\x1b[0m");
    }

    #[test]
    fn test_highlight_only_score_three() {
        assert_eq!(highlight_color(Score::Known), Color::GREEN);
        assert_eq!(highlight_color(Score::Mastered), Color::MAGENTA);
        assert_eq!(highlight_color(Score::New), Color::MAGENTA);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0:00:00");
        assert_eq!(format_duration(75), "0:01:15");
        assert_eq!(format_duration(3723), "1:02:03");
    }

    #[test]
    fn test_format_changes() {
        let mut changes = ChangeTally::new();
        changes.insert("0->1".to_string(), 4);
        changes.insert("1<-3".to_string(), 2);

        assert_eq!(format_changes(&changes), vec!["0->1  4", "1<-3  2"]);
    }
}
