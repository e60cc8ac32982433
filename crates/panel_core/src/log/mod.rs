//! Live server log: line classification, the scrolling window and the
//! WebSocket feed.
//!
//! Lines arrive as `[CHAT] <name> text`, `[WARN] text`, `[ERROR] text` or
//! plain text. [`classify_line`] turns each one into a [`LogEntry`] carrying
//! a badge and a row style; the renderer decides what those look like.

pub mod client;
pub mod window;

pub use client::{websocket_url, LiveLogClient, LogSink, CONNECTION_CLOSED, SOCKETS_UNSUPPORTED};
pub use window::LogWindow;

/// Colour role of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeStyle {
    Brand,
    Info,
    Success,
    Warning,
    Error,
}

/// Short label shown in front of a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub style: BadgeStyle,
}

impl Badge {
    fn new(label: impl Into<String>, style: BadgeStyle) -> Self {
        Self {
            label: label.into(),
            style,
        }
    }
}

/// Row highlight of a log line. Chat lines carry none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Info,
    Warn,
    Error,
}

/// A classified log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub badge: Badge,
    pub row: Option<RowStyle>,
    /// Message with the tag and speaker stripped
    pub text: String,
}

/// Anything the log window can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogItem {
    Entry(LogEntry),
    /// Client-side notice such as "Connection closed."
    Notice(String),
}

impl From<LogEntry> for LogItem {
    fn from(entry: LogEntry) -> Self {
        LogItem::Entry(entry)
    }
}

/// Splits a leading `[TAG] ` off a line.
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(|c: char| c == '[' || c == ']')?;
    if end == 0 || !rest[end..].starts_with("] ") {
        return None;
    }
    Some((&rest[..end], &rest[end + 2..]))
}

/// Splits a leading `<speaker> ` off a chat message.
///
/// The speaker ends at the first `> `, so a message that itself contains
/// `> ` stays intact: `<Ann> a > b` gives speaker `Ann` and text `a > b`.
/// Empty speakers and speakers containing `[` or `]` are rejected.
fn split_speaker(msg: &str) -> Option<(&str, &str)> {
    let rest = msg.strip_prefix('<')?;
    let end = rest.find("> ")?;
    let speaker = &rest[..end];
    if speaker.is_empty() || speaker.contains(['[', ']']) {
        return None;
    }
    Some((speaker, &rest[end + 2..]))
}

fn info_entry(text: &str) -> LogEntry {
    LogEntry {
        badge: Badge::new("Info", BadgeStyle::Brand),
        row: Some(RowStyle::Info),
        text: text.to_string(),
    }
}

/// Classifies one raw log line by its bracketed tag.
///
/// ```
/// use panel_core::log::{classify_line, BadgeStyle};
///
/// let entry = classify_line("[WARN] disk low");
/// assert_eq!(entry.badge.label, "Warning");
/// assert_eq!(entry.badge.style, BadgeStyle::Warning);
/// assert_eq!(entry.text, "disk low");
/// ```
pub fn classify_line(line: &str) -> LogEntry {
    let Some((tag, msg)) = split_tag(line) else {
        return info_entry(line);
    };

    match tag {
        "CHAT" => match split_speaker(msg) {
            Some((speaker, text)) => {
                let speaker = speaker.trim();
                let style = if speaker == "Server" {
                    BadgeStyle::Success
                } else {
                    BadgeStyle::Info
                };
                LogEntry {
                    badge: Badge::new(speaker, style),
                    row: None,
                    text: text.to_string(),
                }
            }
            None => info_entry(msg),
        },
        "WARN" => LogEntry {
            badge: Badge::new("Warning", BadgeStyle::Warning),
            row: Some(RowStyle::Warn),
            text: msg.to_string(),
        },
        "ERROR" => LogEntry {
            badge: Badge::new("Error", BadgeStyle::Error),
            row: Some(RowStyle::Error),
            text: msg.to_string(),
        },
        _ => info_entry(msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_line() {
        let entry = classify_line("[WARN] disk low");
        assert_eq!(entry.badge, Badge::new("Warning", BadgeStyle::Warning));
        assert_eq!(entry.row, Some(RowStyle::Warn));
        assert_eq!(entry.text, "disk low");
    }

    #[test]
    fn test_error_line() {
        let entry = classify_line("[ERROR] world save failed");
        assert_eq!(entry.badge, Badge::new("Error", BadgeStyle::Error));
        assert_eq!(entry.row, Some(RowStyle::Error));
        assert_eq!(entry.text, "world save failed");
    }

    #[test]
    fn test_chat_from_server_is_success() {
        let entry = classify_line("[CHAT] <Server> hello");
        assert_eq!(entry.badge, Badge::new("Server", BadgeStyle::Success));
        assert_eq!(entry.row, None);
        assert_eq!(entry.text, "hello");
    }

    #[test]
    fn test_chat_from_player_is_info_and_trimmed() {
        let entry = classify_line("[CHAT] < Alice > gg> all");
        assert_eq!(entry.badge, Badge::new("Alice", BadgeStyle::Info));
        assert_eq!(entry.text, "gg> all");
    }

    #[test]
    fn test_speaker_ends_at_first_marker() {
        let entry = classify_line("[CHAT] <Ann> a > b");
        assert_eq!(entry.badge.label, "Ann");
        assert_eq!(entry.text, "a > b");
    }

    #[test]
    fn test_chat_without_speaker_falls_back_to_info() {
        let entry = classify_line("[CHAT] nobody spoke");
        assert_eq!(entry.badge, Badge::new("Info", BadgeStyle::Brand));
        assert_eq!(entry.text, "nobody spoke");
    }

    #[test]
    fn test_untagged_and_unknown_tags_are_info() {
        let plain = classify_line("Server started on port 27000");
        assert_eq!(plain.badge, Badge::new("Info", BadgeStyle::Brand));
        assert_eq!(plain.row, Some(RowStyle::Info));
        assert_eq!(plain.text, "Server started on port 27000");

        let tagged = classify_line("[Galaxy] sector 3:4 generated");
        assert_eq!(tagged.badge.label, "Info");
        assert_eq!(tagged.text, "sector 3:4 generated");
    }

    #[test]
    fn test_malformed_tags_are_kept_verbatim() {
        assert_eq!(classify_line("[WARN]no space").text, "[WARN]no space");
        assert_eq!(classify_line("[] empty").text, "[] empty");
        assert_eq!(classify_line("[a[b] nested").text, "[a[b] nested");
        assert_eq!(classify_line("").text, "");
    }
}
