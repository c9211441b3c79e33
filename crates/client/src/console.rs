//! Notification sink printing to the terminal.
use spellpoints_core::NoticeLevel;
use spellpoints_runtime::NotificationSink;

/// Prints notifications and chat lines to stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl NotificationSink for ConsoleSink {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Info => println!("[info] {message}"),
            NoticeLevel::Error => println!("[error] {message}"),
        }
    }

    fn post_chat_message(&self, html: &str, speaker: &str) {
        println!("[chat] {speaker}: {}", strip_tags(html));
    }
}

fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_markup_is_removed() {
        assert_eq!(
            strip_tags("<i style='color:green;'>Elora used 5 Spell Points</i>"),
            "Elora used 5 Spell Points"
        );
    }
}
