//! Delivery of rule notices to the host's chat and notification surfaces.

mod localize;
mod sink;

pub use localize::Localizer;
pub use sink::{RecordingSink, SinkEntry, TracingSink};

use spellpoints_core::{Delivery, Notice, NoticeLevel};

/// Host notification surfaces.
pub trait NotificationSink: Send + Sync {
    /// Transient notification for the acting user.
    fn notify(&self, level: NoticeLevel, message: &str);

    /// Chat message spoken by `speaker`.
    fn post_chat_message(&self, html: &str, speaker: &str);
}

/// Renders each notice and hands it to the sink.
pub fn deliver(notices: &[Notice], localizer: &Localizer, sink: &dyn NotificationSink) {
    for notice in notices {
        let text = localizer.render(&notice.message);
        match &notice.delivery {
            Delivery::Chat { speaker } => {
                sink.post_chat_message(&chat_html(notice.level, &text), speaker);
            }
            Delivery::Toast => sink.notify(notice.level, &text),
        }
    }
}

/// Chat card markup: green italics for info, red for errors.
pub fn chat_html(level: NoticeLevel, text: &str) -> String {
    let color = match level {
        NoticeLevel::Info => "green",
        NoticeLevel::Error => "red",
    };
    format!("<i style='color:{color};'>{text}</i>")
}

#[cfg(test)]
mod tests {
    use spellpoints_core::Message;

    use super::*;

    #[test]
    fn chat_notices_are_wrapped_and_spoken() {
        let sink = RecordingSink::new();
        let notice = Notice::chat(
            NoticeLevel::Error,
            "Elora",
            Message::CastedLifeDead {
                actor: "Elora".into(),
            },
        );

        deliver(&[notice], &Localizer::english(), &sink);

        let entries = sink.entries();
        assert!(matches!(
            &entries[..],
            [SinkEntry::Chat { html, speaker }]
                if speaker == "Elora" && html.starts_with("<i style='color:red;'>Elora")
        ));
    }

    #[test]
    fn toasts_keep_their_level() {
        let sink = RecordingSink::new();
        let notice = Notice::toast(
            NoticeLevel::Info,
            Message::MaximumUpdated {
                actor: "Elora".into(),
                resource: "Spell Points".into(),
                max: 27,
            },
        );

        deliver(&[notice], &Localizer::english(), &sink);

        assert!(matches!(
            &sink.entries()[..],
            [SinkEntry::Notify { level: NoticeLevel::Info, message }] if message.contains("27")
        ));
    }
}
