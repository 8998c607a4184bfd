//! Best-effort text extraction from the inbound message union.

use crate::client::MessageBody;

/// Extract the plain-text body of a message.
///
/// Probes the content variants in priority order: conversation text,
/// extended text, image caption, video caption, button-reply id,
/// list-reply row id, template-button reply id. Returns the first
/// non-empty match. A message with no text-bearing shape yields an empty
/// string; that is an expected result, not an error.
pub fn extract_text(body: &MessageBody) -> &str {
    let candidates = [
        body.conversation.as_deref(),
        body.extended_text.as_ref().map(|e| e.text.as_str()),
        body.image.as_ref().and_then(|m| m.caption.as_deref()),
        body.video.as_ref().and_then(|m| m.caption.as_deref()),
        body.button_reply.as_ref().map(|b| b.selected_id.as_str()),
        body.list_reply.as_ref().map(|l| l.selected_row_id.as_str()),
        body.template_reply.as_ref().map(|t| t.selected_id.as_str()),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|s| !s.is_empty())
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ButtonReply, ExtendedText, MediaContent};

    #[test]
    fn test_empty_body_yields_empty_string() {
        assert_eq!(extract_text(&MessageBody::default()), "");
    }

    #[test]
    fn test_conversation_wins() {
        let body = MessageBody {
            conversation: Some("hello".into()),
            extended_text: Some(ExtendedText {
                text: "ignored".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(extract_text(&body), "hello");
    }

    #[test]
    fn test_caption_only() {
        let body = MessageBody {
            image: Some(MediaContent {
                caption: Some("look at this".into()),
            }),
            ..Default::default()
        };
        assert_eq!(extract_text(&body), "look at this");
    }

    #[test]
    fn test_button_reply_id() {
        let body = MessageBody {
            button_reply: Some(ButtonReply {
                selected_id: ".menu".into(),
            }),
            ..Default::default()
        };
        assert_eq!(extract_text(&body), ".menu");
    }

    #[test]
    fn test_empty_variants_are_skipped() {
        let body = MessageBody {
            conversation: Some(String::new()),
            video: Some(MediaContent {
                caption: Some("cap".into()),
            }),
            ..Default::default()
        };
        assert_eq!(extract_text(&body), "cap");
    }
}
