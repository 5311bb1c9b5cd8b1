//! Markup events from the html5ever tokenizer.
//!
//! The tokenizer runs without a tree builder, so stray or unbalanced tags
//! come through as written. Character references are decoded by the
//! tokenizer; comments and doctypes are dropped.

use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::{
    BufferQueue, TagKind, Token, TokenSink, TokenSinkResult, Tokenizer, TokenizerOpts,
};

/// A tag or a run of text. Tag names are lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Start(String),
    End(String),
    Text(String),
}

/// Collects tokens into events; adjacent text is merged.
#[derive(Default)]
struct EventSink {
    events: RefCell<Vec<Event>>,
}

impl EventSink {
    fn push_text(&self, text: &str) {
        let mut events = self.events.borrow_mut();
        match events.last_mut() {
            Some(Event::Text(run)) => run.push_str(text),
            _ => events.push(Event::Text(text.to_string())),
        }
    }
}

impl TokenSink for EventSink {
    type Handle = ();

    fn process_token(&self, token: Token, _line_number: u64) -> TokenSinkResult<()> {
        match token {
            Token::TagToken(tag) => {
                let name = String::from(&*tag.name);
                let mut events = self.events.borrow_mut();
                match tag.kind {
                    TagKind::StartTag => {
                        events.push(Event::Start(name.clone()));
                        if tag.self_closing {
                            events.push(Event::End(name));
                        }
                    }
                    TagKind::EndTag => events.push(Event::End(name)),
                }
            }
            Token::CharacterTokens(text) => self.push_text(&text),
            Token::ParseError(error) => {
                tracing::trace!(error = %error, "Markup parse error");
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenize inline markup into events.
pub(crate) fn tokenize(markup: &str) -> Vec<Event> {
    let queue = BufferQueue::default();
    queue.push_back(StrTendril::from_slice(markup));

    let tokenizer = Tokenizer::new(EventSink::default(), TokenizerOpts::default());
    let _ = tokenizer.feed(&queue);
    tokenizer.end();

    tokenizer.sink.events.take()
}

/// The text content of inline markup: tags removed, references decoded.
pub(crate) fn text_content(markup: &str) -> String {
    tokenize(markup)
        .into_iter()
        .filter_map(|event| match event {
            Event::Text(text) => Some(text),
            Event::Start(_) | Event::End(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_events() {
        let events = tokenize("<TR class=\"a\">x<br/></tr>");
        assert_eq!(
            events,
            vec![
                Event::Start("tr".to_string()),
                Event::Text("x".to_string()),
                Event::Start("br".to_string()),
                Event::End("br".to_string()),
                Event::End("tr".to_string()),
            ]
        );
    }

    #[test]
    fn test_named_references_decoded() {
        assert_eq!(
            text_content("Relying Party&rsquo;s duty &mdash; &sect;4.9 &eacute;"),
            "Relying Party\u{2019}s duty \u{2014} \u{a7}4.9 \u{e9}"
        );
    }

    #[test]
    fn test_comments_dropped() {
        assert_eq!(text_content("a<!-- note -->b"), "ab");
    }

    #[test]
    fn test_unbalanced_tags_kept_in_order() {
        let events = tokenize("</td><td>orphan");
        assert_eq!(
            events,
            vec![
                Event::End("td".to_string()),
                Event::Start("td".to_string()),
                Event::Text("orphan".to_string()),
            ]
        );
    }
}
