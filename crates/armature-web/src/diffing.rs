//! Whitespace-insensitive markup comparison

/// Compares markup fragments while ignoring insignificant whitespace
///
/// Text nodes are trimmed and inner whitespace runs collapse to a single
/// space, so indentation and line breaks never affect equality. The same
/// collapsing applies to the whitespace between attributes inside a tag.
/// Quoted attribute values are compared verbatim.
#[derive(Debug, Default)]
pub struct HtmlComparer;

impl HtmlComparer {
    pub fn new() -> Self {
        Self
    }

    /// Whether two markup fragments are equal modulo insignificant whitespace
    pub fn markup_equals(&self, expected: &str, actual: &str) -> bool {
        normalize_markup(expected) == normalize_markup(actual)
    }
}

/// Rewrite markup with whitespace runs collapsed to one space, text
/// nodes trimmed, and whitespace before a closing `>` dropped. Quoted
/// attribute values pass through untouched; a `>` inside quotes does
/// not close the tag.
fn normalize_markup(markup: &str) -> String {
    let mut normalized = String::with_capacity(markup.len());
    let mut text = String::new();
    let mut in_tag = false;
    let mut quote: Option<char> = None;
    let mut tag_space = false;
    for ch in markup.chars() {
        if !in_tag {
            if ch == '<' {
                flush_text(&mut normalized, &text);
                text.clear();
                in_tag = true;
                tag_space = false;
                normalized.push('<');
            } else {
                text.push(ch);
            }
            continue;
        }
        if let Some(opening) = quote {
            normalized.push(ch);
            if ch == opening {
                quote = None;
            }
            continue;
        }
        match ch {
            '>' => {
                in_tag = false;
                tag_space = false;
                normalized.push('>');
            }
            '"' | '\'' => {
                if tag_space {
                    normalized.push(' ');
                    tag_space = false;
                }
                quote = Some(ch);
                normalized.push(ch);
            }
            _ if ch.is_whitespace() => {
                tag_space = true;
            }
            _ => {
                if tag_space {
                    normalized.push(' ');
                    tag_space = false;
                }
                normalized.push(ch);
            }
        }
    }
    flush_text(&mut normalized, &text);
    normalized
}

fn flush_text(normalized: &mut String, text: &str) {
    let mut pending_space = false;
    let mut started = false;
    for ch in text.chars() {
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space && started {
            normalized.push(' ');
        }
        pending_space = false;
        started = true;
        normalized.push(ch);
    }
}
