//! Permissive extraction from replies that are not valid JSON

use super::{ReplyAction, digits_of};

/// What could be scraped out of an unparseable reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannedChoice {
    /// Action kind, when a keyword for one was found
    pub action: Option<ReplyAction>,
    /// First index-like token
    pub index: i64,
}

const INDEX_KEYS: [&str; 3] = ["idx", "index", "choice"];
const ACTION_KEYS: [&str; 2] = ["act", "action"];

/// Scan raw text for an action kind and an index-like token
///
/// A number following an `idx`/`index` key is preferred; otherwise the first
/// integer anywhere in the text is taken. Returns `None` when the text holds
/// no integer at all.
pub fn scan_choice(raw: &str) -> Option<ScannedChoice> {
    let lower = raw.to_ascii_lowercase();

    let index = INDEX_KEYS
        .iter()
        .find_map(|key| value_after(&lower, key).and_then(leading_integer))
        .or_else(|| first_integer(&lower))?;

    let action = ACTION_KEYS
        .iter()
        .find_map(|key| value_after(&lower, key).and_then(leading_word))
        .and_then(ReplyAction::parse)
        .or_else(|| keyword_action(&lower));

    Some(ScannedChoice { action, index })
}

/// Scan raw text for a team preview order following an `order` key
pub fn scan_order(raw: &str) -> Option<Vec<usize>> {
    let lower = raw.to_ascii_lowercase();
    let rest = value_after(&lower, "order")?;

    let run: String = rest
        .chars()
        .take_while(|c| c.is_ascii_digit() || matches!(c, ',' | ' ' | '[' | '"' | '\''))
        .collect();
    let digits = digits_of(&run);

    (!digits.is_empty()).then_some(digits)
}

/// Text following `key` and any quote/colon/equals/space separators
fn value_after<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let mut search = 0;
    while let Some(pos) = text[search..].find(key) {
        let at = search + pos;
        let end = at + key.len();
        // Whole-word match only ("act" must not hit "action" or "exact")
        let before_ok = text[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_ascii_alphanumeric());
        let after_ok = text[end..]
            .chars()
            .next()
            .is_none_or(|c| !c.is_ascii_alphanumeric());

        if before_ok && after_ok {
            let rest = text[end..].trim_start_matches(|c: char| {
                c.is_whitespace() || matches!(c, '"' | '\'' | ':' | '=')
            });
            return Some(rest);
        }
        search = end;
    }
    None
}

fn leading_integer(text: &str) -> Option<i64> {
    let digits: String = text
        .chars()
        .enumerate()
        .take_while(|(i, c)| c.is_ascii_digit() || (*i == 0 && *c == '-'))
        .map(|(_, c)| c)
        .collect();
    digits.parse().ok()
}

fn first_integer(text: &str) -> Option<i64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    leading_integer(&text[start..])
}

fn leading_word(text: &str) -> Option<&str> {
    let end = text
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len());
    (end > 0).then(|| &text[..end])
}

fn keyword_action(text: &str) -> Option<ReplyAction> {
    if text.contains("switch") {
        Some(ReplyAction::Switch)
    } else if text.contains("move") || text.contains("attack") {
        Some(ReplyAction::Move)
    } else {
        None
    }
}
