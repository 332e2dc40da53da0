//! Structural marker detection.
//!
//! Total predicates over arbitrary text; empty strings simply match nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static STOCK_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])[0-9]{4}(?:[^0-9]|$)").expect("valid stock code regex"));

static BULLET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*(?:(?:[-*•·]|[0-9]{1,2}[.)])\s+|[0-9]{1,2}、\s*)\S")
        .expect("valid bullet regex")
});

static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)https?://\S+").expect("valid link regex"));

const QUOTE_CHARS: &[char] = &['"', '“', '”', '「', '」', '『', '』'];

/// Structural markers found in one post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralMarkers {
    pub emoji: bool,
    pub hashtag: bool,
    pub question: bool,
    pub exclamation: bool,
    pub digit: bool,
    pub stock_code: bool,
    pub paragraph_break: bool,
    pub line_break: bool,
    pub bullet: bool,
    pub quote: bool,
    pub news_link: bool,
}

impl StructuralMarkers {
    /// Detect markers for a post.
    ///
    /// Inline markers look at title and body; layout markers (line/paragraph
    /// breaks, bullets) and links look at the body only.
    pub fn detect(title: &str, body: &str) -> Self {
        let text = format!("{}\n{}", title, body);

        Self {
            emoji: has_emoji(&text),
            hashtag: text.contains(['#', '＃']),
            question: text.contains(['?', '？']),
            exclamation: text.contains(['!', '！']),
            digit: text.chars().any(|c| c.is_ascii_digit()),
            stock_code: STOCK_CODE_RE.is_match(&text),
            paragraph_break: body.contains("\n\n"),
            line_break: body.contains('\n'),
            bullet: BULLET_RE.is_match(body),
            quote: text.contains(QUOTE_CHARS),
            news_link: LINK_RE.is_match(body),
        }
    }
}

/// Whether `c` is a pictographic emoji.
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F300..=0x1F5FF   // symbols & pictographs
            | 0x1F600..=0x1F64F // emoticons
            | 0x1F680..=0x1F6FF // transport & map
            | 0x1F900..=0x1F9FF // supplemental symbols
            | 0x1FA70..=0x1FAFF // extended pictographs
            | 0x2600..=0x26FF   // misc symbols
            | 0x2700..=0x27BF   // dingbats
    )
}

pub fn has_emoji(text: &str) -> bool {
    text.chars().any(is_emoji)
}
