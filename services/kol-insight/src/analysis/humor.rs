//! Humor classifier.
//!
//! Scores free text against a weighted lexicon:
//!
//! | tier     | weight |
//! |----------|--------|
//! | light    | 1      |
//! | moderate | 2      |
//! | strong   | 3      |
//! | emoji    | 2      |
//!
//! Every distinct lexicon entry found in the text adds its weight once;
//! repeated occurrences add nothing. The total maps to a [`HumorLevel`].

use kol_common::config::HumorLexicon;
use serde::{Deserialize, Serialize};

use crate::types::HumorLevel;

const LIGHT_WEIGHT: u32 = 1;
const MODERATE_WEIGHT: u32 = 2;
const STRONG_WEIGHT: u32 = 3;
const EMOJI_WEIGHT: u32 = 2;

/// Humor score of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumorScore {
    pub score: u32,
    pub level: HumorLevel,
}

impl HumorScore {
    pub fn is_humorous(&self) -> bool {
        self.level != HumorLevel::None
    }
}

/// Lexicon-based humor classifier.
#[derive(Debug, Clone)]
pub struct HumorClassifier {
    /// (lowercased entry, weight), unique by entry
    entries: Vec<(String, u32)>,
}

impl HumorClassifier {
    /// Build a classifier from a lexicon.
    ///
    /// An entry listed in more than one tier keeps its highest weight.
    pub fn new(lexicon: &HumorLexicon) -> Self {
        let tiers = [
            (&lexicon.light, LIGHT_WEIGHT),
            (&lexicon.moderate, MODERATE_WEIGHT),
            (&lexicon.strong, STRONG_WEIGHT),
            (&lexicon.emojis, EMOJI_WEIGHT),
        ];

        let mut entries: Vec<(String, u32)> = Vec::new();
        for (words, weight) in tiers {
            for word in words {
                let word = word.trim().to_lowercase();
                if word.is_empty() {
                    continue;
                }
                match entries.iter_mut().find(|(w, _)| *w == word) {
                    Some(existing) => existing.1 = existing.1.max(weight),
                    None => entries.push((word, weight)),
                }
            }
        }

        Self { entries }
    }

    /// Create with the default lexicon.
    pub fn with_defaults() -> Self {
        Self::new(&HumorLexicon::default())
    }

    /// Score a text. Never fails; empty text scores 0 (`none`).
    pub fn classify(&self, text: &str) -> HumorScore {
        let haystack = text.to_lowercase();
        let score = self
            .entries
            .iter()
            .filter(|(word, _)| haystack.contains(word.as_str()))
            .map(|(_, weight)| *weight)
            .sum();

        HumorScore {
            score,
            level: HumorLevel::from_score(score),
        }
    }

    /// Score a post's title and body together.
    pub fn classify_post(&self, title: &str, body: &str) -> HumorScore {
        self.classify(&format!("{}\n{}", title, body))
    }
}

impl Default for HumorClassifier {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_is_none() {
        let classifier = HumorClassifier::with_defaults();
        let result = classifier.classify("");
        assert_eq!(result.score, 0);
        assert_eq!(result.level, HumorLevel::None);
        assert!(!result.is_humorous());
    }

    #[test]
    fn test_moderate_keyword_and_emoji() {
        let classifier = HumorClassifier::with_defaults();
        let result = classifier.classify_post("大漏財！！😂😂 2330 噴出", "哈哈，這檔要噴了");
        assert_eq!(result.score, 4);
        assert_eq!(result.level, HumorLevel::Moderate);
    }

    #[test]
    fn test_repeated_entry_counts_once() {
        let classifier = HumorClassifier::with_defaults();
        let once = classifier.classify("😂");
        let many = classifier.classify("😂😂😂😂😂😂");
        assert_eq!(once.score, many.score);
        assert_eq!(many.level, HumorLevel::Light);
    }

    #[test]
    fn test_nested_entries_all_count() {
        let classifier = HumorClassifier::with_defaults();
        // "哈哈哈哈" (3) also contains "哈哈" (2)
        let result = classifier.classify("哈哈哈哈");
        assert_eq!(result.score, 5);
        assert_eq!(result.level, HumorLevel::Moderate);
    }

    #[test]
    fn test_case_insensitive_latin_entries() {
        let classifier = HumorClassifier::with_defaults();
        assert_eq!(classifier.classify("LOL").score, 1);
        assert_eq!(classifier.classify("XD").score, 2);
    }

    #[test]
    fn test_strong_level() {
        let classifier = HumorClassifier::with_defaults();
        // 笑爛 (3) + 🤣 (2) + 搞笑 (2) + 笑 (1)
        let result = classifier.classify("笑爛 🤣 搞笑");
        assert_eq!(result.score, 8);
        assert_eq!(result.level, HumorLevel::Strong);
    }

    #[test]
    fn test_duplicate_entry_keeps_highest_weight() {
        let lexicon = HumorLexicon {
            light: vec!["哈哈".into()],
            moderate: vec!["哈哈".into()],
            strong: vec!["笑爛".into()],
            emojis: vec!["😂".into()],
        };
        let classifier = HumorClassifier::new(&lexicon);
        assert_eq!(classifier.classify("哈哈").score, 2);
    }
}
