//! Heuristic pre-filter for translation prompts.
//!
//! This is a guess, not a parser. It only exists to skip a remote call for
//! prompts that obviously are not translation requests. False positives and
//! false negatives are expected; the model's system instruction remains the
//! real gatekeeper.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::IntentFilterConfig;

const KNOWN_LANGUAGES: &[&str] = &[
    "english", "french", "spanish", "german", "italian", "portuguese", "dutch", "russian",
    "chinese", "mandarin", "cantonese", "japanese", "korean", "arabic", "hindi", "bengali",
    "urdu", "turkish", "greek", "hebrew", "polish", "swedish", "norwegian", "danish", "finnish",
    "czech", "hungarian", "romanian", "ukrainian", "vietnamese", "thai", "indonesian", "malay",
    "filipino", "tagalog", "swahili", "persian", "farsi", "latin", "irish", "welsh",
];

/// Off-topic and prompt-injection triggers rejected in strict mode
const DENIED_TERMS: &[&str] = &[
    "joke",
    "capital of",
    "forget",
    "ignore",
    "pretend",
    "act as",
    "you are now",
    "system prompt",
    "write a poem",
    "write a story",
    "weather",
    "who are you",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Every prompt goes to the model
    #[default]
    Off,
    /// Accept anything with a translation cue
    Keyword,
    /// Denylist first, then require a recognisable target language
    Strict,
}

impl std::str::FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" | "none" | "" => Ok(FilterMode::Off),
            "keyword" | "basic" => Ok(FilterMode::Keyword),
            "strict" => Ok(FilterMode::Strict),
            other => Err(anyhow::anyhow!("Unknown intent filter mode: {}", other)),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FilterMode::Off => "off",
            FilterMode::Keyword => "keyword",
            FilterMode::Strict => "strict",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    DeniedTerm(String),
    NoTranslationCue,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::DeniedTerm(term) => write!(f, "denied term '{}'", term),
            RejectReason::NoTranslationCue => f.write_str("no translation cue"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(RejectReason),
}

#[derive(Debug, Clone)]
pub struct IntentFilter {
    mode: FilterMode,
    translate_keyword: Regex,
    languages: Regex,
    denied_terms: Regex,
    target_pattern: Regex,
}

impl IntentFilter {
    pub fn new(config: &IntentFilterConfig) -> Result<Self, regex::Error> {
        let languages: Vec<String> = KNOWN_LANGUAGES
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_languages.iter().cloned())
            .collect();
        let denied: Vec<String> = DENIED_TERMS
            .iter()
            .map(|s| s.to_string())
            .chain(config.extra_denied_terms.iter().cloned())
            .collect();

        Ok(Self {
            mode: config.mode,
            translate_keyword: Regex::new(r"(?i)\btranslat\w*")?,
            languages: word_alternation(&languages)?,
            denied_terms: word_alternation(&denied)?,
            target_pattern: Regex::new(r"(?i)\b(?:to|into|in)\s+(\p{L}+)")?,
        })
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    pub fn check(&self, prompt: &str) -> Verdict {
        match self.mode {
            FilterMode::Off => Verdict::Accept,
            FilterMode::Keyword => {
                if self.translate_keyword.is_match(prompt)
                    || self.languages.is_match(prompt)
                    || self.target_words(prompt).next().is_some()
                {
                    Verdict::Accept
                } else {
                    Verdict::Reject(RejectReason::NoTranslationCue)
                }
            }
            FilterMode::Strict => {
                if let Some(m) = self.denied_terms.find(prompt) {
                    return Verdict::Reject(RejectReason::DeniedTerm(m.as_str().to_lowercase()));
                }

                let names_target = self
                    .target_words(prompt)
                    .any(|word| self.languages.is_match(word));
                let asks_translation =
                    self.translate_keyword.is_match(prompt) && self.languages.is_match(prompt);

                if names_target || asks_translation {
                    Verdict::Accept
                } else {
                    Verdict::Reject(RejectReason::NoTranslationCue)
                }
            }
        }
    }

    #[cfg(test)]
    pub fn is_translation_request(&self, prompt: &str) -> bool {
        self.check(prompt) == Verdict::Accept
    }

    /// Words following "to" / "into" / "in" that have some text before them
    fn target_words<'a>(&'a self, prompt: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.target_pattern
            .captures_iter(prompt)
            .filter_map(move |caps| {
                let whole = caps.get(0)?;
                if prompt[..whole.start()].trim().is_empty() {
                    return None;
                }
                caps.get(1).map(|m| m.as_str())
            })
    }
}

fn word_alternation(terms: &[String]) -> Result<Regex, regex::Error> {
    let escaped: Vec<String> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(regex::escape)
        .collect();
    Regex::new(&format!(r"(?i)\b(?:{})\b", escaped.join("|")))
}
