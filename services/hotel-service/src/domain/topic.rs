//! Topic classification for support chat
//!
//! Keyword matching is plain substring containment on the lower-cased text, so a
//! keyword embedded in a longer word still matches.

use stay_config::KeywordConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TopicDomain {
    Hotel,
    Package,
    Flight,
    General,
}

impl TopicDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hotel => "hotel",
            Self::Package => "package",
            Self::Flight => "flight",
            Self::General => "general",
        }
    }
}

/// Keyword sets and context hints, normalised to lower case.
#[derive(Debug, Clone)]
pub struct TopicKeywords {
    hospitality: Vec<String>,
    package: Vec<String>,
    flight: Vec<String>,
    general_contexts: Vec<String>,
    flight_contexts: Vec<String>,
}

fn normalize(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}

impl From<&KeywordConfig> for TopicKeywords {
    fn from(config: &KeywordConfig) -> Self {
        Self {
            hospitality: normalize(&config.hospitality),
            package: normalize(&config.package),
            flight: normalize(&config.flight),
            general_contexts: normalize(&config.general_contexts),
            flight_contexts: normalize(&config.flight_contexts),
        }
    }
}

impl Default for TopicKeywords {
    fn default() -> Self {
        Self::from(&KeywordConfig::default())
    }
}

/// Outcome of classifying one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub is_hotel: bool,
    pub is_package: bool,
    pub is_flight: bool,
    pub is_general: bool,
}

impl Classification {
    /// Whether the hotel desk answers this message.
    pub fn should_respond(&self) -> bool {
        self.is_hotel || self.is_package || self.is_general
    }

    /// Single label for logs and metrics.
    pub fn domain(&self) -> TopicDomain {
        if self.is_package {
            TopicDomain::Package
        } else if self.is_hotel {
            TopicDomain::Hotel
        } else if self.is_general {
            TopicDomain::General
        } else {
            TopicDomain::Flight
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TopicClassifier {
    keywords: TopicKeywords,
}

fn contains_any(text: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| text.contains(k.as_str()))
}

impl TopicClassifier {
    pub fn new(keywords: TopicKeywords) -> Self {
        Self { keywords }
    }

    pub fn classify(&self, text: &str, context: &str) -> Classification {
        self.classify_lowered(&text.to_lowercase(), context)
    }

    /// Same as [`classify`](Self::classify) for text that is already lower-cased.
    pub fn classify_lowered(&self, lowered: &str, context: &str) -> Classification {
        let context = context.trim().to_lowercase();
        let is_hotel = contains_any(lowered, &self.keywords.hospitality);
        let is_package = contains_any(lowered, &self.keywords.package);
        let is_flight = contains_any(lowered, &self.keywords.flight);

        let general_hint = self.keywords.general_contexts.contains(&context);
        let flight_hint = self.keywords.flight_contexts.contains(&context);
        let is_general = general_hint || (!is_hotel && !is_package && !is_flight && !flight_hint);

        Classification {
            is_hotel,
            is_package,
            is_flight,
            is_general,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_lowercased() {
        let config = KeywordConfig {
            hospitality: vec!["  HOTEL ".to_string(), String::new()],
            ..KeywordConfig::default()
        };
        let classifier = TopicClassifier::new(TopicKeywords::from(&config));
        assert!(classifier.classify("um hotel barato", "").is_hotel);
    }

    #[test]
    fn test_flight_context_without_keywords_is_silent() {
        let classifier = TopicClassifier::default();
        let c = classifier.classify("bom dia", "flight");
        assert!(!c.should_respond());
        assert_eq!(c.domain(), TopicDomain::Flight);
    }

    #[test]
    fn test_general_context_overrides_flight_keywords() {
        let classifier = TopicClassifier::default();
        let c = classifier.classify("quero um voo", "general");
        assert!(c.is_flight);
        assert!(c.is_general);
        assert!(c.should_respond());
    }

    #[test]
    fn test_substring_matching_is_not_whole_word() {
        // "combo" 作为子串出现在更长的单词中也会命中
        let classifier = TopicClassifier::default();
        assert!(classifier.classify("comboio", "").is_package);
    }
}
