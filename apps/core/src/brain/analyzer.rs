//! Message analyzer - main orchestrator for the brain module.
//!
//! Runs classification and entity extraction in one pass and packages the
//! result. Pure: no side effects, safe to call repeatedly on the same text.

use super::analysis::MessageAnalysis;
use super::entities::{extract_major, extract_service, is_question};
use super::intent::IntentClassifier;
use super::normalizer::normalize;

/// Orchestrates the normalizer, classifier and extractors.
#[derive(Debug, Default, Clone, Copy)]
pub struct MessageAnalyzer {
    classifier: IntentClassifier,
}

impl MessageAnalyzer {
    pub fn new() -> Self {
        Self {
            classifier: IntentClassifier::new(),
        }
    }

    /// Analyze one raw message into a [`MessageAnalysis`].
    pub fn analyze(&self, raw_text: &str) -> MessageAnalysis {
        MessageAnalysis {
            intent: self.classifier.classify(raw_text),
            service: extract_service(raw_text),
            major: extract_major(raw_text),
            is_question: is_question(raw_text),
            raw_text: raw_text.to_string(),
            normalized_text: normalize(raw_text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::{Intent, ServiceKind};

    #[test]
    fn test_analysis_is_repeatable() {
        let analyzer = MessageAnalyzer::new();
        let a = analyzer.analyze("¿A qué hora abre el comedor?");
        let b = analyzer.analyze("¿A qué hora abre el comedor?");

        assert_eq!(a.intent, b.intent);
        assert_eq!(a.intent, Intent::ScheduleQuery);
        assert_eq!(a.service, Some(ServiceKind::Cafeteria));
        assert!(a.is_question);
        assert_eq!(a.normalized_text, "a que hora abre el comedor");
    }

    #[test]
    fn test_empty_message() {
        let analyzer = MessageAnalyzer::new();
        let analysis = analyzer.analyze("");

        assert_eq!(analysis.intent, Intent::Unclassified);
        assert_eq!(analysis.service, None);
        assert_eq!(analysis.major, None);
        assert!(!analysis.is_question);
    }
}
