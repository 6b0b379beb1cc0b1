//! Entity extraction: campus service, degree program, question detection.
//!
//! Extraction groups are checked in a fixed order and the first group with a
//! substring match wins; the groups overlap in substring space, so that
//! order is authoritative.

use serde::{Deserialize, Serialize};

use super::normalizer::normalize;

/// Campus services a schedule can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Library,
    Laboratory,
    Cafeteria,
}

impl ServiceKind {
    /// Lookup key as stored in the knowledge base (lower-cased Spanish name).
    pub fn key(&self) -> &'static str {
        match self {
            ServiceKind::Library => "biblioteca",
            ServiceKind::Laboratory => "laboratorio",
            ServiceKind::Cafeteria => "comedor",
        }
    }
}

/// Degree programs the bot knows how to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MajorKind {
    Systems,
    Industrial,
    Civil,
    Mechatronics,
    Administration,
    Accounting,
}

impl MajorKind {
    /// Lookup key as stored in the knowledge base (lower-cased Spanish name).
    pub fn key(&self) -> &'static str {
        match self {
            MajorKind::Systems => "sistemas",
            MajorKind::Industrial => "industrial",
            MajorKind::Civil => "civil",
            MajorKind::Mechatronics => "ingenieria mecatronica",
            MajorKind::Administration => "administracion",
            MajorKind::Accounting => "contabilidad",
        }
    }
}

const SERVICE_GROUPS: &[(ServiceKind, &[&str])] = &[
    (ServiceKind::Library, &["biblioteca", "libros", "biblio"]),
    (
        ServiceKind::Laboratory,
        &["laboratorio", "lab", "laboratorios", "labs"],
    ),
    (
        ServiceKind::Cafeteria,
        &["comedor", "cafeteria", "cafe", "comida"],
    ),
];

// The mechatronics group tolerates common misspellings seen in real traffic.
const MAJOR_GROUPS: &[(MajorKind, &[&str])] = &[
    (
        MajorKind::Systems,
        &["sistemas", "computacion", "software", "informatica"],
    ),
    (MajorKind::Industrial, &["industrial", "produccion"]),
    (MajorKind::Civil, &["civil", "construccion"]),
    (
        MajorKind::Mechatronics,
        &["ingenieria mecatronica", "mecanica", "mecatronica", "ingeneria"],
    ),
    (
        MajorKind::Administration,
        &["administracion", "negocios", "empresas"],
    ),
    (MajorKind::Accounting, &["contabilidad", "contador"]),
];

/// Interrogative words for question detection; matched against lower-cased
/// but NOT accent-folded text.
const QUESTION_WORDS: &[&str] = &[
    "que", "como", "cuando", "donde", "quien", "por que", "cual", "cuales", "cuanto",
];

/// Extract the campus service mentioned in the text, if any.
pub fn extract_service(raw_text: &str) -> Option<ServiceKind> {
    let text = normalize(raw_text);
    SERVICE_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(kind, _)| *kind)
}

/// Extract the degree program mentioned in the text, if any.
pub fn extract_major(raw_text: &str) -> Option<MajorKind> {
    let text = normalize(raw_text);
    MAJOR_GROUPS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(kind, _)| *kind)
}

/// Whether the text reads as a question.
///
/// The trailing `?` check uses the unmodified text; the interrogative-word
/// check uses lower-cased text, deliberately without accent folding.
pub fn is_question(raw_text: &str) -> bool {
    if raw_text.trim_end().ends_with('?') {
        return true;
    }
    let lowered = raw_text.to_lowercase();
    QUESTION_WORDS.iter().any(|w| lowered.contains(w))
}
