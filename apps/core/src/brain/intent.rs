//! Intent classification using keyword scoring.
//!
//! Fast substring-containment matching against fixed keyword lists.
//! No ML model, no regex, no tokenization - a phrase counts once when it
//! appears verbatim inside the normalized text.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::normalizer::normalize;

/// Detected intent for one inbound message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Greeting (hola, buenos dias, etc.)
    Greeting,
    /// Farewell (adios, gracias, etc.)
    Farewell,
    /// Opening hours of a campus service
    ScheduleQuery,
    /// Academic-calendar events
    EventQuery,
    /// Degree program information
    MajorQuery,
    /// Administrative procedures
    ProcedureQuery,
    /// Campus services on offer
    ServiceQuery,
    /// Class suspensions
    SuspensionQuery,
    /// No keyword of any category matched
    Unclassified,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Human-readable label, used as the persisted message tag.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "saludo",
            Intent::Farewell => "despedida",
            Intent::ScheduleQuery => "consulta_horario",
            Intent::EventQuery => "consulta_evento",
            Intent::MajorQuery => "consulta_carrera",
            Intent::ProcedureQuery => "consulta_tramite",
            Intent::ServiceQuery => "consulta_servicio",
            Intent::SuspensionQuery => "consulta_suspension",
            Intent::Unclassified => "otro",
        }
    }
}

/// Greeting phrases, checked before any scoring.
const GREETINGS: &[&str] = &[
    "hola",
    "buenos dias",
    "buenas tardes",
    "buenas noches",
    "que tal",
    "saludos",
    "hey",
    "ola",
];

/// Farewell phrases, checked after greetings and before scoring.
const FAREWELLS: &[&str] = &[
    "adios",
    "hasta luego",
    "chao",
    "bye",
    "nos vemos",
    "gracias",
    "ok",
    "perfecto",
];

// Category keyword lists, verbatim from the deployed configuration.
// Accent-carrying entries cannot match normalized text and are kept for
// parity with that configuration.

const SCHEDULE_KEYWORDS: &[&str] = &[
    "horario",
    "abierto",
    "cierra",
    "abre",
    "hora",
    "cuando",
    "biblioteca",
    "laboratorio",
    "comedor",
    "cafetería",
];

const EVENT_KEYWORDS: &[&str] = &[
    "evento",
    "actividad",
    "cuando",
    "fecha",
    "examen",
    "inscripciones",
    "calendario",
    "periodo",
    "vacaciones",
];

const MAJOR_KEYWORDS: &[&str] = &[
    "carrera",
    "licenciatura",
    "ingenieria",
    "ingeniería",
    "programa",
    "estudiar",
    "materias",
    "plan de estudios",
    "semestre",
    "mecatronica",
    "mecatonica",
    "ingenieria mecatronica",
];

const PROCEDURE_KEYWORDS: &[&str] = &[
    "trámite",
    "documentos",
    "credencial",
    "constancia",
    "certificado",
    "título",
    "como solicitar",
    "requisitos",
];

const SERVICE_KEYWORDS: &[&str] = &[
    "servicio",
    "servicios",
    "disponible",
    "que hay",
    "ofrecen",
    "oferta",
    "recursos",
    "instalaciones",
];

const SUSPENSION_KEYWORDS: &[&str] = &[
    "suspensión",
    "suspensiones",
    "clases",
    "hay clases",
    "cancelado",
    "canceladas",
    "suspendido",
    "actividades",
    "hoy",
    "suspension",
];

/// Scored categories in tie-break priority order. Ties resolve to the
/// earliest entry because the scan keeps the first strictly-greater score.
const CATEGORIES: &[(Intent, &[&str])] = &[
    (Intent::ScheduleQuery, SCHEDULE_KEYWORDS),
    (Intent::EventQuery, EVENT_KEYWORDS),
    (Intent::MajorQuery, MAJOR_KEYWORDS),
    (Intent::ProcedureQuery, PROCEDURE_KEYWORDS),
    (Intent::ServiceQuery, SERVICE_KEYWORDS),
    (Intent::SuspensionQuery, SUSPENSION_KEYWORDS),
];

/// Keyword-scoring intent classifier.
///
/// Stateless; all keyword lists are static configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntentClassifier;

impl IntentClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Classify raw message text into exactly one [`Intent`].
    ///
    /// A message containing a greeting phrase is always a greeting, no
    /// matter how many domain keywords it also contains; farewells have the
    /// same precedence over scoring.
    pub fn classify(&self, raw_text: &str) -> Intent {
        let text = normalize(raw_text);

        if GREETINGS.iter().any(|g| text.contains(g)) {
            return Intent::Greeting;
        }
        if FAREWELLS.iter().any(|f| text.contains(f)) {
            return Intent::Farewell;
        }

        let mut best = Intent::Unclassified;
        let mut best_score = 0usize;
        for (intent, keywords) in CATEGORIES {
            // A multi-word phrase counts once when the whole phrase is a
            // substring; overlapping listed phrases each count separately.
            let score = keywords.iter().filter(|k| text.contains(*k)).count();
            if score > best_score {
                best_score = score;
                best = *intent;
            }
        }

        best
    }
}
