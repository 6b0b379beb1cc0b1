//! Output data structure of the brain: everything the dispatcher needs to
//! pick a response strategy for one message.

use serde::{Deserialize, Serialize};

use super::entities::{MajorKind, ServiceKind};
use super::intent::Intent;

/// Per-message analysis result, produced fresh for every inbound message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageAnalysis {
    /// Classification category for the message.
    pub intent: Intent,
    /// Campus service mentioned, if any.
    pub service: Option<ServiceKind>,
    /// Degree program mentioned, if any.
    pub major: Option<MajorKind>,
    /// Whether the message reads as a question.
    pub is_question: bool,
    /// The message text exactly as received.
    pub raw_text: String,
    /// The normalized form used for keyword matching.
    pub normalized_text: String,
}
