//! # Brain Module
//!
//! Rule-based language processing for UniBot.
//! Analyzes an inbound message BEFORE any response is built.
//!
//! ## Components
//! - `normalizer`: lower-casing, accent folding and punctuation stripping
//! - `intent`: keyword-scoring intent classification
//! - `entities`: service / major extraction and question detection
//! - `analysis`: output data structure
//! - `analyzer`: main orchestrator

pub mod analysis;
pub mod analyzer;
pub mod entities;
pub mod intent;
pub mod normalizer;

pub use analysis::MessageAnalysis;
pub use analyzer::MessageAnalyzer;
pub use entities::{extract_major, extract_service, is_question, MajorKind, ServiceKind};
pub use intent::{Intent, IntentClassifier};
pub use normalizer::normalize;
