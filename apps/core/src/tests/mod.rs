//! Test Module
//!
//! Cross-module test suite for the UniBot backend.
//!
//! ## Test Categories
//! - `api_tests`: webhook validation, JSON round trip, TwiML output
//! - `brain_tests`: normalization, intent classification, entity extraction
//! - `knowledge_tests`: lookups, horizon query, reload atomicity
//! - `responder_tests`: the eight response strategies
//! - `importer_tests`: sheet-row parsing edge cases
//! - `sheets_tests`: values-API client against a mock server
//! - `database_tests`: users/messages persistence and statistics

pub mod knowledge_tests;
pub mod sheets_tests;
