//! Threat ("aggro") tracking

pub mod field;

pub use field::ThreatField;
