//! Core types, configuration and errors shared by every subsystem

pub mod config;
pub mod error;
pub mod types;
