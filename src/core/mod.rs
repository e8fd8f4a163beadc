//! Core provider abstractions.

pub mod llm;
