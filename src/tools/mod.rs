//! Companion tools that sit beside the session pipeline

pub mod journal;
pub mod recommendations;
pub mod relaxation;
pub mod safety;
