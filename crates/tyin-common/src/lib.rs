//! Common types and utilities for the tyin type inference engine.
//!
//! This crate provides foundational types used across all tyin crates:
//! - String interning (`Atom`, `Interner`)
//! - Source spans (`Span`, `Spanned`)
//! - Line/column mapping (`LineMap`, `Position`)
//! - Diagnostics collected during parsing and inference
//! - Centralized limits and thresholds

// String interning for identifier and property name deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{Span, Spanned};

// Position/LineMap types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Diagnostics - collected, never thrown
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Centralized limits and thresholds
pub mod limits;
