//! # memoir-redact
//!
//! Secret and explicit-marker redaction applied to every user-supplied
//! text field before it is persisted, embedded, or written to disk.

mod engine;
mod markers;
mod patterns;

pub use engine::Redactor;
