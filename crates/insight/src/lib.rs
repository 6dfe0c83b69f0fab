//! AI insight client — one request, one response.
//!
//! This crate owns the wire contract with the generative-language API:
//! prompt construction, the pinned response schema
//! `{title, explanation, mathDetails}`, and reply parsing.
//!
//! No retries. No streaming. No timeout. A failed call is an error the
//! caller logs and turns into "no insight"; nothing here is fatal.

mod client;
mod prompt;

pub use client::{request_insight, Insight, InsightError, InsightReply};
pub use prompt::{build_prompt, InsightSubject};
