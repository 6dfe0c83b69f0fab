//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 10-19   | ai               | AI insight codes                         |
//! | 30-39   | share            | Snapshot token codes                     |
//!
//! Inside `mlab lab` these conditions never exit; the TUI degrades to
//! "show less" instead. The codes apply to the headless commands only.
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use matrixlab_insight::InsightError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// AI (10-19)
// =============================================================================

/// AI disabled (provider=none) — not an error, just informational.
pub const EXIT_AI_DISABLED: u8 = 10;

/// AI provider configured but API key missing.
pub const EXIT_AI_MISSING_KEY: u8 = 11;

/// Insight request failed (network or HTTP error from the provider).
pub const EXIT_AI_REQUEST_FAILED: u8 = 12;

/// Provider answered but the reply is not a parseable insight.
pub const EXIT_AI_MALFORMED_REPLY: u8 = 13;

// =============================================================================
// Share (30-39)
// =============================================================================

/// Snapshot token is malformed (bad base64, bad UTF-8, bad JSON, wrong shape).
pub const EXIT_SHARE_MALFORMED: u8 = 30;

/// Map an InsightError to its exit code.
pub fn insight_exit_code(err: &InsightError) -> u8 {
    match err {
        InsightError::NotConfigured(_) => EXIT_AI_DISABLED,
        InsightError::NotImplemented(_) => EXIT_AI_DISABLED,
        InsightError::MissingKey => EXIT_AI_MISSING_KEY,
        InsightError::NetworkError(_) => EXIT_AI_REQUEST_FAILED,
        InsightError::ApiError { .. } => EXIT_AI_REQUEST_FAILED,
        InsightError::ParseError(_) => EXIT_AI_MALFORMED_REPLY,
        InsightError::InvalidResponse(_) => EXIT_AI_MALFORMED_REPLY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insight_errors_map_into_the_ai_range() {
        assert_eq!(
            insight_exit_code(&InsightError::NotConfigured("off".into())),
            EXIT_AI_DISABLED
        );
        assert_eq!(
            insight_exit_code(&InsightError::MissingKey),
            EXIT_AI_MISSING_KEY
        );
        assert_eq!(
            insight_exit_code(&InsightError::NetworkError("refused".into())),
            EXIT_AI_REQUEST_FAILED
        );
        assert_eq!(
            insight_exit_code(&InsightError::ApiError {
                status: 500,
                message: "boom".into()
            }),
            EXIT_AI_REQUEST_FAILED
        );
        assert_eq!(
            insight_exit_code(&InsightError::ParseError("not json".into())),
            EXIT_AI_MALFORMED_REPLY
        );
    }
}
