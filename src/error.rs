// SPDX-License-Identifier: PMPL-1.0-or-later
//! Engine error types.

use thiserror::Error;

use crate::finding::Category;

/// Errors surfaced by the scan engine.
///
/// Checker failures are recovered per §-category: the failing category is
/// reported as unavailable and the remaining categories still produce a
/// report.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A checker failed unexpectedly mid-scan.
    #[error("checker for category '{category}' failed: {message}")]
    CheckerFailed {
        /// Category whose checker failed.
        category: Category,
        /// Panic or error message, best effort.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = EngineError::CheckerFailed {
            category: Category::Contrast,
            message: "boom".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "checker for category 'contrast' failed: boom"
        );
    }
}
