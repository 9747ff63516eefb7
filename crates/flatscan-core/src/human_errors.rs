// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable messages for scan outcomes and errors.
//
// UI layers show these instead of raw error strings. "No document detected"
// is not an error, but it still needs a friendly message, so it has its own
// entry point.

use crate::error::FlatscanError;
use crate::types::NotFoundReason;

/// How the UI should present a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing went wrong; the image simply had no detectable document.
    Info,
    /// The user can fix it (retake the photo, pick another file).
    ActionRequired,
    /// A bug or a broken file; retrying will not help.
    Permanent,
}

/// A plain-language message with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanMessage {
    /// Short summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Drives icon/colour in the UI.
    pub severity: Severity,
}

/// Message for a scan that found no document. The original image should be
/// left untouched by the caller.
pub fn humanize_not_found(reason: NotFoundReason) -> HumanMessage {
    match reason {
        NotFoundReason::NoQuadrilateral => HumanMessage {
            message: "No document was detected in this picture.".into(),
            suggestion: "Place the page on a darker, plain surface so all four edges are visible, or crop it by hand.".into(),
            severity: Severity::Info,
        },
        NotFoundReason::Degenerate => HumanMessage {
            message: "The page edges could not be straightened.".into(),
            suggestion: "Take the photo from more directly above the page, or crop it by hand.".into(),
            severity: Severity::Info,
        },
    }
}

/// Convert a `FlatscanError` into a `HumanMessage`.
pub fn humanize_error(err: &FlatscanError) -> HumanMessage {
    match err {
        FlatscanError::InvalidImage(_) => HumanMessage {
            message: "This image can't be read.".into(),
            suggestion: "Try opening a different photo, or re-export it as JPEG or PNG.".into(),
            severity: Severity::ActionRequired,
        },
        FlatscanError::DegenerateQuadrilateral(_) => HumanMessage {
            message: "Those corners don't outline a page.".into(),
            suggestion: "Drag the four handles so they sit on the four corners of the document.".into(),
            severity: Severity::ActionRequired,
        },
        FlatscanError::ImageError(_) | FlatscanError::Io(_) => HumanMessage {
            message: "The image file couldn't be opened or saved.".into(),
            suggestion: "Check that the file still exists and that there is free space on the disk.".into(),
            severity: Severity::ActionRequired,
        },
        FlatscanError::Config(_) | FlatscanError::Serialization(_) => HumanMessage {
            message: "The scanner settings are invalid.".into(),
            suggestion: "Reset the scanner settings to their defaults.".into(),
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_informational() {
        for reason in [NotFoundReason::NoQuadrilateral, NotFoundReason::Degenerate] {
            assert_eq!(humanize_not_found(reason).severity, Severity::Info);
        }
    }

    #[test]
    fn invalid_image_asks_for_action() {
        let msg = humanize_error(&FlatscanError::InvalidImage("zero width".into()));
        assert_eq!(msg.severity, Severity::ActionRequired);
        assert!(!msg.message.contains("zero width"));
    }

    #[test]
    fn config_errors_are_permanent() {
        let msg = humanize_error(&FlatscanError::Config("bad".into()));
        assert_eq!(msg.severity, Severity::Permanent);
    }
}
