//! Page setup and settings errors
//!
//! The sequencer itself cannot fail; wiring it to a page can, and stored
//! settings can be out of range.

use thiserror::Error;

/// Reasons the page could not be wired up
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SetupError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("missing element `{selector}`")]
    MissingElement { selector: String },
    #[error("element `{selector}` is not an HTML element")]
    NotHtmlElement { selector: String },
    #[error("DOM call failed: {0}")]
    Js(String),
}

impl SetupError {
    pub fn missing(selector: impl Into<String>) -> Self {
        SetupError::MissingElement {
            selector: selector.into(),
        }
    }
}

/// Stored or query settings that would break the run
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SettingsError {
    #[error("`{field}` must be a finite, non-negative number (got {value})")]
    NotNonNegative { field: &'static str, value: f64 },
    #[error("`{field}` must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },
    #[error("`{field}` range is reversed ({min} > {max})")]
    ReversedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("`{field}` must be a percentage (got {value})")]
    NotPercent { field: &'static str, value: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_selector() {
        assert_eq!(
            SetupError::missing("#pill-blue .overlay").to_string(),
            "missing element `#pill-blue .overlay`"
        );
        assert_eq!(
            SetupError::NotHtmlElement {
                selector: "#stats".into()
            }
            .to_string(),
            "element `#stats` is not an HTML element"
        );
    }

    #[test]
    fn test_settings_messages_name_the_field() {
        assert_eq!(
            SettingsError::NotPositive {
                field: "bubbles.interval_min_ms",
                value: 0.0
            }
            .to_string(),
            "`bubbles.interval_min_ms` must be greater than zero (got 0)"
        );
        assert_eq!(
            SettingsError::ReversedRange {
                field: "bubbles.size",
                min: 24.0,
                max: 6.0
            }
            .to_string(),
            "`bubbles.size` range is reversed (24 > 6)"
        );
    }
}
