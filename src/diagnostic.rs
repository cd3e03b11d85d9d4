//! Diagnostics handed to the compiler's emitter

use crate::link::{resolve_link, SiteBase};
use crate::pattern::BugPattern;
use crate::severity::Severity;
use serde::Serialize;
use std::fmt;

/// One flagged site, as the emitter renders it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Name of the check that fired
    pub check_name: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Documentation link, absent for `NONE` or an unresolvable name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl Diagnostic {
    /// Diagnostic for `pattern` using its summary as the message
    pub fn for_pattern(pattern: &BugPattern, site: &SiteBase) -> Self {
        let link = match resolve_link(pattern, site) {
            Ok(link) => link,
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        };

        Self {
            check_name: pattern.name().to_string(),
            severity: pattern.severity(),
            message: pattern.summary().to_string(),
            link,
        }
    }

    /// Replace the default message
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// `[Name] message`, followed by the link on its own line
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.check_name, self.message)?;
        if let Some(link) = &self.link {
            write!(f, "\n    (see {})", link)?;
        }
        Ok(())
    }
}
