//! Severity levels declared by bug patterns

use serde::{Deserialize, Serialize};

/// How serious a bug pattern's findings are.
///
/// Declared once per pattern; there is no default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Style nit or possible improvement
    #[serde(alias = "SUGGESTION")]
    Suggestion,
    /// Likely problem, but valid code exists that triggers it
    #[serde(alias = "WARNING")]
    Warning,
    /// Definite problem
    #[serde(alias = "ERROR")]
    Error,
}

impl Severity {
    /// All severities, most severe first
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warning, Severity::Suggestion];

    pub fn is_error(self) -> bool {
        self == Severity::Error
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Suggestion => write!(f, "suggestion"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "suggestion" | "hint" | "info" => Ok(Severity::Suggestion),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Suggestion);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("WARNING".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("suggestion".parse::<Severity>(), Ok(Severity::Suggestion));
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_display() {
        assert_eq!(format!("{}", Severity::Error), "error");
        assert_eq!(format!("{}", Severity::Warning), "warning");
        assert_eq!(format!("{}", Severity::Suggestion), "suggestion");
    }

    #[test]
    fn test_severity_deserialize_upper_case() {
        let sev: Severity = serde_yaml::from_str("ERROR").unwrap();
        assert_eq!(sev, Severity::Error);
        let sev: Severity = serde_yaml::from_str("suggestion").unwrap();
        assert_eq!(sev, Severity::Suggestion);
    }
}
