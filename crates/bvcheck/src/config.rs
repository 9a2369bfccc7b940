//! Processor options.
//!
//! A host tool passes options as `name=value` string pairs:
//!
//! | Option                       | Values                                             | Default |
//! |------------------------------|----------------------------------------------------|---------|
//! | `diagnosticKind`             | `ERROR`, `WARNING`, `MANDATORY_WARNING`, `NOTE`, `OTHER` | `ERROR` |
//! | `verbose`                    | `true`, `false`                                    | `false` |
//! | `methodConstraintsSupported` | `true`, `false`                                    | `true`  |
//!
//! Options with other names belong to other processors and are ignored.

use std::fmt;
use std::str::FromStr;

use bvcheck_rules::{DispatchOptions, Severity};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Option selecting the severity findings are reported with.
pub const DIAGNOSTIC_KIND: &str = "diagnosticKind";
/// Option enabling per-annotation progress output.
pub const VERBOSE: &str = "verbose";
/// Option allowing constraints on methods other than getters.
pub const METHOD_CONSTRAINTS_SUPPORTED: &str = "methodConstraintsSupported";

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `diagnosticKind` names no known kind.
    #[error("Invalid diagnostic kind: {0}")]
    InvalidDiagnosticKind(String),
    /// A boolean option holds something other than `true` or `false`.
    #[error("Invalid value for option {option}: {value}")]
    InvalidFlag { option: String, value: String },
}

/// Diagnostic kinds a host tool understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticKind {
    #[default]
    Error,
    Warning,
    MandatoryWarning,
    Note,
    Other,
}

impl DiagnosticKind {
    pub const ALL: [DiagnosticKind; 5] = [
        DiagnosticKind::Error,
        DiagnosticKind::Warning,
        DiagnosticKind::MandatoryWarning,
        DiagnosticKind::Note,
        DiagnosticKind::Other,
    ];

    /// Option spelling of this kind.
    pub fn name(self) -> &'static str {
        match self {
            DiagnosticKind::Error => "ERROR",
            DiagnosticKind::Warning => "WARNING",
            DiagnosticKind::MandatoryWarning => "MANDATORY_WARNING",
            DiagnosticKind::Note => "NOTE",
            DiagnosticKind::Other => "OTHER",
        }
    }

    /// Severity findings are reported with under this kind.
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::Error => Severity::Error,
            DiagnosticKind::Warning | DiagnosticKind::MandatoryWarning => Severity::Warning,
            DiagnosticKind::Note | DiagnosticKind::Other => Severity::Note,
        }
    }
}

impl FromStr for DiagnosticKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ConfigError::InvalidDiagnosticKind(s.to_string()))
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Checker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Configuration {
    /// Kind findings are reported with
    pub diagnostic_kind: DiagnosticKind,
    /// Log every checked annotation at info level
    pub verbose: bool,
    /// When false, only getters may carry constraints
    pub method_constraints_supported: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            diagnostic_kind: DiagnosticKind::Error,
            verbose: false,
            method_constraints_supported: true,
        }
    }
}

impl Configuration {
    /// Parse processor options; absent options keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown diagnostic kind or a boolean
    /// option that is neither `true` nor `false`.
    pub fn from_options<I, K, V>(options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();
        for (name, value) in options {
            let (name, value) = (name.as_ref(), value.as_ref());
            match name {
                DIAGNOSTIC_KIND => config.diagnostic_kind = value.parse()?,
                VERBOSE => config.verbose = parse_flag(name, value)?,
                METHOD_CONSTRAINTS_SUPPORTED => {
                    config.method_constraints_supported = parse_flag(name, value)?
                }
                _ => debug!(option = name, "ignoring unknown processor option"),
            }
        }

        if config.verbose {
            info!(
                diagnostic_kind = %config.diagnostic_kind,
                method_constraints_supported = config.method_constraints_supported,
                "verbose reporting enabled"
            );
        }
        Ok(config)
    }

    /// Severity findings are reported with.
    pub fn severity(&self) -> Severity {
        self.diagnostic_kind.severity()
    }

    /// Options for building the check dispatcher.
    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            method_constraints_supported: self.method_constraints_supported,
        }
    }
}

fn parse_flag(option: &str, value: &str) -> Result<bool, ConfigError> {
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ConfigError::InvalidFlag {
            option: option.to_string(),
            value: value.to_string(),
        })
    }
}
