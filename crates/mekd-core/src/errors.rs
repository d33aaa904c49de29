//! Error surface of the MEKD crates.
//!
//! Numeric kernels never fail: bad kinematics turn into NaN. Errors are only
//! raised where input enters the engine (event layouts, configuration,
//! serialized documents, generator parameters), and each carries a stable
//! `code` that callers and the CLI report match on.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload shared by every [`MekdError`] family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Kebab-case code, e.g. `leg-count` or `unknown-hypothesis`.
    pub code: String,
    /// What went wrong.
    pub message: String,
    /// Offending values keyed by what they name (`leg`, `hypothesis`, `channel`).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// How to fix the input, when there is an obvious fix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with an empty context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Records `key = value` in the context.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Records the index of the offending event leg.
    pub fn with_leg(self, index: usize) -> Self {
        self.with_context("leg", index.to_string())
    }

    /// Attaches a remediation hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        let mut entries = self.context.iter();
        if let Some((key, value)) = entries.next() {
            write!(f, " ({key}={value}")?;
            for (key, value) in entries {
                write!(f, ", {key}={value}")?;
            }
            write!(f, ")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Errors raised at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum MekdError {
    /// Generator parameters or transforms that are not physical.
    #[error("kinematics: {0}")]
    Kinematics(ErrorInfo),
    /// Event legs that do not match the hypothesis layout.
    #[error("layout: {0}")]
    Layout(ErrorInfo),
    /// Invalid configuration.
    #[error("config: {0}")]
    Config(ErrorInfo),
    /// Unreadable or malformed documents.
    #[error("serde: {0}")]
    Serde(ErrorInfo),
}

impl MekdError {
    /// Payload of the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            MekdError::Kinematics(info)
            | MekdError::Layout(info)
            | MekdError::Config(info)
            | MekdError::Serde(info) => info,
        }
    }

    /// Family name, matching the serialized `family` tag.
    pub fn family(&self) -> &'static str {
        match self {
            MekdError::Kinematics(_) => "Kinematics",
            MekdError::Layout(_) => "Layout",
            MekdError::Config(_) => "Config",
            MekdError::Serde(_) => "Serde",
        }
    }
}
