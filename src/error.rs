//! Error types for etcdadm-cloudinit

use std::fmt;
use thiserror::Error;

/// Stage of the composition engine a template failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateStage {
    /// The template source is not syntactically valid
    Parse,
    /// The template parsed but could not be evaluated against the data
    Execution,
}

impl fmt::Display for TemplateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateStage::Parse => write!(f, "parse"),
            TemplateStage::Execution => write!(f, "execution"),
        }
    }
}

/// Main error type for bootstrap document generation
#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("failed to parse {template} template: {source}")]
    TemplateParse {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("failed to generate {template} template: {source}")]
    TemplateExecution {
        template: String,
        #[source]
        source: minijinja::Error,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BootstrapError {
    /// Create a parse error blaming `template`
    pub fn parse(template: impl Into<String>, source: minijinja::Error) -> Self {
        Self::TemplateParse {
            template: template.into(),
            source,
        }
    }

    /// Create an execution error blaming `template`
    pub fn execution(template: impl Into<String>, source: minijinja::Error) -> Self {
        Self::TemplateExecution {
            template: template.into(),
            source,
        }
    }

    /// Stage of a template failure, `None` for non-template errors
    pub fn stage(&self) -> Option<TemplateStage> {
        match self {
            Self::TemplateParse { .. } => Some(TemplateStage::Parse),
            Self::TemplateExecution { .. } => Some(TemplateStage::Execution),
            _ => None,
        }
    }

    /// Name of the template a failure is attributed to
    pub fn template_name(&self) -> Option<&str> {
        match self {
            Self::TemplateParse { template, .. } | Self::TemplateExecution { template, .. } => {
                Some(template.as_str())
            }
            _ => None,
        }
    }
}
