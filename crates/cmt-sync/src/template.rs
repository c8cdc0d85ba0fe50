//! Issue title/body templates.
//!
//! Templates are Liquid. [`LiquidEngine`] renders them with the `liquid`
//! standard library, so filters (`| upcase`, `| default: "n/a"`),
//! comparisons in `if` and the `comment`/`raw` tags all work in custom
//! template files.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::error::SyncError;

/// Bundled title template.
pub const DEFAULT_TITLE_TEMPLATE: &str = include_str!("templates/issue_title.liquid");
/// Bundled body template.
pub const DEFAULT_BODY_TEMPLATE: &str = include_str!("templates/issue_body.liquid");

/// A template variable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TemplateValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

pub type TemplateVariables = BTreeMap<String, TemplateValue>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template engine setup failed: {0}")]
    Setup(String),

    #[error("template does not parse: {0}")]
    Parse(String),

    #[error("template does not render: {0}")]
    Render(String),
}

/// Renders a template source against a variable set.
pub trait TemplateEngine {
    /// # Errors
    ///
    /// [`TemplateError`] when the source is malformed.
    fn expand(&self, source: &str, variables: &TemplateVariables) -> Result<String, TemplateError>;

    /// Check that `source` is well formed without rendering it.
    ///
    /// # Errors
    ///
    /// [`TemplateError`] when the source is malformed.
    fn check(&self, source: &str) -> Result<(), TemplateError>;
}

/// Title and body template sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueTemplates {
    pub title: String,
    pub body: String,
}

impl Default for IssueTemplates {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE_TEMPLATE.to_string(),
            body: DEFAULT_BODY_TEMPLATE.to_string(),
        }
    }
}

impl IssueTemplates {
    /// Read custom templates; `None` keeps the bundled one.
    ///
    /// # Errors
    ///
    /// [`SyncError::TemplateNotFound`] when a given file does not exist,
    /// [`SyncError::Io`] when it cannot be read.
    pub fn load(title: Option<&Path>, body: Option<&Path>) -> Result<Self, SyncError> {
        let mut templates = Self::default();
        if let Some(path) = title {
            templates.title = read_template(path)?;
        }
        if let Some(path) = body {
            templates.body = read_template(path)?;
        }
        Ok(templates)
    }
}

fn read_template(path: &Path) -> Result<String, SyncError> {
    if !path.exists() {
        return Err(SyncError::TemplateNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

// ── Liquid ─────────────────────────────────────────────────────────

/// [`TemplateEngine`] over a `liquid` parser with the standard tags and
/// filters.
pub struct LiquidEngine {
    parser: liquid::Parser,
}

impl std::fmt::Debug for LiquidEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiquidEngine").finish_non_exhaustive()
    }
}

impl LiquidEngine {
    /// # Errors
    ///
    /// [`TemplateError::Setup`] when the standard library cannot be registered.
    pub fn new() -> Result<Self, TemplateError> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .build()
            .map_err(|e| TemplateError::Setup(e.to_string()))?;
        Ok(Self { parser })
    }

    fn parse(&self, source: &str) -> Result<liquid::Template, TemplateError> {
        self.parser
            .parse(source)
            .map_err(|e| TemplateError::Parse(e.to_string()))
    }
}

impl TemplateEngine for LiquidEngine {
    fn expand(&self, source: &str, variables: &TemplateVariables) -> Result<String, TemplateError> {
        let template = self.parse(source)?;
        let globals =
            liquid::to_object(variables).map_err(|e| TemplateError::Render(e.to_string()))?;
        template
            .render(&globals)
            .map_err(|e| TemplateError::Render(e.to_string()))
    }

    fn check(&self, source: &str) -> Result<(), TemplateError> {
        self.parse(source).map(drop)
    }
}
