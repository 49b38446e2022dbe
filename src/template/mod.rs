//! HTML template module
//!
//! Templates are plain HTML with `{{ name }}` placeholders. Substituted values
//! are HTML-escaped. Both page templates are read once at startup and shared
//! read-only through the application state.

use pulldown_cmark_escape::escape_html;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const VIEW_TEMPLATE: &str = "view.html";
pub const EDIT_TEMPLATE: &str = "edit.html";

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read template '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("template '{name}': unterminated '{{{{' at byte {offset}")]
    Unterminated { name: String, offset: usize },
    #[error("template '{name}': empty placeholder at byte {offset}")]
    EmptyPlaceholder { name: String, offset: usize },
    #[error("template '{name}': no value for placeholder '{field}'")]
    MissingField { name: String, field: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(String),
}

/// A parsed template
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template source; fails on an unterminated or empty placeholder
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Text(rest[..open].to_string()));
            }
            let after_open = &rest[open + 2..];
            let Some(close) = after_open.find("}}") else {
                return Err(TemplateError::Unterminated {
                    name: name.to_string(),
                    offset: offset + open,
                });
            };
            let field = after_open[..close].trim();
            if field.is_empty() {
                return Err(TemplateError::EmptyPlaceholder {
                    name: name.to_string(),
                    offset: offset + open,
                });
            }
            segments.push(Segment::Field(field.to_string()));

            let consumed = open + 2 + close + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            segments,
        })
    }

    pub async fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| TemplateError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self::parse(&name, &source)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render with the given values. Every placeholder must have a value.
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(field) => {
                    let value =
                        values
                            .get(field.as_str())
                            .ok_or_else(|| TemplateError::MissingField {
                                name: self.name.clone(),
                                field: field.clone(),
                            })?;
                    escape_html(&mut out, value).expect("writing to a String cannot fail");
                }
            }
        }
        Ok(out)
    }
}

/// The read view and edit form templates
#[derive(Debug, Clone)]
pub struct Templates {
    pub view: Template,
    pub edit: Template,
}

impl Templates {
    /// Load `view.html` and `edit.html` from a directory
    pub async fn load(dir: &Path) -> Result<Self, TemplateError> {
        Ok(Self {
            view: Template::load(&dir.join(VIEW_TEMPLATE)).await?,
            edit: Template::load(&dir.join(EDIT_TEMPLATE)).await?,
        })
    }

    pub fn from_sources(view: &str, edit: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            view: Template::parse(VIEW_TEMPLATE, view)?,
            edit: Template::parse(EDIT_TEMPLATE, edit)?,
        })
    }
}
