//! Reading and writing project documents.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use serde_json::json;

use crate::error_codes::CodedError;
use crate::schema::Project;

const FALLBACK_EXPORT_STEM: &str = "veo-prompt";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn from_keyword(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => Err(anyhow!(CodedError::usage(
                "INVALID_EXPORT_FORMAT",
                format!("invalid export format '{value}'"),
            )
            .with_details(json!({
                "provided": value,
                "allowed": ["json", "yaml"]
            })))),
        }
    }

    pub fn for_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("yaml" | "yml") => Self::Yaml,
            _ => Self::Json,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

pub fn load_project(path: &Path) -> Result<Project> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read project {}", path.display()))?;
    parse_project(&contents, ExportFormat::for_path(path))
        .with_context(|| format!("failed to parse project {}", path.display()))
}

pub fn parse_project(contents: &str, format: ExportFormat) -> Result<Project> {
    match format {
        ExportFormat::Json => serde_json::from_str(contents).map_err(|error| {
            anyhow!(
                "invalid json at line {}, column {}: {}",
                error.line(),
                error.column(),
                error
            )
        }),
        ExportFormat::Yaml => serde_yaml::from_str(contents).map_err(|error| {
            let location = error
                .location()
                .map(|location| format!("line {}, column {}", location.line(), location.column()))
                .unwrap_or_else(|| "unknown location".to_owned());
            anyhow!("invalid yaml at {}: {}", location, error)
        }),
    }
}

/// Pretty JSON (two-space indent) or YAML rendering of the document.
pub fn render_project(project: &Project, format: ExportFormat) -> Result<String> {
    let mut rendered = match format {
        ExportFormat::Json => {
            serde_json::to_string_pretty(project).context("failed to serialize project")?
        }
        ExportFormat::Yaml => {
            serde_yaml::to_string(project).context("failed to serialize project")?
        }
    };
    if !rendered.ends_with('\n') {
        rendered.push('\n');
    }
    Ok(rendered)
}

pub fn write_project(path: &Path, project: &Project, format: ExportFormat) -> Result<()> {
    let rendered = render_project(project, format)?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    fs::write(path, rendered).with_context(|| format!("failed to write {}", path.display()))
}

/// Download name for an export: the title, or `veo-prompt` when it is blank.
pub fn export_file_name(project: &Project, format: ExportFormat) -> String {
    let title = project.title.trim();
    let stem = if title.is_empty() {
        FALLBACK_EXPORT_STEM
    } else {
        title
    };
    let stem = stem.replace(['/', '\\'], "-");
    format!("{stem}.{}", format.extension())
}

/// Reads free text from a file, or from stdin when `source` is `-`.
pub fn read_text_input(source: &Path) -> Result<String> {
    if source.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read text from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(source).with_context(|| format!("failed to read {}", source.display()))
}
