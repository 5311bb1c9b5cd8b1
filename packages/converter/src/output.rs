//! Rendering and saving of converted documents.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use crate::error::{ConverterError, Result};
use crate::parser::ParserKind;
use crate::types::{Document, Metadata};

/// Serialization format of the output document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

impl OutputFormat {
    /// File extension without the dot.
    #[must_use]
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}

/// Render a document in the given format.
///
/// JSON is pretty-printed. YAML starts with a document marker. Both end with
/// a newline.
pub fn render(document: &Document, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut content = serde_json::to_string_pretty(document)?;
            content.push('\n');
            Ok(content)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yaml_ng::to_string(document)?;
            let yaml = yaml.strip_prefix("---\n").unwrap_or(&yaml);
            Ok(format!("---\n{yaml}"))
        }
    }
}

/// File name for a converted catalog.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use pki_policy_converter::output::{output_file_name, OutputFormat};
/// use pki_policy_converter::parser::ParserKind;
/// use pki_policy_converter::types::Metadata;
///
/// let metadata = Metadata::new("Example CP", "2.1", Utc::now());
/// assert_eq!(
///     output_file_name(&metadata, ParserKind::Simple, OutputFormat::Json),
///     "example_cp-2.1-oscal-1.1.2-simple.json"
/// );
/// ```
#[must_use]
pub fn output_file_name(metadata: &Metadata, parser: ParserKind, format: OutputFormat) -> String {
    let version: String = metadata
        .version
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!(
        "{}-{}-oscal-{}-{}.{}",
        metadata.to_slug(),
        version,
        metadata.oscal_version,
        parser,
        format.extension()
    )
}

/// Save a document into `output_dir`.
///
/// Writes to a temporary file, syncs it, then renames it into place.
///
/// # Returns
/// Path to the saved file
///
/// # Errors
/// `ConverterError::EmptyDocument` when the document has no catalog, or an
/// I/O or serialization error.
pub fn save_document(
    document: &Document,
    parser: ParserKind,
    format: OutputFormat,
    output_dir: &Path,
) -> Result<PathBuf> {
    let catalog = document
        .catalog
        .as_ref()
        .ok_or(ConverterError::EmptyDocument)?;

    fs::create_dir_all(output_dir)?;
    let file_name = output_file_name(&catalog.metadata, parser, format);
    let output_file = output_dir.join(&file_name);
    let temp_file = output_dir.join(format!(".{file_name}.tmp"));

    let content = render(document, format)?;

    {
        let mut file = File::create(&temp_file)?;
        file.write_all(content.as_bytes())?;
        file.sync_all()?;
    }

    // On Windows, rename fails if the destination already exists
    #[cfg(target_os = "windows")]
    if output_file.exists() {
        fs::remove_file(&output_file)?;
    }

    fs::rename(&temp_file, &output_file)?;

    tracing::debug!(path = %output_file.display(), "Saved document");
    Ok(output_file)
}
