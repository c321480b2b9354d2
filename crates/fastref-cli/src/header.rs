use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fastref_syntax::parse_header;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderReport {
    pub file: PathBuf,
    /// Empty for the root package.
    pub package: String,
    pub imports: Vec<ImportLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportLine {
    pub path: String,
    pub alias: Option<String>,
    pub star: bool,
}

impl ImportLine {
    pub fn render(&self) -> String {
        match (&self.alias, self.star) {
            (_, true) => format!("import {}.*", self.path),
            (Some(alias), false) => format!("import {} as {alias}", self.path),
            (None, false) => format!("import {}", self.path),
        }
    }
}

pub fn header_report(file: &Path) -> Result<HeaderReport> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Ok(header_report_for_source(file, &source))
}

pub fn header_report_for_source(file: &Path, source: &str) -> HeaderReport {
    let header = parse_header(source);
    HeaderReport {
        file: file.to_path_buf(),
        package: header
            .package
            .map(|package| package.to_dotted())
            .unwrap_or_default(),
        imports: header
            .imports
            .iter()
            .map(|import| ImportLine {
                path: import.path.to_dotted(),
                alias: import.alias.as_ref().map(|alias| alias.to_string()),
                star: import.is_star,
            })
            .collect(),
    }
}
