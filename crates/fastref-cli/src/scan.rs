use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fastref_config::FastrefConfig;
use fastref_core::{FqName, LineIndex, PackageName, TextSize};
use fastref_resolve::{
    ClassResolver, FileContext, ReferenceFacts, ReferenceRole, StatsSnapshot, TargetSpec, Verdict,
};
use fastref_syntax::{find_type_references, parse_header};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: &[&str] = &[".git", "build", "target", "out"];

/// Command-line overrides applied on top of `fastref.toml`.
#[derive(Debug, Default)]
pub struct ScanOverrides {
    pub target: Option<String>,
    pub conflicts: Vec<String>,
}

/// A configured resolver plus the packages every file implicitly imports.
#[derive(Debug)]
pub struct Scanner {
    resolver: ClassResolver,
    implicit_imports: Vec<PackageName>,
}

impl Scanner {
    pub fn from_config(config: &FastrefConfig, overrides: &ScanOverrides) -> Result<Self> {
        let target = match &overrides.target {
            Some(text) => Some(FqName::parse(text).with_context(|| format!("invalid --target `{text}`"))?),
            None => config.target_name()?,
        };
        let target = target
            .context("no target class: pass --target or set `target` in fastref.toml")?;

        let mut resolver = ClassResolver::new(TargetSpec::new(target));
        for conflict in config.conflict_names()? {
            resolver.add_conflict(conflict);
        }
        for text in &overrides.conflicts {
            let conflict =
                FqName::parse(text).with_context(|| format!("invalid --conflict `{text}`"))?;
            resolver.add_conflict(conflict);
        }
        for package in config.type_alias_package_names()? {
            resolver.add_type_alias_package(package);
        }

        Ok(Self {
            resolver,
            implicit_imports: config.implicit_import_packages()?,
        })
    }

    pub fn resolver(&self) -> &ClassResolver {
        &self.resolver
    }

    /// Resolves every candidate occurrence in one file.
    pub fn scan_source(&self, file: &str, source: &str) -> Vec<Finding> {
        let context = FileContext::from_header(&parse_header(source))
            .with_implicit_imports(&self.implicit_imports);
        let names = self.resolver.candidate_names(&context);
        let lines = LineIndex::new(source);

        let mut findings = Vec::new();
        for occurrence in find_type_references(source, &names) {
            let facts = match ReferenceFacts::try_from(&occurrence) {
                Ok(facts) => facts,
                Err(err) => {
                    tracing::warn!(target: "fastref.scan", file, error = %err, "skipping malformed reference");
                    continue;
                }
            };
            let verdict = self.resolver.resolve(&context, &facts);
            let (line, column) = lines.line_col(occurrence.range.start()).one_based();
            let text = match &occurrence.qualifier {
                Some(qualifier) => format!("{qualifier}.{}", occurrence.name),
                None => occurrence.name.to_string(),
            };
            findings.push(Finding {
                file: file.to_owned(),
                line,
                column,
                role: facts.role(),
                text,
                verdict,
            });
        }
        findings
    }

    /// Scans every Kotlin file under `root` (or `root` itself when it is a file).
    ///
    /// The report's stats cover this scan only.
    pub fn scan_path(&self, root: &Path) -> Result<ScanReport> {
        let files = kotlin_files_in(root)?;
        tracing::debug!(target: "fastref.scan", root = %root.display(), files = files.len(), "scanning");
        self.resolver.reset_stats();

        let per_file = files
            .par_iter()
            .map(|path| -> Result<Option<Vec<Finding>>> {
                let len = fs::metadata(path)
                    .with_context(|| format!("failed to read {}", path.display()))?
                    .len();
                if !fits_text_size(len) {
                    tracing::warn!(
                        target: "fastref.scan",
                        file = %path.display(),
                        len,
                        "skipping file too large for 32-bit offsets"
                    );
                    return Ok(None);
                }

                let source = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                let display = path.strip_prefix(root).unwrap_or(path);
                let display = if display.as_os_str().is_empty() {
                    path.as_path()
                } else {
                    display
                };
                Ok(Some(self.scan_source(&display.display().to_string(), &source)))
            })
            .collect::<Result<Vec<_>>>()?;

        let files_skipped = per_file.iter().filter(|f| f.is_none()).count();
        let findings: Vec<Finding> = per_file.into_iter().flatten().flatten().collect();
        let mut summary = ScanSummary {
            files_scanned: files.len() - files_skipped,
            files_skipped,
            ..ScanSummary::default()
        };
        for finding in &findings {
            match finding.verdict {
                Verdict::Match => summary.matches += 1,
                Verdict::NoMatch => summary.no_matches += 1,
                Verdict::Indeterminate => summary.indeterminate += 1,
            }
        }

        Ok(ScanReport {
            root: root.to_path_buf(),
            target: self.resolver().target().fq_name().to_dotted(),
            findings,
            summary,
            stats: self.resolver().stats(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub role: ReferenceRole,
    /// The reference as written, including any qualifier.
    pub text: String,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub files_scanned: usize,
    /// Files too large to index.
    pub files_skipped: usize,
    #[serde(rename = "match")]
    pub matches: usize,
    #[serde(rename = "no_match")]
    pub no_matches: usize,
    pub indeterminate: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub target: String,
    pub findings: Vec<Finding>,
    pub summary: ScanSummary,
    pub stats: StatsSnapshot,
}

pub fn role_label(role: ReferenceRole) -> &'static str {
    match role {
        ReferenceRole::AnnotationEntry => "annotation",
        ReferenceRole::SupertypeEntry => "supertype",
        ReferenceRole::Other => "other",
    }
}

pub fn verdict_label(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Match => "match",
        Verdict::NoMatch => "no_match",
        Verdict::Indeterminate => "indeterminate",
    }
}

/// Token offsets are [`TextSize`] (`u32`).
fn fits_text_size(len: u64) -> bool {
    usize::try_from(len).is_ok_and(|len| TextSize::try_from(len).is_ok())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_kotlin_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("kt") | Some("kts")
    )
}

fn kotlin_files_in(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        anyhow::bail!("path does not exist: {}", root.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry))
    {
        let entry = entry?;
        if entry.file_type().is_file() && is_kotlin_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
