//! Eclipse user library files.
//!
//! Generation pairs every jar in a directory with its `-sources.jar` (same
//! group, artifact and version) and writes one `<library>`. Merging copies
//! the `<library>` elements of several such files into one document.

use crate::coordinate::ResolvedArtifact;
use crate::inventory::{self, ScanOptions};
use crate::ui;
use anyhow::{Context, Result, bail};
use regex::Regex;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const ROOT_TAG: &str = "eclipse-userlibraries";

static ROOT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*(?:<\?xml[^>]*\?>\s*)?(?:<!--.*?-->\s*)*<([A-Za-z_][\w.-]*)").expect("valid regex")
});
static LIBRARY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<library\b[^>]*?/>|<library\b[^>]*>.*?</library>").expect("valid regex")
});

/// A jar and, when one was found, its sources jar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPair {
    pub artifact: ResolvedArtifact,
    pub sources: Option<ResolvedArtifact>,
}

#[derive(Debug, Clone)]
pub struct UserLibRequest {
    pub library_name: String,
    pub spec_file: PathBuf,
    pub output_xml: PathBuf,
    pub jars_dir: PathBuf,
    pub sources_dir: Option<PathBuf>,
}

pub fn generate_userlibs(request: &UserLibRequest) -> Result<()> {
    tracing::info!("starting user library generation");
    if !request.spec_file.exists() {
        bail!("Spec file does not exist: {}", request.spec_file.display());
    }
    let out_parent = match request.output_xml.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !out_parent.exists() {
        bail!("Output folder does not exist: {}", out_parent.display());
    }
    if let Some(dir) = &request.sources_dir
        && !dir.exists()
    {
        bail!("Source JARs path does not exist: {}", dir.display());
    }

    let jars = inventory::scan_directory(&request.jars_dir, &ScanOptions::all_jars())
        .with_context(|| format!("Failed to scan {}", request.jars_dir.display()))?;
    if jars.is_empty() {
        ui::error(format!(
            "No JAR files found in target folder: {}",
            request.jars_dir.display()
        ));
        return Ok(());
    }

    let sources = match &request.sources_dir {
        Some(dir) => {
            let found = inventory::scan_directory(dir, &ScanOptions::sources())
                .with_context(|| format!("Failed to scan {}", dir.display()))?;
            if found.is_empty() {
                ui::error(format!("No source JAR files found in source folder: {}", dir.display()));
                return Ok(());
            }
            found
        }
        None => Vec::new(),
    };

    let pairs = pair_sources(jars, &sources);
    let xml = render_userlibs(&request.library_name, &pairs);
    fs::write(&request.output_xml, xml)
        .with_context(|| format!("Failed to write {}", request.output_xml.display()))?;
    ui::success(format!(
        "User libraries file generated successfully: {}",
        request.output_xml.display()
    ));
    Ok(())
}

pub fn pair_sources(artifacts: Vec<ResolvedArtifact>, sources: &[ResolvedArtifact]) -> Vec<ArtifactPair> {
    artifacts
        .into_iter()
        .map(|artifact| {
            let sources = sources.iter().find(|s| s.same_release(&artifact)).cloned();
            ArtifactPair { artifact, sources }
        })
        .collect()
}

pub fn render_userlibs(library_name: &str, pairs: &[ArtifactPair]) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(out, "<{ROOT_TAG} version=\"2\">");
    let _ = writeln!(
        out,
        "  <library name=\"{}\" systemlibrary=\"false\">",
        escape_attr(library_name)
    );
    for pair in pairs {
        let jar = slash_path(pair.artifact.path());
        match pair.sources.as_ref().map(|s| slash_path(s.path())) {
            Some(src) if !src.is_empty() => {
                let _ = writeln!(
                    out,
                    "    <archive path=\"{}\" source=\"{}\" />",
                    escape_attr(&jar),
                    escape_attr(&src)
                );
            }
            _ => {
                let _ = writeln!(out, "    <archive path=\"{}\" />", escape_attr(&jar));
            }
        }
    }
    out.push_str("  </library>\n");
    let _ = writeln!(out, "</{ROOT_TAG}>");
    out
}

/// Combines the libraries of every input into `output`, in input order.
pub fn merge_userlibs(output: &Path, inputs: &[PathBuf]) -> Result<usize> {
    let mut libraries = Vec::new();
    for input in inputs {
        let xml = fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))?;
        libraries.extend(extract_libraries(&xml).with_context(|| format!("Invalid user libraries file {}", input.display()))?);
    }

    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(out, "<{ROOT_TAG} version=\"2\">");
    for library in &libraries {
        let _ = writeln!(out, "  {}", library.trim());
    }
    let _ = writeln!(out, "</{ROOT_TAG}>");

    fs::write(output, out).with_context(|| format!("Failed to write {}", output.display()))?;
    ui::success(format!(
        "Merged {} libraries into {}",
        libraries.len(),
        output.display()
    ));
    Ok(libraries.len())
}

/// Raw `<library>` elements of a user libraries document.
pub fn extract_libraries(xml: &str) -> Result<Vec<String>> {
    let root = ROOT_RE
        .captures(xml)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());
    if root != Some(ROOT_TAG) {
        bail!("Expected <{ROOT_TAG}> root element, found {:?}", root.unwrap_or("nothing"));
    }
    Ok(LIBRARY_RE
        .find_iter(xml)
        .map(|m| m.as_str().to_string())
        .collect())
}

fn slash_path(path: Option<&Path>) -> String {
    path.map(|p| p.to_string_lossy().replace('\\', "/"))
        .unwrap_or_default()
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
