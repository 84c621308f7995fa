//! `<dependencies>` snippets from a directory of jars.
//!
//! Optionally writes a companion `.additional` listing next to the POM
//! snippet, either as `group:artifact:version` lines or as mail-friendly
//! blocks with a download URL.

use crate::coordinate::{ResolvedArtifact, artifact_path, jar_url};
use crate::inventory::{self, ScanOptions};
use crate::ui;
use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const SEPARATOR: &str = "--------------------------------------------------------";

#[derive(Debug, Clone, Copy, Default)]
pub struct PomOptions {
    pub additional: bool,
    pub email_friendly: bool,
}

/// Returns the paths written, or an empty list when `dir` has no
/// identifiable jars.
pub fn generate_pom(dir: &Path, output: &Path, base_url: &str, options: PomOptions) -> Result<Vec<PathBuf>> {
    let artifacts = inventory::scan_directory(dir, &ScanOptions::primary())
        .with_context(|| format!("Failed to scan {}", dir.display()))?;
    if artifacts.is_empty() {
        ui::warn(format!("No JAR files found in the directory: {}", dir.display()));
        return Ok(Vec::new());
    }

    fs::write(output, render_dependencies(&artifacts))
        .with_context(|| format!("Failed to write {}", output.display()))?;
    ui::success(format!("POM entries written to: {}", output.display()));
    let mut written = vec![output.to_path_buf()];

    if options.additional {
        let path = additional_path(output);
        let body = artifacts
            .iter()
            .map(|a| additional_entry(a, base_url, options.email_friendly))
            .collect::<String>();
        fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
        ui::success(format!("Additional information written to: {}", path.display()));
        written.push(path);
    }
    Ok(written)
}

pub fn render_dependencies(artifacts: &[ResolvedArtifact]) -> String {
    let mut out = String::from("<dependencies>\n");
    for artifact in artifacts {
        let c = &artifact.coordinate;
        let _ = write!(
            out,
            " <dependency>\n <groupId>{}</groupId>\n <artifactId>{}</artifactId>\n <version>{}</version>\n </dependency>\n",
            c.group_id,
            c.artifact_id,
            c.version.as_deref().unwrap_or("latest")
        );
    }
    out.push_str("</dependencies>\n");
    out
}

pub fn additional_entry(artifact: &ResolvedArtifact, base_url: &str, email_friendly: bool) -> String {
    let c = &artifact.coordinate;
    let version = c.version.as_deref().unwrap_or("latest");
    if !email_friendly {
        return format!("{}:{}:{}\n", c.group_id, c.artifact_id, version);
    }
    let url = jar_url(&artifact_path(base_url, c), &c.artifact_id, version);
    format!(
        "Group ID: {}\nArtifact ID: {}\nVersion: {}\nURL: {}\n{}\n",
        c.group_id, c.artifact_id, version, url, SEPARATOR
    )
}

/// `deps.xml` → `deps.additional` in the same directory.
pub fn additional_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}.additional"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Coordinate;

    fn guava() -> ResolvedArtifact {
        ResolvedArtifact::new(
            Coordinate::new("com.google.guava", "guava").with_version("33.1.0-jre"),
            None,
        )
    }

    #[test]
    fn test_render_dependencies() {
        let xml = render_dependencies(&[guava()]);
        assert!(xml.starts_with("<dependencies>\n"));
        assert!(xml.contains("<groupId>com.google.guava</groupId>"));
        assert!(xml.contains("<artifactId>guava</artifactId>"));
        assert!(xml.contains("<version>33.1.0-jre</version>"));
        assert!(xml.ends_with("</dependencies>\n"));
    }

    #[test]
    fn test_additional_concise() {
        assert_eq!(
            additional_entry(&guava(), "https://repo", false),
            "com.google.guava:guava:33.1.0-jre\n"
        );
    }

    #[test]
    fn test_additional_email_friendly() {
        let entry = additional_entry(&guava(), "https://repo", true);
        let lines: Vec<&str> = entry.lines().collect();
        assert_eq!(lines[0], "Group ID: com.google.guava");
        assert_eq!(lines[1], "Artifact ID: guava");
        assert_eq!(lines[2], "Version: 33.1.0-jre");
        assert_eq!(
            lines[3],
            "URL: https://repo/com/google/guava/guava/33.1.0-jre/guava-33.1.0-jre.jar"
        );
        assert_eq!(lines[4].len(), 56);
    }

    #[test]
    fn test_additional_path() {
        assert_eq!(
            additional_path(Path::new("out/deps.xml")),
            PathBuf::from("out/deps.additional")
        );
    }

    #[test]
    fn test_empty_directory_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("pom.xml");
        let written = generate_pom(dir.path(), &output, "https://repo", PomOptions::default()).unwrap();
        assert!(written.is_empty());
        assert!(!output.exists());
    }
}
