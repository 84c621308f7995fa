//! Local archive inventory.
//!
//! Identifies the jars already present in a directory by reading the
//! `pom.properties` descriptor Maven embeds in every published archive.

use crate::coordinate::{Coordinate, ResolvedArtifact};
use crate::ui;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Entry-name prefixes searched for a descriptor, highest priority first.
const DESCRIPTOR_LOCATIONS: &[&str] = &["META-INF/maven/", "META-INF/"];
const DESCRIPTOR_NAME: &str = "pom.properties";

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("cannot list directory {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File-name suffix a candidate must end with (e.g. `.jar`).
    pub suffix: String,
    /// Skip any file whose name contains `sources`.
    pub exclude_sources: bool,
}

impl ScanOptions {
    /// Primary archives: `*.jar`, sources excluded.
    pub fn primary() -> Self {
        Self {
            suffix: ".jar".to_string(),
            exclude_sources: true,
        }
    }

    /// Source archives: `*-sources.jar`.
    pub fn sources() -> Self {
        Self {
            suffix: "-sources.jar".to_string(),
            exclude_sources: false,
        }
    }

    /// Every `*.jar`, sources treated as ordinary artifacts.
    pub fn all_jars() -> Self {
        Self {
            suffix: ".jar".to_string(),
            exclude_sources: false,
        }
    }

    fn accepts(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.suffix) && !(self.exclude_sources && file_name.contains("sources"))
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::primary()
    }
}

/// Lists qualifying archives in `dir`, sorted by file name.
pub fn list_archives(dir: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>, InventoryError> {
    if dir.exists() && !dir.is_dir() {
        return Err(InventoryError::NotADirectory(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| InventoryError::List {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if options.accepts(&name) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Scans `dir` and returns one artifact per identifiable archive.
///
/// Archives without a usable descriptor are reported and left out. An empty
/// result is not an error; callers decide whether that deserves a warning.
pub fn scan_directory(dir: &Path, options: &ScanOptions) -> Result<Vec<ResolvedArtifact>, InventoryError> {
    let files = list_archives(dir, options)?;
    Ok(identify_archives(&files))
}

pub fn identify_archives(files: &[PathBuf]) -> Vec<ResolvedArtifact> {
    files
        .iter()
        .filter_map(|path| match read_identity(path) {
            Ok(Some(coordinate)) => Some(ResolvedArtifact::new(coordinate, Some(path.clone()))),
            Ok(None) => {
                ui::warn(format!("No POM properties found in JAR: {}", path.display()));
                None
            }
            Err(e) => {
                ui::error(format!("An error occurred while processing JAR file {}: {}", path.display(), e));
                None
            }
        })
        .collect()
}

/// Reads the coordinate embedded in a jar.
///
/// `Ok(None)` means the archive is readable but carries no complete
/// descriptor.
pub fn read_identity(jar: &Path) -> zip::result::ZipResult<Option<Coordinate>> {
    let file = fs::File::open(jar)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let names: Vec<String> = archive.file_names().map(str::to_string).collect();
    for prefix in DESCRIPTOR_LOCATIONS {
        let Some(name) = names
            .iter()
            .find(|n| n.starts_with(prefix) && n.ends_with(DESCRIPTOR_NAME))
        else {
            continue;
        };

        let mut content = String::new();
        if let Err(e) = archive.by_name(name)?.read_to_string(&mut content) {
            tracing::error!("could not read {} in {}: {}", name, jar.display(), e);
            continue;
        }
        let props = parse_properties(&content);
        return Ok(coordinate_from_properties(&props));
    }
    Ok(None)
}

fn coordinate_from_properties(props: &HashMap<String, String>) -> Option<Coordinate> {
    let group = props.get("groupId").filter(|v| !v.is_empty())?;
    let artifact = props.get("artifactId").filter(|v| !v.is_empty())?;
    let version = props.get("version").filter(|v| !v.is_empty())?;
    Some(Coordinate::new(group.as_str(), artifact.as_str()).with_version(version.as_str()))
}

/// Minimal reader for Java `.properties` text: `key=value` or `key: value`,
/// `#`/`!` comments, surrounding whitespace trimmed. Line continuations and
/// unicode escapes are not interpreted; Maven never writes them here.
pub fn parse_properties(content: &str) -> HashMap<String, String> {
    let mut props = HashMap::new();
    for raw in content.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }
        let split_at = line.find(['=', ':']);
        let (key, value) = match split_at {
            Some(idx) => (&line[..idx], &line[idx + 1..]),
            None => (line, ""),
        };
        props.insert(key.trim().to_string(), value.trim().to_string());
    }
    props
}
