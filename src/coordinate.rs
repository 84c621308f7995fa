//! Artifact identities and repository layout.
//!
//! A [`Coordinate`] is what a user asks for, a [`ResolvedArtifact`] is what
//! exists on disk (or was just downloaded). URL construction follows the
//! standard Maven 2 repository layout.

use std::fmt;
use std::path::{Path, PathBuf};

/// `group:artifact[:version]` identity of a published archive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    /// `None` means "whatever the repository calls latest".
    pub version: Option<String>,
}

impl Coordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Same logical artifact, version ignored.
    pub fn same_artifact(&self, other: &Coordinate) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }

    /// File name used for the primary archive in a target directory.
    pub fn jar_name(&self) -> String {
        format!("{}.jar", self.artifact_id)
    }

    /// File name used for the sources archive in a source target directory.
    pub fn sources_jar_name(&self) -> String {
        format!("{}-sources.jar", self.artifact_id)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(v) => write!(f, "{}:{}:{}", self.group_id, self.artifact_id, v),
            None => write!(f, "{}:{}", self.group_id, self.artifact_id),
        }
    }
}

/// A coordinate tied to a local archive, if one is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArtifact {
    pub coordinate: Coordinate,
    pub path: Option<PathBuf>,
}

impl ResolvedArtifact {
    pub fn new(coordinate: Coordinate, path: Option<PathBuf>) -> Self {
        Self { coordinate, path }
    }

    pub fn version(&self) -> Option<&str> {
        self.coordinate.version.as_deref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Same group, artifact and version.
    pub fn same_release(&self, other: &ResolvedArtifact) -> bool {
        self.coordinate.same_artifact(&other.coordinate)
            && self.coordinate.version == other.coordinate.version
    }
}

/// Directory URL holding every published version of `coordinate`.
pub fn artifact_path(base_url: &str, coordinate: &Coordinate) -> String {
    format!(
        "{}/{}/{}",
        base_url,
        coordinate.group_id.replace('.', "/"),
        coordinate.artifact_id
    )
}

pub fn jar_url(artifact_path: &str, artifact_id: &str, version: &str) -> String {
    format!("{artifact_path}/{version}/{artifact_id}-{version}.jar")
}

pub fn sources_url(artifact_path: &str, artifact_id: &str, version: &str) -> String {
    format!("{artifact_path}/{version}/{artifact_id}-{version}-sources.jar")
}

pub fn metadata_url(artifact_path: &str) -> String {
    format!("{artifact_path}/maven-metadata.xml")
}
