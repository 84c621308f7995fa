//! Archive downloads.
//!
//! The primary jar lands in the target directory as `{artifactId}.jar`, the
//! optional sources jar in the source directory as
//! `{artifactId}-sources.jar`. Both bodies are fetched before anything is
//! written, so a failed sources request leaves the target untouched.

use crate::coordinate::{Coordinate, ResolvedArtifact, jar_url, sources_url};
use crate::repository::Transport;
use crate::ui;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Where downloaded archives go.
#[derive(Debug, Clone, Copy)]
pub struct FetchTargets<'a> {
    pub target_dir: &'a Path,
    /// `Some` when sources should be downloaded as well.
    pub sources_dir: Option<&'a Path>,
}

pub struct Fetcher<'t> {
    transport: &'t dyn Transport,
    show_progress: bool,
}

impl<'t> Fetcher<'t> {
    pub fn new(transport: &'t dyn Transport) -> Self {
        Self {
            transport,
            show_progress: true,
        }
    }

    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Downloads `coordinate` at `version`. Failures are logged and reported
    /// as `None`.
    pub fn fetch(
        &self,
        coordinate: &Coordinate,
        version: &str,
        artifact_path: &str,
        targets: FetchTargets<'_>,
    ) -> Option<ResolvedArtifact> {
        match self.try_fetch(coordinate, version, artifact_path, targets) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                ui::error(format!("Error downloading {}: {:#}", coordinate.artifact_id, e));
                None
            }
        }
    }

    fn try_fetch(
        &self,
        coordinate: &Coordinate,
        version: &str,
        artifact_path: &str,
        targets: FetchTargets<'_>,
    ) -> Result<ResolvedArtifact> {
        let artifact_id = &coordinate.artifact_id;
        let primary_url = jar_url(artifact_path, artifact_id, version);
        tracing::info!("downloading artifact from {}", primary_url);

        let pb = self.spinner(format!("Downloading {}:{}...", artifact_id, version));
        let primary = self.transport.get(&primary_url);
        let sources = match (&primary, targets.sources_dir) {
            (Ok(_), Some(_)) => {
                let url = sources_url(artifact_path, artifact_id, version);
                tracing::info!("downloading sources from {}", url);
                Some(self.transport.get(&url))
            }
            _ => None,
        };
        pb.finish_and_clear();

        let primary = primary.context("primary jar")?;
        let sources = sources.transpose().context("sources jar")?;

        let jar_path = targets.target_dir.join(coordinate.jar_name());
        write_atomically(&jar_path, &primary)?;

        if let (Some(bytes), Some(dir)) = (sources, targets.sources_dir) {
            write_atomically(&dir.join(coordinate.sources_jar_name()), &bytes)?;
        }

        let resolved = Coordinate::new(coordinate.group_id.as_str(), artifact_id.as_str()).with_version(version);
        Ok(ResolvedArtifact::new(resolved, Some(jar_path)))
    }

    fn spinner(&self, msg: String) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Writes through a temporary file in the destination directory and renames
/// it into place.
fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<()> {
    let dir = dest
        .parent()
        .with_context(|| format!("{} has no parent directory", dest.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(bytes)?;
    tmp.flush()?;
    tmp.persist(dest)
        .with_context(|| format!("Failed to write {}", dest.display()))?;
    Ok(())
}
