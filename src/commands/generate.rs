//! `generate-pom`, `generate-userlibs` and `combine-userlibs`

use anyhow::{Result, ensure};
use colored::*;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::pom::{self, PomOptions};
use crate::userlibs::{self, UserLibRequest};

pub fn generate_pom(config: &Config, folder: &Path, output: &Path, options: PomOptions) -> Result<()> {
    println!(
        "{} Generating POM XML for JARs in: {}",
        "⚡".yellow(),
        folder.display()
    );
    pom::generate_pom(folder, output, config.base_url(), options)?;
    Ok(())
}

pub fn generate_userlibs(request: &UserLibRequest) -> Result<()> {
    ensure!(!request.library_name.trim().is_empty(), "Library name cannot be empty");
    println!(
        "{} Generating user libraries XML to: {}",
        "⚡".yellow(),
        request.output_xml.display()
    );
    userlibs::generate_userlibs(request)
}

pub fn combine_userlibs(inputs: &[PathBuf], output: &Path) -> Result<()> {
    ensure!(
        inputs.len() > 1,
        "At least two XML files are required to combine"
    );
    println!(
        "{} Combining {} user libraries files into: {}",
        "⚡".yellow(),
        inputs.len(),
        output.display()
    );
    userlibs::merge_userlibs(output, inputs)?;
    Ok(())
}
