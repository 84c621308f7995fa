//! # jar-manager CLI Entry Point
//!
//! Parses CLI arguments with clap, resolves the configuration once and
//! routes to the command handlers.
//!
//! ## Command Structure
//!
//! - **Download**: `download-jars`
//! - **Generate**: `generate-pom`, `generate-userlibs`, `combine-userlibs`
//! - **Shell**: `completion`

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use jar_manager::commands;
use jar_manager::config::Config;
use jar_manager::logging;
use jar_manager::pom::PomOptions;
use jar_manager::reconcile::DownloadRequest;
use jar_manager::userlibs::UserLibRequest;

#[derive(Parser)]
#[command(name = "jar-manager")]
#[command(about = "JAR Manager command-line utility", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download JARs listed in a coordinate list file
    DownloadJars {
        /// Path to the coordinate list (one group:artifact[:version] per line)
        spec_file: PathBuf,
        /// Folder the downloaded JARs are saved to
        #[arg(long)]
        target_folder: PathBuf,
        /// Folder the source JARs are saved to (enables source download)
        #[arg(long)]
        source_target_folder: Option<PathBuf>,
        /// Only replace JAR files if a different version was requested
        #[arg(long)]
        update_different_only: bool,
        /// Changes log file to append to
        #[arg(long)]
        changes_log: Option<PathBuf>,
    },
    /// Generate POM dependency entries from a folder of JARs
    GeneratePom {
        /// Folder containing the .jar files
        #[arg(long)]
        folder_path: PathBuf,
        /// Output file for the generated XML
        #[arg(long)]
        output_path: PathBuf,
        /// Also write a `.additional` file with group:artifact:version entries
        #[arg(long)]
        additional_info: bool,
        /// Write the additional file in a readable, email-friendly layout with download URLs
        #[arg(long, requires = "additional_info")]
        email_friendly_format: bool,
    },
    /// Generate an Eclipse user libraries XML file
    GenerateUserlibs {
        /// Name of the user library
        library_name: String,
        /// Path to the coordinate list (one group:artifact[:version] per line)
        spec_file: PathBuf,
        /// Output user libraries XML file
        #[arg(long)]
        output_xml: PathBuf,
        /// Folder holding the JAR files
        #[arg(long)]
        jars_path: PathBuf,
        /// Folder holding the source JAR files
        #[arg(long)]
        jars_source_path: Option<PathBuf>,
    },
    /// Combine several user libraries XML files into one
    CombineUserlibs {
        /// User libraries XML files to combine
        #[arg(required = true, num_args = 2..)]
        xmls: Vec<PathBuf>,
        /// Output user libraries XML file
        #[arg(long)]
        output_xml: PathBuf,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Welcome to JAR Manager! Use {} for help.", "-h".bold());
        return Ok(());
    };

    if let Commands::Completion { shell } = command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return Ok(());
    }

    let _log_guard = match logging::init_logging(&logging::default_log_dir()) {
        Ok(guard) => {
            println!("{} Currently logging to: {}", "ℹ".blue(), guard.path().display());
            Some(guard)
        }
        Err(e) => {
            println!("{} File logging disabled: {}", "!".yellow(), e);
            None
        }
    };

    if let Some(path) = &cli.config {
        println!("{} Loading configuration from: {}", "ℹ".blue(), path.display());
    }
    let config = Config::load(cli.config.as_deref())?;

    match command {
        Commands::DownloadJars {
            spec_file,
            target_folder,
            source_target_folder,
            update_different_only,
            changes_log,
        } => {
            let request = DownloadRequest {
                spec_file,
                target_dir: target_folder,
                sources_dir: source_target_folder,
                update_only_if_different: update_different_only,
                changes_log,
            };
            commands::download::run_download(&config, &request)?;
            Ok(())
        }
        Commands::GeneratePom {
            folder_path,
            output_path,
            additional_info,
            email_friendly_format,
        } => commands::generate::generate_pom(
            &config,
            &folder_path,
            &output_path,
            PomOptions {
                additional: additional_info,
                email_friendly: email_friendly_format,
            },
        ),
        Commands::GenerateUserlibs {
            library_name,
            spec_file,
            output_xml,
            jars_path,
            jars_source_path,
        } => commands::generate::generate_userlibs(&UserLibRequest {
            library_name,
            spec_file,
            output_xml,
            jars_dir: jars_path,
            sources_dir: jars_source_path,
        }),
        Commands::CombineUserlibs { xmls, output_xml } => {
            commands::generate::combine_userlibs(&xmls, &output_xml)
        }
        Commands::Completion { .. } => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_download_jars() {
        let cli = Cli::try_parse_from([
            "jar-manager",
            "download-jars",
            "libs.txt",
            "--target-folder",
            "lib",
            "--update-different-only",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::DownloadJars {
                spec_file,
                update_different_only,
                source_target_folder,
                ..
            }) => {
                assert_eq!(spec_file, PathBuf::from("libs.txt"));
                assert!(update_different_only);
                assert!(source_target_folder.is_none());
            }
            _ => panic!("expected download-jars"),
        }
    }

    #[test]
    fn test_combine_needs_two_inputs() {
        let result = Cli::try_parse_from([
            "jar-manager",
            "combine-userlibs",
            "one.xml",
            "--output-xml",
            "out.xml",
        ]);
        assert!(result.is_err());
    }
}
