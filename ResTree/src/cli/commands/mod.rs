use clap::Subcommand;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::config::Config;
use crate::dump::WorldDump;
use crate::factory::TreeFlags;

pub mod paths;
pub mod related;
pub mod tree;
pub mod trees;

#[derive(Subcommand)]
pub enum Commands {
    /// Build resource trees for every character in a world dump
    Trees {
        /// World dump (JSON)
        dump: PathBuf,

        /// Guess display names and icons
        #[arg(long)]
        ui: bool,

        /// Blank disk paths outside the mod directory or missing from disk
        #[arg(long)]
        redact: bool,

        /// Mod directory used when redacting (overrides the config file)
        #[arg(long)]
        mod_directory: Option<PathBuf>,

        /// Only the local player and what it owns
        #[arg(long)]
        local_only: bool,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build the resource tree of a single character
    Tree {
        /// World dump (JSON)
        dump: PathBuf,

        /// Object index of the character
        #[arg(short, long)]
        index: u16,

        /// Guess display names and icons
        #[arg(long)]
        ui: bool,

        /// Blank disk paths outside the mod directory or missing from disk
        #[arg(long)]
        redact: bool,

        /// Mod directory used when redacting (overrides the config file)
        #[arg(long)]
        mod_directory: Option<PathBuf>,

        /// Follow ownership chains when naming the character
        #[arg(long)]
        ownership: bool,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List the local player and the characters it owns
    Related {
        /// World dump (JSON)
        dump: PathBuf,
    },

    /// Print disk path -> game paths for each tree
    Paths {
        /// World dump (JSON)
        dump: PathBuf,

        /// Only this object index
        #[arg(short, long)]
        index: Option<u16>,

        /// Blank disk paths outside the mod directory or missing from disk
        #[arg(long)]
        redact: bool,

        /// Mod directory used when redacting (overrides the config file)
        #[arg(long)]
        mod_directory: Option<PathBuf>,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Tree building options shared by the build commands
pub struct BuildOptions {
    pub ui: bool,
    pub redact: bool,
    pub mod_directory: Option<PathBuf>,
    pub ownership: bool,
}

impl BuildOptions {
    /// Config defaults, overridden by whatever was given on the command line
    pub fn resolve(&self, config: &Config) -> anyhow::Result<(TreeFlags, Option<PathBuf>)> {
        let mut flags = TreeFlags::from(config.default_flags);
        if self.ui {
            flags |= TreeFlags::WITH_UI_DATA;
        }
        if self.redact {
            flags |= TreeFlags::REDACT_EXTERNAL_PATHS;
        }
        if self.ownership {
            flags |= TreeFlags::WITH_OWNERSHIP;
        }

        let mut config = config.clone();
        if let Some(dir) = &self.mod_directory {
            config.mod_directory = Some(dir.clone());
        }
        let mod_directory = config.validated_mod_directory()?;
        if flags.contains(TreeFlags::REDACT_EXTERNAL_PATHS) && mod_directory.is_none() {
            tracing::warn!("Redacting without a mod directory: only missing files are blanked");
        }

        Ok((flags, mod_directory))
    }
}

fn load_world(dump: &Path) -> anyhow::Result<WorldDump> {
    WorldDump::load(dump).with_context(|| format!("Failed to load world dump: {}", dump.display()))
}

/// Pretty-print `value` as JSON to `output`, or stdout
fn write_json(value: &impl Serialize, output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Written to: {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        let config = Config::load();
        match self {
            Commands::Trees {
                dump,
                ui,
                redact,
                mod_directory,
                local_only,
                output,
            } => trees::execute(
                dump,
                &config,
                &BuildOptions {
                    ui: *ui,
                    redact: *redact,
                    mod_directory: mod_directory.clone(),
                    ownership: true,
                },
                *local_only,
                output.as_deref(),
            ),
            Commands::Tree {
                dump,
                index,
                ui,
                redact,
                mod_directory,
                ownership,
                output,
            } => tree::execute(
                dump,
                *index,
                &config,
                &BuildOptions {
                    ui: *ui,
                    redact: *redact,
                    mod_directory: mod_directory.clone(),
                    ownership: *ownership,
                },
                output.as_deref(),
            ),
            Commands::Related { dump } => related::execute(dump),
            Commands::Paths {
                dump,
                index,
                redact,
                mod_directory,
                output,
            } => paths::execute(
                dump,
                *index,
                &config,
                &BuildOptions {
                    ui: false,
                    redact: *redact,
                    mod_directory: mod_directory.clone(),
                    ownership: false,
                },
                output.as_deref(),
            ),
        }
    }
}
