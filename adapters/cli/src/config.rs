//! Command-line arguments and their merge with an optional level file.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use graph_chase_core::LevelConfig;

/// Command-line arguments accepted by the Graph Chase binary.
#[derive(Debug, Parser)]
#[command(name = "graph-chase", about = "Chase game played on a mutable grid graph")]
pub(crate) struct Args {
    /// Number of node columns.
    #[arg(long)]
    columns: Option<u32>,

    /// Number of node rows.
    #[arg(long)]
    rows: Option<u32>,

    /// Distance between neighbouring nodes in world units.
    #[arg(long)]
    cell_length: Option<f32>,

    /// Number of enemies spawned with each level.
    #[arg(long)]
    enemies: Option<u32>,

    /// Seed for the level's random source.
    #[arg(long)]
    seed: Option<u64>,

    /// TOML file providing the base level configuration.
    #[arg(long, value_name = "TOML")]
    config: Option<PathBuf>,

    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    pub(crate) vsync: bool,

    /// Print the frame rate once per second.
    #[arg(long)]
    pub(crate) show_fps: bool,

    /// Run this many ticks without a window and report the outcome.
    #[arg(long, value_name = "N")]
    pub(crate) headless_ticks: Option<u64>,
}

impl Args {
    /// Resolves the level configuration: file values first, explicit flags on top.
    pub(crate) fn level_config(&self) -> Result<LevelConfig> {
        let base = match &self.config {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .with_context(|| format!("failed to read level file {}", path.display()))?;
                parse_level(&contents)
                    .with_context(|| format!("failed to parse level file {}", path.display()))?
            }
            None => LevelConfig::default(),
        };
        Ok(self.apply_overrides(base))
    }

    fn apply_overrides(&self, base: LevelConfig) -> LevelConfig {
        LevelConfig {
            columns: self.columns.unwrap_or(base.columns),
            rows: self.rows.unwrap_or(base.rows),
            cell_length: self.cell_length.unwrap_or(base.cell_length),
            enemy_count: self.enemies.unwrap_or(base.enemy_count),
            seed: self.seed.unwrap_or(base.seed),
        }
    }
}

fn parse_level(contents: &str) -> Result<LevelConfig> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_flags_fall_back_to_defaults() {
        let args = Args::try_parse_from(["graph-chase"]).expect("no flags parse");

        assert_eq!(args.level_config().unwrap(), LevelConfig::default());
        assert!(args.vsync);
        assert!(!args.show_fps);
        assert_eq!(args.headless_ticks, None);
    }

    #[test]
    fn flags_override_the_level_file() {
        let args = Args::try_parse_from([
            "graph-chase",
            "--columns",
            "9",
            "--enemies",
            "2",
            "--vsync",
            "false",
            "--headless-ticks",
            "600",
        ])
        .expect("flags parse");
        let base = parse_level("columns = 4\nrows = 3\nseed = 11\n").expect("valid toml");

        let config = args.apply_overrides(base);

        assert_eq!(
            config,
            LevelConfig {
                columns: 9,
                rows: 3,
                enemy_count: 2,
                seed: 11,
                ..LevelConfig::default()
            }
        );
        assert!(!args.vsync);
        assert_eq!(args.headless_ticks, Some(600));
    }

    #[test]
    fn level_file_rejects_unexpected_types() {
        assert!(parse_level("columns = \"many\"").is_err());
    }

    #[test]
    fn unreadable_level_file_reports_its_path() {
        let args = Args::try_parse_from(["graph-chase", "--config", "/nonexistent/level.toml"])
            .expect("flags parse");

        let error = args.level_config().expect_err("missing file must fail");

        assert!(error.to_string().contains("/nonexistent/level.toml"));
    }
}
