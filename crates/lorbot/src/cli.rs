//! Command line arguments.

use clap::{Parser, ValueEnum};
use lorbot_core::{BotConfig, Rotation};
use std::path::PathBuf;

/// Screen and telemetry driven autopilot, dry-run harness.
#[derive(Debug, Clone, Parser)]
#[command(name = "lorbot", version, about)]
pub struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory of PNG frames to replay as the game window
    #[arg(short, long, required_unless_present = "print_config_schema")]
    pub frames: Option<PathBuf>,

    /// Replay telemetry from a JSON lines recording instead of the client API
    #[arg(long, conflicts_with = "port")]
    pub replay_telemetry: Option<PathBuf>,

    /// Record every telemetry response to a JSON lines file
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Client API port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Rotation picked in PvP
    #[arg(long, value_enum)]
    pub rotation: Option<RotationArg>,

    /// Queue against players instead of the AI
    #[arg(long)]
    pub pvp: bool,

    /// Hold the bot while this file exists
    #[arg(long)]
    pub pause_file: Option<PathBuf>,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    pub print_config_schema: bool,
}

/// Rotation as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RotationArg {
    /// Standard rotation
    Standard,
    /// Eternal rotation
    Eternal,
}

impl From<RotationArg> for Rotation {
    fn from(arg: RotationArg) -> Self {
        match arg {
            RotationArg::Standard => Rotation::Standard,
            RotationArg::Eternal => Rotation::Eternal,
        }
    }
}

impl Cli {
    /// Apply command line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut BotConfig) {
        if let Some(port) = self.port {
            config.client.telemetry_port = port;
        }
        if let Some(rotation) = self.rotation {
            config.bot.rotation = rotation.into();
        }
        if self.pvp {
            config.bot.pvp = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let cli = Cli::try_parse_from(["lorbot", "--frames", "captures"]).unwrap();
        assert_eq!(cli.frames, Some(PathBuf::from("captures")));
        assert!(cli.config.is_none());
        assert!(cli.pause_file.is_none());
        assert!(!cli.pvp);
    }

    #[test]
    fn test_frames_required_unless_schema() {
        assert!(Cli::try_parse_from(["lorbot"]).is_err());
        assert!(Cli::try_parse_from(["lorbot", "--print-config-schema"]).is_ok());
    }

    #[test]
    fn test_replay_conflicts_with_port() {
        let result = Cli::try_parse_from([
            "lorbot",
            "--frames",
            "captures",
            "--replay-telemetry",
            "polls.jsonl",
            "--port",
            "9000",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "lorbot",
            "--frames",
            "captures",
            "--port",
            "9000",
            "--rotation",
            "eternal",
            "--pvp",
        ])
        .unwrap();

        let mut config = BotConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.client.telemetry_port, 9000);
        assert_eq!(config.bot.rotation, Rotation::Eternal);
        assert!(config.bot.pvp);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let cli = Cli::try_parse_from(["lorbot", "--frames", "captures"]).unwrap();
        let mut config = BotConfig::default();
        config.bot.pvp = true;
        cli.apply(&mut config);
        assert!(config.bot.pvp);
        assert_eq!(config.client.telemetry_port, 21337);
    }
}
