use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "remote-panel")]
#[command(about = "Clickable remote control panel that signals a receiver over a named pipe")]
#[command(version)]
pub struct Cli {
    /// Named pipe the receiver listens on (FIFO path, or \\.\pipe\<name> on Windows)
    pub pipe: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Panel artwork to show instead of the configured one
    #[arg(short, long, value_name = "PATH")]
    pub background: Option<PathBuf>,

    /// Panel-to-window downscale divisor
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub scaling: Option<u32>,

    /// Print the button catalogue as JSON and exit
    #[arg(long)]
    pub list_buttons: bool,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Missing argument: Named Pipe")]
    MissingPipe,
}

impl Cli {
    /// Apply command line overrides on top of the loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(background) = &self.background {
            config.appearance.background = background.clone();
        }
        if let Some(scaling) = self.scaling {
            config.window.scaling = scaling;
        }
    }

    /// The pipe to signal: command line first, then config
    pub fn resolve_pipe(&self, config: &Config) -> Result<PathBuf, CliError> {
        self.pipe
            .clone()
            .or_else(|| config.pipe.path.clone())
            .ok_or(CliError::MissingPipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_pipe() {
        let cli = Cli::try_parse_from(["remote-panel"]).unwrap();
        let result = cli.resolve_pipe(&Config::default());
        assert!(matches!(result, Err(CliError::MissingPipe)));
    }

    #[test]
    fn test_pipe_argument_wins() {
        let cli = Cli::try_parse_from(["remote-panel", "/tmp/cli_rc"]).unwrap();
        let mut config = Config::default();
        config.pipe.path = Some(PathBuf::from("/tmp/config_rc"));

        assert_eq!(cli.resolve_pipe(&config).unwrap(), PathBuf::from("/tmp/cli_rc"));
    }

    #[test]
    fn test_pipe_from_config() {
        let cli = Cli::try_parse_from(["remote-panel"]).unwrap();
        let mut config = Config::default();
        config.pipe.path = Some(PathBuf::from("/tmp/config_rc"));

        assert_eq!(cli.resolve_pipe(&config).unwrap(), PathBuf::from("/tmp/config_rc"));
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "remote-panel",
            "--scaling",
            "3",
            "--background",
            "panel.png",
            "/tmp/rc",
        ])
        .unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.window.scaling, 3);
        assert_eq!(config.appearance.background, PathBuf::from("panel.png"));
    }

    #[test]
    fn test_zero_scaling_rejected() {
        assert!(Cli::try_parse_from(["remote-panel", "-s", "0", "/tmp/rc"]).is_err());
    }
}
