use std::path::PathBuf;

use crate::application::data::ColorChoice;
use crate::cli::Cli;

#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub script: Option<PathBuf>,
    pub seed: Option<PathBuf>,
    pub echo: bool,
    pub color: ColorChoice,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            script: cli.script,
            seed: cli.seed,
            echo: cli.echo,
            color: cli.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn runtime_config_from_cli() {
        let cli = Cli::parse_from([
            "dirtree", "--script", "commands.txt", "--seed", "seed.yaml", "--echo", "--color",
            "never",
        ]);

        let config = RuntimeConfig::from(cli);

        assert_eq!(config.script, Some(PathBuf::from("commands.txt")));
        assert_eq!(config.seed, Some(PathBuf::from("seed.yaml")));
        assert!(config.echo);
        assert_eq!(config.color, ColorChoice::Never);
    }
}
