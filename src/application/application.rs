use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal};

use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::config::{TreeSeed, TreeSeedApplyError, TreeSeedError};
use crate::dispatcher::{CommandDispatcher, Session, SessionSummary};
use crate::tree::Directory;

pub struct Application;

impl Application {
    pub fn run(app_config: impl Into<RuntimeConfig>) -> Result<SessionSummary, ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        debug!("Runtime config: {:?}", app_config);

        let root = Self::seeded_root(&app_config)?;
        let color = app_config.color.enabled();
        colored::control::set_override(color);
        let dispatcher = CommandDispatcher::new(root);

        match &app_config.script {
            Some(path) => {
                info!("Reading commands from {}", path.display());
                let file = File::open(path).context(ScriptOpenSnafu {
                    file_path: path.display().to_string(),
                })?;
                Self::drive(dispatcher, BufReader::new(file), false, color, &app_config)
            }
            None => {
                let stdin = io::stdin();
                let interactive = stdin.is_terminal();
                debug!("Reading commands from stdin (interactive: {})", interactive);
                Self::drive(dispatcher, stdin.lock(), interactive, color, &app_config)
            }
        }
    }

    fn seeded_root(app_config: &RuntimeConfig) -> Result<Directory, ApplicationError> {
        let mut root = Directory::new();
        if let Some(seed_path) = &app_config.seed {
            let seed = TreeSeed::read(seed_path).context(SeedReadSnafu)?;
            let seeded = seed.apply(&mut root).context(SeedApplySnafu)?;
            info!("Seeded {} directories from {}", seeded, seed_path.display());
        }
        Ok(root)
    }

    fn drive(
        dispatcher: CommandDispatcher,
        input: impl BufRead,
        prompt: bool,
        color: bool,
        app_config: &RuntimeConfig,
    ) -> Result<SessionSummary, ApplicationError> {
        Session::new(dispatcher, input, io::stdout().lock())
            .with_prompt(prompt)
            .with_echo(app_config.echo)
            .with_color(color)
            .run()
            .context(SessionIoSnafu)
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the tree seed"))]
    SeedReadError { source: TreeSeedError },
    #[snafu(display("Critical failure encountered while seeding the tree"))]
    SeedApplyError { source: TreeSeedApplyError },
    #[snafu(display("Failed to open the command script: {}", file_path))]
    ScriptOpenError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Critical failure encountered while reading or writing commands"))]
    SessionIoError { source: std::io::Error },
}
