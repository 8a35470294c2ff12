use std::{borrow::Cow, fs, path::Path};

use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::debug;

use crate::tree::{Directory, TreeError};

const DIRECTORIES_KEY: &str = "directories";

/// Directories to create before a session starts, read from YAML:
///
/// ```yaml
/// directories:
///   - fruits
///   - fruits/apples
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSeed {
    directories: Vec<String>,
}

impl TreeSeed {
    pub fn read(path: &Path) -> Result<Self, TreeSeedError> {
        debug!("Reading tree seed: {}", path.display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Read tree seed: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    pub fn directories(&self) -> &[String] {
        &self.directories
    }

    /// Creates every seeded directory in order, stopping at the first failure.
    pub fn apply(&self, root: &mut Directory) -> Result<usize, TreeSeedApplyError> {
        for path in &self.directories {
            root.create(path).context(TreeSeedApplySnafu { path })?;
        }
        debug!("Seeded {} directories", self.directories.len());
        Ok(self.directories.len())
    }

    fn parse_directories(
        top_level: &LinkedHashMap<Yaml, Yaml>,
    ) -> Result<Vec<String>, TreeSeedError> {
        let Some(section) =
            top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(DIRECTORIES_KEY))))
        else {
            return Ok(Vec::new());
        };

        let directories = section
            .as_sequence()
            .context(DirectoriesNotSequenceSnafu)?
            .iter()
            .filter_map(|entry| match entry.as_str() {
                Some(path) => Some(path.to_string()),
                None => {
                    debug!("Skipping non-string seed entry: {:?}", entry);
                    None
                }
            })
            .collect();

        Ok(directories)
    }
}

impl TryFrom<&str> for TreeSeed {
    type Error = TreeSeedError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedSeedSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        Ok(TreeSeed {
            directories: Self::parse_directories(top_level)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum TreeSeedError {
    #[snafu(display("Failed to read the seed file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the seed file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted seed file"))]
    MalformedSeed,
    #[snafu(display("Top level of the seed file should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Directories section should be a list"))]
    DirectoriesNotSequence,
}

#[derive(Debug, Snafu)]
#[snafu(display("Failed to seed directory '{}'", path))]
pub struct TreeSeedApplyError {
    path: String,
    source: TreeError,
}
