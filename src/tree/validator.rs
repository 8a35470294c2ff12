use snafu::ensure;

use crate::tree::error::InvalidNameSnafu;
use crate::tree::{ROOT_NAME, TreeError};

/// Decides which names may be given to newly created children.
///
/// Every node of a [`NaryTree`](crate::tree::NaryTree) shares the tree's
/// validator, so children are always of the same kind as their parent.
pub trait NameValidator {
    fn validate_name(&self, _name: &str) -> Result<(), TreeError> {
        Ok(())
    }
}

/// Accepts every name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Permissive;

impl NameValidator for Permissive {}

/// Directory naming rule: no blank names and no names equal to the root marker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectoryNames;

impl NameValidator for DirectoryNames {
    fn validate_name(&self, name: &str) -> Result<(), TreeError> {
        ensure!(
            name != ROOT_NAME && !name.trim().is_empty(),
            InvalidNameSnafu { name }
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("")]
    #[case(" ")]
    #[case("\t \t")]
    #[case("/")]
    fn directory_names_rejects(#[case] name: &str) {
        assert_eq!(
            DirectoryNames.validate_name(name),
            Err(TreeError::InvalidName { name: name.into() })
        );
    }

    #[rstest]
    #[case("fruits")]
    #[case(" padded ")]
    #[case("тест")]
    #[case("with.dots")]
    fn directory_names_accepts(#[case] name: &str) {
        assert!(DirectoryNames.validate_name(name).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("/")]
    fn permissive_accepts_anything(#[case] name: &str) {
        assert!(Permissive.validate_name(name).is_ok());
    }
}
