mod tree_seed;

pub use tree_seed::{TreeSeed, TreeSeedApplyError, TreeSeedError};
