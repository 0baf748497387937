use std::path::PathBuf;

use thiserror::Error;

use crate::taxonomy::TaxonomyError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("taxonomy in {path} could not be loaded: {source}")]
    Taxonomy {
        path: PathBuf,
        #[source]
        source: TaxonomyError,
    },

    #[error("taxonomy is {depth} levels deep; snapshots in {path} hold at most {max}")]
    TooDeep {
        path: PathBuf,
        depth: usize,
        max: usize,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;
