//! Record sources.
//!
//! Opening a record is the only potentially blocking operation in the
//! pipeline, so it lives behind a collaborator trait. The engine itself never
//! touches the filesystem except through a [RecordSource].

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{event, Level};
use validator::Validate;

use crate::dataset::Dataset;
use crate::error::AggregationError;

/// A collaborator that opens profile records by identifier.
pub trait RecordSource {
    /// Open one record. A failure here is fatal for the whole aggregation;
    /// there is no partial aggregation of a corpus with unreadable members.
    fn open(&self, identifier: &str) -> Result<Dataset, AggregationError>;
}

/// Reads records stored as JSON documents on disk.
#[derive(Clone, Debug, Default)]
pub struct JsonSource {
    /// Directory resolved against relative identifiers
    root: Option<PathBuf>,
}

impl JsonSource {
    /// Return a source resolving identifiers against the working directory.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Return a source resolving identifiers against `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, identifier: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(identifier),
            None => PathBuf::from(identifier),
        }
    }
}

impl RecordSource for JsonSource {
    fn open(&self, identifier: &str) -> Result<Dataset, AggregationError> {
        let path = self.resolve(identifier);
        event!(Level::DEBUG, path = %path.display(), "opening record");
        let file = File::open(&path)?;
        let dataset: Dataset = serde_json::from_reader(BufReader::new(file))?;
        dataset
            .validate()
            .map_err(|source| AggregationError::RecordInvalid {
                identifier: identifier.to_string(),
                source,
            })?;
        Ok(dataset)
    }
}

/// Separate the metadata record from the profile records.
///
/// Filename convention: an identifier whose file stem contains `meta` names
/// the metadata record. At most one is taken; the remaining identifiers keep
/// their order.
pub fn split_metadata(identifiers: Vec<String>) -> (Option<String>, Vec<String>) {
    let mut metadata = None;
    let mut records = Vec::with_capacity(identifiers.len());
    for identifier in identifiers {
        let stem = Path::new(&identifier)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("");
        if metadata.is_none() && stem.contains("meta") {
            metadata = Some(identifier);
        } else {
            records.push(identifier);
        }
    }
    (metadata, records)
}
