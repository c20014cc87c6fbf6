//! The aggregation pipeline.

use hashbrown::HashSet;
use rayon::prelude::*;
use tracing::{event, Level};

use crate::aggregator;
use crate::classifier;
use crate::dataset::Dataset;
use crate::error::AggregationError;
use crate::padder;
use crate::resolver;
use crate::source::RecordSource;

/// Aggregate the records named by `identifiers`, in order, into one record.
///
/// Sequence: open every record, classify the dimension vocabulary, resolve
/// the target shape, pad each record and concatenate the padded records
/// along the resolved axis. When a metadata identifier is supplied its
/// summary attributes are merged into the output afterwards. Opening and
/// padding run on the rayon pool with ordered result collection, so the
/// output follows input order regardless of completion order. The
/// classification and resolution scan completes before any padding begins.
pub fn aggregate_all<S>(
    source: &S,
    identifiers: &[String],
    metadata: Option<&str>,
) -> Result<Dataset, AggregationError>
where
    S: RecordSource + Sync,
{
    if identifiers.is_empty() {
        return Err(AggregationError::EmptyCorpus);
    }
    let records = identifiers
        .par_iter()
        .map(|identifier| source.open(identifier))
        .collect::<Result<Vec<_>, _>>()?;
    let vocabularies: Vec<HashSet<String>> =
        records.iter().map(Dataset::dimension_names).collect();
    let classes = classifier::classify(&vocabularies)?;
    let resolution = resolver::resolve(&records, &classes)?;
    event!(
        Level::INFO,
        records = identifiers.len(),
        axis = %resolution.axis,
        divergent = classes.divergent.len(),
        "aggregating profile records"
    );
    let padded = records
        .into_par_iter()
        .map(|record| padder::pad(record, &resolution, &classes.divergent))
        .collect::<Result<Vec<_>, _>>()?;
    let mut aggregated = aggregator::concatenate(padded, &resolution.axis)?;
    if let Some(identifier) = metadata {
        let metadata_record = source.open(identifier)?;
        aggregator::merge_metadata(&mut aggregated, &metadata_record);
    }
    Ok(aggregated)
}
