//! Shape resolution.
//!
//! Runs once per aggregation over the full input set: the maximum extent of
//! each shared dimension and the choice of concatenation axis are global
//! properties of the corpus, not of any single record.

use hashbrown::HashMap;
use lazy_static::lazy_static;

use crate::classifier::DimensionClasses;
use crate::dataset::Dataset;
use crate::error::AggregationError;

/// Dimension roles recognised as the concatenation axis.
///
/// The registry is closed configuration. Extending the dimension vocabulary
/// means adding a variant here, not matching on caller-supplied strings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AxisCandidate {
    /// One entry per measurement event, the usual profile-file layout
    ProfileCount,
    /// One entry per individual measurement, the trajectory-file layout
    MeasurementCount,
}

impl AxisCandidate {
    /// Return the dimension name this candidate matches.
    pub fn dimension_name(self) -> &'static str {
        match self {
            Self::ProfileCount => "N_PROF",
            Self::MeasurementCount => "N_MEASUREMENT",
        }
    }
}

lazy_static! {
    /// Process-wide registry of recognised concatenation axis names.
    static ref AXIS_REGISTRY: Vec<AxisCandidate> =
        vec![AxisCandidate::ProfileCount, AxisCandidate::MeasurementCount];
}

/// Target shape of an aggregation.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeResolution {
    /// Maximum extent observed for each shared dimension
    pub max_sizes: HashMap<String, usize>,
    /// The shared dimension along which records are stacked
    pub axis: String,
}

/// Compute the target extent of every shared dimension and select the
/// concatenation axis.
///
/// A record that does not declare a shared dimension contributes no sample to
/// that dimension's maximum. Exactly one shared dimension may match the axis
/// registry.
pub fn resolve(
    records: &[Dataset],
    classes: &DimensionClasses,
) -> Result<ShapeResolution, AggregationError> {
    if records.is_empty() {
        return Err(AggregationError::EmptyCorpus);
    }
    let mut max_sizes = HashMap::with_capacity(classes.shared.len());
    for name in &classes.shared {
        let max = records
            .iter()
            .filter_map(|record| record.dimensions.get(name).copied())
            .max();
        if let Some(extent) = max {
            max_sizes.insert(name.clone(), extent);
        }
    }
    let mut candidates: Vec<&String> = classes
        .shared
        .iter()
        .filter(|name| {
            AXIS_REGISTRY
                .iter()
                .any(|candidate| candidate.dimension_name() == name.as_str())
        })
        .collect();
    candidates.sort();
    let axis = match candidates.as_slice() {
        [] => return Err(AggregationError::NoAxisDimension),
        [axis] => (*axis).clone(),
        [first, second, ..] => {
            return Err(AggregationError::AmbiguousAxisDimension {
                first: (*first).clone(),
                second: (*second).clone(),
            })
        }
    };
    Ok(ShapeResolution { max_sizes, axis })
}
