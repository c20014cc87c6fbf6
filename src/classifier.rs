//! Dimension classification.
//!
//! Records in a corpus rarely declare an identical dimension vocabulary. A
//! few files carry one-off auxiliary dimensions that cannot be padded into a
//! common schema and must be dropped instead. The classifier separates the
//! two cases with a frequency-of-frequency vote over the declared names, so
//! no exact global schema is required up front.

use hashbrown::{HashMap, HashSet};

use crate::error::AggregationError;

/// Partition of the dimension names seen across a corpus.
#[derive(Clone, Debug, PartialEq)]
pub struct DimensionClasses {
    /// Names declared at the normal multiplicity
    pub shared: HashSet<String>,
    /// Names declared at any other multiplicity, to be dropped before padding
    pub divergent: HashSet<String>,
}

/// Partition dimension names into shared and divergent sets.
///
/// The multiplicity of a name is the number of records declaring it. The
/// multiplicity shared by the largest number of distinct names is taken as
/// normal, and every name at another multiplicity is divergent. A tie on
/// population is resolved in favour of the larger multiplicity, so names
/// declared by more records win.
pub fn classify(records: &[HashSet<String>]) -> Result<DimensionClasses, AggregationError> {
    if records.is_empty() {
        return Err(AggregationError::EmptyCorpus);
    }
    let mut multiplicities: HashMap<&str, usize> = HashMap::new();
    for names in records {
        for name in names {
            *multiplicities.entry(name).or_insert(0) += 1;
        }
    }
    let mut histogram: HashMap<usize, usize> = HashMap::new();
    for &multiplicity in multiplicities.values() {
        *histogram.entry(multiplicity).or_insert(0) += 1;
    }
    let normal = histogram
        .iter()
        .max_by_key(|&(&multiplicity, &population)| (population, multiplicity))
        .map(|(&multiplicity, _)| multiplicity);
    let mut shared = HashSet::new();
    let mut divergent = HashSet::new();
    if let Some(normal) = normal {
        for (name, multiplicity) in multiplicities {
            if multiplicity == normal {
                shared.insert(name.to_string());
            } else {
                divergent.insert(name.to_string());
            }
        }
    }
    Ok(DimensionClasses { shared, divergent })
}
