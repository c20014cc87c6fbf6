//! Record padding.
//!
//! Padding brings one record up to the globally resolved target shape. It is
//! independent per record and runs inside the parallel stage of the pipeline,
//! so it takes its inputs by value and shares no mutable state.

use hashbrown::{HashMap, HashSet};
use tracing::{event, Level};

use crate::dataset::{Dataset, Variable};
use crate::error::AggregationError;
use crate::resolver::ShapeResolution;

/// Pad one record to the resolved target shape.
///
/// Variables referencing a divergent dimension are dropped. Every remaining
/// variable is padded at the trailing edge of each non-axis dimension until
/// it reaches the resolved maximum, while its extent along the concatenation
/// axis is preserved. A variable that does not span the axis, including a
/// scalar, is promoted to a length-1 run along a new leading axis dimension
/// first, so concatenation across records stays positionally aligned.
/// Appended cells are masked missing, never zero. Record attributes are
/// copied unchanged.
pub fn pad(
    dataset: Dataset,
    resolution: &ShapeResolution,
    divergent: &HashSet<String>,
) -> Result<Dataset, AggregationError> {
    let axis = resolution.axis.as_str();
    let axis_extent = dataset.dimensions.get(axis).copied().unwrap_or(1);
    let mut variables = HashMap::with_capacity(dataset.variables.len());
    for (name, variable) in dataset.variables {
        if let Some(dim) = variable.dims.iter().find(|dim| divergent.contains(*dim)) {
            event!(
                Level::DEBUG,
                variable = %name,
                dimension = %dim,
                "dropping variable on divergent dimension"
            );
            continue;
        }
        let Variable {
            mut dims,
            mut data,
            attributes,
        } = variable;
        if !dims.iter().any(|dim| dim == axis) {
            data = data.insert_leading_axis();
            dims.insert(0, axis.to_string());
        }
        let target: Vec<usize> = dims
            .iter()
            .zip(data.shape())
            .map(|(dim, &extent)| {
                if dim == axis {
                    axis_extent
                } else {
                    resolution.max_sizes.get(dim).copied().unwrap_or(extent)
                }
            })
            .collect();
        let data = data.pad_to(&target)?;
        variables.insert(
            name,
            Variable {
                dims,
                data,
                attributes,
            },
        );
    }
    let mut dimensions = resolution.max_sizes.clone();
    dimensions.insert(axis.to_string(), axis_extent);
    Ok(Dataset {
        dimensions,
        variables,
        attributes: dataset.attributes,
    })
}
