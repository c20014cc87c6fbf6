//! Concatenation of padded records and metadata merge.

use hashbrown::HashMap;
use time::macros::format_description;
use time::PrimitiveDateTime;
use tracing::{event, Level};

use crate::dataset::{Dataset, Variable, VariableData};
use crate::error::AggregationError;
use crate::types::AttrValue;

/// Concatenate padded records along the concatenation axis, in the order the
/// records are supplied.
///
/// Every variable present in any record must be present in all of them with
/// the same dimension list, element type and non-axis extents; anything else
/// is a padding defect and fails with
/// [ShapeMismatch](AggregationError::ShapeMismatch). The axis extent of the
/// output is the sum of the per-record axis extents.
pub fn concatenate(mut records: Vec<Dataset>, axis: &str) -> Result<Dataset, AggregationError> {
    if records.is_empty() {
        return Err(AggregationError::EmptyCorpus);
    }
    let mut names: Vec<String> = records
        .iter()
        .flat_map(|record| record.variables.keys().cloned())
        .collect();
    names.sort();
    names.dedup();
    let axis_total: usize = records
        .iter()
        .map(|record| record.dimensions.get(axis).copied().unwrap_or(0))
        .sum();
    let mut variables = HashMap::with_capacity(names.len());
    for name in names {
        let mut parts = Vec::with_capacity(records.len());
        for (index, record) in records.iter_mut().enumerate() {
            let part = record.variables.remove(&name).ok_or_else(|| {
                AggregationError::ShapeMismatch {
                    variable: name.clone(),
                    detail: format!("missing from record {}", index),
                }
            })?;
            parts.push(part);
        }
        let first = &parts[0];
        let dims = first.dims.clone();
        let attributes = first.attributes.clone();
        let dtype = first.data.dtype();
        let shape = first.data.shape().to_vec();
        let axis_index =
            dims.iter()
                .position(|dim| dim == axis)
                .ok_or_else(|| AggregationError::ShapeMismatch {
                    variable: name.clone(),
                    detail: format!("does not span the {} axis", axis),
                })?;
        for (index, part) in parts.iter().enumerate().skip(1) {
            if part.dims != dims {
                return Err(AggregationError::ShapeMismatch {
                    variable: name.clone(),
                    detail: format!("dimension list differs in record {}", index),
                });
            }
            if part.data.dtype() != dtype {
                return Err(AggregationError::ShapeMismatch {
                    variable: name.clone(),
                    detail: format!("element type differs in record {}", index),
                });
            }
            for (position, (dim, &extent)) in dims.iter().zip(part.data.shape()).enumerate() {
                if position != axis_index && extent != shape[position] {
                    return Err(AggregationError::ShapeMismatch {
                        variable: name.clone(),
                        detail: format!("extent of {} differs in record {}", dim, index),
                    });
                }
            }
        }
        let data = VariableData::concatenate(
            axis_index,
            parts.into_iter().map(|part| part.data).collect(),
        )?;
        variables.insert(
            name,
            Variable {
                dims,
                data,
                attributes,
            },
        );
    }
    let mut aggregated = records.swap_remove(0);
    aggregated.dimensions.insert(axis.to_string(), axis_total);
    aggregated.variables = variables;
    Ok(aggregated)
}

/// Attach launch date and platform type attributes extracted from a metadata
/// record.
///
/// The launch date arrives as a 14-digit compact timestamp and is normalised
/// to `YYYY-MM-DD hh:mm:ss`; the platform type is trimmed of surrounding
/// whitespace. A field that is absent or unparsable produces a warning and
/// the corresponding attribute is omitted.
pub fn merge_metadata(dataset: &mut Dataset, metadata: &Dataset) {
    match scalar_str(metadata, "LAUNCH_DATE").and_then(|raw| normalise_launch_date(&raw)) {
        Some(launch_date) => {
            dataset
                .attributes
                .insert("launch_date".to_string(), AttrValue::String(launch_date));
        }
        None => event!(
            Level::WARN,
            "metadata record has no usable LAUNCH_DATE field"
        ),
    }
    match scalar_str(metadata, "PLATFORM_TYPE") {
        Some(platform_type) => {
            dataset.attributes.insert(
                "platform_type".to_string(),
                AttrValue::String(platform_type.trim().to_string()),
            );
        }
        None => event!(
            Level::WARN,
            "metadata record has no usable PLATFORM_TYPE field"
        ),
    }
}

/// Read the first valid cell of a string variable.
fn scalar_str(dataset: &Dataset, name: &str) -> Option<String> {
    let variable = dataset.variables.get(name)?;
    match &variable.data {
        VariableData::Str(array) => array
            .data()
            .iter()
            .zip(array.mask().iter())
            .find_map(|(value, &valid)| valid.then(|| value.clone())),
        _ => None,
    }
}

/// Normalise a compact `YYYYMMDDhhmmss` timestamp to `YYYY-MM-DD hh:mm:ss`.
fn normalise_launch_date(raw: &str) -> Option<String> {
    let compact = format_description!("[year][month][day][hour][minute][second]");
    let display = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    let parsed = PrimitiveDateTime::parse(raw.trim(), &compact).ok()?;
    parsed.format(&display).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils;

    /// Records with identical schemas apart from the axis extent, with the
    /// scalar removed so every variable spans the axis.
    fn axis_aligned_records(extents: &[usize]) -> Vec<Dataset> {
        extents
            .iter()
            .enumerate()
            .map(|(index, &extent)| {
                let mut record = test_utils::profile_record(extent, 3, index as f64 * 1000.0);
                record.variables.remove("DATA_TYPE");
                record
            })
            .collect()
    }

    #[test]
    fn test_empty_corpus() {
        let result = concatenate(vec![], "N_PROF").unwrap_err();
        assert_eq!("cannot aggregate an empty corpus", result.to_string());
    }

    #[test]
    fn test_axis_extent_is_the_sum() {
        let aggregated = concatenate(axis_aligned_records(&[5, 3, 7]), "N_PROF").unwrap();
        assert_eq!(Some(&15), aggregated.dimensions.get("N_PROF"));
        assert_eq!(&[15, 3], aggregated.variables["TEMP"].data.shape());
        assert_eq!(Some(&3), aggregated.dimensions.get("N_LEVELS"));
    }

    #[test]
    fn test_input_order_is_preserved() {
        let aggregated = concatenate(axis_aligned_records(&[2, 2]), "N_PROF").unwrap();
        match &aggregated.variables["TEMP"].data {
            VariableData::Float64(array) => {
                // Record 0 cells start at 0.0, record 1 cells at 1000.0.
                assert_eq!(0.0, array.data()[[0, 0]]);
                assert_eq!(1000.0, array.data()[[2, 0]]);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_missing_variable_is_fatal() {
        let mut records = axis_aligned_records(&[2, 2]);
        records[1].variables.remove("TEMP");
        let result = concatenate(records, "N_PROF").unwrap_err();
        assert_eq!(
            "variable TEMP is inconsistent across padded records: missing from record 1",
            result.to_string()
        );
    }

    #[test]
    fn test_dtype_mismatch_is_fatal() {
        let mut records = axis_aligned_records(&[2, 2]);
        let temp = records[1].variables.get_mut("TEMP").unwrap();
        temp.data = VariableData::Float32(crate::types::MaskedArray::from_data(
            ndarray::ArrayD::from_elem(ndarray::IxDyn(&[2, 3]), 0.0_f32),
        ));
        let result = concatenate(records, "N_PROF").unwrap_err();
        assert_eq!(
            "variable TEMP is inconsistent across padded records: element type differs in record 1",
            result.to_string()
        );
    }

    #[test]
    fn test_non_axis_extent_mismatch_is_fatal() {
        let mut records = axis_aligned_records(&[2, 2]);
        let unpadded = test_utils::profile_record(2, 4, 0.0);
        records[1]
            .variables
            .insert("TEMP".to_string(), unpadded.variables["TEMP"].clone());
        let result = concatenate(records, "N_PROF").unwrap_err();
        assert_eq!(
            "variable TEMP is inconsistent across padded records: extent of N_LEVELS differs in record 1",
            result.to_string()
        );
    }

    #[test]
    fn test_record_attributes_come_from_the_first_record() {
        let aggregated = concatenate(axis_aligned_records(&[2, 2]), "N_PROF").unwrap();
        assert_eq!(
            Some(&AttrValue::from("argo")),
            aggregated.attributes.get("source")
        );
    }

    #[test]
    fn test_merge_metadata_normalises_fields() {
        let mut aggregated = concatenate(axis_aligned_records(&[2]), "N_PROF").unwrap();
        let metadata = test_utils::metadata_record("20190102030405", "  ARVOR ");
        merge_metadata(&mut aggregated, &metadata);
        assert_eq!(
            Some(&AttrValue::from("2019-01-02 03:04:05")),
            aggregated.attributes.get("launch_date")
        );
        assert_eq!(
            Some(&AttrValue::from("ARVOR")),
            aggregated.attributes.get("platform_type")
        );
    }

    #[test]
    fn test_merge_metadata_missing_launch_date() {
        let mut aggregated = concatenate(axis_aligned_records(&[2]), "N_PROF").unwrap();
        let mut metadata = test_utils::metadata_record("unused", "ARVOR");
        metadata.variables.remove("LAUNCH_DATE");
        merge_metadata(&mut aggregated, &metadata);
        assert!(!aggregated.attributes.contains_key("launch_date"));
        assert_eq!(
            Some(&AttrValue::from("ARVOR")),
            aggregated.attributes.get("platform_type")
        );
    }

    #[test]
    fn test_merge_metadata_malformed_launch_date() {
        let mut aggregated = concatenate(axis_aligned_records(&[2]), "N_PROF").unwrap();
        let metadata = test_utils::metadata_record("2019-01-02", "ARVOR");
        merge_metadata(&mut aggregated, &metadata);
        assert!(!aggregated.attributes.contains_key("launch_date"));
    }

    #[test]
    fn test_normalise_launch_date() {
        assert_eq!(
            Some("2023-12-31 23:59:58".to_string()),
            normalise_launch_date("20231231235958")
        );
        assert_eq!(None, normalise_launch_date("not a date"));
        assert_eq!(None, normalise_launch_date("20231301000000"));
    }
}
