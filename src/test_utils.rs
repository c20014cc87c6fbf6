use hashbrown::HashMap;
use ndarray::{arr0, ArrayD, IxDyn};

use crate::dataset::{Dataset, Variable, VariableData};
use crate::types::{AttrValue, MaskedArray};

/// Create a float variable spanning the named dimensions.
pub(crate) fn float_variable(dims: &[&str], data: ArrayD<f64>) -> Variable {
    Variable {
        dims: dims.iter().map(|dim| dim.to_string()).collect(),
        data: VariableData::Float64(MaskedArray::from_data(data)),
        attributes: HashMap::new(),
    }
}

/// Create a scalar string variable.
pub(crate) fn str_scalar(value: &str) -> Variable {
    Variable {
        dims: vec![],
        data: VariableData::Str(MaskedArray::from_data(arr0(value.to_string()).into_dyn())),
        attributes: HashMap::new(),
    }
}

/// Create a profile record with TEMP and PRES over (N_PROF, N_LEVELS), JULD
/// over (N_PROF,) and a scalar DATA_TYPE. Cell values start at `base` so
/// records built with different bases are distinguishable after aggregation.
pub(crate) fn profile_record(n_prof: usize, n_levels: usize, base: f64) -> Dataset {
    let grid = ArrayD::from_shape_fn(IxDyn(&[n_prof, n_levels]), |index| {
        base + (index[0] * n_levels + index[1]) as f64
    });
    let juld = ArrayD::from_shape_fn(IxDyn(&[n_prof]), |index| base + index[0] as f64);
    let mut dimensions = HashMap::new();
    dimensions.insert("N_PROF".to_string(), n_prof);
    dimensions.insert("N_LEVELS".to_string(), n_levels);
    let mut variables = HashMap::new();
    variables.insert(
        "TEMP".to_string(),
        float_variable(&["N_PROF", "N_LEVELS"], grid.clone()),
    );
    variables.insert(
        "PRES".to_string(),
        float_variable(&["N_PROF", "N_LEVELS"], grid + 1000.0),
    );
    variables.insert("JULD".to_string(), float_variable(&["N_PROF"], juld));
    variables.insert("DATA_TYPE".to_string(), str_scalar("Argo profile"));
    let mut attributes = HashMap::new();
    attributes.insert("source".to_string(), AttrValue::from("argo"));
    Dataset {
        dimensions,
        variables,
        attributes,
    }
}

/// Create a profile record that additionally declares an N_CALIB dimension
/// with a calibration variable over (N_PROF, N_CALIB).
pub(crate) fn calibrated_record(
    n_prof: usize,
    n_levels: usize,
    n_calib: usize,
    base: f64,
) -> Dataset {
    let mut dataset = profile_record(n_prof, n_levels, base);
    dataset.dimensions.insert("N_CALIB".to_string(), n_calib);
    let coefficients = ArrayD::from_elem(IxDyn(&[n_prof, n_calib]), base);
    dataset.variables.insert(
        "SCIENTIFIC_CALIB_COEFFICIENT".to_string(),
        float_variable(&["N_PROF", "N_CALIB"], coefficients),
    );
    dataset
}

/// Create a metadata record carrying launch date and platform type scalars.
pub(crate) fn metadata_record(launch_date: &str, platform_type: &str) -> Dataset {
    let mut variables = HashMap::new();
    variables.insert("LAUNCH_DATE".to_string(), str_scalar(launch_date));
    variables.insert("PLATFORM_TYPE".to_string(), str_scalar(platform_type));
    Dataset {
        dimensions: HashMap::new(),
        variables,
        attributes: HashMap::new(),
    }
}
