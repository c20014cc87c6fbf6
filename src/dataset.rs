//! Data types and associated functions and methods

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use validator::{Validate, ValidationError};

use crate::error::AggregationError;
use crate::types::{AttrValue, MaskedArray};

/// Supported element data types
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    /// [i32]
    Int32,
    /// [i64]
    Int64,
    /// [u32]
    Uint32,
    /// [u64]
    Uint64,
    /// [f32]
    Float32,
    /// [f64]
    Float64,
    /// [String]
    Str,
}

/// Array payload of a variable, tagged by element type.
///
/// Generic array code is written against [MaskedArray] and reached by matching
/// on the variant here.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "dtype", content = "array", rename_all = "lowercase")]
pub enum VariableData {
    /// [i32]
    Int32(MaskedArray<i32>),
    /// [i64]
    Int64(MaskedArray<i64>),
    /// [u32]
    Uint32(MaskedArray<u32>),
    /// [u64]
    Uint64(MaskedArray<u64>),
    /// [f32]
    Float32(MaskedArray<f32>),
    /// [f64]
    Float64(MaskedArray<f64>),
    /// [String]
    Str(MaskedArray<String>),
}

/// Evaluate an expression against the masked array inside any variant.
macro_rules! with_array {
    ($data:expr, $array:ident, $body:expr) => {
        match $data {
            VariableData::Int32($array) => $body,
            VariableData::Int64($array) => $body,
            VariableData::Uint32($array) => $body,
            VariableData::Uint64($array) => $body,
            VariableData::Float32($array) => $body,
            VariableData::Float64($array) => $body,
            VariableData::Str($array) => $body,
        }
    };
}

/// Apply a variant-preserving transformation to the masked array inside.
macro_rules! map_array {
    ($data:expr, $array:ident, $body:expr) => {
        match $data {
            VariableData::Int32($array) => VariableData::Int32($body),
            VariableData::Int64($array) => VariableData::Int64($body),
            VariableData::Uint32($array) => VariableData::Uint32($body),
            VariableData::Uint64($array) => VariableData::Uint64($body),
            VariableData::Float32($array) => VariableData::Float32($body),
            VariableData::Float64($array) => VariableData::Float64($body),
            VariableData::Str($array) => VariableData::Str($body),
        }
    };
}

/// Concatenate parts that must all hold the named variant.
macro_rules! concatenate_variant {
    ($variant:ident, $axis:expr, $parts:expr) => {{
        let mut arrays = Vec::with_capacity($parts.len());
        for part in $parts {
            match part {
                VariableData::$variant(array) => arrays.push(array),
                _ => {
                    return Err(AggregationError::ShapeInvalid(
                        ndarray::ShapeError::from_kind(ndarray::ErrorKind::IncompatibleShape),
                    ))
                }
            }
        }
        Ok(VariableData::$variant(MaskedArray::concatenate(
            $axis, &arrays,
        )?))
    }};
}

impl VariableData {
    /// Return the element data type.
    pub fn dtype(&self) -> DType {
        match self {
            Self::Int32(_) => DType::Int32,
            Self::Int64(_) => DType::Int64,
            Self::Uint32(_) => DType::Uint32,
            Self::Uint64(_) => DType::Uint64,
            Self::Float32(_) => DType::Float32,
            Self::Float64(_) => DType::Float64,
            Self::Str(_) => DType::Str,
        }
    }

    /// Return the shape of the array.
    pub fn shape(&self) -> &[usize] {
        with_array!(self, array, array.shape())
    }

    /// Return the number of dimensions of the array.
    pub fn ndim(&self) -> usize {
        with_array!(self, array, array.ndim())
    }

    /// Return the number of cells holding a real measurement.
    pub fn valid_count(&self) -> usize {
        with_array!(self, array, array.valid_count())
    }

    /// Grow the array to `target` by appending masked fill cells at the
    /// trailing edge of each dimension.
    pub fn pad_to(&self, target: &[usize]) -> Result<Self, AggregationError> {
        Ok(map_array!(self, array, array.pad_to(target)?))
    }

    /// Insert a new leading dimension of extent 1.
    pub fn insert_leading_axis(self) -> Self {
        map_array!(self, array, array.insert_leading_axis())
    }

    /// Concatenate parts along the given axis, preserving the order of
    /// `parts`. All parts must hold the same element type.
    pub fn concatenate(axis: usize, parts: Vec<Self>) -> Result<Self, AggregationError> {
        match parts.first() {
            None => Err(AggregationError::EmptyCorpus),
            Some(Self::Int32(_)) => concatenate_variant!(Int32, axis, parts),
            Some(Self::Int64(_)) => concatenate_variant!(Int64, axis, parts),
            Some(Self::Uint32(_)) => concatenate_variant!(Uint32, axis, parts),
            Some(Self::Uint64(_)) => concatenate_variant!(Uint64, axis, parts),
            Some(Self::Float32(_)) => concatenate_variant!(Float32, axis, parts),
            Some(Self::Float64(_)) => concatenate_variant!(Float64, axis, parts),
            Some(Self::Str(_)) => concatenate_variant!(Str, axis, parts),
        }
    }
}

/// A named multi-dimensional variable within a record.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Variable {
    /// Names of the dimensions spanned by the array, outermost first.
    /// An empty list denotes a scalar.
    #[serde(default)]
    pub dims: Vec<String>,
    /// Array payload and element type
    #[serde(flatten)]
    pub data: VariableData,
    /// Descriptive metadata, carried through aggregation unchanged
    #[serde(default)]
    pub attributes: HashMap<String, AttrValue>,
}

impl Variable {
    /// Return true if the variable is a scalar.
    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }
}

/// A self-describing profile record.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[validate(schema(function = "validate_dataset"))]
pub struct Dataset {
    /// Extent of each named dimension
    pub dimensions: HashMap<String, usize>,
    /// Variables keyed by name
    pub variables: HashMap<String, Variable>,
    /// Record-level descriptive metadata
    #[serde(default)]
    pub attributes: HashMap<String, AttrValue>,
}

impl Dataset {
    /// Return the set of dimension names the record declares.
    pub fn dimension_names(&self) -> HashSet<String> {
        self.dimensions.keys().cloned().collect()
    }
}

/// Validate the structural invariants of a record.
fn validate_dataset(dataset: &Dataset) -> Result<(), ValidationError> {
    for (name, variable) in &dataset.variables {
        if variable.dims.len() != variable.data.ndim() {
            let mut error = ValidationError::new("Variable rank must match its dimension list");
            error.add_param("variable".into(), name);
            error.add_param("dims".into(), &variable.dims.len());
            error.add_param("rank".into(), &variable.data.ndim());
            return Err(error);
        }
        for (dim, &extent) in variable.dims.iter().zip(variable.data.shape()) {
            match dataset.dimensions.get(dim) {
                None => {
                    let mut error =
                        ValidationError::new("Variable references an undeclared dimension");
                    error.add_param("variable".into(), name);
                    error.add_param("dimension".into(), dim);
                    return Err(error);
                }
                Some(&declared) if declared != extent => {
                    let mut error =
                        ValidationError::new("Variable extent must match the declared dimension");
                    error.add_param("variable".into(), name);
                    error.add_param("dimension".into(), dim);
                    error.add_param("declared".into(), &declared);
                    error.add_param("actual".into(), &extent);
                    return Err(error);
                }
                Some(_) => (),
            }
        }
    }
    Ok(())
}
