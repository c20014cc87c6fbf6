//! Multi-dimensional arrays with an explicit validity mask.
//!
//! Padding a record must never be confused with a real measurement, even for
//! element types that have no NaN. A [MaskedArray] therefore pairs every data
//! array with a boolean mask of identical shape in which `true` marks a real
//! measurement and `false` marks a padded cell. Padded cells hold the element
//! type's fill sentinel so that serialised documents remain self-describing.

use ndarray::{ArrayD, Axis, IxDyn, SliceInfoElem};
use num_traits::{Bounded, Float};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AggregationError;

/// An array element type supported by the aggregation engine.
pub trait Element:
    Clone + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Sentinel value stored in cells that carry no measurement.
    fn fill() -> Self;
}

impl Element for i32 {
    fn fill() -> Self {
        Bounded::max_value()
    }
}

impl Element for i64 {
    fn fill() -> Self {
        Bounded::max_value()
    }
}

impl Element for u32 {
    fn fill() -> Self {
        Bounded::max_value()
    }
}

impl Element for u64 {
    fn fill() -> Self {
        Bounded::max_value()
    }
}

impl Element for f32 {
    fn fill() -> Self {
        Self::nan()
    }
}

impl Element for f64 {
    fn fill() -> Self {
        Self::nan()
    }
}

impl Element for String {
    fn fill() -> Self {
        String::new()
    }
}

/// A dynamic-dimensional array paired with a validity mask of the same shape.
///
/// The serialised representation is a single array of optional cells in which
/// masked cells appear as `null`. This keeps documents independent of the
/// in-memory fill sentinel and avoids the non-finite floats serde_json cannot
/// represent.
#[derive(Clone, Debug)]
pub struct MaskedArray<T: Element> {
    data: ArrayD<T>,
    mask: ArrayD<bool>,
}

impl<T: Element> Serialize for MaskedArray<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut cells = self.data.mapv(Some);
        cells.zip_mut_with(&self.mask, |cell, &valid| {
            if !valid {
                *cell = None;
            }
        });
        cells.serialize(serializer)
    }
}

impl<'de, T: Element> Deserialize<'de> for MaskedArray<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let cells: ArrayD<Option<T>> = ArrayD::deserialize(deserializer)?;
        let mask = cells.map(|cell| cell.is_some());
        let data = cells.mapv(|cell| cell.unwrap_or_else(T::fill));
        Ok(Self { data, mask })
    }
}

impl<T: Element> MaskedArray<T> {
    /// Return a new MaskedArray, checking that the mask covers the data.
    pub fn new(data: ArrayD<T>, mask: ArrayD<bool>) -> Result<Self, AggregationError> {
        if data.shape() != mask.shape() {
            return Err(AggregationError::MaskMismatch {
                data: data.shape().to_vec(),
                mask: mask.shape().to_vec(),
            });
        }
        Ok(Self { data, mask })
    }

    /// Return a new MaskedArray in which every cell is a valid measurement.
    pub fn from_data(data: ArrayD<T>) -> Self {
        let mask = ArrayD::from_elem(data.raw_dim(), true);
        Self { data, mask }
    }

    /// Return the shape of the array.
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Return the number of dimensions of the array.
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Return the data array.
    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    /// Return the validity mask.
    pub fn mask(&self) -> &ArrayD<bool> {
        &self.mask
    }

    /// Return the number of cells holding a real measurement.
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|&&valid| valid).count()
    }

    /// Grow the array to `target` by appending cells at the trailing edge of
    /// each dimension. Appended cells are masked invalid and hold the fill
    /// sentinel. Existing cells and their mask bits are unchanged.
    pub fn pad_to(&self, target: &[usize]) -> Result<Self, AggregationError> {
        let shrinks = target.len() != self.ndim()
            || self
                .shape()
                .iter()
                .zip(target)
                .any(|(&current, &wanted)| wanted < current);
        if shrinks {
            return Err(AggregationError::ShapeInvalid(ndarray::ShapeError::from_kind(
                ndarray::ErrorKind::IncompatibleShape,
            )));
        }
        let mut data = ArrayD::from_elem(IxDyn(target), T::fill());
        let mut mask = ArrayD::from_elem(IxDyn(target), false);
        let original: Vec<SliceInfoElem> = self
            .shape()
            .iter()
            .map(|&extent| SliceInfoElem::Slice {
                start: 0,
                end: Some(extent as isize),
                step: 1,
            })
            .collect();
        data.slice_mut(original.as_slice()).assign(&self.data);
        mask.slice_mut(original.as_slice()).assign(&self.mask);
        Ok(Self { data, mask })
    }

    /// Insert a new leading dimension of extent 1.
    pub fn insert_leading_axis(self) -> Self {
        Self {
            data: self.data.insert_axis(Axis(0)),
            mask: self.mask.insert_axis(Axis(0)),
        }
    }

    /// Concatenate arrays along the given axis, preserving the order of
    /// `parts`.
    pub fn concatenate(axis: usize, parts: &[Self]) -> Result<Self, AggregationError> {
        let data_views: Vec<_> = parts.iter().map(|part| part.data.view()).collect();
        let mask_views: Vec<_> = parts.iter().map(|part| part.mask.view()).collect();
        let data = ndarray::concatenate(Axis(axis), &data_views)?;
        let mask = ndarray::concatenate(Axis(axis), &mask_views)?;
        Ok(Self { data, mask })
    }
}

impl<T: Element> PartialEq for MaskedArray<T> {
    /// Masked cells compare equal regardless of the data they hold, so
    /// NaN-filled padding does not break equality.
    fn eq(&self, other: &Self) -> bool {
        self.data.shape() == other.data.shape()
            && self.mask == other.mask
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .zip(self.mask.iter())
                .all(|((left, right), &valid)| !valid || left == right)
    }
}
