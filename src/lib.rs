//! This crate provides an oceanographic profile aggregation engine. It ingests collections of
//! self-describing multi-dimensional profile records (one record per measurement event) that do
//! not share an identical dimensional schema, and produces a single aggregated record in which
//! every measurement event is a valid, padded member of a uniform N-dimensional array collection.
//!
//! The engine decides which dimensions are structurally comparable across heterogeneous inputs,
//! computes the target shape, pads each input to that shape without corrupting physical meaning
//! and concatenates all inputs along a single designated record axis.
//!
//! The aggregation engine is built on top of a number of open source components.
//!
//! * [ndarray] provides [NumPy](https://numpy.org)-like n-dimensional arrays used in numerical
//!   computation.
//! * [Serde](serde) performs (de)serialisation of JSON record documents.
//! * [Rayon](rayon) executes the data-parallel padding stage.
//! * [Clap](clap) implements the command line interface.

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod dataset;
pub mod error;
pub mod padder;
pub mod pipeline;
pub mod resolver;
pub mod source;
#[cfg(test)]
pub mod test_utils;
pub mod tracing;
pub mod types;
