#![doc = "f1-sprint-core: core pipeline for the F1 sprint wins analysis."]

//! This crate holds every step of the analysis that has real logic in it:
//! loading the Kaggle F1 csv files, validating and cleaning them into typed
//! tables, and aggregating sprint wins per driver. Downloading and chart
//! rendering sit behind the traits in [`contract`].
//!
//! # Usage
//! Call [`pipeline::run`] with a [`config::PipelineConfig`], a
//! [`contract::Downloader`] and a [`contract::Reporter`], or use
//! [`pipeline::analyse`] for the computation alone.

pub mod cleaning;
pub mod config;
pub mod contract;
pub mod download;
pub mod error;
pub mod features;
pub mod model;
pub mod pipeline;
pub mod report;
pub mod table;
pub mod validation;

pub use error::PipelineError;
