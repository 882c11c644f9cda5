//! flipdl core: resolve an online flipbook's pages and stage them locally.
//!
//! Stages, in order: [`reference`] normalization, [`fetch`] of the config
//! payload, [`metadata`] parsing, [`locator`] page URLs, [`retriever`] into a
//! staging directory. [`pipeline`] ties the first four together.

pub mod config;
pub mod error;
pub mod logging;

pub mod assemble;
pub mod fetch;
pub mod locator;
pub mod metadata;
pub mod pipeline;
pub mod reference;
pub mod retriever;
pub mod retry;
pub mod storage;
pub mod url_model;

pub use error::FlipbookError;
