//! colorset-dedupe: Consolidate Xcode colors into a deduplicated catalog.

pub mod asset;
pub mod catalog;
pub mod color;
pub mod error;
pub mod group;
pub mod logging;
pub mod markup;
pub mod naming;
pub mod report;
pub mod scanner;
pub mod types;
