//! Admission-side path handling

mod resolver;

pub use resolver::{contains_wildcard, PathResolver, Resolution};
