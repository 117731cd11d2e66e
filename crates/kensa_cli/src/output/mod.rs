//! Output formatting module

mod json;

pub use json::output_json;
