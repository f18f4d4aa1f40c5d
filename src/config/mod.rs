//! Validation file model and parser.

pub mod model;
pub mod parser;

pub use model::{FileRule, StageValidation, ValidationConfig, ValidationRule};
pub use parser::{discover, parse_file, parse_str, CANDIDATE_FILES};
