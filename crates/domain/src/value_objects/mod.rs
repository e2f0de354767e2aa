//! Value objects - immutable types identified by their content

mod grade;
mod language;
mod scenario;

pub use grade::Grade;
pub use language::{Language, language_name};
pub use scenario::Scenario;
