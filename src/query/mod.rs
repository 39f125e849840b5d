mod dimensions;
mod executor;
mod predicate;

pub use dimensions::{extract_dimensions, DimensionOptions};
pub use executor::{execute, ProjectedRecord};
pub use predicate::{CountrySelectionDefault, Dimension, FilterClause, FilterSelection, Predicate};
