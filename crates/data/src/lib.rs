//! Catalog data loading for the reading aid: the JSON card schema,
//! the embedded default deck and the filter picker tables.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;
