//! Path classification against the configured route tables.

pub mod class;
pub mod table;

pub use class::RouteClass;
pub use table::RouteTable;
