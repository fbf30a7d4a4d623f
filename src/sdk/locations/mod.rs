pub mod cache;
pub mod error;
pub mod selector;
pub mod source;
pub mod tree;

pub use cache::LocationHierarchyCache;
pub use error::{HierarchyError, Level, SelectorError};
pub use selector::{CascadingSelector, SelectorState, UNSELECTED};
pub use source::{CsvLocationSource, HttpLocationSource, LocationSource};
pub use tree::LocationTree;
