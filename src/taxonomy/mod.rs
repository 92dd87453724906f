pub mod layout;

pub use layout::{layout, LayoutTaxonomy};
