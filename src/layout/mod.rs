//! Layout layer: cell coordinates and the header lists that shape the report.

pub mod cell;
pub mod headers;

pub use cell::{CellRef, column_name};
pub use headers::{Layout, LayoutSpec, MainHeader};
