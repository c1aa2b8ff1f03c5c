//! In-memory model of sheet data.
//!
//! The reader turns worksheet XML into these structures and the renderer
//! turns each [`Row`] into a document.

mod cell;
mod row;
mod sheet;

pub use cell::*;
pub use row::*;
pub use sheet::*;
