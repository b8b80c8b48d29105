// ============================================================
// TABLE DOMAIN LAYER
// ============================================================
// Schema-less table types shared by the projection and mapping use cases
// No I/O, no async

mod cell;
#[allow(clippy::module_inception)]
mod table;

pub use cell::Cell;
pub use table::{is_falsy, Row, Table};
