//! Data transfer objects for API responses.
//!
//! These structs are serialized to JSON for the panel client.
//! - `blame`: LineRecord, Block for per-line commit attribution
//! - `view`: DisplayEntry, HighlightSpan, PanelSnapshot for the rendered panel

pub mod blame;
pub mod view;

pub use blame::*;
pub use view::*;
