//! Blame engine.
//!
//! - `group`: consecutive same-commit lines → blocks
//! - `view`: blocks → panel entries (title, headers, content, footer)
//! - `highlight`: panel entries/text → styled byte ranges
//! - `navigation`: the session state machine driving all of the above
//! - `host` / `panel`: the seam to the hosting application and its in-memory impl
//! - `keymap`, `clipboard`, `time`: key bindings, hash copying, relative dates

pub mod clipboard;
pub mod group;
pub mod highlight;
pub mod host;
pub mod keymap;
pub mod navigation;
pub mod panel;
pub mod time;
pub mod view;

pub use host::BlameHost;
pub use navigation::{BlameConfig, BlameEngine, NavigationState};
pub use panel::PanelHost;
