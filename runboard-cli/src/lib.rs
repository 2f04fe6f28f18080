//! runboard-cli library interface for testing
//!
//! Exposes the presentation layer: upload handling, the last-writer-wins
//! display slot, watch mode and text/JSON rendering.

pub mod render;
pub mod session;
pub mod upload;
pub mod watch;

pub use render::{render_json, render_text, RenderOptions};
pub use session::{DisplaySlot, DisplayState, Published, UploadTicket};
pub use upload::{process_file, upload_once};
