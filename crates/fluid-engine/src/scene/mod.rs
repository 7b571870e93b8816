//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic draw commands per pass target
//! - provide deterministic ordering (z-index + insertion order)
//! - keep item-specific payloads isolated per file under `scene::items`

mod cmd;
mod list;
mod order;

pub mod items;

pub use cmd::DrawCmd;
pub use items::image::{ImageCmd, ImageId};
pub use items::mesh::{MeshCmd, TransmissionParams};
pub use items::text::TextCmd;
pub use list::{DrawItem, DrawList, PassTarget};
pub use order::{SortKey, ZIndex};
