use crate::scene::items::image::ImageCmd;
use crate::scene::items::mesh::MeshCmd;
use crate::scene::items::text::TextCmd;

/// Renderer-agnostic draw command stream.
///
/// Extending the scene:
/// - add a payload module under `scene::items::*`
/// - add a new variant here
/// - implement push helpers inside that item module
/// - add a matching renderer under `render::*`
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Mesh(MeshCmd),
    Image(ImageCmd),
    Text(TextCmd),
}
