use glam::{Vec2, Vec3};

use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Handle to an image registered with the image renderer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ImageId(pub(crate) usize);

/// World-space image quad with cover-fit sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCmd {
    pub image: ImageId,
    /// Quad center in world units.
    pub center: Vec3,
    /// Quad extent in world units.
    pub size: Vec2,
    /// Texture zoom around the quad center; `1.0` is a plain cover fit.
    pub zoom: f32,
}

impl DrawList {
    /// Records an image draw command.
    #[inline]
    pub fn push_image(&mut self, z: ZIndex, image: ImageId, center: Vec3, size: Vec2, zoom: f32) {
        self.push(z, DrawCmd::Image(ImageCmd { image, center, size, zoom }));
    }
}
