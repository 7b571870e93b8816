use std::sync::Arc;

use glam::Mat4;

use crate::geometry::MeshData;
use crate::paint::Color;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Resolved transmission material inputs for one mesh draw.
///
/// Every field maps onto a uniform slot of the transmission shader.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TransmissionParams {
    pub ior: f32,
    pub thickness: f32,
    pub anisotropy: f32,
    pub chromatic_aberration: f32,
    pub transmission: f32,
    pub roughness: f32,
    /// `f32::INFINITY` disables absorption.
    pub attenuation_distance: f32,
    pub attenuation_color: Color,
    pub color: Color,
    pub distortion: f32,
    pub distortion_scale: f32,
    pub temporal_distortion: f32,
}

impl Default for TransmissionParams {
    fn default() -> Self {
        Self {
            ior: 1.5,
            thickness: 0.0,
            anisotropy: 0.0,
            chromatic_aberration: 0.0,
            transmission: 1.0,
            roughness: 0.0,
            attenuation_distance: f32::INFINITY,
            attenuation_color: Color::WHITE,
            color: Color::WHITE,
            distortion: 0.0,
            distortion_scale: 0.5,
            temporal_distortion: 0.0,
        }
    }
}

/// Mesh drawn with the transmission material over the offscreen buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshCmd {
    pub mesh: Arc<MeshData>,
    pub model: Mat4,
    pub material: TransmissionParams,
}

impl DrawList {
    /// Records a transmissive mesh draw command.
    #[inline]
    pub fn push_mesh(&mut self, z: ZIndex, mesh: Arc<MeshData>, model: Mat4, material: TransmissionParams) {
        self.push(z, DrawCmd::Mesh(MeshCmd { mesh, model, material }));
    }
}
