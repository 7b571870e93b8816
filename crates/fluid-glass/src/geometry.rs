//! Geometry provider seam and the procedural stand-ins for the model assets.

use std::collections::HashMap;
use std::f32::consts::TAU;
use std::sync::Arc;

use fluid_engine::geometry::MeshData;
use glam::Vec3;

use crate::mode::{GeometryRef, Mode, ModeConfig};

/// Resolves named sub-meshes. `None` means "not loaded yet"; callers retry next frame.
pub trait GeometryProvider {
    fn mesh(&self, geometry: GeometryRef) -> Option<Arc<MeshData>>;
}

impl GeometryProvider for HashMap<GeometryRef, Arc<MeshData>> {
    fn mesh(&self, geometry: GeometryRef) -> Option<Arc<MeshData>> {
        self.get(&geometry).cloned()
    }
}

/// Procedural meshes shaped like the shipped models, keyed by each mode's reference.
pub struct BuiltinGeometry {
    meshes: HashMap<GeometryRef, Arc<MeshData>>,
}

impl BuiltinGeometry {
    pub fn new() -> Self {
        let mut meshes = HashMap::new();
        meshes.insert(ModeConfig::for_mode(Mode::Lens).geometry, Arc::new(lens(1.0, 0.12, 0.2, 64, 12)));
        meshes.insert(ModeConfig::for_mode(Mode::Cube).geometry, Arc::new(cuboid(Vec3::splat(1.0))));
        meshes.insert(ModeConfig::for_mode(Mode::Bar).geometry, Arc::new(cuboid(Vec3::new(10.0, 0.5, 1.0))));
        Self { meshes }
    }
}

impl Default for BuiltinGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProvider for BuiltinGeometry {
    fn mesh(&self, geometry: GeometryRef) -> Option<Arc<MeshData>> {
        self.meshes.mesh(geometry)
    }
}

// ── builders ──────────────────────────────────────────────────────────────

/// Y-axis disc of `radius` with caps bulging by `bulge * (1 - r²)` beyond ±`half_height`.
pub fn lens(radius: f32, half_height: f32, bulge: f32, segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(1);
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    let mut indices = Vec::new();

    for sign in [1.0f32, -1.0] {
        let base = positions.len() as u32;
        // Center vertex, then `rings` rings of `segments` vertices.
        positions.push([0.0, sign * (half_height + bulge), 0.0]);
        normals.push([0.0, sign, 0.0]);
        for ring in 1..=rings {
            let t = ring as f32 / rings as f32;
            let r = t * radius;
            let y = sign * (half_height + bulge * (1.0 - t * t));
            for seg in 0..segments {
                let a = seg as f32 / segments as f32 * TAU;
                let (x, z) = (a.cos() * r, a.sin() * r);
                positions.push([x, y, z]);
                // Gradient of y = h + b(1 - (x² + z²)/R²).
                let k = 2.0 * bulge / (radius * radius);
                let n = Vec3::new(k * x, sign, k * z).normalize_or(Vec3::Y * sign);
                normals.push(n.to_array());
            }
        }
        let ring_start = |ring: u32| base + 1 + (ring - 1) * segments;
        for seg in 0..segments {
            let next = (seg + 1) % segments;
            indices.extend([base, ring_start(1) + seg, ring_start(1) + next]);
        }
        for ring in 1..rings {
            let (inner, outer) = (ring_start(ring), ring_start(ring + 1));
            for seg in 0..segments {
                let next = (seg + 1) % segments;
                indices.extend([inner + seg, outer + seg, outer + next]);
                indices.extend([inner + seg, outer + next, inner + next]);
            }
        }
    }

    // Side wall with its own radial normals.
    let base = positions.len() as u32;
    for seg in 0..segments {
        let a = seg as f32 / segments as f32 * TAU;
        let (c, s) = (a.cos(), a.sin());
        positions.push([c * radius, half_height, s * radius]);
        positions.push([c * radius, -half_height, s * radius]);
        normals.push([c, 0.0, s]);
        normals.push([c, 0.0, s]);
    }
    for seg in 0..segments {
        let next = (seg + 1) % segments;
        let (t0, b0, t1, b1) = (base + seg * 2, base + seg * 2 + 1, base + next * 2, base + next * 2 + 1);
        indices.extend([t0, b0, b1, t0, b1, t1]);
    }

    MeshData::new(positions, normals, indices)
}

/// Box centered at the origin with flat per-face normals.
pub fn cuboid(half: Vec3) -> MeshData {
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::NEG_Z),
        (Vec3::Y, Vec3::Z, Vec3::X),
        (Vec3::NEG_Y, Vec3::Z, Vec3::NEG_X),
        (Vec3::Z, Vec3::Y, Vec3::NEG_X),
        (Vec3::NEG_Z, Vec3::Y, Vec3::X),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, up, right) in FACES {
        let base = positions.len() as u32;
        for (u, v) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = (normal + right * u + up * v) * half;
            positions.push(p.to_array());
            normals.push(normal.to_array());
        }
        indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData::new(positions, normals, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn builtin_resolves_every_mode() {
        let provider = BuiltinGeometry::new();
        for mode in Mode::ALL {
            let mesh = provider.mesh(ModeConfig::for_mode(mode).geometry).unwrap();
            assert!(!mesh.is_empty());
        }
    }

    #[test]
    fn unknown_reference_is_not_loaded() {
        let provider = BuiltinGeometry::new();
        assert!(provider.mesh(GeometryRef { asset: "torus.glb", node: "Torus" }).is_none());
    }

    #[test]
    fn lens_bounds() {
        let b = lens(1.0, 0.1, 0.2, 32, 4).bounds().unwrap();
        assert!(close(b.size().x, 2.0));
        assert!(close(b.size().y, 0.6));
    }

    #[test]
    fn bar_is_twenty_units_wide() {
        let b = cuboid(Vec3::new(10.0, 0.5, 1.0)).bounds().unwrap();
        assert_eq!(b.size(), Vec3::new(20.0, 1.0, 2.0));
    }

    #[test]
    fn cuboid_has_flat_faces() {
        let mesh = cuboid(Vec3::ONE);
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.index_count(), 36);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let (p, n) = (Vec3::from_array(*p), Vec3::from_array(*n));
            // Every vertex lies on the face plane its normal points out of.
            assert!(close(p.dot(n), 1.0));
        }
    }

    #[test]
    fn indices_stay_in_range() {
        let mesh = lens(1.0, 0.1, 0.2, 16, 3);
        let count = mesh.positions.len() as u32;
        assert!(mesh.indices.iter().all(|i| *i < count));
        assert_eq!(mesh.index_count() % 3, 0);
    }
}
