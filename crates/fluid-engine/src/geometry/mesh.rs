use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec3;

/// Process-unique mesh identity, used by renderers to cache GPU buffers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct MeshId(u64);

impl MeshId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Axis-aligned bounding box in mesh-local units.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Bounds of `points`, or `None` when empty or non-finite.
    pub fn from_points(points: &[[f32; 3]]) -> Option<Self> {
        let mut it = points.iter().map(|p| Vec3::from_array(*p));
        let first = it.next()?;
        let (min, max) = it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
        (min.is_finite() && max.is_finite()).then_some(Self { min, max })
    }
}

/// Indexed triangle mesh with per-vertex normals.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    id: MeshId,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    bounds: Option<Aabb>,
}

impl MeshData {
    /// Builds a mesh. Missing or mismatched normals are recomputed from faces.
    pub fn new(positions: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        let normals = if normals.len() == positions.len() {
            normals
        } else {
            compute_normals(&positions, &indices)
        };
        let bounds = Aabb::from_points(&positions);
        Self { id: MeshId::next(), positions, normals, indices, bounds }
    }

    #[inline]
    pub fn id(&self) -> MeshId {
        self.id
    }

    /// Local-space bounds; `None` for an empty mesh.
    #[inline]
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty() || self.positions.is_empty()
    }
}

/// Area-weighted smooth normals. Faces with out-of-range indices are skipped.
pub(crate) fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let pa = Vec3::from_array(positions[a]);
        let n = (Vec3::from_array(positions[b]) - pa).cross(Vec3::from_array(positions[c]) - pa);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    }

    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData::new(
            vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 1.0, -1.0]],
            Vec::new(),
            vec![0, 1, 2],
        )
    }

    #[test]
    fn bounds_cover_all_positions() {
        let b = triangle().bounds().unwrap();
        assert_eq!(b.min, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(b.size(), Vec3::new(2.0, 1.0, 1.0));
    }

    #[test]
    fn missing_normals_are_computed() {
        let mesh = MeshData::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            Vec::new(),
            vec![0, 1, 2],
        );
        assert_eq!(mesh.normals.len(), 3);
        for n in &mesh.normals {
            assert!((Vec3::from_array(*n) - Vec3::Z).length() < 1e-6);
        }
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(triangle().id(), triangle().id());
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        let mesh = MeshData::new(Vec::new(), Vec::new(), Vec::new());
        assert!(mesh.bounds().is_none());
        assert!(mesh.is_empty());
    }

    #[test]
    fn out_of_range_indices_are_skipped() {
        let normals = compute_normals(&[[0.0; 3], [1.0, 0.0, 0.0]], &[0, 1, 7]);
        assert_eq!(normals, vec![[0.0, 1.0, 0.0]; 2]);
    }
}
