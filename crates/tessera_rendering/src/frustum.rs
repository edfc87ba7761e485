//! View frustum planes.
//!
//! Recomputed once per frame from the current projection and view matrices,
//! after the camera has produced the view. Renderers query it to skip
//! chunks and entities outside the view.

use bytemuck::{Pod, Zeroable};
use tessera_shared::{Mat4, Vec3};

/// A plane `a*x + b*y + c*z + d = 0`, normal pointing into the frustum.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Plane {
    /// Normal X.
    pub a: f32,
    /// Normal Y.
    pub b: f32,
    /// Normal Z.
    pub c: f32,
    /// Offset.
    pub d: f32,
}

impl Plane {
    /// Creates a plane.
    #[must_use]
    pub const fn new(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self { a, b, c, d }
    }

    /// Scales so the normal has unit length.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = (self.a * self.a + self.b * self.b + self.c * self.c).sqrt();
        if len > 0.0 {
            Self::new(self.a / len, self.b / len, self.c / len, self.d / len)
        } else {
            self
        }
    }

    /// Signed distance from `p`; positive is inside.
    #[inline]
    #[must_use]
    pub fn distance(&self, p: Vec3) -> f32 {
        self.a * p.x + self.b * p.y + self.c * p.z + self.d
    }
}

/// Axis-aligned box, e.g. a chunk or an entity's bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// The unit box occupied by block `(x, y, z)`.
    #[must_use]
    pub fn block(x: i32, y: i32, z: i32) -> Self {
        let min = Vec3::new(x as f32, y as f32, z as f32);
        Self::new(min, min + Vec3::new(1.0, 1.0, 1.0))
    }
}

/// The six planes of a view frustum.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Left plane index.
    pub const LEFT: usize = 0;
    /// Right plane index.
    pub const RIGHT: usize = 1;
    /// Bottom plane index.
    pub const BOTTOM: usize = 2;
    /// Top plane index.
    pub const TOP: usize = 3;
    /// Near plane index.
    pub const NEAR: usize = 4;
    /// Far plane index.
    pub const FAR: usize = 5;

    /// Extracts planes from `projection * view`.
    #[must_use]
    pub fn from_matrices(projection: &Mat4, view: &Mat4) -> Self {
        Self::from_view_projection(&(*projection * *view))
    }

    /// Extracts planes from a combined clip matrix (Gribb/Hartmann).
    #[must_use]
    pub fn from_view_projection(clip: &Mat4) -> Self {
        let m = &clip.cols;
        let row = |r: usize| [m[0][r], m[1][r], m[2][r], m[3][r]];
        let (r0, r1, r2, r3) = (row(0), row(1), row(2), row(3));
        let combine = |other: [f32; 4], sign: f32| {
            Plane::new(
                r3[0] + sign * other[0],
                r3[1] + sign * other[1],
                r3[2] + sign * other[2],
                r3[3] + sign * other[3],
            )
            .normalized()
        };

        let mut planes = [Plane::default(); 6];
        planes[Self::LEFT] = combine(r0, 1.0);
        planes[Self::RIGHT] = combine(r0, -1.0);
        planes[Self::BOTTOM] = combine(r1, 1.0);
        planes[Self::TOP] = combine(r1, -1.0);
        planes[Self::NEAR] = combine(r2, 1.0);
        planes[Self::FAR] = combine(r2, -1.0);
        Self { planes }
    }

    /// True if any part of the sphere is inside.
    #[must_use]
    pub fn sphere_visible(&self, center: Vec3, radius: f32) -> bool {
        self.planes.iter().all(|p| p.distance(center) >= -radius)
    }

    /// True if any part of the box is inside (conservative).
    #[must_use]
    pub fn aabb_visible(&self, aabb: &Aabb) -> bool {
        let center = (aabb.min + aabb.max) * 0.5;
        let half = (aabb.max - aabb.min) * 0.5;
        self.planes.iter().all(|p| {
            let r = half.x * p.a.abs() + half.y * p.b.abs() + half.z * p.c.abs();
            p.distance(center) >= -r
        })
    }

    /// Planes as raw floats for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.planes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frustum() -> Frustum {
        let projection = Mat4::perspective(70f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
        let view = Mat4::look_at(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        Frustum::from_matrices(&projection, &view)
    }

    #[test]
    fn test_plane_normalization() {
        let p = Plane::new(3.0, 0.0, 4.0, 10.0).normalized();
        assert!((p.a - 0.6).abs() < 1e-6);
        assert!((p.c - 0.8).abs() < 1e-6);
        assert!((p.d - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_block_ahead_is_visible() {
        let f = frustum();
        assert!(f.aabb_visible(&Aabb::block(0, 0, -10)));
        assert!(f.sphere_visible(Vec3::new(0.0, 0.0, -50.0), 1.0));
    }

    #[test]
    fn test_block_behind_or_beyond_far_is_culled() {
        let f = frustum();
        assert!(!f.aabb_visible(&Aabb::block(0, 0, 10)));
        assert!(!f.sphere_visible(Vec3::new(0.0, 0.0, -150.0), 1.0));
    }

    #[test]
    fn test_plane_bytes() {
        assert_eq!(frustum().as_bytes().len(), 6 * 16);
    }
}
