use glam::{Mat4, Vec3, Vec4};

use crate::bounds::Bounds;

/// Six clip planes as `(normal, d)` with normals pointing inward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract normalized planes from a view-projection matrix
    /// (order: left, right, bottom, top, near, far).
    pub fn from_view_projection(view_proj: &Mat4) -> Self {
        let row0 = view_proj.row(0);
        let row1 = view_proj.row(1);
        let row2 = view_proj.row(2);
        let row3 = view_proj.row(3);
        let planes = [
            row3 + row0,
            row3 - row0,
            row3 + row1,
            row3 - row1,
            row3 + row2,
            row3 - row2,
        ]
        .map(normalize_plane);
        Self { planes }
    }

    /// Conservative box test: false only when the box is fully outside a plane.
    pub fn intersects_bounds(&self, bounds: &Bounds) -> bool {
        let min = bounds.min();
        let max = bounds.max();
        self.planes.iter().all(|plane| {
            let normal = plane.truncate();
            let p = Vec3::select(normal.cmpge(Vec3::ZERO), max, min);
            normal.dot(p) + plane.w >= 0.0
        })
    }
}

fn normalize_plane(plane: Vec4) -> Vec4 {
    let len = plane.truncate().length();
    if len > 0.0 { plane / len } else { plane }
}

/// Immutable per-frame camera snapshot.
///
/// Only `position` drives LOD refinement. The frustum is carried so consumers
/// can cull the visible set, but expansion itself never looks at it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraInfo {
    pub position: Vec3,
    pub frustum: Option<Frustum>,
}

impl CameraInfo {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            frustum: None,
        }
    }

    pub fn with_view_projection(position: Vec3, view_proj: &Mat4) -> Self {
        Self {
            position,
            frustum: Some(Frustum::from_view_projection(view_proj)),
        }
    }

    /// Whether `bounds` may be on screen. Without a frustum everything is.
    pub fn may_see(&self, bounds: &Bounds) -> bool {
        self.frustum
            .as_ref()
            .is_none_or(|frustum| frustum.intersects_bounds(bounds))
    }
}
