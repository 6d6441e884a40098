use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Integer axis-aligned box: `position` is the min corner, `size` the extent.
///
/// The `y` channel carries the fitted height range of whatever surface the box
/// wraps. Equality and hashing only look at the `x`/`z` footprint, so two boxes
/// over the same square compare equal no matter how their heights were fitted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub position: IVec3,
    pub size: IVec3,
}

/// Quadrant order used whenever a footprint is split.
///
/// `x` grows east and `z` grows north, so SW is the min corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    SouthWest = 0,
    NorthWest = 1,
    NorthEast = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::SouthWest,
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthEast,
    ];

    /// Offset of this quadrant's min corner in half-size units.
    fn offset(self) -> (i32, i32) {
        match self {
            Quadrant::SouthWest => (0, 0),
            Quadrant::NorthWest => (0, 1),
            Quadrant::NorthEast => (1, 1),
            Quadrant::SouthEast => (1, 0),
        }
    }
}

impl Bounds {
    pub fn new(position: IVec3, size: IVec3) -> Self {
        Self { position, size }
    }

    /// Min corner in world units.
    pub fn min(&self) -> Vec3 {
        self.position.as_vec3()
    }

    /// Max corner in world units.
    pub fn max(&self) -> Vec3 {
        (self.position + self.size).as_vec3()
    }

    pub fn center(&self) -> Vec3 {
        self.position.as_vec3() + self.size.as_vec3() * 0.5
    }

    /// Edge length of the square footprint.
    pub fn footprint_size(&self) -> i32 {
        self.size.x
    }

    /// Footprint area in square world units.
    pub fn footprint_area(&self) -> i64 {
        self.size.x as i64 * self.size.z as i64
    }

    /// Copy of this box with its vertical range replaced by `[min_y, max_y]`,
    /// rounded outward to whole units.
    pub fn with_height_range(&self, min_y: f32, max_y: f32) -> Self {
        let lo = min_y.floor() as i32;
        let hi = (max_y.ceil() as i32).max(lo);
        Self {
            position: IVec3::new(self.position.x, lo, self.position.z),
            size: IVec3::new(self.size.x, hi - lo, self.size.z),
        }
    }

    /// Footprint of one quadrant. The vertical channel is copied from the
    /// parent until the caller fits it.
    pub fn quadrant(&self, quadrant: Quadrant) -> Self {
        let half_x = self.size.x / 2;
        let half_z = self.size.z / 2;
        let (ox, oz) = quadrant.offset();
        Self {
            position: IVec3::new(
                self.position.x + ox * half_x,
                self.position.y,
                self.position.z + oz * half_z,
            ),
            size: IVec3::new(half_x, self.size.y, half_z),
        }
    }

    /// All four quadrants in [`Quadrant::ALL`] order.
    pub fn quadrants(&self) -> [Self; 4] {
        Quadrant::ALL.map(|q| self.quadrant(q))
    }

    /// Whether the `x`/`z` footprint of `other` lies inside this footprint.
    pub fn contains_footprint(&self, other: &Bounds) -> bool {
        other.position.x >= self.position.x
            && other.position.z >= self.position.z
            && other.position.x + other.size.x <= self.position.x + self.size.x
            && other.position.z + other.size.z <= self.position.z + self.size.z
    }

    /// Whether the footprints share any area (touching edges do not count).
    pub fn overlaps_footprint(&self, other: &Bounds) -> bool {
        self.position.x < other.position.x + other.size.x
            && other.position.x < self.position.x + self.size.x
            && self.position.z < other.position.z + other.size.z
            && other.position.z < self.position.z + self.size.z
    }

    fn footprint_key(&self) -> (i32, i32, i32, i32) {
        (self.position.x, self.position.z, self.size.x, self.size.z)
    }
}

impl PartialEq for Bounds {
    fn eq(&self, other: &Self) -> bool {
        self.footprint_key() == other.footprint_key()
    }
}

impl Eq for Bounds {}

impl Hash for Bounds {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.footprint_key().hash(state);
    }
}
