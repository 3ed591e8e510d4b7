use glam::{Mat4, Vec3};
use crate::IsOnOrInside;

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct AABB
{
    pub min: Vec3,
    pub max: Vec3,
}
impl AABB
{
    pub const MAX_MIN: Self = Self { min: Vec3::MAX, max: Vec3::MIN }; // for finding min volume

    #[inline] #[must_use] pub const fn new(min: Vec3, max: Vec3) -> Self { Self { min, max } }

    // Smallest box containing every point, or None if there are no points
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self>
    {
        let mut aabb = Self::MAX_MIN;
        for point in points
        {
            aabb.min = aabb.min.min(point);
            aabb.max = aabb.max.max(point);
        }
        aabb.is_valid().then_some(aabb)
    }

    // false for MAX_MIN (nothing has been added)
    #[inline] #[must_use] pub fn is_valid(self) -> bool { self.min.cmple(self.max).all() }

    #[inline] #[must_use] pub fn size(self) -> Vec3 { self.max - self.min }
    #[inline] #[must_use] pub fn center(self) -> Vec3 { (self.min + self.max) / 2.0 }

    #[inline]
    pub fn union_with(&mut self, other: Self)
    {
        *self = self.unioned_with(other);
    }

    #[inline] #[must_use]
    pub fn unioned_with(self, rhs: Self) -> Self
    {
        Self
        {
            min: self.min.min(rhs.min),
            max: self.max.max(rhs.max),
        }
    }

    // The eight corners, ordered by (x, y, z) bits of the index: bit 0 picks max.x, etc
    #[must_use]
    pub fn corners(self) -> [Vec3; 8]
    {
        std::array::from_fn(|i| Vec3::new(
            if i & 1 == 0 { self.min.x } else { self.max.x },
            if i & 2 == 0 { self.min.y } else { self.max.y },
            if i & 4 == 0 { self.min.z } else { self.max.z },
        ))
    }

    // The eight corners moved into another space. The result is not necessarily axis aligned
    #[must_use]
    pub fn transformed_corners(self, transform: &Mat4) -> [Vec3; 8]
    {
        self.corners().map(|c| transform.transform_point3(c))
    }
}
impl IsOnOrInside<Vec3> for AABB
{
    fn rhs_is_on_or_inside(&self, other: Vec3) -> bool
    {
        self.min.cmple(other).all() && self.max.cmpge(other).all()
    }
}
