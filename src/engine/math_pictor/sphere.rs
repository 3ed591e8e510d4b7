use std::fmt::{Debug, Formatter};
use glam::{Vec3, Vec4, Vec4Swizzles};
use nab_pictor::utils::ShortTypeName;
use crate::{CenterDistance, IsOnOrInside, AABB};

#[derive(Default, Clone, Copy, PartialEq)]
pub struct Sphere(pub Vec4);
impl Sphere
{
    // Smallest radius from_corners() will produce. Flat or point-like geometry would otherwise frame at zero size
    pub const MIN_RADIUS: f32 = 0.01;
    // Returned by from_corners() when there is nothing to bound
    pub const FALLBACK: Self = Self(Vec4::new(0.0, 0.0, 0.0, 1.0));

    #[inline] #[must_use] pub fn new(center: Vec3, radius: f32) -> Self
    {
        Self(Vec4::new(center.x, center.y, center.z, radius))
    }

    #[inline] #[must_use] pub fn center(&self) -> Vec3 { self.0.xyz() }
    #[inline] #[must_use] pub fn radius(&self) -> f32 { self.0.w }
    #[inline] #[must_use] pub fn radius_squared(&self) -> f32 { self.0.w * self.0.w }
    #[inline] #[must_use] pub fn diameter(&self) -> f32 { self.0.w * 2.0 }

    // Bound a set of world-space points (typically mesh bounding box corners).
    // The center is the midpoint of the points' AABB and the radius reaches the farthest point from it.
    // Not the minimal enclosing sphere: elongated diagonal shapes come out somewhat larger
    #[must_use]
    pub fn from_corners(corners: &[Vec3]) -> Self
    {
        let Some(aabb) = AABB::from_points(corners.iter().copied()) else { return Self::FALLBACK; };

        let center = aabb.center();
        let radius_sq = corners.iter().fold(0.0f32, |max_sq, c| max_sq.max(center.distance_squared(*c)));

        Self::new(center, radius_sq.sqrt().max(Self::MIN_RADIUS))
    }
}
impl Debug for Sphere
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct(Self::short_type_name())
            .field("center", &self.center())
            .field("radius", &self.radius())
            .finish()
    }
}
impl From<Vec4> for Sphere
{
    fn from(value: Vec4) -> Self
    {
        Self(value)
    }
}
impl IsOnOrInside<Vec3> for Sphere
{
    fn rhs_is_on_or_inside(&self, other: Vec3) -> bool
    {
        let dist = self.center().distance(other);
        dist <= self.radius()
    }
}
impl CenterDistance<Vec3> for Sphere
{
    fn center_distance_sq(&self, other: Vec3) -> f32 { self.center().distance_squared(other) }
}

#[cfg(test)]
mod tests
{
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use super::*;

    fn cube_corners(center: Vec3, half: f32) -> [Vec3; 8]
    {
        AABB::new(center - Vec3::splat(half), center + Vec3::splat(half)).corners()
    }

    #[test]
    fn basics()
    {
        let sphere = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 5.0);
        assert_eq!(sphere.center(), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(sphere.radius(), 5.0);
        assert_eq!(sphere.radius_squared(), 5.0 * 5.0);
        assert_eq!(sphere.diameter(), 10.0);
        assert_eq!(format!("{sphere:?}"), "Sphere { center: Vec3(0.0, 2.0, 0.0), radius: 5.0 }");
    }

    #[test]
    fn point_containment()
    {
        let sphere = Sphere::new(Vec3::new(0.0, 2.0, 0.0), 5.0);
        assert!(sphere.rhs_is_on_or_inside(Vec3::ZERO));
        assert!(sphere.rhs_is_on_or_inside(Vec3::new(0.0, 7.0, 0.0)));
        assert!(!sphere.rhs_is_on_or_inside(Vec3::new(0.0, 10.0, 0.0)));
        assert_relative_eq!(sphere.center_distance(Vec3::new(3.0, 6.0, 0.0)), 5.0);
    }

    mod from_corners
    {
        use super::*;

        #[test]
        fn empty_is_fallback()
        {
            let sphere = Sphere::from_corners(&[]);
            assert_eq!(sphere, Sphere::FALLBACK);
            assert_eq!(sphere.center(), Vec3::ZERO);
            assert_eq!(sphere.radius(), 1.0);
        }

        #[test]
        fn unit_cube()
        {
            let sphere = Sphere::from_corners(&cube_corners(Vec3::ZERO, 0.5));
            assert_abs_diff_eq!(sphere.center(), Vec3::ZERO);
            assert_relative_eq!(sphere.radius(), 3.0f32.sqrt() / 2.0);
            assert_relative_eq!(sphere.radius(), 0.866, epsilon = 1e-3);
        }

        #[test]
        fn single_point_uses_min_radius()
        {
            let sphere = Sphere::from_corners(&[Vec3::new(5.0, 0.0, 0.0)]);
            assert_eq!(sphere.center(), Vec3::new(5.0, 0.0, 0.0));
            assert_eq!(sphere.radius(), Sphere::MIN_RADIUS);
        }

        #[test]
        fn flat_geometry_keeps_its_extent()
        {
            // a 2x2 plane lying on z=3
            let corners = AABB::new(Vec3::new(-1.0, -1.0, 3.0), Vec3::new(1.0, 1.0, 3.0)).corners();
            let sphere = Sphere::from_corners(&corners);
            assert_abs_diff_eq!(sphere.center(), Vec3::new(0.0, 0.0, 3.0));
            assert_relative_eq!(sphere.radius(), 2.0f32.sqrt());
        }

        #[test]
        fn tiny_geometry_is_floored()
        {
            let sphere = Sphere::from_corners(&cube_corners(Vec3::new(1.0, 2.0, 3.0), 0.0001));
            assert_eq!(sphere.radius(), Sphere::MIN_RADIUS);
            assert_abs_diff_eq!(sphere.center(), Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-6);
        }

        #[test]
        fn box_center_not_minimal()
        {
            // three corners of a right triangle: the minimal sphere is centered on the hypotenuse,
            // the box-center approximation is centered on the box instead
            let points = [Vec3::new(0.0, 0.0, 0.0), Vec3::new(4.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)];
            let sphere = Sphere::from_corners(&points);
            assert_eq!(sphere.center(), Vec3::new(2.0, 1.0, 0.0));
            assert_relative_eq!(sphere.radius(), 5.0f32.sqrt());
        }

        #[test]
        fn contains_all_corners()
        {
            // a handful of deterministic, irregular clouds
            let mut seed = 0x2545_f491_u32;
            let mut next = move ||
            {
                seed ^= seed << 13;
                seed ^= seed >> 17;
                seed ^= seed << 5;
                (seed as f32 / u32::MAX as f32) * 200.0 - 100.0
            };

            for count in [1, 2, 3, 8, 16, 64, 250]
            {
                let points: Vec<Vec3> = (0..count).map(|_| Vec3::new(next(), next(), next() * 0.01)).collect();
                let sphere = Sphere::from_corners(&points);
                assert!(sphere.radius() >= Sphere::MIN_RADIUS);
                for p in &points
                {
                    assert!(sphere.center_distance(*p) <= sphere.radius() * (1.0 + 1e-6),
                        "{p} is outside {sphere:?}");
                }
            }
        }
    }
}
