use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use glam::{Quat, Vec3};
use math_pictor::{Angle, Sphere, Transform, WORLD_UP};

// Near clip never goes below this
pub const CLIP_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramingParams
{
    pub padding: f32, // multiplier on the sphere's diameter
    pub elevation: Angle, // above the horizontal plane
    pub azimuth: Angle, // about world up, from +X toward +Y
    pub distance_multiplier: f32, // camera distance in sphere radii
}
impl FramingParams
{
    pub const DEFAULT_PADDING: f32 = 1.15;
    pub const DEFAULT_DISTANCE_MULTIPLIER: f32 = 4.0;

    pub fn validate(&self) -> Result<(), FramingError>
    {
        if !self.padding.is_finite() || self.padding <= 1.0
        {
            return Err(FramingError::PaddingTooSmall(self.padding));
        }
        if !self.distance_multiplier.is_finite() || self.distance_multiplier <= 1.0
        {
            return Err(FramingError::CameraInsideBounds(self.distance_multiplier));
        }
        // looking straight down (or up) leaves the up vector undefined
        if !self.elevation.to_radians().is_finite() ||
            self.elevation.cos().abs() < 1e-4
        {
            return Err(FramingError::VerticalView(self.elevation));
        }
        if !self.azimuth.to_radians().is_finite()
        {
            return Err(FramingError::NonFiniteAzimuth);
        }
        Ok(())
    }

    // Unit vector from the subject toward the camera
    #[must_use]
    pub fn view_offset_direction(&self) -> Vec3
    {
        let (sin_el, cos_el) = self.elevation.sin_cos();
        let (sin_az, cos_az) = self.azimuth.sin_cos();
        Vec3::new(cos_el * cos_az, cos_el * sin_az, sin_el)
    }
}
impl Default for FramingParams
{
    fn default() -> Self
    {
        Self
        {
            padding: Self::DEFAULT_PADDING,
            elevation: Angle::ISOMETRIC_ELEVATION,
            azimuth: -Angle::PI_OVER_FOUR,
            distance_multiplier: Self::DEFAULT_DISTANCE_MULTIPLIER,
        }
    }
}

#[derive(Debug)]
pub enum FramingError
{
    PaddingTooSmall(f32),
    CameraInsideBounds(f32),
    VerticalView(Angle),
    NonFiniteAzimuth,
}
impl Display for FramingError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}
impl Error for FramingError { }

// Everything a framing pass decides about the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig
{
    pub position: Vec3,
    pub target: Vec3,
    pub rotation: Quat,
    pub ortho_scale: f32,
    pub clip_start: f32,
    pub clip_end: f32,
}
impl CameraConfig
{
    #[inline] #[must_use] pub fn look_direction(&self) -> Vec3 { self.target - self.position }
    #[inline] #[must_use] pub fn distance(&self) -> f32 { self.position.distance(self.target) }
}

// Frames a bounding sphere from a fixed isometric viewpoint, so every icon in a set shares the same
// angle and the same margin regardless of the subject's size or placement
#[derive(Debug, Clone)]
pub struct IsometricFramer
{
    params: FramingParams,
    offset_dir: Vec3,
    rotation: Quat,
}
impl IsometricFramer
{
    pub fn new(params: FramingParams) -> Result<Self, FramingError>
    {
        params.validate()?;

        let offset_dir = params.view_offset_direction();
        // orientation is the same for every sphere: look from the offset direction back at the origin
        let rotation = Transform::looking_at(offset_dir, Vec3::ZERO, WORLD_UP)
            .ok_or(FramingError::VerticalView(params.elevation))?
            .rotation;

        Ok(Self { params, offset_dir, rotation })
    }

    #[inline] #[must_use] pub fn params(&self) -> &FramingParams { &self.params }

    // Since the projection is orthographic, distance only needs to keep the sphere between the clip planes;
    // the view direction and orientation are the same for every sphere
    #[must_use]
    pub fn frame(&self, sphere: Sphere) -> CameraConfig
    {
        let center = sphere.center();
        let radius = sphere.radius();
        let distance = radius * self.params.distance_multiplier;

        CameraConfig
        {
            position: center + self.offset_dir * distance,
            target: center,
            rotation: self.rotation,
            ortho_scale: sphere.diameter() * self.params.padding,
            clip_start: (distance - radius * 2.0).max(CLIP_EPSILON),
            clip_end: distance + radius * 3.0,
        }
    }
}

#[cfg(test)]
mod tests
{
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use math_pictor::LOCAL_FORWARD;
    use super::*;

    fn default_framer() -> IsometricFramer
    {
        IsometricFramer::new(FramingParams::default()).unwrap()
    }

    #[test]
    fn unit_sphere_at_origin()
    {
        let config = default_framer().frame(Sphere::new(Vec3::ZERO, 1.0));
        assert_relative_eq!(config.ortho_scale, 2.3, epsilon = 1e-6);
        assert_relative_eq!(config.distance(), 4.0, epsilon = 1e-5);
        assert_relative_eq!(config.clip_start, 2.0);
        assert_relative_eq!(config.clip_end, 7.0);

        // -45 deg azimuth puts the camera over +X/-Y, above the subject
        let offset = config.position;
        assert!(offset.x > 0.0 && offset.y < 0.0 && offset.z > 0.0);
        assert_relative_eq!(offset.x, -offset.y, epsilon = 1e-5);
        let elevation = (offset.z / offset.length()).asin();
        assert_relative_eq!(elevation.to_degrees(), 35.264, epsilon = 1e-3);
    }

    #[test]
    fn orientation_points_at_center()
    {
        let sphere = Sphere::new(Vec3::new(3.0, -7.0, 12.0), 2.5);
        let config = default_framer().frame(sphere);

        let forward = config.rotation * LOCAL_FORWARD;
        assert_abs_diff_eq!(forward, config.look_direction().normalize(), epsilon = 1e-5);

        // no roll: the camera's right axis is horizontal and its up leans toward world up
        let transform = Transform { position: config.position, rotation: config.rotation, scale: Vec3::ONE };
        assert_abs_diff_eq!(transform.right().z, 0.0, epsilon = 1e-6);
        assert!(transform.up().z > 0.0);
    }

    #[test]
    fn deterministic()
    {
        let framer = default_framer();
        let sphere = Sphere::new(Vec3::new(-1.5, 0.25, 9.0), 0.73);
        assert_eq!(framer.frame(sphere), framer.frame(sphere));
        assert_eq!(framer.frame(sphere), default_framer().frame(sphere));
    }

    #[test]
    fn clip_planes_valid_across_sizes()
    {
        let framer = default_framer();
        for radius in [Sphere::MIN_RADIUS, 0.1, 0.5, 1.0, 3.0, 75.0, 1000.0, 10_000.0]
        {
            let sphere = Sphere::new(Vec3::new(10.0, -20.0, 5.0), radius);
            let config = framer.frame(sphere);
            assert!(config.clip_start > 0.0, "radius {radius}");
            assert!(config.clip_start < config.clip_end, "radius {radius}");
            assert!(config.ortho_scale > 0.0, "radius {radius}");
            assert!(config.look_direction().length() > 0.0, "radius {radius}");

            // the whole sphere sits between the planes
            let distance = config.distance();
            assert!(distance - radius > config.clip_start * (1.0 - 1e-5), "radius {radius}");
            assert!(distance + radius < config.clip_end, "radius {radius}");
        }
    }

    #[test]
    fn near_clip_floor()
    {
        let params = FramingParams { distance_multiplier: 1.5, ..Default::default() };
        let config = IsometricFramer::new(params).unwrap().frame(Sphere::new(Vec3::ZERO, 1.0));
        assert_eq!(config.clip_start, CLIP_EPSILON);
        assert_relative_eq!(config.clip_end, 4.5);
    }

    #[test]
    fn scales_linearly()
    {
        let framer = default_framer();
        let center = Vec3::new(2.0, 4.0, -1.0);
        let a = framer.frame(Sphere::new(center, 1.7));
        let b = framer.frame(Sphere::new(center, 3.4));

        assert_relative_eq!(b.ortho_scale, a.ortho_scale * 2.0, epsilon = 1e-5);
        assert_relative_eq!(b.distance(), a.distance() * 2.0, epsilon = 1e-4);
        assert_abs_diff_eq!(b.look_direction().normalize(), a.look_direction().normalize(), epsilon = 1e-5);
        assert_eq!(a.rotation, b.rotation);
    }

    #[test]
    fn fallback_sphere_frames()
    {
        let config = default_framer().frame(Sphere::from_corners(&[]));
        assert!(config.clip_start > 0.0 && config.clip_start < config.clip_end);
        assert_relative_eq!(config.ortho_scale, 2.3, epsilon = 1e-6);
        assert_abs_diff_eq!(config.target, Vec3::ZERO);
    }

    #[test]
    fn rejects_bad_params()
    {
        let bad = [
            FramingParams { padding: 1.0, ..Default::default() },
            FramingParams { padding: f32::NAN, ..Default::default() },
            FramingParams { distance_multiplier: 0.5, ..Default::default() },
            FramingParams { elevation: Angle::PI_OVER_TWO, ..Default::default() },
            FramingParams { elevation: -Angle::PI_OVER_TWO, ..Default::default() },
            FramingParams { azimuth: Angle::from_radians(f32::INFINITY), ..Default::default() },
        ];
        for params in bad
        {
            assert!(IsometricFramer::new(params).is_err(), "{params:?}");
        }

        assert!(FramingParams::default().validate().is_ok());
    }
}
