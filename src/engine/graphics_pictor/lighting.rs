use glam::{Quat, Vec3};
use math_pictor::Angle;

// An infinitely distant light. Direction is the way the light travels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunLight
{
    pub direction: Vec3,
    pub energy: f32,
    pub color: Vec3,
}
impl SunLight
{
    // An unrotated sun shines straight down (-Z); rotations apply X, then Y, then Z about world axes
    #[must_use]
    pub fn from_euler(x: Angle, y: Angle, z: Angle, energy: f32) -> Self
    {
        let rotation =
            Quat::from_rotation_z(z.to_radians()) *
            Quat::from_rotation_y(y.to_radians()) *
            Quat::from_rotation_x(x.to_radians());
        Self
        {
            direction: (rotation * Vec3::NEG_Z).normalize(),
            energy,
            color: Vec3::ONE,
        }
    }

    // Lambertian irradiance onto a surface with unit `normal`
    #[inline] #[must_use]
    pub fn irradiance(&self, normal: Vec3) -> Vec3
    {
        self.color * (self.energy * normal.dot(-self.direction).max(0.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightRig
{
    pub suns: Vec<SunLight>,
    pub ambient: Vec3,
}
impl LightRig
{
    // Outgoing radiance of a diffuse surface with the given (linear) albedo
    #[must_use]
    pub fn shade(&self, albedo: Vec3, normal: Vec3) -> Vec3
    {
        let direct = self.suns.iter().fold(Vec3::ZERO, |sum, sun| sum + sun.irradiance(normal));
        albedo * (self.ambient + direct * std::f32::consts::FRAC_1_PI)
    }
}
impl Default for LightRig
{
    // Key light from above the front-right, dimmer fill from the back-left
    fn default() -> Self
    {
        Self
        {
            suns: vec!
            [
                SunLight::from_euler(Angle::from_degrees(45.0), Angle::ZERO, Angle::from_degrees(45.0), 2.5),
                SunLight::from_euler(Angle::from_degrees(60.0), Angle::ZERO, Angle::from_degrees(-135.0), 1.0),
            ],
            ambient: Vec3::splat(0.05),
        }
    }
}
