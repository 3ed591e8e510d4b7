use std::fmt::{Display, Formatter};
use std::ops::Neg;
use serde::{Deserialize, Serialize};

// Angle, stored as radians internally
#[derive(Debug, Default, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(f32);
impl Angle
{
    pub const ZERO: Self = Self::from_radians(0.0);
    pub const PI: Self = Self::from_radians(std::f32::consts::PI);
    pub const PI_OVER_TWO: Self = Self::from_radians(std::f32::consts::FRAC_PI_2);
    pub const PI_OVER_FOUR: Self = Self::from_radians(std::f32::consts::FRAC_PI_4);

    // atan(1/sqrt(2)), the elevation at which all three world axes foreshorten equally
    pub const ISOMETRIC_ELEVATION: Self = Self::from_radians(0.615_479_7);

    #[inline] #[must_use]
    pub const fn from_radians(radians: f32) -> Self { Self(radians) }
    #[inline] #[must_use]
    pub const fn from_degrees(degrees: f32) -> Self { Self(degrees.to_radians()) }

    #[inline] #[must_use]
    pub const fn to_radians(self) -> f32 { self.0 }
    #[inline] #[must_use]
    pub const fn to_degrees(self) -> f32 { self.0.to_degrees() }

    #[inline] #[must_use] pub fn sin(self) -> f32 { self.0.sin() }
    #[inline] #[must_use] pub fn cos(self) -> f32 { self.0.cos() }
    #[inline] #[must_use] pub fn sin_cos(self) -> (f32, f32) { self.0.sin_cos() }
}
// Display the angle, by default as radians, alternatively as degrees
impl Display for Angle
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        if f.alternate()
        {
            f.write_fmt(format_args!("{:.1}deg", self.to_degrees()))
        }
        else
        {
            f.write_fmt(format_args!("{:.1}rad", self.to_radians()))
        }
    }
}
impl Neg for Angle
{
    type Output = Self;
    fn neg(self) -> Self { Self(-self.0) }
}
