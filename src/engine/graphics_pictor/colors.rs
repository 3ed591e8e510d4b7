use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

// 8-bit sRGB color with straight (not premultiplied) alpha
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba
{
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}
impl Rgba
{
    #[inline] #[must_use] pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self { Self { red, green, blue, alpha } }
    #[inline] #[must_use] pub const fn gray(lightness: u8, a: u8) -> Self { Self { red: lightness, green: lightness, blue: lightness, alpha: a } }

    // Decode into linear light, alpha untouched
    #[must_use]
    pub fn to_linear(self) -> Vec4
    {
        Vec4::new(
            srgb_to_linear(self.red as f32 / 255.0),
            srgb_to_linear(self.green as f32 / 255.0),
            srgb_to_linear(self.blue as f32 / 255.0),
            self.alpha as f32 / 255.0)
    }

    // Encode linear light, clamping out of range values
    #[must_use]
    pub fn from_linear(linear: Vec4) -> Self
    {
        let quantize = |x: f32| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self
        {
            red: quantize(linear_to_srgb(linear.x)),
            green: quantize(linear_to_srgb(linear.y)),
            blue: quantize(linear_to_srgb(linear.z)),
            alpha: quantize(linear.w),
        }
    }
}
impl Default for Rgba
{
    fn default() -> Self { WHITE }
}
impl From<[u8;4]> for Rgba
{
    fn from(rgba: [u8;4]) -> Self
    {
        Rgba
        {
            red: rgba[0],
            green: rgba[1],
            blue: rgba[2],
            alpha: rgba[3],
        }
    }
}
impl From<Rgba> for [u8;4]
{
    fn from(color: Rgba) -> Self
    {
        [color.red, color.green, color.blue, color.alpha]
    }
}

#[inline] #[must_use]
pub fn srgb_to_linear(x: f32) -> f32
{
    if x > 0.04045
    {
        ((x + 0.055) / 1.055).powf(2.4)
    }
    else
    {
        x / 12.92
    }
}

#[inline] #[must_use]
pub fn linear_to_srgb(x: f32) -> f32
{
    if x > 0.003_130_8
    {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    }
    else
    {
        x * 12.92
    }
}

#[inline] #[must_use]
pub fn luminance(linear: Vec3) -> f32
{
    linear.dot(Vec3::new(0.2126, 0.7152, 0.0722))
}

pub const TRANSPARENT_BLACK: Rgba = Rgba { red: 0, green: 0, blue: 0, alpha: 0 };
pub const WHITE: Rgba = Rgba { red: 255, green: 255, blue: 255, alpha: 255 };
pub const BLACK: Rgba = Rgba { red: 0, green: 0, blue: 0, alpha: 255 };
