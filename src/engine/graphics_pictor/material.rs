use std::sync::Arc;
use glam::{Vec2, Vec4};
use crate::texture::Texture;

// Metallic-roughness surface, reduced to what the icon renderer shades with
#[derive(Debug, Clone)]
pub struct Material
{
    pub name: String,
    pub base_color_factor: Vec4, // linear
    pub base_color_texture: Option<Arc<Texture>>,
}
impl Material
{
    // Default surface for meshes without a material
    pub const DEFAULT_BASE_COLOR: Vec4 = Vec4::new(0.8, 0.8, 0.8, 1.0);

    #[must_use]
    pub fn from_factor(name: impl Into<String>, base_color_factor: Vec4) -> Self
    {
        Self
        {
            name: name.into(),
            base_color_factor,
            base_color_texture: None,
        }
    }

    // Texture drives the base color directly
    #[must_use]
    pub fn textured(name: impl Into<String>, texture: Arc<Texture>) -> Self
    {
        Self
        {
            name: name.into(),
            base_color_factor: Vec4::ONE,
            base_color_texture: Some(texture),
        }
    }

    #[inline] #[must_use]
    pub fn base_color(&self, uv: Vec2) -> Vec4
    {
        match &self.base_color_texture
        {
            Some(tex) => self.base_color_factor * tex.sample(uv),
            None => self.base_color_factor,
        }
    }
}
impl Default for Material
{
    fn default() -> Self { Self::from_factor("Default", Self::DEFAULT_BASE_COLOR) }
}
