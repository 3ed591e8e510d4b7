use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use glam::{Vec2, Vec4};
use crate::colors::Rgba;

#[derive(Debug)]
pub enum TextureError
{
    NotFound(PathBuf),
    Decode
    {
        path: PathBuf,
        inner: image::ImageError,
    },
    Empty(PathBuf),
}
impl Display for TextureError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}
impl Error for TextureError
{
    fn source(&self) -> Option<&(dyn Error + 'static)>
    {
        match self
        {
            TextureError::Decode { inner, .. } => Some(inner),
            _ => None,
        }
    }
}

// A decoded 2D image, stored as linear RGBA. Loaded once and shared between materials
pub struct Texture
{
    name: String,
    width: u32,
    height: u32,
    texels: Box<[Vec4]>,
}
impl Texture
{
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError>
    {
        let path = path.as_ref();
        if !path.is_file()
        {
            return Err(TextureError::NotFound(path.to_path_buf()));
        }

        let decoded = image::open(path)
            .map_err(|inner| TextureError::Decode { path: path.to_path_buf(), inner })?
            .to_rgba8();
        if decoded.width() == 0 || decoded.height() == 0
        {
            return Err(TextureError::Empty(path.to_path_buf()));
        }

        let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let texels = decoded.pixels().map(|p| Rgba::from(p.0).to_linear()).collect();
        log::debug!("Loaded texture {name} ({}x{})", decoded.width(), decoded.height());

        Ok(Self
        {
            name,
            width: decoded.width(),
            height: decoded.height(),
            texels,
        })
    }

    // Texels are row-major, top row first, in linear RGBA
    #[must_use]
    pub fn from_texels(name: impl Into<String>, width: u32, height: u32, texels: Box<[Vec4]>) -> Option<Self>
    {
        (width > 0 && height > 0 && texels.len() == (width * height) as usize).then(|| Self
        {
            name: name.into(),
            width,
            height,
            texels,
        })
    }

    #[inline] #[must_use] pub fn name(&self) -> &str { &self.name }
    #[inline] #[must_use] pub fn width(&self) -> u32 { self.width }
    #[inline] #[must_use] pub fn height(&self) -> u32 { self.height }

    #[inline] #[must_use]
    fn texel(&self, x: i64, y: i64) -> Vec4
    {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        self.texels[y * self.width as usize + x]
    }

    // Bilinear sample with repeat wrapping. (0, 0) is the top-left corner of the image
    #[must_use]
    pub fn sample(&self, uv: Vec2) -> Vec4
    {
        let x = uv.x * self.width as f32 - 0.5;
        let y = uv.y * self.height as f32 - 0.5;
        let (x0, y0) = (x.floor(), y.floor());
        let (fx, fy) = (x - x0, y - y0);
        let (x0, y0) = (x0 as i64, y0 as i64);

        let top = self.texel(x0, y0).lerp(self.texel(x0 + 1, y0), fx);
        let bottom = self.texel(x0, y0 + 1).lerp(self.texel(x0 + 1, y0 + 1), fx);
        top.lerp(bottom, fy)
    }
}
impl Debug for Texture
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("Texture")
            .field("name", &self.name)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}
