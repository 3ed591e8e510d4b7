use glam::{UVec2, Vec2, Vec3, Vec4};
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use crate::camera::Camera;
use crate::colors::Rgba;
use crate::geometry::MeshDraw;
use crate::lighting::LightRig;
use crate::raster::RenderTarget;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings
{
    pub resolution: u32, // output is square
    pub supersample: u32, // samples per output pixel along each axis
    pub transparent_background: bool,
    pub background: Rgba, // only used when the background is not transparent
}
impl Default for RenderSettings
{
    fn default() -> Self
    {
        Self
        {
            resolution: 256,
            supersample: 2,
            transparent_background: true,
            background: Rgba::gray(40, 255),
        }
    }
}

// Renders orthographic icons on the CPU: depth-tested, two-sided Lambert shading
pub struct IconRenderer
{
    settings: RenderSettings,
    lights: LightRig,
    target: RenderTarget,
}
impl IconRenderer
{
    #[must_use]
    pub fn new(settings: RenderSettings, lights: LightRig) -> Self
    {
        let samples = settings.resolution.max(1) * settings.supersample.max(1);
        Self
        {
            target: RenderTarget::new(UVec2::splat(samples)),
            settings,
            lights,
        }
    }

    #[inline] #[must_use] pub fn settings(&self) -> &RenderSettings { &self.settings }

    // Width / height of the output image
    #[inline] #[must_use] pub fn aspect_ratio(&self) -> f32 { 1.0 }

    #[must_use]
    pub fn render(&mut self, camera: &Camera, draws: &[MeshDraw]) -> RgbaImage
    {
        let clear = match self.settings.transparent_background
        {
            true => Vec4::ZERO,
            false => self.settings.background.to_linear(),
        };
        self.target.clear(clear);

        let clip_mtx = camera.matrix();
        let view_dir = camera.forward();
        let mut triangle_count = 0usize;

        for draw in draws
        {
            for tri in draw.triangles
            {
                let verts = tri.positions.map(|p| self.target.project(&clip_mtx, p));
                let lights = &self.lights;
                let material = draw.material;

                self.target.draw_triangle(verts, |frag|
                {
                    let w = frag.weights;
                    let uv = tri.uvs[0] * w.x + tri.uvs[1] * w.y + tri.uvs[2] * w.z;
                    let mut normal = (tri.normals[0] * w.x + tri.normals[1] * w.y + tri.normals[2] * w.z)
                        .try_normalize()
                        .unwrap_or_else(|| tri.face_normal());
                    // back faces are lit as if facing the camera
                    if normal.dot(view_dir) > 0.0
                    {
                        normal = -normal;
                    }

                    let albedo = material.base_color(uv);
                    lights.shade(albedo.truncate(), normal).extend(1.0)
                });
                triangle_count += 1;
            }
        }

        log::trace!("Rasterized {triangle_count} triangles in {} draws", draws.len());
        self.target.resolve(self.settings.supersample.max(1))
    }

    // Where a world-space point lands in the output image, in pixels
    #[must_use]
    pub fn project_to_pixel(&self, camera: &Camera, world: Vec3) -> Vec2
    {
        let sample = self.target.project(&camera.matrix(), world).position.truncate();
        sample / self.settings.supersample.max(1) as f32
    }
}
