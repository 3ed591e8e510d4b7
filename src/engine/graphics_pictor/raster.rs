use glam::{Mat4, UVec2, Vec2, Vec3, Vec4};
use image::RgbaImage;
use crate::colors::Rgba;

// A screen-space vertex: xy in pixels, z as [0, 1] depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex
{
    pub position: Vec3,
}

// Barycentric weights of a covered sample, plus its depth
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment
{
    pub weights: Vec3,
    pub depth: f32,
}

// Color + depth buffers. Color is linear and premultiplied by coverage
pub struct RenderTarget
{
    size: UVec2,
    color: Box<[Vec4]>,
    depth: Box<[f32]>,
}
impl RenderTarget
{
    #[must_use]
    pub fn new(size: UVec2) -> Self
    {
        let len = (size.x * size.y) as usize;
        Self
        {
            size,
            color: vec![Vec4::ZERO; len].into_boxed_slice(),
            depth: vec![f32::INFINITY; len].into_boxed_slice(),
        }
    }

    #[inline] #[must_use] pub fn size(&self) -> UVec2 { self.size }

    pub fn clear(&mut self, color: Vec4)
    {
        self.color.fill(color);
        self.depth.fill(f32::INFINITY);
    }

    #[inline] #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Vec4
    {
        self.color[(y * self.size.x + x) as usize]
    }

    // NDC (x right, y up, z in [0, 1]) to pixels (y down)
    #[inline] #[must_use]
    pub fn ndc_to_screen(&self, ndc: Vec3) -> ScreenVertex
    {
        let size = self.size.as_vec2();
        ScreenVertex
        {
            position: Vec3::new(
                (ndc.x * 0.5 + 0.5) * size.x,
                (0.5 - ndc.y * 0.5) * size.y,
                ndc.z),
        }
    }

    // Project a world-space point through an affine (orthographic) clip matrix
    #[inline] #[must_use]
    pub fn project(&self, clip_mtx: &Mat4, world: Vec3) -> ScreenVertex
    {
        self.ndc_to_screen(clip_mtx.transform_point3(world))
    }

    // Rasterize one triangle. Both windings are drawn. Samples outside the [0, 1] depth range are clipped
    // and the nearest sample wins. `shade` receives the barycentric weights of each visible sample
    pub fn draw_triangle(&mut self, verts: [ScreenVertex; 3], mut shade: impl FnMut(Fragment) -> Vec4)
    {
        let [a, b, c] = verts.map(|v| v.position);
        let area = edge(a.truncate(), b.truncate(), c.truncate());
        if area.abs() <= f32::EPSILON || !area.is_finite()
        {
            return;
        }

        let min = a.min(b).min(c).truncate().floor().max(Vec2::ZERO);
        let max = a.max(b).max(c).truncate().ceil().min(self.size.as_vec2());
        if min.x >= max.x || min.y >= max.y
        {
            return;
        }

        for y in (min.y as u32)..(max.y as u32)
        {
            for x in (min.x as u32)..(max.x as u32)
            {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let weights = Vec3::new(
                    edge(b.truncate(), c.truncate(), p),
                    edge(c.truncate(), a.truncate(), p),
                    edge(a.truncate(), b.truncate(), p)) / area;
                if weights.min_element() < 0.0
                {
                    continue;
                }

                let depth = weights.dot(Vec3::new(a.z, b.z, c.z));
                if !(0.0..=1.0).contains(&depth)
                {
                    continue;
                }

                let index = (y * self.size.x + x) as usize;
                if depth >= self.depth[index]
                {
                    continue;
                }

                self.depth[index] = depth;
                self.color[index] = shade(Fragment { weights, depth });
            }
        }
    }

    // Box-filter down by `factor` and encode as straight-alpha sRGB
    #[must_use]
    pub fn resolve(&self, factor: u32) -> RgbaImage
    {
        let factor = factor.max(1);
        let out_size = self.size / factor;
        let sample_count = (factor * factor) as f32;

        RgbaImage::from_fn(out_size.x, out_size.y, |ox, oy|
        {
            let mut sum = Vec4::ZERO;
            for sy in 0..factor
            {
                for sx in 0..factor
                {
                    sum += self.pixel(ox * factor + sx, oy * factor + sy);
                }
            }
            let premultiplied = sum / sample_count;

            let straight = match premultiplied.w > 0.0
            {
                true => (premultiplied.truncate() / premultiplied.w).extend(premultiplied.w),
                false => Vec4::ZERO,
            };
            let encoded: [u8; 4] = Rgba::from_linear(straight).into();
            image::Rgba(encoded)
        })
    }
}

// Twice the signed area of (a, b, p)
#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32
{
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}
