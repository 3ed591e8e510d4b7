use glam::{Mat4, Vec2, Vec3};
use math_pictor::Transform;
use crate::framing::CameraConfig;

// Orthographic only; apparent size is governed by `scale` rather than distance
#[derive(Debug, Clone, PartialEq)]
pub struct OrthographicProjection
{
    pub scale: f32, // view extent along the larger image axis, in world units
    pub aspect_ratio: f32, // width / height
    pub shift: Vec2, // lens shift, in fractions of `scale`
}
impl OrthographicProjection
{
    // Half extents of the view volume (x, y)
    #[must_use]
    pub fn half_extents(&self) -> Vec2
    {
        let half = self.scale / 2.0;
        if self.aspect_ratio >= 1.0
        {
            Vec2::new(half, half / self.aspect_ratio)
        }
        else
        {
            Vec2::new(half * self.aspect_ratio, half)
        }
    }

    #[must_use]
    pub fn to_matrix(&self, near_clip: f32, far_clip: f32) -> Mat4
    {
        let half = self.half_extents();
        let offset = self.shift * self.scale;
        Mat4::orthographic_rh(
            -half.x + offset.x,
            half.x + offset.x,
            -half.y + offset.y,
            half.y + offset.y,
            near_clip,
            far_clip)
    }
}
impl Default for OrthographicProjection
{
    fn default() -> Self
    {
        Self
        {
            scale: 2.0,
            aspect_ratio: 1.0,
            shift: Vec2::ZERO,
        }
    }
}

// The single scene camera. Reconfigured for every asset rather than recreated
#[derive(Debug, Clone)]
pub struct Camera
{
    projection: OrthographicProjection,
    near_clip: f32,
    far_clip: f32,

    transform: Transform,
    clip_mtx: Mat4,
}
impl Camera
{
    #[must_use]
    pub fn new(aspect_ratio: f32) -> Self
    {
        let mut camera = Self::default();
        camera.projection.aspect_ratio = aspect_ratio;
        camera.update_clip_mtx();
        camera
    }

    #[inline] #[must_use] pub fn transform(&self) -> &Transform { &self.transform }
    #[inline] #[must_use] pub fn projection(&self) -> &OrthographicProjection { &self.projection }
    #[inline] #[must_use] pub fn matrix(&self) -> Mat4 { self.clip_mtx }

    #[inline] #[must_use] pub fn near_clip(&self) -> f32 { self.near_clip }
    #[inline] #[must_use] pub fn far_clip(&self) -> f32 { self.far_clip }

    #[inline] #[must_use] pub fn position(&self) -> Vec3 { self.transform.position }
    #[inline] #[must_use] pub fn forward(&self) -> Vec3 { self.transform.forward() }

    pub fn set_shift(&mut self, shift: Vec2)
    {
        self.projection.shift = shift;
        self.update_clip_mtx();
    }

    // Overwrite everything a framing pass controls. Lens shift left over from a previous asset is reset,
    // aspect ratio is kept
    pub fn apply_framing(&mut self, config: &CameraConfig)
    {
        self.projection = OrthographicProjection
        {
            scale: config.ortho_scale,
            aspect_ratio: self.projection.aspect_ratio,
            shift: Vec2::ZERO,
        };
        self.near_clip = config.clip_start;
        self.far_clip = config.clip_end;
        self.transform = Transform
        {
            position: config.position,
            rotation: config.rotation,
            scale: Vec3::ONE,
        };
        self.update_clip_mtx();
    }

    fn update_clip_mtx(&mut self)
    {
        self.clip_mtx = self.projection.to_matrix(self.near_clip, self.far_clip) * self.transform.to_view_mtx();
    }
}
impl Default for Camera
{
    fn default() -> Self
    {
        let projection = OrthographicProjection::default();
        let transform = Transform::default();
        let clip_mtx = projection.to_matrix(0.1, 100.0) * transform.to_view_mtx();

        Self
        {
            projection,
            near_clip: 0.1,
            far_clip: 100.0,
            transform,
            clip_mtx,
        }
    }
}
