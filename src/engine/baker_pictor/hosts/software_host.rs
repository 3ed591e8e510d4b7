use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use image::{ImageFormat, RgbaImage};
use graphics_pictor::camera::Camera;
use graphics_pictor::geometry::MeshDraw;
use graphics_pictor::lighting::LightRig;
use graphics_pictor::material::Material;
use graphics_pictor::renderer::{IconRenderer, RenderSettings};
use graphics_pictor::texture::Texture;
use scene_pictor::gltf_import::import_gltf;
use scene_pictor::SceneObject;
use crate::core::IconHost;

#[derive(Debug)]
pub enum RenderError
{
    Encode
    {
        path: PathBuf,
        inner: image::ImageError,
    },
    Persist
    {
        path: PathBuf,
        inner: io::Error,
    },
}
impl Display for RenderError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}
impl Error for RenderError
{
    fn source(&self) -> Option<&(dyn Error + 'static)>
    {
        match self
        {
            RenderError::Encode { inner, .. } => Some(inner),
            RenderError::Persist { inner, .. } => Some(inner),
        }
    }
}

// Bakes icons without any external 3D environment: glTF import and CPU rasterization
pub struct SoftwareHost
{
    renderer: IconRenderer,
}
impl SoftwareHost
{
    pub const MATERIAL_NAME: &'static str = "GameMaterial";

    #[must_use]
    pub fn new(settings: RenderSettings) -> Self
    {
        Self::with_lights(settings, LightRig::default())
    }

    #[must_use]
    pub fn with_lights(settings: RenderSettings, lights: LightRig) -> Self
    {
        Self { renderer: IconRenderer::new(settings, lights) }
    }

    #[inline] #[must_use] pub fn renderer(&self) -> &IconRenderer { &self.renderer }

    #[must_use]
    pub fn render_image(&mut self, objects: &[SceneObject], camera: &Camera) -> RgbaImage
    {
        let surfaces: Vec<_> = objects.iter().flat_map(SceneObject::world_surfaces).collect();
        let draws: Vec<_> = surfaces.iter()
            .map(|(triangles, material)| MeshDraw { triangles, material })
            .collect();
        self.renderer.render(camera, &draws)
    }
}
impl IconHost for SoftwareHost
{
    fn aspect_ratio(&self) -> f32 { self.renderer.aspect_ratio() }

    fn import(&mut self, source: &Path) -> Result<Vec<SceneObject>, Box<dyn Error>>
    {
        Ok(import_gltf(source)?)
    }

    fn apply_material(&mut self, objects: &mut [SceneObject], texture: &Arc<Texture>)
    {
        for mesh in objects.iter_mut().filter_map(SceneObject::mesh_mut)
        {
            mesh.replace_materials(&Material::textured(Self::MATERIAL_NAME, texture.clone()));
        }
    }

    fn render(&mut self, objects: &[SceneObject], camera: &Camera, output: &Path) -> Result<(), Box<dyn Error>>
    {
        let image = self.render_image(objects, camera);
        write_png_atomic(&image, output)?;
        Ok(())
    }

    fn cleanup(&mut self, objects: Vec<SceneObject>)
    {
        let (meshes, triangles) = objects.iter()
            .filter_map(SceneObject::mesh)
            .fold((0, 0), |(m, t), mesh| (m + 1, t + mesh.triangle_count()));
        log::debug!("Releasing {} objects ({meshes} meshes, {triangles} triangles)", objects.len());
    }
}

// Encode next to `path` and rename into place, so a failed write never leaves a partial PNG behind
pub fn write_png_atomic(image: &RgbaImage, path: &Path) -> Result<(), RenderError>
{
    let temp_path = path.with_extension("png.partial");

    if let Err(inner) = image.save_with_format(&temp_path, ImageFormat::Png)
    {
        let _ = std::fs::remove_file(&temp_path);
        return Err(RenderError::Encode { path: path.to_path_buf(), inner });
    }
    if let Err(inner) = std::fs::rename(&temp_path, path)
    {
        let _ = std::fs::remove_file(&temp_path);
        return Err(RenderError::Persist { path: path.to_path_buf(), inner });
    }
    Ok(())
}

#[cfg(test)]
mod tests
{
    use glam::{Mat4, Vec2, Vec3, Vec4};
    use graphics_pictor::framing::{FramingParams, IsometricFramer};
    use graphics_pictor::geometry::Triangle;
    use math_pictor::{Sphere, AABB};
    use scene_pictor::{world_corners, MeshObject, ObjectKind, Surface};
    use super::*;

    fn temp_dir(name: &str) -> PathBuf
    {
        let dir = std::env::temp_dir().join(format!("pictor_host_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn quad_object() -> SceneObject
    {
        let uvs = [Vec2::ZERO, Vec2::X, Vec2::ONE];
        let a = Triangle::flat([Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0)], uvs);
        let b = Triangle::flat([Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(-1.0, 1.0, 0.0)], uvs);
        SceneObject
        {
            name: "Quad".to_string(),
            world: Mat4::IDENTITY,
            kind: ObjectKind::Mesh(MeshObject
            {
                local_bounds: Some(AABB::new(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0))),
                surfaces: vec![Surface { triangles: vec![a, b], material: Material::default() }],
            }),
        }
    }

    fn framed_camera(objects: &[SceneObject]) -> Camera
    {
        let framer = IsometricFramer::new(FramingParams::default()).unwrap();
        let mut camera = Camera::new(1.0);
        camera.apply_framing(&framer.frame(Sphere::from_corners(&world_corners(objects))));
        camera
    }

    #[test]
    fn renders_png()
    {
        let dir = temp_dir("render");
        let objects = vec![quad_object()];
        let camera = framed_camera(&objects);
        let mut host = SoftwareHost::new(RenderSettings { resolution: 48, ..Default::default() });

        let output = dir.join("quad.png");
        host.render(&objects, &camera, &output).unwrap();

        let image = image::open(&output).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (48, 48));
        assert_eq!(image.get_pixel(0, 0).0[3], 0);
        assert_eq!(image.get_pixel(24, 24).0[3], 255);
        assert!(!dir.join("quad.png.partial").exists());

        host.cleanup(objects);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn failed_write_leaves_nothing()
    {
        let dir = temp_dir("failed_write");
        let objects = vec![quad_object()];
        let camera = framed_camera(&objects);
        let mut host = SoftwareHost::new(RenderSettings { resolution: 8, supersample: 1, ..Default::default() });

        let output = dir.join("missing_subdir").join("quad.png");
        assert!(host.render(&objects, &camera, &output).is_err());
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 0);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn shared_texture_tints_meshes()
    {
        let red = vec![Vec4::new(1.0, 0.0, 0.0, 1.0); 4].into_boxed_slice();
        let texture = Arc::new(Texture::from_texels("base.png", 2, 2, red).unwrap());
        let mut objects = vec![quad_object(), SceneObject { name: "Cam".to_string(), world: Mat4::IDENTITY, kind: ObjectKind::Camera }];

        let mut host = SoftwareHost::new(RenderSettings { resolution: 16, supersample: 1, ..Default::default() });
        host.apply_material(&mut objects, &texture);
        let material = &objects[0].mesh().unwrap().surfaces[0].material;
        assert_eq!(material.name, SoftwareHost::MATERIAL_NAME);

        let camera = framed_camera(&objects);
        let image = host.render_image(&objects, &camera);
        let [r, g, b, a] = image.get_pixel(8, 8).0;
        assert_eq!(a, 255);
        assert!(r > 0 && g == 0 && b == 0, "{r} {g} {b}");
    }

    #[test]
    fn import_failure()
    {
        let mut host = SoftwareHost::new(RenderSettings::default());
        assert!(host.import(Path::new("no/such/model.glb")).is_err());
    }
}
