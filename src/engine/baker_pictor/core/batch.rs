use std::error::Error;
use std::ffi::OsStr;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use graphics_pictor::camera::Camera;
use graphics_pictor::framing::IsometricFramer;
use graphics_pictor::texture::{Texture, TextureError};
use math_pictor::Sphere;
use nab_pictor::utils::file_stem_lossy;
use scene_pictor::{world_corners, SceneObject};
use crate::core::{ConfigError, IconBakerConfig, IconHost};

// Where an asset is in its trip through the batch.
// Idle -> Imported -> Framed -> Rendered -> Cleaned -> Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStage
{
    Idle,
    Imported,
    Framed,
    Rendered,
    Cleaned,
}

pub struct AssetError
{
    pub stage: AssetStage, // the stage the asset failed to reach
    pub cause: Box<dyn Error>,
}
impl Debug for AssetError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        f.debug_struct("AssetError")
            .field("stage", &self.stage)
            .field("cause", &format_args!("{}", self.cause))
            .finish()
    }
}
impl Display for AssetError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "failed to reach {:?}: {}", self.stage, self.cause)
    }
}
impl Error for AssetError
{
    fn source(&self) -> Option<&(dyn Error + 'static)> { Some(self.cause.as_ref()) }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AssetOutcome
{
    Rendered
    {
        output: PathBuf,
        mesh_count: usize,
        sphere: Sphere,
    },
    // The file imported nothing
    Empty,
}

#[derive(Debug)]
pub struct AssetReport
{
    pub source: PathBuf,
    pub name: String,
    pub result: Result<AssetOutcome, AssetError>,
}

#[derive(Debug, Default)]
pub struct BatchSummary
{
    pub reports: Vec<AssetReport>,
    pub not_processed: usize, // left over after hitting the asset limit
}
impl BatchSummary
{
    #[must_use]
    pub fn rendered(&self) -> usize
    {
        self.reports.iter().filter(|r| matches!(r.result, Ok(AssetOutcome::Rendered { .. }))).count()
    }
    #[must_use]
    pub fn empty(&self) -> usize
    {
        self.reports.iter().filter(|r| matches!(r.result, Ok(AssetOutcome::Empty))).count()
    }
    #[must_use]
    pub fn failed(&self) -> usize
    {
        self.reports.iter().filter(|r| r.result.is_err()).count()
    }
    #[inline] #[must_use]
    pub fn total(&self) -> usize { self.reports.len() }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &AssetError)>
    {
        self.reports.iter().filter_map(|r| r.result.as_ref().err().map(|e| (r.name.as_str(), e)))
    }
}
impl Display for BatchSummary
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result
    {
        write!(f, "{} rendered, {} empty, {} failed, {} total",
            self.rendered(),
            self.empty(),
            self.failed(),
            self.total())?;
        if self.not_processed > 0
        {
            write!(f, " ({} not processed)", self.not_processed)?;
        }
        Ok(())
    }
}

// Load the texture every icon shares. A missing or unreadable texture is not fatal,
// icons then keep their imported materials
pub fn load_shared_texture(path: impl AsRef<Path>) -> Option<Arc<Texture>>
{
    let path = path.as_ref();
    match Texture::load(path)
    {
        Ok(texture) =>
        {
            log::info!("Loaded shared texture {path:?} ({}x{})", texture.width(), texture.height());
            Some(Arc::new(texture))
        }
        Err(TextureError::NotFound(_)) =>
        {
            log::warn!("Shared texture {path:?} not found, rendering with imported materials");
            None
        }
        Err(err) =>
        {
            log::warn!("Failed to load shared texture {path:?}, rendering with imported materials: {err}");
            None
        }
    }
}

// Renders one icon per model. One camera is reused and fully reframed for every asset
pub struct IconBatch<H: IconHost>
{
    host: H,
    framer: IsometricFramer,
    camera: Camera,
    texture: Option<Arc<Texture>>,
    output_dir: PathBuf,
    max_assets: Option<usize>,
    stage: AssetStage,
}
impl<H: IconHost> IconBatch<H>
{
    #[must_use]
    pub fn new(host: H, framer: IsometricFramer, output_dir: impl Into<PathBuf>) -> Self
    {
        let camera = Camera::new(host.aspect_ratio());
        Self
        {
            host,
            framer,
            camera,
            texture: None,
            output_dir: output_dir.into(),
            max_assets: None,
            stage: AssetStage::Idle,
        }
    }

    // Validate the config, prepare the output directory and load the shared texture
    pub fn from_config(host: H, config: &IconBakerConfig) -> Result<Self, ConfigError>
    {
        config.validate()?;
        let framer = IsometricFramer::new(config.framing_params())?;
        let output_dir = config.prepare_output_dir()?;
        let texture = load_shared_texture(config.texture_path());

        Ok(Self::new(host, framer, output_dir)
            .with_texture(texture)
            .with_max_assets(config.max_assets))
    }

    #[must_use]
    pub fn with_texture(mut self, texture: Option<Arc<Texture>>) -> Self
    {
        self.texture = texture;
        self
    }

    #[must_use]
    pub fn with_max_assets(mut self, max_assets: Option<usize>) -> Self
    {
        self.max_assets = max_assets;
        self
    }

    #[inline] #[must_use] pub fn host(&self) -> &H { &self.host }
    #[inline] #[must_use] pub fn camera(&self) -> &Camera { &self.camera }
    #[inline] #[must_use] pub fn output_dir(&self) -> &Path { &self.output_dir }
    #[inline] #[must_use] pub fn into_host(self) -> H { self.host }
    // Idle between assets
    #[inline] #[must_use] pub fn stage(&self) -> AssetStage { self.stage }

    // The source's file stem (kept byte for byte) with a .png extension, in the output directory
    #[must_use]
    pub fn output_file(&self, source: &Path) -> PathBuf
    {
        let mut file_name = source.file_stem().map(OsStr::to_os_string).unwrap_or_default();
        file_name.push(".png");
        self.output_dir.join(file_name)
    }

    fn advance(&mut self, source: &Path, stage: AssetStage)
    {
        log::debug!("{}: {:?} -> {stage:?}", file_stem_lossy(source), self.stage);
        self.stage = stage;
    }

    // Each asset either renders, turns out empty, or fails on its own; the batch always finishes
    pub fn run(&mut self, sources: &[PathBuf]) -> BatchSummary
    {
        let limit = self.max_assets.unwrap_or(usize::MAX).min(sources.len());
        let mut summary = BatchSummary
        {
            reports: Vec::with_capacity(limit),
            not_processed: sources.len() - limit,
        };

        for (i, source) in sources[..limit].iter().enumerate()
        {
            let name = file_stem_lossy(source);
            log::info!("[{}/{limit}] {name}", i + 1);

            let result = self.process_asset(source);
            match &result
            {
                Ok(AssetOutcome::Rendered { output, mesh_count, .. }) =>
                    log::info!("Rendered {name} ({mesh_count} meshes) to {output:?}"),
                Ok(AssetOutcome::Empty) =>
                    log::warn!("Skipped {name}: no objects imported"),
                Err(err) =>
                    log::error!("Failed to bake {name}: {err}"),
            }

            summary.reports.push(AssetReport { source: source.clone(), name, result });
        }

        if summary.not_processed > 0
        {
            log::warn!("Asset limit of {limit} reached, {} not processed", summary.not_processed);
        }
        summary
    }

    // Idle -> Imported -> Framed -> Rendered -> Cleaned -> Idle. Anything imported is cleaned up,
    // even if framing or rendering it fails
    pub fn process_asset(&mut self, source: &Path) -> Result<AssetOutcome, AssetError>
    {
        debug_assert_eq!(self.stage, AssetStage::Idle);
        let output = self.output_file(source);
        let mut objects = self.host.import(source)
            .map_err(|cause| AssetError { stage: AssetStage::Imported, cause })?;
        self.advance(source, AssetStage::Imported);

        let result = match objects.is_empty()
        {
            true => Ok(AssetOutcome::Empty),
            false => self.frame_and_render(source, &mut objects, output),
        };

        self.host.cleanup(objects);
        self.advance(source, AssetStage::Cleaned);
        self.advance(source, AssetStage::Idle);
        result
    }

    fn frame_and_render(&mut self, source: &Path, objects: &mut [SceneObject], output: PathBuf) -> Result<AssetOutcome, AssetError>
    {
        if let Some(texture) = &self.texture
        {
            self.host.apply_material(objects, texture);
        }

        let sphere = Sphere::from_corners(&world_corners(objects));
        let framing = self.framer.frame(sphere);
        self.camera.apply_framing(&framing);
        log::debug!("Framed {sphere:?}: camera at {} ortho scale {} clip {}..{}",
            framing.position,
            framing.ortho_scale,
            framing.clip_start,
            framing.clip_end);
        self.advance(source, AssetStage::Framed);

        self.host.render(objects, &self.camera, &output)
            .map_err(|cause| AssetError { stage: AssetStage::Rendered, cause })?;
        self.advance(source, AssetStage::Rendered);

        Ok(AssetOutcome::Rendered
        {
            output,
            mesh_count: objects.iter().filter(|o| o.mesh().is_some()).count(),
            sphere,
        })
    }
}

#[cfg(test)]
mod tests
{
    use approx::assert_relative_eq;
    use glam::{Mat4, Vec2, Vec3, Vec4};
    use graphics_pictor::framing::FramingParams;
    use graphics_pictor::geometry::Triangle;
    use graphics_pictor::material::Material;
    use math_pictor::AABB;
    use scene_pictor::{MeshObject, ObjectKind, Surface};
    use super::*;

    #[derive(Debug)]
    struct MockError(&'static str);
    impl Display for MockError
    {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { f.write_str(self.0) }
    }
    impl Error for MockError { }

    #[derive(Debug, Clone, PartialEq)]
    struct RenderCall
    {
        output: PathBuf,
        ortho_scale: f32,
        shift: Vec2,
        object_count: usize,
        material: String,
    }

    // Imports by file stem: "empty" imports nothing, "bad_import" and "bad_render" fail,
    // "camera_only" has no meshes, anything else is a unit cube scaled by the number in its name
    #[derive(Default)]
    struct MockHost
    {
        live_objects: usize,
        imports: usize,
        cleanups: usize,
        renders: Vec<RenderCall>,
        calls: Vec<String>, // "<host fn> <stem>", in call order
        current: String,
    }
    impl IconHost for MockHost
    {
        fn aspect_ratio(&self) -> f32 { 1.0 }

        fn import(&mut self, source: &Path) -> Result<Vec<SceneObject>, Box<dyn Error>>
        {
            self.imports += 1;
            let stem = file_stem_lossy(source);
            self.calls.push(format!("import {stem}"));
            self.current = stem.clone();
            let objects = match stem.as_str()
            {
                "bad_import" => return Err(Box::new(MockError("corrupt file"))),
                "empty" => Vec::new(),
                "camera_only" => vec![SceneObject { name: stem, world: Mat4::IDENTITY, kind: ObjectKind::Camera }],
                _ =>
                {
                    let scale = stem.trim_start_matches(|c: char| !c.is_ascii_digit()).parse().unwrap_or(1.0);
                    let tri = Triangle::flat([Vec3::ZERO, Vec3::X, Vec3::Y], [Vec2::ZERO; 3]);
                    vec![SceneObject
                    {
                        name: stem,
                        world: Mat4::from_scale(Vec3::splat(scale)),
                        kind: ObjectKind::Mesh(MeshObject
                        {
                            local_bounds: Some(AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5))),
                            surfaces: vec![Surface { triangles: vec![tri], material: Material::default() }],
                        }),
                    }]
                }
            };
            self.live_objects += objects.len();
            Ok(objects)
        }

        fn apply_material(&mut self, objects: &mut [SceneObject], texture: &Arc<Texture>)
        {
            self.calls.push(format!("apply_material {}", self.current));
            for mesh in objects.iter_mut().filter_map(SceneObject::mesh_mut)
            {
                mesh.replace_materials(&Material::textured("GameMaterial", texture.clone()));
            }
        }

        fn render(&mut self, objects: &[SceneObject], camera: &Camera, output: &Path) -> Result<(), Box<dyn Error>>
        {
            self.calls.push(format!("render {}", self.current));
            if output.file_stem().is_some_and(|s| s == "bad_render")
            {
                return Err(Box::new(MockError("out of memory")));
            }
            self.renders.push(RenderCall
            {
                output: output.to_path_buf(),
                ortho_scale: camera.projection().scale,
                shift: camera.projection().shift,
                object_count: objects.len(),
                material: objects.iter()
                    .find_map(|o| o.mesh())
                    .map(|m| m.surfaces[0].material.name.clone())
                    .unwrap_or_default(),
            });
            Ok(())
        }

        fn cleanup(&mut self, objects: Vec<SceneObject>)
        {
            self.cleanups += 1;
            self.live_objects -= objects.len();
            self.calls.push(format!("cleanup {}", self.current));
        }
    }

    fn batch() -> IconBatch<MockHost>
    {
        let framer = IsometricFramer::new(FramingParams::default()).unwrap();
        IconBatch::new(MockHost::default(), framer, "icons")
    }

    fn sources(names: &[&str]) -> Vec<PathBuf>
    {
        names.iter().map(|n| PathBuf::from(format!("models/{n}.glb"))).collect()
    }

    #[test]
    fn failures_do_not_stop_the_batch()
    {
        let mut batch = batch();
        let summary = batch.run(&sources(&["a_rock", "bad_import", "empty", "bad_render", "camera_only", "z_tree"]));

        assert_eq!(summary.total(), 6);
        assert_eq!(summary.rendered(), 3);
        assert_eq!(summary.empty(), 1);
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.to_string(), "3 rendered, 1 empty, 2 failed, 6 total");

        let failures: Vec<_> = summary.failures().map(|(name, err)| (name, err.stage)).collect();
        assert_eq!(failures, [("bad_import", AssetStage::Imported), ("bad_render", AssetStage::Rendered)]);

        let host = batch.into_host();
        assert_eq!(host.imports, 6);
        // everything imported got cleaned up, including the failed render
        assert_eq!(host.cleanups, 5);
        assert_eq!(host.live_objects, 0);
        let outputs: Vec<_> = host.renders.iter().map(|r| r.output.clone()).collect();
        assert_eq!(outputs, [
            PathBuf::from("icons/a_rock.png"),
            PathBuf::from("icons/camera_only.png"),
            PathBuf::from("icons/z_tree.png"),
        ]);
    }

    #[test]
    fn no_meshes_frames_the_fallback_sphere()
    {
        let mut batch = batch();
        let outcome = batch.process_asset(Path::new("camera_only.glb")).unwrap();
        let AssetOutcome::Rendered { sphere, mesh_count, .. } = outcome else { panic!("{outcome:?}") };
        assert_eq!(sphere, Sphere::FALLBACK);
        assert_eq!(mesh_count, 0);
        assert_relative_eq!(batch.camera().projection().scale, 2.3, epsilon = 1e-5);
    }

    #[test]
    fn camera_is_reframed_per_asset()
    {
        let mut batch = batch();
        batch.process_asset(Path::new("cube1.glb")).unwrap();
        batch.camera.set_shift(Vec2::new(0.25, -0.5));
        batch.process_asset(Path::new("cube10.glb")).unwrap();

        let host = batch.host();
        let unit_radius = 3.0f32.sqrt() / 2.0;
        assert_relative_eq!(host.renders[0].ortho_scale, unit_radius * 2.0 * 1.15, epsilon = 1e-4);
        assert_relative_eq!(host.renders[1].ortho_scale, unit_radius * 20.0 * 1.15, epsilon = 1e-3);
        assert_eq!(host.renders[1].shift, Vec2::ZERO);
    }

    fn test_texture() -> Arc<Texture>
    {
        let texels = vec![Vec4::ONE; 4].into_boxed_slice();
        Arc::new(Texture::from_texels("base.png", 2, 2, texels).unwrap())
    }

    #[test]
    fn host_calls_follow_the_asset_stages()
    {
        let mut batch = batch().with_texture(Some(test_texture()));
        assert_eq!(batch.stage(), AssetStage::Idle);
        let summary = batch.run(&sources(&["rock", "bad_import", "empty", "bad_render", "tree"]));
        assert_eq!(summary.rendered(), 2);
        assert_eq!(batch.stage(), AssetStage::Idle);

        let host = batch.into_host();
        assert_eq!(host.calls,
        [
            "import rock", "apply_material rock", "render rock", "cleanup rock",
            "import bad_import",
            "import empty", "cleanup empty",
            "import bad_render", "apply_material bad_render", "render bad_render", "cleanup bad_render",
            "import tree", "apply_material tree", "render tree", "cleanup tree",
        ]);
    }

    #[test]
    fn output_keeps_the_whole_stem()
    {
        let batch = batch();
        assert_eq!(batch.output_file(Path::new("models/crate.v2.glb")), Path::new("icons/crate.v2.png"));
        assert_eq!(batch.output_file(Path::new("models/Barrel.GLTF")), Path::new("icons/Barrel.png"));
    }

    #[cfg(unix)]
    #[test]
    fn output_keeps_non_utf8_stems()
    {
        use std::os::unix::ffi::OsStrExt;

        let batch = batch();
        let source = Path::new("models").join(OsStr::from_bytes(b"caf\xe9.glb"));
        let output = batch.output_file(&source);
        assert_eq!(output.file_name(), Some(OsStr::from_bytes(b"caf\xe9.png")));
        assert_eq!(output.parent(), Some(Path::new("icons")));
    }

    #[test]
    fn texture_replaces_materials()
    {
        let mut batch = batch();
        batch.process_asset(Path::new("plain.glb")).unwrap();
        let mut batch = IconBatch { texture: Some(test_texture()), ..batch };
        batch.process_asset(Path::new("textured.glb")).unwrap();

        let host = batch.host();
        assert_eq!(host.renders[0].material, Material::default().name);
        assert_eq!(host.renders[1].material, "GameMaterial");
        assert_eq!(host.renders[1].object_count, 1);
    }

    #[test]
    fn asset_limit()
    {
        let mut batch = batch().with_max_assets(Some(2));
        let summary = batch.run(&sources(&["a", "b", "c", "d"]));
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.not_processed, 2);
        assert_eq!(summary.to_string(), "2 rendered, 0 empty, 0 failed, 2 total (2 not processed)");
    }

    #[test]
    fn missing_texture_is_not_fatal()
    {
        assert!(load_shared_texture("no/such/textures/base.png").is_none());
    }
}
