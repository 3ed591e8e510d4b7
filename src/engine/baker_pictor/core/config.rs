use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use unicase::UniCase;
use graphics_pictor::framing::{FramingError, FramingParams};
use graphics_pictor::renderer::RenderSettings;
use math_pictor::Angle;

#[derive(Debug)]
pub enum ConfigError
{
    Io(io::Error),
    Parse(toml::de::Error),
    MissingInputDir(PathBuf),
    OutputNotWritable
    {
        path: PathBuf,
        inner: io::Error,
    },
    InvalidFraming(FramingError),
    InvalidIconSize
    {
        icon_size: u32,
        supersample: u32,
    },
}
impl Display for ConfigError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}
impl Error for ConfigError
{
    fn source(&self) -> Option<&(dyn Error + 'static)>
    {
        match self
        {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::OutputNotWritable { inner, .. } => Some(inner),
            ConfigError::InvalidFraming(err) => Some(err),
            _ => None,
        }
    }
}
impl From<FramingError> for ConfigError
{
    fn from(err: FramingError) -> Self { Self::InvalidFraming(err) }
}

// Load-time tunables. Relative directories resolve against `project_root`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconBakerConfig
{
    pub project_root: PathBuf,
    pub models_dir: PathBuf,
    pub textures_dir: PathBuf,
    pub texture_name: String,
    pub output_dir: PathBuf,

    pub icon_size: u32, // square, in pixels
    pub supersample: u32,

    pub padding: f32,
    pub elevation_degrees: f32,
    pub azimuth_degrees: f32,
    pub distance_multiplier: f32,

    pub source_extensions: Vec<String>,
    pub max_assets: Option<usize>,
}
impl IconBakerConfig
{
    pub const DEFAULT_FILE_NAME: &'static str = "pictor.toml";
    pub const MAX_ICON_SIZE: u32 = 8192;

    // Defaults are used when `path` does not exist. A file that exists but can't be read or parsed is an error
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError>
    {
        let path = path.as_ref();
        if !path.is_file()
        {
            log::info!("No config at {path:?}, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        let config = Self::parse(&text)?;
        log::debug!("Loaded config from {path:?}: {config:?}");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError>
    {
        toml::from_str(text).map_err(ConfigError::Parse)
    }

    fn resolve(&self, dir: &Path) -> PathBuf
    {
        match dir.is_absolute()
        {
            true => dir.to_path_buf(),
            false => self.project_root.join(dir),
        }
    }

    #[must_use] pub fn models_path(&self) -> PathBuf { self.resolve(&self.models_dir) }
    #[must_use] pub fn texture_path(&self) -> PathBuf { self.resolve(&self.textures_dir).join(&self.texture_name) }
    #[must_use] pub fn output_path(&self) -> PathBuf { self.resolve(&self.output_dir) }

    #[must_use]
    pub fn framing_params(&self) -> FramingParams
    {
        FramingParams
        {
            padding: self.padding,
            elevation: Angle::from_degrees(self.elevation_degrees),
            azimuth: Angle::from_degrees(self.azimuth_degrees),
            distance_multiplier: self.distance_multiplier,
        }
    }

    #[must_use]
    pub fn render_settings(&self) -> RenderSettings
    {
        RenderSettings
        {
            resolution: self.icon_size,
            supersample: self.supersample,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn extensions(&self) -> Vec<UniCase<String>>
    {
        self.source_extensions.iter()
            .map(|e| UniCase::new(e.trim_start_matches('.').to_string()))
            .collect()
    }

    // Everything that can be checked without touching the output directory
    pub fn validate(&self) -> Result<(), ConfigError>
    {
        if self.icon_size == 0 ||
            self.supersample == 0 ||
            self.icon_size.saturating_mul(self.supersample) > Self::MAX_ICON_SIZE
        {
            return Err(ConfigError::InvalidIconSize { icon_size: self.icon_size, supersample: self.supersample });
        }

        self.framing_params().validate()?;

        let models = self.models_path();
        if !models.is_dir()
        {
            return Err(ConfigError::MissingInputDir(models));
        }
        Ok(())
    }

    // Create the output directory and make sure files can be written into it
    pub fn prepare_output_dir(&self) -> Result<PathBuf, ConfigError>
    {
        let output = self.output_path();
        let not_writable = |inner| ConfigError::OutputNotWritable { path: output.clone(), inner };

        std::fs::create_dir_all(&output).map_err(not_writable)?;
        let probe = output.join(".pictor_write_probe");
        std::fs::write(&probe, b"").map_err(not_writable)?;
        std::fs::remove_file(&probe).map_err(not_writable)?;

        Ok(output)
    }
}
impl Default for IconBakerConfig
{
    fn default() -> Self
    {
        Self
        {
            project_root: PathBuf::from("."),
            models_dir: PathBuf::from("src/public/models"),
            textures_dir: PathBuf::from("src/public/textures"),
            texture_name: "base.png".to_string(),
            output_dir: PathBuf::from("src/public/icons/models"),

            icon_size: 256,
            supersample: 2,

            padding: FramingParams::DEFAULT_PADDING,
            elevation_degrees: 35.264,
            azimuth_degrees: -45.0,
            distance_multiplier: FramingParams::DEFAULT_DISTANCE_MULTIPLIER,

            source_extensions: vec!["glb".to_string()],
            max_assets: None,
        }
    }
}
