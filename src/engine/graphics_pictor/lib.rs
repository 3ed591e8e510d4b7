pub mod camera;
pub mod colors;
pub mod framing;
pub mod geometry;
pub mod lighting;
pub mod material;
pub mod raster;
pub mod renderer;
pub mod texture;
