mod scene_object;
pub use scene_object::*;

pub mod gltf_import;
