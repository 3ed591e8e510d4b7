use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use graphics_pictor::camera::Camera;
use graphics_pictor::texture::Texture;
use scene_pictor::SceneObject;

// The environment an icon batch runs against. It owns importing, materials and image output;
// the batch only decides where the camera goes
pub trait IconHost
{
    // Width / height of the images `render` produces
    fn aspect_ratio(&self) -> f32;

    // Bring every object in a model file into the scene
    fn import(&mut self, source: &Path) -> Result<Vec<SceneObject>, Box<dyn Error>>;

    // Give every mesh object its own material using the shared texture
    fn apply_material(&mut self, objects: &mut [SceneObject], texture: &Arc<Texture>);

    // Render `objects` through `camera` and write the image to `output`. Nothing is left at `output` on failure
    fn render(&mut self, objects: &[SceneObject], camera: &Camera, output: &Path) -> Result<(), Box<dyn Error>>;

    // Release an asset's objects and materials. Called for every import, successful render or not
    fn cleanup(&mut self, objects: Vec<SceneObject>);
}
