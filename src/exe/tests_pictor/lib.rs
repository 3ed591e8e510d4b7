mod glb;
mod gltf_import;
mod icon_batch;
