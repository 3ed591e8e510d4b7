// Minimal binary glTF writer for test scenes. Every mesh node instances the same unit cube
// (-0.5..0.5 on each axis, no normals, no uvs, no material)

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;
use gltf::binary::{Glb, Header};
use gltf::json;
use gltf::json::accessor::{ComponentType, GenericComponentType, Type};
use gltf::json::validation::Checked::Valid;
use gltf::json::validation::USize64;

pub struct Node
{
    pub name: &'static str,
    pub has_mesh: bool,
    pub translation: [f32; 3],
    pub scale: [f32; 3],
    pub children: Vec<usize>,
}
impl Node
{
    pub fn cube(name: &'static str) -> Self
    {
        Self { name, has_mesh: true, translation: [0.0; 3], scale: [1.0; 3], children: Vec::new() }
    }

    pub fn empty(name: &'static str) -> Self
    {
        Self { has_mesh: false, ..Self::cube(name) }
    }

    pub fn at(self, translation: [f32; 3]) -> Self { Self { translation, ..self } }
    pub fn scaled(self, scale: f32) -> Self { Self { scale: [scale; 3], ..self } }
    pub fn with_children(self, children: &[usize]) -> Self { Self { children: children.to_vec(), ..self } }

    fn to_json(&self, mesh: json::Index<json::Mesh>) -> json::Node
    {
        json::Node
        {
            name: Some(self.name.to_string()),
            mesh: self.has_mesh.then_some(mesh),
            translation: Some(self.translation),
            scale: Some(self.scale),
            children: (!self.children.is_empty()).then(|| self.children.iter().map(|&c| json::Index::new(c as u32)).collect()),
            ..Default::default()
        }
    }
}

// How the cube's vertex data is stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeLayout
{
    Float,
    // u16 positions, as written by mesh quantization
    QuantizedPositions,
    // an index accessor holding no elements
    EmptyIndices,
}

const CUBE_FACES: [[u32; 4]; 6] = [[0, 2, 3, 1], [4, 5, 7, 6], [0, 1, 5, 4], [2, 6, 7, 3], [0, 4, 6, 2], [1, 3, 7, 5]];

fn cube_corner(i: usize, axis: usize) -> bool { i & (1 << axis) != 0 }

// Appends `bytes` to the buffer (4-byte aligned) and returns a view over them
fn push_view(root: &mut json::Root, bin: &mut Vec<u8>, bytes: &[u8]) -> json::Index<json::buffer::View>
{
    while bin.len() % 4 != 0
    {
        bin.push(0);
    }
    let view = json::buffer::View
    {
        buffer: json::Index::new(0),
        byte_length: USize64::from(bytes.len()),
        byte_offset: Some(USize64::from(bin.len())),
        byte_stride: None,
        extensions: None,
        extras: Default::default(),
        name: None,
        target: None,
    };
    bin.extend_from_slice(bytes);
    root.push(view)
}

fn push_accessor(
    root: &mut json::Root,
    view: json::Index<json::buffer::View>,
    count: usize,
    component: ComponentType,
    type_: Type,
    bounds: Option<([f32; 3], [f32; 3])>) -> json::Index<json::Accessor>
{
    root.push(json::Accessor
    {
        buffer_view: Some(view),
        byte_offset: Some(USize64(0)),
        count: USize64::from(count),
        component_type: Valid(GenericComponentType(component)),
        extensions: None,
        extras: Default::default(),
        type_: Valid(type_),
        min: bounds.map(|(min, _)| json::Value::from(min.to_vec())),
        max: bounds.map(|(_, max)| json::Value::from(max.to_vec())),
        name: None,
        normalized: false,
        sparse: None,
    })
}

fn push_cube_mesh(root: &mut json::Root, bin: &mut Vec<u8>, layout: CubeLayout) -> json::Index<json::Mesh>
{
    let positions = match layout
    {
        CubeLayout::QuantizedPositions =>
        {
            let bytes: Vec<u8> = (0..8)
                .flat_map(|i| (0..3).map(move |axis| if cube_corner(i, axis) { 1u16 } else { 0u16 }))
                .flat_map(u16::to_le_bytes)
                .collect();
            let view = push_view(root, bin, &bytes);
            push_accessor(root, view, 8, ComponentType::U16, Type::Vec3, Some(([0.0; 3], [1.0; 3])))
        }
        _ =>
        {
            let bytes: Vec<u8> = (0..8)
                .flat_map(|i| (0..3).map(move |axis| if cube_corner(i, axis) { 0.5f32 } else { -0.5f32 }))
                .flat_map(f32::to_le_bytes)
                .collect();
            let view = push_view(root, bin, &bytes);
            push_accessor(root, view, 8, ComponentType::F32, Type::Vec3, Some(([-0.5; 3], [0.5; 3])))
        }
    };

    let index_bytes: Vec<u8> = CUBE_FACES.iter()
        .flat_map(|&[a, b, c, d]| [a, b, c, a, c, d])
        .flat_map(u32::to_le_bytes)
        .collect();
    let index_count = if layout == CubeLayout::EmptyIndices { 0 } else { index_bytes.len() / 4 };
    let view = push_view(root, bin, &index_bytes);
    let indices = push_accessor(root, view, index_count, ComponentType::U32, Type::Scalar, None);

    let primitive = json::mesh::Primitive
    {
        attributes: BTreeMap::from([(Valid(json::mesh::Semantic::Positions), positions)]),
        extensions: None,
        extras: Default::default(),
        indices: Some(indices),
        material: None,
        mode: Valid(json::mesh::Mode::Triangles),
        targets: None,
    };
    root.push(json::Mesh
    {
        extensions: None,
        extras: Default::default(),
        name: Some("Cube".to_string()),
        primitives: vec![primitive],
        weights: None,
    })
}

fn build_glb(nodes: &[Node], roots: &[usize], layout: CubeLayout) -> Vec<u8>
{
    let mut root = json::Root::default();
    let mut bin = Vec::new();

    let mesh = push_cube_mesh(&mut root, &mut bin, layout);
    root.push(json::Buffer
    {
        byte_length: USize64::from(bin.len()),
        extensions: None,
        extras: Default::default(),
        name: None,
        uri: None,
    });

    for node in nodes
    {
        let node = node.to_json(mesh);
        root.push(node);
    }
    let scene = root.push(json::Scene
    {
        extensions: None,
        extras: Default::default(),
        name: None,
        nodes: roots.iter().map(|&r| json::Index::new(r as u32)).collect(),
    });
    root.scene = Some(scene);

    let json_text = json::serialize::to_string(&root).unwrap();
    let glb = Glb
    {
        // length is recomputed when written
        header: Header { magic: *b"glTF", version: 2, length: 0 },
        json: Cow::Owned(json_text.into_bytes()),
        bin: Some(Cow::Owned(bin)),
    };
    glb.to_vec().unwrap()
}

pub fn write_glb(path: impl AsRef<Path>, nodes: &[Node], roots: &[usize])
{
    write_glb_with(path, nodes, roots, CubeLayout::Float);
}

pub fn write_glb_with(path: impl AsRef<Path>, nodes: &[Node], roots: &[usize], layout: CubeLayout)
{
    std::fs::write(path, build_glb(nodes, roots, layout)).unwrap();
}

pub fn temp_dir(name: &str) -> std::path::PathBuf
{
    let dir = std::env::temp_dir().join(format!("pictor_tests_{name}_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
