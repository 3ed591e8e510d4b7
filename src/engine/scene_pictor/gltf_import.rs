use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::Path;
use glam::{Mat4, Vec2, Vec3, Vec4};
use gltf::accessor::{DataType, Dimensions};
use gltf::mesh::Mode;
use gltf::Semantic;
use graphics_pictor::geometry::Triangle;
use graphics_pictor::material::Material;
use math_pictor::AABB;
use crate::{MeshObject, ObjectKind, SceneObject, Surface};

#[derive(Debug)]
pub enum ModelImportError
{
    Gltf(gltf::Error),
    NoPositionData
    {
        mesh: String,
    },
    IndexOutOfRange
    {
        mesh: String,
        index: u32,
        vertex_count: usize,
    },
    // The accessor's layout can't be read as the attribute it feeds (e.g. quantized positions, no elements)
    UnsupportedAccessor
    {
        mesh: String,
        semantic: &'static str,
        data_type: DataType,
        dimensions: Dimensions,
        count: usize,
    },
    MalformedAccessor
    {
        mesh: String,
        semantic: &'static str,
        reason: &'static str,
    },
}
impl Display for ModelImportError
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { Debug::fmt(self, f) }
}
impl Error for ModelImportError
{
    fn source(&self) -> Option<&(dyn Error + 'static)>
    {
        match self
        {
            ModelImportError::Gltf(err) => Some(err),
            _ => None,
        }
    }
}
impl From<gltf::Error> for ModelImportError
{
    fn from(err: gltf::Error) -> Self { Self::Gltf(err) }
}

// glTF is Y-up; the scene is Z-up. (x, y, z) -> (x, -z, y)
pub const GLTF_TO_WORLD: Mat4 = Mat4::from_cols(Vec4::X, Vec4::Z, Vec4::NEG_Y, Vec4::W);

// Load every node of a .glb/.gltf file's default scene as scene objects, in world space
pub fn import_gltf(path: impl AsRef<Path>) -> Result<Vec<SceneObject>, ModelImportError>
{
    let path = path.as_ref();
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob)?;

    let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else
    {
        log::warn!("{path:?} has no scenes");
        return Ok(Vec::new());
    };

    let mut objects = Vec::new();
    for node in scene.nodes()
    {
        import_node(node, GLTF_TO_WORLD, &buffers, &mut objects)?;
    }

    log::debug!("Imported {} objects ({} meshes) from {path:?}",
        objects.len(),
        objects.iter().filter(|o| o.mesh().is_some()).count());
    Ok(objects)
}

fn import_node(node: gltf::Node, parent_world: Mat4, buffers: &[gltf::buffer::Data], objects: &mut Vec<SceneObject>) -> Result<(), ModelImportError>
{
    let world = parent_world * Mat4::from_cols_array_2d(&node.transform().matrix());
    let name = node.name().map(str::to_string).unwrap_or_else(|| format!("Node.{:03}", node.index()));

    let kind = if let Some(mesh) = node.mesh()
    {
        ObjectKind::Mesh(import_mesh(&name, mesh, buffers)?)
    }
    else if node.camera().is_some()
    {
        ObjectKind::Camera
    }
    else
    {
        ObjectKind::Empty
    };

    objects.push(SceneObject { name, world, kind });

    for child in node.children()
    {
        import_node(child, world, buffers, objects)?;
    }
    Ok(())
}

fn import_mesh(name: &str, mesh: gltf::Mesh, buffers: &[gltf::buffer::Data]) -> Result<MeshObject, ModelImportError>
{
    let mut local_bounds = AABB::MAX_MIN;
    let mut surfaces = Vec::new();

    for prim in mesh.primitives()
    {
        if prim.mode() != Mode::Triangles
        {
            log::warn!("Skipping {:?} primitive {} in mesh {name}", prim.mode(), prim.index());
            continue;
        }

        let Some(position_accessor) = prim.get(&Semantic::Positions) else
        {
            return Err(ModelImportError::NoPositionData { mesh: name.to_string() });
        };
        check_accessor(name, "POSITION", &position_accessor, &[DataType::F32], Dimensions::Vec3)?;
        if let Some(index_accessor) = prim.indices()
        {
            check_accessor(name, "indices", &index_accessor, &[DataType::U8, DataType::U16, DataType::U32], Dimensions::Scalar)?;
        }

        let reader = prim.reader(|b| buffers.get(b.index()).map(|d| &d.0[..]));
        let positions: Vec<Vec3> = reader.read_positions()
            .ok_or_else(|| ModelImportError::MalformedAccessor { mesh: name.to_string(), semantic: "POSITION", reason: "data is outside its buffer" })?
            .map(Vec3::from)
            .collect();

        let bb = prim.bounding_box();
        local_bounds.union_with(AABB::new(bb.min.into(), bb.max.into()));

        // unreadable normals or uvs only cost shading detail
        let normals: Option<Vec<Vec3>> = readable_attribute(name, "NORMAL", prim.get(&Semantic::Normals), &[DataType::F32], Dimensions::Vec3)
            .then(|| reader.read_normals())
            .flatten()
            .map(|n| n.map(Vec3::from).collect());
        let tex_coords: Option<Vec<Vec2>> = readable_attribute(name, "TEXCOORD_0", prim.get(&Semantic::TexCoords(0)), &[DataType::F32, DataType::U8, DataType::U16], Dimensions::Vec2)
            .then(|| reader.read_tex_coords(0))
            .flatten()
            .map(|t| t.into_f32().map(Vec2::from).collect());
        let indices: Vec<u32> = match reader.read_indices()
        {
            Some(indices) => indices.into_u32().collect(),
            None if prim.indices().is_some() =>
            {
                return Err(ModelImportError::MalformedAccessor { mesh: name.to_string(), semantic: "indices", reason: "data is outside its buffer" });
            }
            None => (0..positions.len() as u32).collect(),
        };

        let mut triangles = Vec::with_capacity(indices.len() / 3);
        for tri in indices.chunks_exact(3)
        {
            let mut verts = [0usize; 3];
            for (v, &i) in verts.iter_mut().zip(tri)
            {
                if i as usize >= positions.len()
                {
                    return Err(ModelImportError::IndexOutOfRange { mesh: name.to_string(), index: i, vertex_count: positions.len() });
                }
                *v = i as usize;
            }

            let tri_positions = verts.map(|i| positions[i]);
            let uvs = verts.map(|i| tex_coords.as_ref().and_then(|t| t.get(i).copied()).unwrap_or(Vec2::ZERO));
            let triangle = match &normals
            {
                Some(normals) if normals.len() == positions.len() => Triangle
                {
                    positions: tri_positions,
                    normals: verts.map(|i| normals[i]),
                    uvs,
                },
                _ => Triangle::flat(tri_positions, uvs),
            };
            triangles.push(triangle);
        }

        surfaces.push(Surface { triangles, material: import_material(prim.material()) });
    }

    Ok(MeshObject
    {
        local_bounds: local_bounds.is_valid().then_some(local_bounds),
        surfaces,
    })
}

// The reader asserts on layouts it doesn't expect, so anything it can't handle is rejected up front
fn check_accessor(mesh: &str, semantic: &'static str, accessor: &gltf::Accessor, data_types: &[DataType], dimensions: Dimensions) -> Result<(), ModelImportError>
{
    if accessor.count() == 0 ||
        !data_types.contains(&accessor.data_type()) ||
        accessor.dimensions() != dimensions
    {
        return Err(ModelImportError::UnsupportedAccessor
        {
            mesh: mesh.to_string(),
            semantic,
            data_type: accessor.data_type(),
            dimensions: accessor.dimensions(),
            count: accessor.count(),
        });
    }

    let malformed = |reason| ModelImportError::MalformedAccessor { mesh: mesh.to_string(), semantic, reason };
    if accessor.view().and_then(|v| v.stride()).is_some_and(|stride| stride < accessor.size())
    {
        return Err(malformed("stride is smaller than an element"));
    }
    if let Some(sparse) = accessor.sparse()
    {
        if sparse.count() == 0
        {
            return Err(malformed("sparse substitution is empty"));
        }
        if sparse.values().view().stride().is_some_and(|stride| stride < accessor.size()) ||
            sparse.indices().view().stride().is_some_and(|stride| stride < sparse.indices().index_type().size())
        {
            return Err(malformed("sparse stride is smaller than an element"));
        }
    }
    Ok(())
}

// false if the attribute is absent or unreadable (logged)
fn readable_attribute(mesh: &str, semantic: &'static str, accessor: Option<gltf::Accessor>, data_types: &[DataType], dimensions: Dimensions) -> bool
{
    let Some(accessor) = accessor else { return false; };
    match check_accessor(mesh, semantic, &accessor, data_types, dimensions)
    {
        Ok(()) => true,
        Err(err) =>
        {
            log::warn!("Ignoring {semantic} in mesh {mesh}: {err}");
            false
        }
    }
}

fn import_material(material: gltf::Material) -> Material
{
    let pbr = material.pbr_metallic_roughness();
    let name = material.name().unwrap_or("Material");
    // the default glTF material is plain white; keep the neutral gray instead
    match material.index()
    {
        Some(_) => Material::from_factor(name, Vec4::from(pbr.base_color_factor())),
        None => Material::default(),
    }
}
