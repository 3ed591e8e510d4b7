use glam::{Mat4, Vec3};
use graphics_pictor::geometry::Triangle;
use graphics_pictor::material::Material;
use math_pictor::AABB;

// Triangles sharing one material, in the owning object's local space
#[derive(Debug, Clone)]
pub struct Surface
{
    pub triangles: Vec<Triangle>,
    pub material: Material,
}

#[derive(Debug, Clone)]
pub struct MeshObject
{
    pub local_bounds: Option<AABB>, // None if the mesh has no vertices
    pub surfaces: Vec<Surface>,
}
impl MeshObject
{
    #[must_use]
    pub fn triangle_count(&self) -> usize
    {
        self.surfaces.iter().map(|s| s.triangles.len()).sum()
    }

    // Every surface draws with `material` from now on
    pub fn replace_materials(&mut self, material: &Material)
    {
        for surface in &mut self.surfaces
        {
            surface.material = material.clone();
        }
    }
}

#[derive(Debug, Clone)]
pub enum ObjectKind
{
    Mesh(MeshObject),
    Camera,
    Empty,
}

// One object placed in the scene by an import
#[derive(Debug, Clone)]
pub struct SceneObject
{
    pub name: String,
    pub world: Mat4,
    pub kind: ObjectKind,
}
impl SceneObject
{
    #[inline] #[must_use]
    pub fn mesh(&self) -> Option<&MeshObject>
    {
        match &self.kind
        {
            ObjectKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    #[inline] #[must_use]
    pub fn mesh_mut(&mut self) -> Option<&mut MeshObject>
    {
        match &mut self.kind
        {
            ObjectKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    // The eight world-space corners of the mesh's local bounds. Empty for non-meshes and meshes without vertices
    #[must_use]
    pub fn world_corners(&self) -> Vec<Vec3>
    {
        self.mesh()
            .and_then(|m| m.local_bounds)
            .map(|b| b.transformed_corners(&self.world).to_vec())
            .unwrap_or_default()
    }

    // World-space copies of every surface's triangles
    #[must_use]
    pub fn world_surfaces(&self) -> Vec<(Vec<Triangle>, &Material)>
    {
        let Some(mesh) = self.mesh() else { return Vec::new(); };
        mesh.surfaces.iter().map(|s|
        {
            let triangles = s.triangles.iter().map(|t| t.transformed(&self.world)).collect();
            (triangles, &s.material)
        }).collect()
    }
}

// The corner set for a whole import: every mesh object's world-space bounding box corners
#[must_use]
pub fn world_corners(objects: &[SceneObject]) -> Vec<Vec3>
{
    objects.iter().flat_map(SceneObject::world_corners).collect()
}

#[cfg(test)]
mod tests
{
    use approx::assert_abs_diff_eq;
    use glam::{Vec2, Vec4};
    use math_pictor::Sphere;
    use super::*;

    fn unit_mesh(name: &str, world: Mat4) -> SceneObject
    {
        let tri = Triangle::flat([Vec3::ZERO, Vec3::X, Vec3::Y], [Vec2::ZERO; 3]);
        SceneObject
        {
            name: name.to_string(),
            world,
            kind: ObjectKind::Mesh(MeshObject
            {
                local_bounds: Some(AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5))),
                surfaces: vec![Surface { triangles: vec![tri], material: Material::default() }],
            }),
        }
    }

    #[test]
    fn corners_skip_non_meshes()
    {
        let objects = vec!
        [
            unit_mesh("a", Mat4::IDENTITY),
            SceneObject { name: "cam".to_string(), world: Mat4::IDENTITY, kind: ObjectKind::Camera },
            SceneObject { name: "root".to_string(), world: Mat4::IDENTITY, kind: ObjectKind::Empty },
            unit_mesh("b", Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0))),
            SceneObject
            {
                name: "no_verts".to_string(),
                world: Mat4::IDENTITY,
                kind: ObjectKind::Mesh(MeshObject { local_bounds: None, surfaces: Vec::new() }),
            },
        ];

        let corners = world_corners(&objects);
        assert_eq!(corners.len(), 16);

        let sphere = Sphere::from_corners(&corners);
        assert_abs_diff_eq!(sphere.center(), Vec3::new(1.5, 0.0, 0.0));
    }

    #[test]
    fn no_meshes_gives_fallback()
    {
        let objects = vec![SceneObject { name: "cam".to_string(), world: Mat4::IDENTITY, kind: ObjectKind::Camera }];
        assert!(world_corners(&objects).is_empty());
        assert_eq!(Sphere::from_corners(&world_corners(&objects)), Sphere::FALLBACK);
    }

    #[test]
    fn world_surfaces_are_transformed()
    {
        let object = unit_mesh("a", Mat4::from_scale(Vec3::splat(2.0)));
        let surfaces = object.world_surfaces();
        assert_eq!(surfaces.len(), 1);
        assert_eq!(surfaces[0].0[0].positions[1], Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn replacing_materials()
    {
        let mut object = unit_mesh("a", Mat4::IDENTITY);
        let red = Material::from_factor("red", Vec4::new(1.0, 0.0, 0.0, 1.0));
        object.mesh_mut().unwrap().replace_materials(&red);
        let mesh = object.mesh().unwrap();
        assert_eq!(mesh.surfaces[0].material.name, "red");
        assert_eq!(mesh.triangle_count(), 1);
    }
}
