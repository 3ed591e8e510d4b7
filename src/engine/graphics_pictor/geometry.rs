use glam::{Mat3, Mat4, Vec2, Vec3};
use crate::material::Material;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle
{
    pub positions: [Vec3; 3],
    pub normals: [Vec3; 3],
    pub uvs: [Vec2; 3],
}
impl Triangle
{
    // Flat shaded, normals from the winding
    #[must_use]
    pub fn flat(positions: [Vec3; 3], uvs: [Vec2; 3]) -> Self
    {
        let normal = face_normal(positions);
        Self { positions, normals: [normal; 3], uvs }
    }

    // Move into another space. Normals use the inverse-transpose so non-uniform scale stays correct
    #[must_use]
    pub fn transformed(&self, transform: &Mat4) -> Self
    {
        let normal_mtx = Mat3::from_mat4(*transform).inverse().transpose();
        Self
        {
            positions: self.positions.map(|p| transform.transform_point3(p)),
            normals: self.normals.map(|n| (normal_mtx * n).normalize_or_zero()),
            uvs: self.uvs,
        }
    }

    #[inline] #[must_use]
    pub fn face_normal(&self) -> Vec3 { face_normal(self.positions) }
}

#[inline] #[must_use]
pub fn face_normal([a, b, c]: [Vec3; 3]) -> Vec3
{
    (b - a).cross(c - a).normalize_or_zero()
}

// One mesh submitted to the renderer
#[derive(Debug, Clone, Copy)]
pub struct MeshDraw<'m>
{
    pub triangles: &'m [Triangle],
    pub material: &'m Material,
}
