use glam::{Mat3, Mat4, Quat, Vec3};

// World space is right handed and Z-up
pub const WORLD_UP: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

// Object-local axes. Cameras look down local -Z with local +Y as up
pub const LOCAL_RIGHT: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
pub const LOCAL_UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
pub const LOCAL_FORWARD: Vec3 = Vec3 { x: 0.0, y: 0.0, z: -1.0 };

#[derive(Debug, PartialEq, Clone)]
pub struct Transform
{
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}
impl Default for Transform
{
    fn default() -> Self { Self
    {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    }}
}
impl Transform
{
    // Place an object at `position` with its forward axis pointing at `target`, without roll.
    // Returns None if the direction is degenerate (zero, or parallel to `up`)
    #[must_use]
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Option<Self>
    {
        Some(Self
        {
            position,
            rotation: look_rotation(target - position, up)?,
            scale: Vec3::ONE,
        })
    }

    #[inline] #[must_use] pub fn forward(&self) -> Vec3 { self.rotation * LOCAL_FORWARD }
    #[inline] #[must_use] pub fn right(&self) -> Vec3 { self.rotation * LOCAL_RIGHT }
    #[inline] #[must_use] pub fn up(&self) -> Vec3 { self.rotation * LOCAL_UP }

    // Ignores scale
    #[inline] #[must_use]
    pub fn to_view_mtx(&self) -> Mat4
    {
        let rotation = Mat4::from_quat(self.rotation.inverse());
        let translation = Mat4::from_translation(-self.position);
        rotation * translation
    }
}

// Rotation that maps LOCAL_FORWARD onto `direction` and keeps LOCAL_UP in the plane of `direction` and `up`
#[must_use]
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat>
{
    let forward = direction.try_normalize()?;
    let right = forward.cross(up).try_normalize()?;
    let local_up = right.cross(forward);

    // columns are where each local axis lands; local -Z is forward so +Z is backward
    let basis = Mat3::from_cols(right, local_up, -forward);
    Some(Quat::from_mat3(&basis).normalize())
}
