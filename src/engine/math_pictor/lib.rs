mod angle;
pub use angle::*;

mod aabb;
pub use aabb::*;

mod transform;
pub use transform::*;

mod sphere;
pub use sphere::*;

pub use geometry_tests::*;
