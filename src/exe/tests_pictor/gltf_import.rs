use approx::assert_relative_eq;
use glam::Vec3;
use math_pictor::{Sphere, AABB};
use scene_pictor::gltf_import::{import_gltf, ModelImportError};
use scene_pictor::{world_corners, ObjectKind};
use crate::glb::{temp_dir, write_glb, write_glb_with, CubeLayout, Node};

#[test]
fn single_cube()
{
    let dir = temp_dir("import_cube");
    let path = dir.join("cube.glb");
    write_glb(&path, &[Node::cube("Cube")], &[0]);

    let objects = import_gltf(&path).unwrap();
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].name, "Cube");

    let mesh = objects[0].mesh().unwrap();
    assert_eq!(mesh.triangle_count(), 12);
    assert_eq!(mesh.local_bounds, Some(AABB::new(Vec3::splat(-0.5), Vec3::splat(0.5))));

    let sphere = Sphere::from_corners(&world_corners(&objects));
    assert_relative_eq!(sphere.center(), Vec3::ZERO, epsilon = 1e-6);
    assert_relative_eq!(sphere.radius(), 0.866_025_4, epsilon = 1e-5);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn hierarchy_is_flattened_into_z_up_world()
{
    let dir = temp_dir("import_hierarchy");
    let path = dir.join("stack.glb");
    write_glb(&path,
    &[
        Node::empty("Root").at([0.0, 10.0, 0.0]).with_children(&[1]),
        Node::cube("Crate").at([1.0, 0.0, 0.0]).scaled(2.0),
        Node::cube("Marker").at([0.0, 0.0, 5.0]),
    ],
    &[0, 2]);

    let objects = import_gltf(&path).unwrap();
    let names: Vec<_> = objects.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["Root", "Crate", "Marker"]);
    assert!(matches!(objects[0].kind, ObjectKind::Empty));

    // glTF +Y is world +Z, glTF +Z is world -Y
    let crate_sphere = Sphere::from_corners(&objects[1].world_corners());
    assert_relative_eq!(crate_sphere.center(), Vec3::new(1.0, 0.0, 10.0), epsilon = 1e-5);
    assert_relative_eq!(crate_sphere.radius(), 0.866_025_4 * 2.0, epsilon = 1e-5);

    let marker_sphere = Sphere::from_corners(&objects[2].world_corners());
    assert_relative_eq!(marker_sphere.center(), Vec3::new(0.0, -5.0, 0.0), epsilon = 1e-5);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn empty_scene()
{
    let dir = temp_dir("import_empty");
    let path = dir.join("empty.glb");
    write_glb(&path, &[], &[]);

    let objects = import_gltf(&path).unwrap();
    assert!(objects.is_empty());
    assert_eq!(Sphere::from_corners(&world_corners(&objects)), Sphere::FALLBACK);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn garbage_file()
{
    let dir = temp_dir("import_garbage");
    let path = dir.join("broken.glb");
    std::fs::write(&path, b"definitely not a model").unwrap();

    assert!(matches!(import_gltf(&path), Err(ModelImportError::Gltf(_))));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unreadable_accessors_are_errors()
{
    let dir = temp_dir("import_accessors");

    let quantized = dir.join("quantized.glb");
    write_glb_with(&quantized, &[Node::cube("Packed")], &[0], CubeLayout::QuantizedPositions);
    let err = import_gltf(&quantized).unwrap_err();
    assert!(matches!(err, ModelImportError::UnsupportedAccessor { ref mesh, semantic: "POSITION", count: 8, .. } if mesh == "Packed"), "{err}");

    let no_indices = dir.join("no_indices.glb");
    write_glb_with(&no_indices, &[Node::cube("Hollow")], &[0], CubeLayout::EmptyIndices);
    let err = import_gltf(&no_indices).unwrap_err();
    assert!(matches!(err, ModelImportError::UnsupportedAccessor { ref mesh, semantic: "indices", count: 0, .. } if mesh == "Hollow"), "{err}");

    let _ = std::fs::remove_dir_all(&dir);
}
