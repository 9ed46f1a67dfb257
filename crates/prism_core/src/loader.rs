//! JSON scene file loading.
//!
//! A scene file names its materials once and refers to them from objects:
//!
//! ```json
//! {
//!   "camera": { "position": [0, 0, 5], "look_at": [0, 0, 0], "fov": 45 },
//!   "ambient": [0.1, 0.1, 0.1],
//!   "lights": [{ "type": "point", "position": [0, 5, 5], "color": [1, 1, 1] }],
//!   "materials": {
//!     "glass": { "diffuse": [0.1, 0.1, 0.1], "transmissive": 0.9, "index": 1.5 },
//!     "wood":  { "diffuse": { "texture": "wood.png" } }
//!   },
//!   "objects": [
//!     { "type": "sphere", "center": [0, 0, 0], "radius": 1, "material": "glass" },
//!     { "type": "trimesh", "vertices": [[-1, -1, -2], [1, -1, -2], [0, 1, -2]],
//!       "faces": [[0, 1, 2]], "material": "wood" }
//!   ]
//! }
//! ```
//!
//! Texture paths are resolved relative to the scene file's directory.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use prism_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::camera::Camera;
use crate::light::Light;
use crate::material::{Material, MaterialParameter};
use crate::mesh::{Mesh, MeshError};
use crate::scene::Scene;
use crate::texture::{TextureCache, TextureError};
use crate::Color;

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Syntax error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Texture mapping error: {0}")]
    Texture(#[from] TextureError),

    #[error("Bad trimesh (object {index}): {source}")]
    Mesh {
        index: usize,
        #[source]
        source: MeshError,
    },

    #[error("Unknown material: {0}")]
    UnknownMaterial(String),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SceneFile {
    #[serde(default)]
    camera: CameraDesc,
    #[serde(default)]
    ambient: Color,
    #[serde(default)]
    lights: Vec<Light>,
    #[serde(default)]
    materials: BTreeMap<String, MaterialDesc>,
    #[serde(default)]
    objects: Vec<ObjectDesc>,
}

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct CameraDesc {
    position: Vec3,
    look_at: Vec3,
    up: Vec3,
    /// Vertical field of view in degrees; unit image plane height when absent
    fov: Option<f32>,
    aspect: f32,
}

impl Default for CameraDesc {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: None,
            aspect: 1.0,
        }
    }
}

impl CameraDesc {
    fn build(&self) -> Camera {
        let camera = Camera::new().with_aspect(self.aspect);
        let camera = match self.fov {
            Some(fov) => camera.with_fov(fov),
            None => camera,
        };
        camera.with_position(self.position, self.look_at, self.up)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ParamDesc {
    Scalar(f32),
    Color(Vec3),
    Texture { texture: String },
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct MaterialDesc {
    #[serde(alias = "ke")]
    emissive: Option<ParamDesc>,
    #[serde(alias = "ka")]
    ambient: Option<ParamDesc>,
    #[serde(alias = "ks")]
    specular: Option<ParamDesc>,
    #[serde(alias = "kd")]
    diffuse: Option<ParamDesc>,
    #[serde(alias = "kr")]
    reflective: Option<ParamDesc>,
    #[serde(alias = "kt")]
    transmissive: Option<ParamDesc>,
    shininess: Option<ParamDesc>,
    index: Option<ParamDesc>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ObjectDesc {
    Sphere {
        center: Vec3,
        radius: f32,
        material: Option<String>,
    },
    Trimesh {
        vertices: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        faces: Vec<[u32; 3]>,
        material: Option<String>,
    },
}

/// Load a scene file.
///
/// # Example
///
/// ```ignore
/// use prism_core::load_scene;
///
/// let scene = load_scene("scenes/cornell.json")?;
/// println!("Loaded {} primitives", scene.primitive_count());
/// ```
pub fn load_scene<P: AsRef<Path>>(path: P) -> LoadResult<Scene> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut scene = load_scene_from_str(&source, base_dir)?;
    scene.name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed")
        .to_string();

    log::info!(
        "Loaded scene '{}': {} objects ({} primitives), {} lights",
        scene.name,
        scene.object_count(),
        scene.primitive_count(),
        scene.light_count()
    );
    Ok(scene)
}

/// Parse a scene from JSON text. Relative texture paths resolve against `base_dir`.
pub fn load_scene_from_str(source: &str, base_dir: impl AsRef<Path>) -> LoadResult<Scene> {
    let file: SceneFile = serde_json::from_str(source)?;
    let mut textures = TextureCache::with_base_dir(base_dir.as_ref());

    let mut materials = BTreeMap::new();
    for (name, desc) in &file.materials {
        let material = build_material(name, desc, &mut textures)?;
        materials.insert(name.clone(), Arc::new(material));
    }
    let default_material = Arc::new(Material::default());

    let lookup = |name: &Option<String>| -> LoadResult<Arc<Material>> {
        match name {
            None => Ok(default_material.clone()),
            Some(name) => materials
                .get(name)
                .cloned()
                .ok_or_else(|| LoadError::UnknownMaterial(name.clone())),
        }
    };

    let mut scene = Scene::new("unnamed")
        .with_camera(file.camera.build())
        .with_ambient(file.ambient);
    for light in file.lights {
        scene.add_light(light);
    }

    for (index, object) in file.objects.into_iter().enumerate() {
        match object {
            ObjectDesc::Sphere {
                center,
                radius,
                material,
            } => {
                scene.add_sphere(center, radius, lookup(&material)?);
            }
            ObjectDesc::Trimesh {
                vertices,
                normals,
                faces,
                material,
            } => {
                let mesh = build_mesh(vertices, normals, &faces)
                    .map_err(|source| LoadError::Mesh { index, source })?;
                log::debug!(
                    "Object {}: trimesh with {} vertices, {} faces",
                    index,
                    mesh.vertex_count(),
                    mesh.triangle_count()
                );
                scene.add_mesh(mesh, lookup(&material)?);
            }
        }
    }

    if !textures.is_empty() {
        log::debug!("Scene uses {} textures", textures.len());
    }
    Ok(scene)
}

fn build_mesh(
    vertices: Vec<Vec3>,
    normals: Option<Vec<Vec3>>,
    faces: &[[u32; 3]],
) -> Result<Mesh, MeshError> {
    let mut mesh = Mesh::new(vertices);
    if let Some(normals) = normals {
        mesh = mesh.with_normals(normals)?;
    }
    for &[a, b, c] in faces {
        mesh.add_face(a, b, c)?;
    }
    Ok(mesh)
}

fn build_material(
    name: &str,
    desc: &MaterialDesc,
    textures: &mut TextureCache,
) -> LoadResult<Material> {
    let defaults = Material::default();
    let mut param = |desc: &Option<ParamDesc>, default: MaterialParameter| {
        resolve_param(desc.as_ref(), textures).map(|p| p.unwrap_or(default))
    };

    Ok(Material {
        name: name.to_string(),
        ke: param(&desc.emissive, defaults.ke)?,
        ka: param(&desc.ambient, defaults.ka)?,
        ks: param(&desc.specular, defaults.ks)?,
        kd: param(&desc.diffuse, defaults.kd)?,
        kr: param(&desc.reflective, defaults.kr)?,
        kt: param(&desc.transmissive, defaults.kt)?,
        shininess: param(&desc.shininess, defaults.shininess)?,
        index: param(&desc.index, defaults.index)?,
    })
}

fn resolve_param(
    desc: Option<&ParamDesc>,
    textures: &mut TextureCache,
) -> LoadResult<Option<MaterialParameter>> {
    Ok(match desc {
        None => None,
        Some(ParamDesc::Scalar(s)) => Some(MaterialParameter::scalar(*s)),
        Some(ParamDesc::Color(c)) => Some(MaterialParameter::Constant(*c)),
        Some(ParamDesc::Texture { texture }) => Some(textures.load(texture)?.into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneObject;
    use prism_math::Vec2;

    const TRIANGLE_SCENE: &str = r#"{
        "camera": { "position": [0, 0, 5], "look_at": [0, 0, 0], "fov": 45 },
        "ambient": [0.2, 0.2, 0.2],
        "lights": [
            { "type": "directional", "orientation": [0, 0, -1], "color": [1, 1, 1] },
            { "type": "point", "position": [0, 4, 4], "color": [1, 0.5, 0.5], "quadratic": 0.01 }
        ],
        "materials": {
            "red": { "diffuse": [1, 0, 0], "shininess": 32, "kr": 0.25 }
        },
        "objects": [
            { "type": "sphere", "center": [0, 0, -1], "radius": 0.5, "material": "red" },
            { "type": "trimesh",
              "vertices": [[-1, -1, 0], [1, -1, 0], [0, 1, 0]],
              "faces": [[0, 1, 2]] }
        ]
    }"#;

    #[test]
    fn test_load_scene_from_str() {
        let scene = load_scene_from_str(TRIANGLE_SCENE, ".").unwrap();

        assert_eq!(scene.object_count(), 2);
        assert_eq!(scene.light_count(), 2);
        assert_eq!(scene.primitive_count(), 2);
        assert_eq!(scene.ambient, Color::splat(0.2));
        assert_eq!(scene.camera.eye(), Vec3::new(0.0, 0.0, 5.0));

        let red = scene.objects[0].material();
        assert_eq!(red.name, "red");
        assert_eq!(red.kd(Vec2::ZERO), Color::new(1.0, 0.0, 0.0));
        assert_eq!(red.kr(Vec2::ZERO), Color::splat(0.25));
        assert!((red.shininess(Vec2::ZERO) - 32.0).abs() < 1e-4);
        assert!((red.index(Vec2::ZERO) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_trimesh_gets_default_material_and_normals() {
        let scene = load_scene_from_str(TRIANGLE_SCENE, ".").unwrap();

        match &scene.objects[1] {
            SceneObject::Trimesh { mesh, material } => {
                assert!(mesh.has_normals());
                assert_eq!(material.kd(Vec2::ZERO), Color::ZERO);
            }
            other => panic!("expected a trimesh, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_material_is_an_error() {
        let source = r#"{ "objects": [
            { "type": "sphere", "center": [0, 0, 0], "radius": 1, "material": "missing" }
        ] }"#;

        let err = load_scene_from_str(source, ".").unwrap_err();
        assert!(matches!(err, LoadError::UnknownMaterial(ref name) if name == "missing"));
    }

    #[test]
    fn test_bad_face_index_is_an_error() {
        let source = r#"{ "objects": [
            { "type": "trimesh", "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]], "faces": [[0, 1, 5]] }
        ] }"#;

        let err = load_scene_from_str(source, ".").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Mesh {
                index: 0,
                source: MeshError::FaceIndexOutOfRange { .. }
            }
        ));
    }

    #[test]
    fn test_normal_count_mismatch_is_an_error() {
        let source = r#"{ "objects": [
            { "type": "trimesh", "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
              "normals": [[0, 0, 1]], "faces": [[0, 1, 2]] }
        ] }"#;

        let err = load_scene_from_str(source, ".").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Mesh {
                source: MeshError::NormalCountMismatch { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_syntax_error() {
        let err = load_scene_from_str("{ \"objects\": [", ".").unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_missing_texture_fails_the_load() {
        let source = r#"{ "materials": { "wood": { "diffuse": { "texture": "no_such_file.png" } } } }"#;

        let err = load_scene_from_str(source, std::env::temp_dir()).unwrap_err();
        assert!(matches!(err, LoadError::Texture(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_scene("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_load_scene_names_scene_after_file() {
        let dir = std::env::temp_dir().join(format!("prism_loader_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("triangle.json");
        std::fs::write(&path, TRIANGLE_SCENE).unwrap();

        let scene = load_scene(&path).unwrap();
        assert_eq!(scene.name, "triangle");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_demo_scene_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../demos/spheres.json");
        let scene = load_scene(&path).unwrap();

        assert_eq!(scene.name, "spheres");
        assert_eq!(scene.object_count(), 4);
        assert_eq!(scene.primitive_count(), 5);
        assert_eq!(scene.light_count(), 2);

        let glass = scene.objects[2].material();
        assert!(glass.is_transmissive(Vec2::ZERO));
        assert!((glass.index(Vec2::ZERO) - 1.5).abs() < 1e-5);
    }
}
