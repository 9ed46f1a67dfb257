//! Simple Whitted ray tracer example.
//!
//! Builds a small scene by hand (mirror, glass and matte spheres over a
//! triangle floor) and saves it as a PNG.

use std::sync::Arc;

use prism_core::{Camera, Color, Light, Material, MaterialParameter, Mesh, Scene};
use prism_renderer::{CancelToken, RayTracer, RenderConfig, ShadowMode, Vec3};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Prism Ray Tracer - Simple Example");
    println!("=================================");

    let start = std::time::Instant::now();
    let scene = build_scene()?;
    println!("Scene built in {:?}", start.elapsed());

    let (width, height) = (640, 360);
    let config = RenderConfig::default()
        .with_max_depth(5)
        .with_rays(3)
        .with_shadows(ShadowMode::Occlusion);

    let mut tracer = RayTracer::new();
    tracer.set_scene(scene);

    println!(
        "Rendering {}x{} @ {}x{} rays per pixel...",
        width, height, config.rays, config.rays
    );
    let stats = tracer.render(width, height, &config, &CancelToken::new())?;
    println!("Rendered in {:?}", stats.elapsed);

    let filename = "output.png";
    tracer.buffer().save(filename)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene() -> Result<Scene, Box<dyn std::error::Error>> {
    let camera = Camera::new()
        .with_position(
            Vec3::new(0.0, 2.0, 8.0), // eye
            Vec3::new(0.0, 0.8, 0.0), // look_at
            Vec3::Y,                  // up
        )
        .with_fov(40.0)
        .with_aspect(16.0 / 9.0);

    let mut scene = Scene::new("simple")
        .with_camera(camera)
        .with_ambient(Color::splat(0.1));

    // Floor: two triangles
    let mut floor = Mesh::new(vec![
        Vec3::new(-10.0, 0.0, -10.0),
        Vec3::new(10.0, 0.0, -10.0),
        Vec3::new(10.0, 0.0, 10.0),
        Vec3::new(-10.0, 0.0, 10.0),
    ]);
    floor.add_face(0, 2, 1)?;
    floor.add_face(0, 3, 2)?;
    scene.add_mesh(
        floor,
        Arc::new(Material {
            ka: Color::splat(0.5).into(),
            ..Material::new("floor", Color::new(0.5, 0.5, 0.45))
        }),
    );

    let mirror = Material {
        ks: Color::splat(0.8).into(),
        kr: Color::splat(0.7).into(),
        shininess: MaterialParameter::scalar(64.0),
        ..Material::new("mirror", Color::splat(0.1))
    };
    let glass = Material {
        ks: Color::splat(0.9).into(),
        kt: Color::splat(0.85).into(),
        kr: Color::splat(0.1).into(),
        shininess: MaterialParameter::scalar(96.0),
        index: MaterialParameter::scalar(1.5),
        ..Material::new("glass", Color::ZERO)
    };
    let matte = Material {
        ka: Color::new(0.4, 0.2, 0.1).into(),
        ..Material::new("matte", Color::new(0.8, 0.3, 0.2))
    };

    scene.add_sphere(Vec3::new(-2.2, 1.0, 0.0), 1.0, Arc::new(mirror));
    scene.add_sphere(Vec3::new(0.0, 1.0, 0.0), 1.0, Arc::new(glass));
    scene.add_sphere(Vec3::new(2.2, 1.0, 0.0), 1.0, Arc::new(matte));

    scene.add_light(Light::directional(Vec3::new(-1.0, -2.0, -1.0), Color::splat(0.8)));
    scene.add_light(
        Light::point(Vec3::new(3.0, 5.0, 4.0), Color::ONE).with_attenuation(1.0, 0.05, 0.01),
    );

    Ok(scene)
}
