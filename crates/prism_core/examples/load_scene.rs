//! Example: Load and inspect a JSON scene file.
//!
//! Run with: cargo run --example load_scene -- demos/spheres.json

use std::env;

use prism_core::{load_scene, SceneObject};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_scene <path-to-scene-json>");
        println!("\nExample:");
        println!("  cargo run --example load_scene -- demos/spheres.json");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\n=== Scene: {} ===", scene.name);
            println!("Objects: {}", scene.object_count());
            println!("Primitives: {}", scene.primitive_count());
            println!("Lights: {}", scene.light_count());
            println!("Ambient: {:?}", scene.ambient);
            println!(
                "Camera: eye {:?}, look {:?}, aspect {:.3}",
                scene.camera.eye(),
                scene.camera.look(),
                scene.camera.aspect_ratio()
            );

            for (i, object) in scene.objects.iter().enumerate() {
                match object {
                    SceneObject::Sphere { center, radius, material } => {
                        println!(
                            "  [{}] sphere center {:?} radius {} material '{}'",
                            i, center, radius, material.name
                        );
                    }
                    SceneObject::Trimesh { mesh, material } => {
                        let bounds = mesh.bounds();
                        println!(
                            "  [{}] trimesh {} vertices, {} triangles, material '{}'",
                            i,
                            mesh.vertex_count(),
                            mesh.triangle_count(),
                            material.name
                        );
                        println!(
                            "      bounds x [{:.2}, {:.2}] y [{:.2}, {:.2}] z [{:.2}, {:.2}]",
                            bounds.x.min, bounds.x.max, bounds.y.min, bounds.y.max,
                            bounds.z.min, bounds.z.max
                        );
                    }
                }
            }

            for (i, light) in scene.lights.iter().enumerate() {
                println!("  light [{}] {:?}", i, light);
            }
        }
        Err(e) => {
            eprintln!("Error loading scene: {}", e);
            std::process::exit(1);
        }
    }
}
