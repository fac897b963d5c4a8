//! Flat-shaded painter's-algorithm renderer for the box scene, plus the overlay pass.

use std::f32::consts::FRAC_1_PI;

use engine::camera::OrthoCamera;
use engine::graphics::{Color, Renderer2d};
use engine::raycast::box_corners;
use engine::scene::{SceneGraph, vec3_to_color};
use engine::view_tree::{ViewTree, draw_view_tree};
use glam::{Mat3, Vec3};

/// Corner indices into [`box_corners`] with the local outward normal of each face.
const FACES: [([usize; 4], Vec3); 6] = [
    ([0, 1, 2, 3], Vec3::NEG_Z),
    ([4, 5, 6, 7], Vec3::Z),
    ([0, 3, 7, 4], Vec3::NEG_X),
    ([1, 2, 6, 5], Vec3::X),
    ([0, 1, 5, 4], Vec3::NEG_Y),
    ([3, 2, 6, 7], Vec3::Y),
];

/// Overall brightness multiplier applied after lighting.
pub const EXPOSURE: f32 = 1.7;

#[derive(Debug, Clone, Copy)]
struct Quad {
    points: [[f32; 2]; 4],
    depth: f32,
    color: Color,
}

/// Lambert shading: `exposure * diffuse / pi * (ambient + sun * n.l)`.
fn shade_face(scene: &SceneGraph, diffuse: Vec3, normal: Vec3) -> Color {
    let ambient = scene.ambient.color * scene.ambient.intensity;
    let lambert = normal.dot(scene.sun.to_light()).max(0.0);
    let direct = scene.sun.color * scene.sun.intensity * lambert;
    vec3_to_color(diffuse * FRAC_1_PI * EXPOSURE * (ambient + direct))
}

fn collect_quads(scene: &SceneGraph, camera: &OrthoCamera, width: f32, height: f32) -> Vec<Quad> {
    let toward_camera = -camera.forward();
    let mut quads = Vec::new();
    for id in scene.mesh_nodes() {
        let Some(mesh) = scene.node(id).and_then(|n| n.mesh) else {
            continue;
        };
        let model = scene.world_matrix(id);
        let normal_matrix = Mat3::from_mat4(model).inverse().transpose();
        let corners = box_corners(mesh.size * 0.5).map(|c| camera.project(model.transform_point3(c)));

        for (indices, local_normal) in FACES {
            let normal = (normal_matrix * local_normal).normalize_or_zero();
            if normal.dot(toward_camera) <= 0.0 {
                continue;
            }
            let ndc = indices.map(|i| corners[i]);
            let depth = ndc.iter().map(|p| p.z).sum::<f32>() / 4.0;
            quads.push(Quad {
                points: ndc.map(|p| [(p.x + 1.0) * 0.5 * width, (1.0 - p.y) * 0.5 * height]),
                depth,
                color: shade_face(scene, mesh.color, normal),
            });
        }
    }
    // Far faces first.
    quads.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    quads
}

pub fn draw_scene(scene: &SceneGraph, camera: &OrthoCamera, gfx: &mut dyn Renderer2d) {
    let size = gfx.size();
    gfx.clear(vec3_to_color(scene.background));
    if size.is_empty() {
        return;
    }
    for quad in collect_quads(scene, camera, size.width as f32, size.height as f32) {
        let [a, b, c, d] = quad.points;
        gfx.fill_triangle(a, b, c, quad.color);
        gfx.fill_triangle(a, c, d, quad.color);
    }
}

/// Scene first, overlay on top.
pub fn draw_frame<A>(scene: &SceneGraph, camera: &OrthoCamera, view: &ViewTree<A>, gfx: &mut dyn Renderer2d) {
    draw_scene(scene, camera, gfx);
    draw_view_tree(view, gfx);
}
