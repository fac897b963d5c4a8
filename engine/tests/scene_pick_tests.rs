use engine::camera::OrthoCamera;
use engine::scene::{AMBIENT_LIGHT, SceneGraph};
use engine::tween::{Animatable, Easing, Position, Property, Timeline, Tween, Tweener};
use glam::{Vec2, Vec3};

const SCENE: &str = r##"{
    "nodes": [
        { "name": "Floor", "position": [0.0, -0.5, 0.0], "collidable": true,
          "mesh": { "size": [20.0, 1.0, 20.0], "color": "#c9a27a" } },
        { "name": "Shelf", "position": [2.0, 1.0, 0.0],
          "children": [
            { "name": "Book", "position": [0.0, 0.5, 0.0],
              "mesh": { "size": [0.5, 1.0, 0.5], "color": "#aa3333" } }
          ] },
        { "name": "Front", "position": [0.0, 1.0, 4.0],
          "mesh": { "size": [1.0, 1.0, 1.0], "color": "#ffffff" } },
        { "name": "Back", "position": [0.0, 1.0, -4.0],
          "mesh": { "size": [1.0, 1.0, 1.0], "color": "#ffffff" } }
    ]
}"##;

fn scene() -> SceneGraph {
    SceneGraph::from_json_str(SCENE).expect("scene parses")
}

#[test]
fn children_inherit_parent_transform() {
    let scene = scene();
    let book = scene.find("Book").expect("book");
    let center = scene.world_matrix(book).transform_point3(Vec3::ZERO);
    assert!(center.distance(Vec3::new(2.0, 1.5, 0.0)) < 1e-5);
    assert_eq!(scene.parent_name(book), Some("Shelf"));
}

#[test]
fn ray_through_two_boxes_hits_nearest_first() {
    let scene = scene();
    // Looking down -Z from in front of both boxes.
    let camera = OrthoCamera::new(Vec3::new(0.0, 1.0, 20.0), Vec3::new(0.0, 1.0, 0.0), 1.0, 10.0);
    let ray = camera.ray_from_ndc(Vec2::ZERO);
    let candidates = vec![
        scene.find("Back").expect("back"),
        scene.find("Front").expect("front"),
    ];
    let hits = scene.intersect(&ray, &candidates);
    assert_eq!(hits.len(), 2);
    assert_eq!(scene.node(hits[0].node).map(|n| n.name.as_str()), Some("Front"));
    assert!(hits[0].distance < hits[1].distance);
}

#[test]
fn ray_beside_every_box_misses() {
    let scene = scene();
    let camera = OrthoCamera::new(Vec3::new(0.0, 1.0, 20.0), Vec3::new(0.0, 1.0, 0.0), 1.0, 10.0);
    let ray = camera.ray_from_ndc(Vec2::new(0.9, 0.9));
    assert!(scene.intersect(&ray, &scene.mesh_nodes()).is_empty());
}

#[test]
fn projected_center_round_trips_to_a_hit() {
    let scene = scene();
    let camera = OrthoCamera::new(Vec3::new(30.0, 20.0, 30.0), Vec3::ZERO, 16.0 / 9.0, 8.0);
    let book = scene.find("Book").expect("book");
    let ndc = camera.project(scene.world_matrix(book).transform_point3(Vec3::ZERO));
    let hits = scene.intersect(&camera.ray_from_ndc(Vec2::new(ndc.x, ndc.y)), &[book]);
    assert_eq!(hits.len(), 1);
}

#[test]
fn timelines_drive_node_and_light_channels() {
    let mut scene = scene();
    let mut tweener = Tweener::new();
    tweener.play(
        Timeline::new(Easing::Power2Out)
            .to(
                Tween::new(0.5)
                    .track("Shelf", Property::RotationY, 1.0)
                    .track(AMBIENT_LIGHT, Property::Intensity, 0.25)
                    .on_complete(()),
                Position::End,
            ),
    );
    let mut finished = 0;
    for _ in 0..40 {
        finished += tweener.advance(1.0 / 60.0, &mut scene).len();
    }
    assert_eq!(finished, 1);
    assert_eq!(scene.get("Shelf", Property::RotationY), Some(1.0));
    assert!((scene.ambient.intensity - 0.25).abs() < 1e-6);
}

#[test]
fn scene_files_load_from_disk_and_report_bad_colors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let good = dir.path().join("room.json");
    std::fs::write(&good, SCENE).expect("write scene");
    assert_eq!(SceneGraph::load(&good).expect("loads").len(), 5);

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, r#"{ "nodes": [ { "name": "Box", "mesh": { "size": [1,1,1], "color": "teal" } } ] }"#)
        .expect("write scene");
    let err = SceneGraph::load(&bad).expect_err("bad color is rejected");
    assert!(err.to_string().contains("Box"));
    assert!(SceneGraph::load(&dir.path().join("missing.json")).is_err());
}
