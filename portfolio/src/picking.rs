use engine::camera::OrthoCamera;
use engine::scene::{Hit, NodeId, SceneGraph};
use glam::Vec2;

use crate::content::is_interactable;

/// Which hit wins when the pointer ray crosses several meshes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PickPolicy {
    /// Only the nearest mesh counts; an unlabeled mesh in front occludes what is behind it.
    #[default]
    NearestOnly,
    /// The nearest interactable mesh wins, looking through unlabeled ones.
    FirstInteractable,
}

/// Ray picking over the meshes present at load time.
#[derive(Debug, Clone, Default)]
pub struct Picker {
    candidates: Vec<NodeId>,
    pub policy: PickPolicy,
}

impl Picker {
    /// Freezes the candidate list: every mesh node currently in `scene`.
    pub fn from_scene(scene: &SceneGraph, policy: PickPolicy) -> Self {
        Self {
            candidates: scene.mesh_nodes(),
            policy,
        }
    }

    /// Interactable name under the pointer, if any.
    pub fn pick(&self, scene: &SceneGraph, camera: &OrthoCamera, ndc: Vec2) -> Option<String> {
        let ray = camera.ray_from_ndc(ndc);
        let hits = scene.intersect(&ray, &self.candidates);
        self.select(scene, &hits).map(str::to_string)
    }

    /// Per-frame hover check; only drives the pointer cursor.
    pub fn hover(&self, scene: &SceneGraph, camera: &OrthoCamera, ndc: Vec2) -> bool {
        self.pick(scene, camera, ndc).is_some()
    }

    fn select<'s>(&self, scene: &'s SceneGraph, hits: &[Hit]) -> Option<&'s str> {
        match self.policy {
            PickPolicy::NearestOnly => hits.first().and_then(|h| resolve_name(scene, h.node)),
            PickPolicy::FirstInteractable => {
                hits.iter().find_map(|h| resolve_name(scene, h.node))
            }
        }
    }
}

/// The node's own name when allow-listed, else its parent's when that is.
pub fn resolve_name(scene: &SceneGraph, node: NodeId) -> Option<&str> {
    let own = scene.node(node)?.name.as_str();
    if is_interactable(own) {
        return Some(own);
    }
    scene.parent_name(node).filter(|p| is_interactable(p))
}
