//! Named scene graph loaded from a JSON scene file.
//!
//! Geometry is limited to colored boxes; every node is addressed by name, and lights are exposed
//! to timelines under [`AMBIENT_LIGHT`] and [`SUN_LIGHT`].

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graphics::parse_hex_color;
use crate::raycast::{Aabb, Ray, ray_box};
use crate::tween::{Animatable, Property};

pub const AMBIENT_LIGHT: &str = "AmbientLight";
pub const SUN_LIGHT: &str = "Sun";

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scene file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid color {value:?} on {owner}")]
    Color { owner: String, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// Unit-centered box of `size`, flat-shaded with `color` (linear RGB 0..1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshShape {
    pub size: Vec3,
    pub color: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: Transform,
    pub mesh: Option<MeshShape>,
    /// Part of the static collision geometry.
    pub collidable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl DirectionalLight {
    /// Unit vector pointing from the target toward the light.
    pub fn to_light(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }
}

/// A ray hit on a mesh node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    by_name: HashMap<String, NodeId>,
    pub background: Vec3,
    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            by_name: HashMap::new(),
            background: color_to_vec3([0x65, 0x8e, 0xbf, 255]),
            ambient: AmbientLight {
                color: color_to_vec3([0x24, 0x24, 0x24, 255]),
                intensity: 2.7,
            },
            sun: DirectionalLight {
                color: Vec3::ONE,
                intensity: 1.0,
                position: Vec3::new(280.0, 100.0, -80.0),
                target: Vec3::new(100.0, 0.0, -10.0),
            },
        }
    }
}

impl SceneGraph {
    /// An empty scene with default lights.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, SceneError> {
        let file: SceneFile = serde_json::from_str(text)?;
        Self::from_file(&file)
    }

    pub fn from_file(file: &SceneFile) -> Result<Self, SceneError> {
        let mut graph = Self::empty();
        if let Some(bg) = &file.background {
            graph.background = hex_vec3("background", bg)?;
        }
        if let Some(ambient) = &file.ambient {
            graph.ambient = AmbientLight {
                color: hex_vec3(AMBIENT_LIGHT, &ambient.color)?,
                intensity: ambient.intensity,
            };
        }
        if let Some(sun) = &file.sun {
            graph.sun = DirectionalLight {
                color: hex_vec3(SUN_LIGHT, &sun.color)?,
                intensity: sun.intensity,
                position: sun.position,
                target: sun.target,
            };
        }
        for node in &file.nodes {
            graph.insert(node, None)?;
        }
        Ok(graph)
    }

    fn insert(&mut self, def: &NodeDef, parent: Option<NodeId>) -> Result<NodeId, SceneError> {
        let mesh = match &def.mesh {
            Some(m) => Some(MeshShape {
                size: m.size,
                color: hex_vec3(&def.name, &m.color)?,
            }),
            None => None,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(SceneNode {
            name: def.name.clone(),
            parent,
            children: Vec::new(),
            transform: Transform {
                position: def.position,
                rotation: def.rotation,
                scale: def.scale,
            },
            mesh,
            collidable: def.collidable,
        });
        // First node with a given name wins lookups.
        self.by_name.entry(def.name.clone()).or_insert(id);
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        for child in &def.children {
            self.insert(child, Some(id))?;
        }
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn transform(&self, name: &str) -> Option<&Transform> {
        self.find(name)
            .and_then(|id| self.node(id))
            .map(|n| &n.transform)
    }

    pub fn transform_mut(&mut self, name: &str) -> Option<&mut Transform> {
        let id = self.find(name)?;
        self.node_mut(id).map(|n| &mut n.transform)
    }

    pub fn parent_name(&self, id: NodeId) -> Option<&str> {
        let parent = self.node(id)?.parent?;
        self.node(parent).map(|n| n.name.as_str())
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                break;
            };
            matrix = node.transform.matrix() * matrix;
            cursor = node.parent;
        }
        matrix
    }

    /// All nodes carrying a mesh, in scene order.
    pub fn mesh_nodes(&self) -> Vec<NodeId> {
        (0..self.nodes.len())
            .map(NodeId)
            .filter(|id| self.nodes[id.0].mesh.is_some())
            .collect()
    }

    /// World-space bounds of every collidable mesh.
    pub fn collision_boxes(&self) -> Vec<Aabb> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.collidable)
            .filter_map(|(i, n)| {
                n.mesh
                    .map(|m| Aabb::from_transformed_box(self.world_matrix(NodeId(i)), m.size))
            })
            .collect()
    }

    /// Ray hits against `candidates`, nearest first.
    pub fn intersect(&self, ray: &Ray, candidates: &[NodeId]) -> Vec<Hit> {
        let mut hits: Vec<Hit> = candidates
            .iter()
            .filter_map(|&id| {
                let mesh = self.node(id)?.mesh?;
                let distance = ray_box(ray, self.world_matrix(id), mesh.size)?;
                Some(Hit { node: id, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

impl Animatable for SceneGraph {
    fn get(&self, target: &str, property: Property) -> Option<f32> {
        match target {
            AMBIENT_LIGHT => light_channel(self.ambient.color, self.ambient.intensity, property),
            SUN_LIGHT => light_channel(self.sun.color, self.sun.intensity, property),
            _ => {
                let t = self.transform(target)?;
                match property {
                    Property::PositionX => Some(t.position.x),
                    Property::PositionY => Some(t.position.y),
                    Property::PositionZ => Some(t.position.z),
                    Property::RotationX => Some(t.rotation.x),
                    Property::RotationY => Some(t.rotation.y),
                    Property::RotationZ => Some(t.rotation.z),
                    Property::ScaleX => Some(t.scale.x),
                    Property::ScaleY => Some(t.scale.y),
                    Property::ScaleZ => Some(t.scale.z),
                    Property::ColorR | Property::ColorG | Property::ColorB | Property::Intensity => {
                        None
                    }
                }
            }
        }
    }

    fn set(&mut self, target: &str, property: Property, value: f32) {
        match target {
            AMBIENT_LIGHT => {
                set_light_channel(&mut self.ambient.color, &mut self.ambient.intensity, property, value)
            }
            SUN_LIGHT => set_light_channel(&mut self.sun.color, &mut self.sun.intensity, property, value),
            _ => {
                let Some(t) = self.transform_mut(target) else {
                    return;
                };
                match property {
                    Property::PositionX => t.position.x = value,
                    Property::PositionY => t.position.y = value,
                    Property::PositionZ => t.position.z = value,
                    Property::RotationX => t.rotation.x = value,
                    Property::RotationY => t.rotation.y = value,
                    Property::RotationZ => t.rotation.z = value,
                    Property::ScaleX => t.scale.x = value,
                    Property::ScaleY => t.scale.y = value,
                    Property::ScaleZ => t.scale.z = value,
                    Property::ColorR | Property::ColorG | Property::ColorB | Property::Intensity => {}
                }
            }
        }
    }
}

fn light_channel(color: Vec3, intensity: f32, property: Property) -> Option<f32> {
    match property {
        Property::ColorR => Some(color.x),
        Property::ColorG => Some(color.y),
        Property::ColorB => Some(color.z),
        Property::Intensity => Some(intensity),
        _ => None,
    }
}

fn set_light_channel(color: &mut Vec3, intensity: &mut f32, property: Property, value: f32) {
    match property {
        Property::ColorR => color.x = value,
        Property::ColorG => color.y = value,
        Property::ColorB => color.z = value,
        Property::Intensity => *intensity = value,
        _ => {}
    }
}

pub fn color_to_vec3(color: [u8; 4]) -> Vec3 {
    Vec3::new(color[0] as f32, color[1] as f32, color[2] as f32) / 255.0
}

pub fn vec3_to_color(v: Vec3) -> [u8; 4] {
    let c = (v.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8, 255]
}

fn hex_vec3(owner: &str, value: &str) -> Result<Vec3, SceneError> {
    parse_hex_color(value)
        .map(color_to_vec3)
        .ok_or_else(|| SceneError::Color {
            owner: owner.to_string(),
            value: value.to_string(),
        })
}

/// On-disk scene description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub ambient: Option<AmbientDef>,
    #[serde(default)]
    pub sun: Option<SunDef>,
    #[serde(default)]
    pub nodes: Vec<NodeDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientDef {
    pub color: String,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunDef {
    pub color: String,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDef {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "unit_scale")]
    pub scale: Vec3,
    #[serde(default)]
    pub mesh: Option<MeshDef>,
    #[serde(default)]
    pub collidable: bool,
    #[serde(default)]
    pub children: Vec<NodeDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshDef {
    pub size: Vec3,
    pub color: String,
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}
