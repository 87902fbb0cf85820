//! The scene graph data structure.
//!
//! An arena of nodes with parent/child relationships and TRS transforms,
//! using free-list index recycling. Nodes optionally carry an [`AnchorSpec`]
//! (resolved by the owning [`CanvasScaler`](crate::scaler::CanvasScaler)) and
//! a [`HitShape`] making them valid raycast targets.

use crate::scaler::AnchorSpec;
use crate::types::NodeId;
use glam::{Mat4, Quat, Vec3};

/// Shape used to resolve pointer rays against a node, expressed in the node's
/// local space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum HitShape {
    /// Axis-aligned rectangle on the local XY plane, centred at the origin.
    Rect { width: f32, height: f32 },
    /// Axis-aligned box centred at the origin.
    Box { half_extents: Vec3 },
    /// Sphere centred at the origin.
    Sphere { radius: f32 },
}

/// A node in the scene graph.
#[derive(Clone, Debug)]
pub struct SceneNode {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub visible: bool,
    /// Anchor-relative placement, resolved by the owning scaler.
    pub anchor: Option<AnchorSpec>,
    /// Present on nodes registered as raycast targets.
    pub hit_shape: Option<HitShape>,
}

impl SceneNode {
    fn new() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            visible: true,
            anchor: None,
            hit_shape: None,
        }
    }

    /// The node's local TRS matrix.
    pub fn local_transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Arena of scene nodes with free-index recycling.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<SceneNode>>,
    free_indices: Vec<usize>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a detached node and returns its ID.
    pub fn add_node(&mut self) -> NodeId {
        if let Some(id) = self.free_indices.pop() {
            self.nodes[id] = Some(SceneNode::new());
            id
        } else {
            let id = self.nodes.len();
            self.nodes.push(Some(SceneNode::new()));
            id
        }
    }

    /// Adds a node as a child of `parent`.
    pub fn spawn_child(&mut self, parent: NodeId) -> NodeId {
        let id = self.add_node();
        self.add_child(parent, id);
        id
    }

    /// Recursively destroys a node and its children, freeing their indices.
    pub fn destroy_node(&mut self, id: NodeId) {
        if id >= self.nodes.len() || self.nodes[id].is_none() {
            return;
        }

        let (parent_id, children) = {
            let node = self.nodes[id].as_ref().unwrap();
            (node.parent, node.children.clone())
        };

        if let Some(pid) = parent_id {
            self.remove_child(pid, id);
        }

        for child in children {
            self.destroy_node(child);
        }

        self.nodes[id] = None;
        self.free_indices.push(id);
    }

    /// Establishes a parent-child relationship between two existing nodes.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p_node) = self.nodes.get_mut(parent).and_then(|n| n.as_mut()) {
            p_node.children.push(child);
        }
        if let Some(c_node) = self.nodes.get_mut(child).and_then(|n| n.as_mut()) {
            c_node.parent = Some(parent);
        }
    }

    /// Removes `child` from `parent`'s children list and clears its parent
    /// link. The child subtree itself stays alive.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(p_node) = self.nodes.get_mut(parent).and_then(|n| n.as_mut()) {
            if let Some(pos) = p_node.children.iter().position(|&c| c == child) {
                p_node.children.remove(pos);
            }
        }
        if let Some(c_node) = self.nodes.get_mut(child).and_then(|n| n.as_mut()) {
            if c_node.parent == Some(parent) {
                c_node.parent = None;
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id).and_then(|n| n.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id).and_then(|n| n.as_mut())
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes in the arena.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Collects `root` and every descendant, depth-first.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                out.push(id);
                stack.extend(node.children.iter().copied());
            }
        }
        out
    }

    /// `true` when `ancestor` is on `node`'s parent chain (or is the node).
    pub fn is_descendant_of(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// The node's world matrix, composed root-down over the parent chain.
    pub fn world_transform(&self, id: NodeId) -> Mat4 {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.get(node_id) {
                Some(node) => {
                    chain.push(node.local_transform());
                    current = node.parent;
                }
                None => break,
            }
        }

        let mut world = Mat4::IDENTITY;
        for local in chain.iter().rev() {
            world *= *local;
        }
        world
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_transform(id)
            .transform_point3(Vec3::ZERO)
    }

    /// `true` when the node and its whole parent chain are visible.
    pub fn effectively_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.get(node_id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    pub fn set_position(&mut self, id: NodeId, position: Vec3) {
        if let Some(node) = self.get_mut(id) {
            node.position = position;
        }
    }

    pub fn set_uniform_scale(&mut self, id: NodeId, scale: f32) {
        if let Some(node) = self.get_mut(id) {
            node.scale = Vec3::splat(scale);
        }
    }
}
