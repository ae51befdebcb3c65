//! Scene graph and hierarchical transform composition.
//!
//! A [`SceneTree`] owns every node; parent-to-child edges are the only
//! ownership edges, and each node keeps a plain id back-reference to its
//! parent. World transforms are composed on demand by walking to the root:
//! `root * p0 * p1 * local` yields the absolute transform of a node.

use cgmath::{Quaternion, Vector3};
use thiserror::Error;

use crate::data_structures::transform::Transform;

/// Identifies a node inside a [`SceneTree`].
///
/// Ids are never reused; looking up a removed node yields
/// [`SceneGraphError::NodeNotFound`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Error)]
pub enum SceneGraphError {
    #[error("node {0:?} is not part of this scene tree")]
    NodeNotFound(NodeId),
    #[error("node {child:?} is already a child of {parent:?}")]
    AlreadyChild { parent: NodeId, child: NodeId },
    #[error("adding {child:?} to {parent:?} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },
}

/// A single transform node: local TRS plus tree links.
#[derive(Debug)]
struct TransformNode {
    local: Transform,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Owner of a transform hierarchy.
///
/// All structural operations (insert, link, detach, remove) and all transform
/// reads and mutations go through the tree, addressed by [`NodeId`].
#[derive(Debug, Default)]
pub struct SceneTree {
    nodes: Vec<Option<TransformNode>>,
}

impl SceneTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Insert a parentless node and return its id.
    pub fn insert(&mut self, local: Transform) -> NodeId {
        self.nodes.push(Some(TransformNode {
            local,
            parent: None,
            children: Vec::new(),
        }));
        NodeId(self.nodes.len() - 1)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.0), Some(Some(_)))
    }

    fn node(&self, id: NodeId) -> Result<&TransformNode, SceneGraphError> {
        self.nodes
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .ok_or(SceneGraphError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut TransformNode, SceneGraphError> {
        self.nodes
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .ok_or(SceneGraphError::NodeNotFound(id))
    }

    /// Link `child` under `parent`, setting the child's parent back-reference.
    ///
    /// A child that is currently linked elsewhere is detached from its old
    /// parent first. Linking a node's ancestor (or the node itself) below it
    /// fails with [`SceneGraphError::CycleDetected`] and mutates nothing; the
    /// check is an explicit ancestor walk from `parent` to the root.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneGraphError> {
        self.node(child)?;
        if self.node(parent)?.children.contains(&child) {
            return Err(SceneGraphError::AlreadyChild { parent, child });
        }
        let mut cursor = Some(parent);
        while let Some(id) = cursor {
            if id == child {
                return Err(SceneGraphError::CycleDetected { parent, child });
            }
            cursor = self.node(id)?.parent;
        }
        if self.node(child)?.parent.is_some() {
            self.detach(child)?;
        }
        self.node_mut(parent)?.children.push(child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Unlink a node from its parent; the node lives on as a root.
    ///
    /// Afterwards the former parent's child list no longer mentions the node
    /// and the node's parent reference is cleared. Detaching a root is a
    /// no-op.
    pub fn detach(&mut self, id: NodeId) -> Result<(), SceneGraphError> {
        let parent = self.node(id)?.parent;
        if let Some(pid) = parent {
            self.node_mut(pid)?.children.retain(|&c| c != id);
            self.node_mut(id)?.parent = None;
        }
        Ok(())
    }

    /// Detach a node and destroy it together with its entire subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), SceneGraphError> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes[cur.0].take() {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, SceneGraphError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], SceneGraphError> {
        Ok(&self.node(id)?.children)
    }

    pub fn local(&self, id: NodeId) -> Result<&Transform, SceneGraphError> {
        Ok(&self.node(id)?.local)
    }

    pub fn set_local(&mut self, id: NodeId, local: Transform) -> Result<(), SceneGraphError> {
        self.node_mut(id)?.local = local;
        Ok(())
    }

    pub fn local_position(&self, id: NodeId) -> Result<Vector3<f32>, SceneGraphError> {
        Ok(self.node(id)?.local.position)
    }

    pub fn local_rotation(&self, id: NodeId) -> Result<Quaternion<f32>, SceneGraphError> {
        Ok(self.node(id)?.local.rotation)
    }

    pub fn local_scale(&self, id: NodeId) -> Result<Vector3<f32>, SceneGraphError> {
        Ok(self.node(id)?.local.scale)
    }

    pub fn set_local_position(
        &mut self,
        id: NodeId,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), SceneGraphError> {
        self.node_mut(id)?.local.position = Vector3::new(x, y, z);
        Ok(())
    }

    /// Accumulate a translation onto the local position.
    pub fn translate(
        &mut self,
        id: NodeId,
        v: impl Into<Vector3<f32>>,
    ) -> Result<(), SceneGraphError> {
        self.node_mut(id)?.local.position += v.into();
        Ok(())
    }

    /// Accumulate a rotation; the incoming rotation is applied *before* the
    /// existing one (`local = incoming * local`).
    pub fn rotate(
        &mut self,
        id: NodeId,
        q: impl Into<Quaternion<f32>>,
    ) -> Result<(), SceneGraphError> {
        let node = self.node_mut(id)?;
        node.local.rotation = q.into() * node.local.rotation;
        Ok(())
    }

    /// Accumulate a component-wise scale factor onto the local scale.
    pub fn scale(
        &mut self,
        id: NodeId,
        v: impl Into<Vector3<f32>>,
    ) -> Result<(), SceneGraphError> {
        let v = v.into();
        let node = self.node_mut(id)?;
        node.local.scale.x *= v.x;
        node.local.scale.y *= v.y;
        node.local.scale.z *= v.z;
        Ok(())
    }

    /// Compose the absolute world matrix of a node.
    ///
    /// The local TRS matrix is left-multiplied by the parent's world matrix,
    /// recursively to the root. A root node's world matrix is its local
    /// matrix exactly. Recomputed on every call; mutations anywhere in the
    /// ancestor chain are always reflected.
    pub fn world_matrix(&self, id: NodeId) -> Result<cgmath::Matrix4<f32>, SceneGraphError> {
        let node = self.node(id)?;
        let local = node.local.to_matrix();
        match node.parent {
            None => Ok(local),
            Some(pid) => Ok(self.world_matrix(pid)? * local),
        }
    }

    /// Compose the world transform in TRS form (`parent * local` chain).
    ///
    /// Cheaper than the matrix path and exact as long as no ancestor combines
    /// non-uniform scale with rotation; shear developed by such chains is not
    /// representable in TRS form.
    pub fn world_transform(&self, id: NodeId) -> Result<Transform, SceneGraphError> {
        let node = self.node(id)?;
        match node.parent {
            None => Ok(node.local.clone()),
            Some(pid) => Ok(&self.world_transform(pid)? * &node.local),
        }
    }

    pub fn world_position(&self, id: NodeId) -> Result<Vector3<f32>, SceneGraphError> {
        Ok(Transform::from_matrix(self.world_matrix(id)?).position)
    }

    pub fn world_rotation(&self, id: NodeId) -> Result<Quaternion<f32>, SceneGraphError> {
        Ok(Transform::from_matrix(self.world_matrix(id)?).rotation)
    }

    pub fn world_scale(&self, id: NodeId) -> Result<Vector3<f32>, SceneGraphError> {
        Ok(Transform::from_matrix(self.world_matrix(id)?).scale)
    }
}
