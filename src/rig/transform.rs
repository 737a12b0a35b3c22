use std::collections::BTreeMap;

use glam::{DMat4, DVec3};

use crate::error::{HalaRigError, HalaRigErrorKind};
use crate::scene::cpu::scene::{HalaScene, ROOT_NODE_INDEX};

/// The world space data of one scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct HalaJointRecord {
  pub world_transform: DMat4,
  pub world_position: DVec3,
  /// The name of the parent node, None for the traversal root.
  pub parent: Option<String>,
  pub node_index: u32,
}

/// World transforms and parent links of all nodes, keyed by node name.
#[derive(Debug, Clone, Default)]
pub struct HalaJointTable {
  records: BTreeMap<String, HalaJointRecord>,
}

/// The implementation of the joint table.
impl HalaJointTable {
  /// Accumulate the world transforms of the whole scene tree.
  /// The root node's parent transform is the identity.
  /// param scene: The scene.
  /// return: The joint table.
  pub fn accumulate(scene: &HalaScene) -> Result<Self, HalaRigError> {
    Self::accumulate_from(scene, ROOT_NODE_INDEX, DMat4::IDENTITY)
  }

  /// Accumulate the world transforms of a subtree.
  /// Nodes are visited depth first, pre-order, children in scene order.
  /// param scene: The scene.
  /// param start: The arena index of the subtree root.
  /// param parent_world_transform: The world transform of the subtree root's parent.
  /// return: The joint table.
  pub fn accumulate_from(scene: &HalaScene, start: u32, parent_world_transform: DMat4) -> Result<Self, HalaRigError> {
    let mut table = Self::default();
    let mut stack = vec![(start, None, parent_world_transform)];

    while let Some((node_index, parent, parent_world)) = stack.pop() {
      let node = scene.nodes.get(node_index as usize)
        .ok_or_else(|| HalaRigError::new(
          HalaRigErrorKind::InvalidScene,
          &format!("Node {} does not exist.", node_index),
          None))?;

      // A node reached twice also lands here, so cycles cannot loop forever.
      if table.records.contains_key(&node.name) {
        return Err(HalaRigError::new(
          HalaRigErrorKind::DuplicateNodeName,
          &format!("Node name \"{}\" is used more than once.", node.name),
          None));
      }

      let world_transform = parent_world * node.local_transform;
      table.records.insert(node.name.clone(), HalaJointRecord {
        world_transform,
        world_position: world_transform.w_axis.truncate(),
        parent: parent.map(|parent: u32| scene.nodes[parent as usize].name.clone()),
        node_index,
      });

      stack.extend(node.children.iter().rev().map(|&child| (child, Some(node_index), world_transform)));
    }

    log::debug!("Accumulated world transforms of {} nodes.", table.records.len());
    Ok(table)
  }

  /// Get the record of the named node.
  /// param name: The node name.
  /// return: The record or None.
  pub fn get(&self, name: &str) -> Option<&HalaJointRecord> {
    self.records.get(name)
  }

  /// Get the world position of the named node.
  /// param name: The node name.
  /// return: The world position or None.
  pub fn world_position(&self, name: &str) -> Option<DVec3> {
    self.records.get(name).map(|record| record.world_position)
  }

  /// Get the parent name of the named node.
  /// param name: The node name.
  /// return: The parent name, None for the root or an unknown node.
  pub fn parent_name(&self, name: &str) -> Option<&str> {
    self.records.get(name)?.parent.as_deref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn chain() -> HalaScene {
    let mut scene = HalaScene::new("root", DMat4::IDENTITY);
    let a = scene.add_node(ROOT_NODE_INDEX, "A", DMat4::from_translation(DVec3::new(1.0, 0.0, 0.0))).unwrap();
    scene.add_node(a, "B", DMat4::from_translation(DVec3::new(0.0, 2.0, 0.0))).unwrap();
    scene
  }

  #[test]
  fn translation_chain_accumulates() {
    let table = HalaJointTable::accumulate(&chain()).unwrap();
    assert_eq!(table.world_position("root"), Some(DVec3::ZERO));
    assert_eq!(table.world_position("A"), Some(DVec3::new(1.0, 0.0, 0.0)));
    assert_eq!(table.world_position("B"), Some(DVec3::new(1.0, 2.0, 0.0)));
    assert_eq!(table.parent_name("B"), Some("A"));
    assert_eq!(table.parent_name("A"), Some("root"));
    assert_eq!(table.parent_name("root"), None);
  }

  #[test]
  fn root_position_is_its_own_translation() {
    let scene = HalaScene::new("root", DMat4::from_translation(DVec3::new(3.0, -4.0, 5.5)));
    let table = HalaJointTable::accumulate(&scene).unwrap();
    assert_eq!(table.world_position("root"), Some(DVec3::new(3.0, -4.0, 5.5)));
  }

  #[test]
  fn parent_transform_is_applied_first() {
    let mut scene = HalaScene::new("root", DMat4::from_rotation_z(std::f64::consts::FRAC_PI_2));
    scene.add_node(ROOT_NODE_INDEX, "A", DMat4::from_translation(DVec3::new(1.0, 0.0, 0.0))).unwrap();
    let table = HalaJointTable::accumulate(&scene).unwrap();
    let position = table.world_position("A").unwrap();
    assert!(position.abs_diff_eq(DVec3::new(0.0, 1.0, 0.0), 1e-12));
  }

  #[test]
  fn siblings_keep_their_own_parent() {
    let mut scene = HalaScene::new("root", DMat4::IDENTITY);
    let a = scene.add_node(ROOT_NODE_INDEX, "A", DMat4::from_translation(DVec3::X)).unwrap();
    let c = scene.add_node(ROOT_NODE_INDEX, "C", DMat4::from_translation(DVec3::Z)).unwrap();
    scene.add_node(a, "B", DMat4::from_translation(DVec3::Y)).unwrap();
    let table = HalaJointTable::accumulate(&scene).unwrap();
    assert_eq!(table.parent_name("B"), Some("A"));
    assert_eq!(table.parent_name("C"), Some("root"));
    assert_eq!(table.world_position("B"), Some(DVec3::new(1.0, 1.0, 0.0)));
    assert_eq!(table.get("C").map(|record| record.node_index), Some(c));
  }

  #[test]
  fn duplicate_names_are_rejected() {
    let mut scene = chain();
    scene.add_node(ROOT_NODE_INDEX, "A", DMat4::IDENTITY).unwrap();
    let err = HalaJointTable::accumulate(&scene).unwrap_err();
    assert_eq!(err.kind(), HalaRigErrorKind::DuplicateNodeName);
  }

  #[test]
  fn cycles_are_rejected() {
    let mut scene = chain();
    scene.nodes[2].children.push(1);
    let err = HalaJointTable::accumulate(&scene).unwrap_err();
    assert_eq!(err.kind(), HalaRigErrorKind::DuplicateNodeName);
  }

  #[test]
  fn dangling_child_is_rejected() {
    let mut scene = chain();
    scene.nodes[0].children.push(42);
    let err = HalaJointTable::accumulate(&scene).unwrap_err();
    assert_eq!(err.kind(), HalaRigErrorKind::InvalidScene);
  }

  #[test]
  fn subtree_uses_given_parent_transform() {
    let scene = chain();
    let parent = DMat4::from_translation(DVec3::new(0.0, 0.0, 10.0));
    let table = HalaJointTable::accumulate_from(&scene, 1, parent).unwrap();
    assert!(table.get("A").is_some());
    assert_eq!(table.world_position("B"), Some(DVec3::new(1.0, 2.0, 10.0)));
    assert!(table.get("root").is_none());
  }
}
