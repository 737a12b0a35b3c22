use std::path::Path;

use crate::error::{HalaRigError, HalaRigErrorKind};
use super::node::HalaNode;
use super::mesh::HalaMesh;
use super::super::loader::HalaGltfLoader;

/// The index of the root node in the node arena.
pub const ROOT_NODE_INDEX: u32 = 0;

/// A scene is a node tree plus the meshes skinned to it.
/// The nodes form an arena; the node at ROOT_NODE_INDEX is the root.
#[derive(Debug, Clone)]
pub struct HalaScene {
  pub nodes: Vec<HalaNode>,
  pub meshes: Vec<HalaMesh>,
}

/// The Drop implementation of the scene.
impl Drop for HalaScene {
  fn drop(&mut self) {
    log::debug!("A HalaScene dropped.");
  }
}

/// The implementation of the scene.
impl HalaScene {
  /// Create a new scene with only a root node.
  /// param root_name: The name of the root node.
  /// param root_transform: The local transform of the root node.
  /// return: The scene.
  pub fn new(root_name: &str, root_transform: glam::DMat4) -> Self {
    log::debug!("A HalaScene created.");
    Self {
      nodes: vec![HalaNode::new(root_name, root_transform)],
      meshes: Vec::new(),
    }
  }

  /// Load a scene from file.
  /// param path: The path to the glTF or GLB file.
  /// return: The scene.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HalaRigError> {
    // Check the file extension.
    let path = path.as_ref();
    let extension = path.extension()
      .ok_or_else(|| HalaRigError::new(HalaRigErrorKind::SceneLoad, &format!("Get file \"{:?}\" extension failed.", path), None))?;
    let scene = match extension.to_str() {
      // glTF file.
      Some("gltf") | Some("glb") => HalaGltfLoader::load(path),
      // Unsupported file.
      _ => Err(HalaRigError::new(HalaRigErrorKind::SceneLoad, &format!("Unsupported file \"{:?}\".", path), None)),
    }?;

    log::debug!("A HalaScene loaded from \"{:?}\".", path);
    Ok(scene)
  }

  /// Add a node under the parent node.
  /// param parent: The index of the parent node.
  /// param name: The name of the node.
  /// param local_transform: The transform relative to the parent node.
  /// return: The index of the new node.
  pub fn add_node(&mut self, parent: u32, name: &str, local_transform: glam::DMat4) -> Result<u32, HalaRigError> {
    let index = self.nodes.len() as u32;
    let parent_node = self.nodes.get_mut(parent as usize)
      .ok_or_else(|| HalaRigError::new(
        HalaRigErrorKind::InvalidScene,
        &format!("Parent node {} of node \"{}\" does not exist.", parent, name),
        None))?;
    parent_node.children.push(index);

    self.nodes.push(HalaNode {
      parent: Some(parent),
      ..HalaNode::new(name, local_transform)
    });
    Ok(index)
  }

  /// Add a mesh to the scene.
  /// param mesh: The mesh.
  /// return: The index of the mesh.
  pub fn add_mesh(&mut self, mesh: HalaMesh) -> u32 {
    self.meshes.push(mesh);
    (self.meshes.len() - 1) as u32
  }

  /// Find a node by name.
  /// param name: The node name.
  /// return: The node index or None.
  pub fn find_node(&self, name: &str) -> Option<u32> {
    self.nodes.iter().position(|node| node.name == name).map(|idx| idx as u32)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::scene::cpu::mesh::HalaMeshBone;

  #[test]
  fn add_node_links_parent_and_child() {
    let mut scene = HalaScene::new("root", glam::DMat4::IDENTITY);
    let a = scene.add_node(ROOT_NODE_INDEX, "A", glam::DMat4::IDENTITY).unwrap();
    let b = scene.add_node(a, "B", glam::DMat4::IDENTITY).unwrap();

    assert_eq!(scene.nodes[0].children, vec![a]);
    assert_eq!(scene.nodes[a as usize].children, vec![b]);
    assert_eq!(scene.nodes[b as usize].parent, Some(a));
    assert_eq!(scene.nodes[ROOT_NODE_INDEX as usize].parent, None);
    assert_eq!(scene.find_node("B"), Some(b));
    assert_eq!(scene.find_node("C"), None);
  }

  #[test]
  fn add_node_rejects_missing_parent() {
    let mut scene = HalaScene::new("root", glam::DMat4::IDENTITY);
    let err = scene.add_node(7, "A", glam::DMat4::IDENTITY).unwrap_err();
    assert_eq!(err.kind(), HalaRigErrorKind::InvalidScene);
    assert_eq!(scene.nodes.len(), 1);
  }

  #[test]
  fn add_mesh_returns_its_index() {
    let mut scene = HalaScene::new("root", glam::DMat4::IDENTITY);
    assert_eq!(scene.add_mesh(HalaMesh::new("body", 3)), 0);
    assert_eq!(scene.add_mesh(HalaMesh::new("head", 5).with_bone(HalaMeshBone::new("root", &[(0, 1.0)]))), 1);
    assert_eq!(scene.meshes[1].bones[0].weights[0].weight, 1.0);
  }

  #[test]
  fn unsupported_extension_is_a_load_error() {
    let err = HalaScene::load("model.fbx").unwrap_err();
    assert_eq!(err.kind(), HalaRigErrorKind::SceneLoad);
  }
}
