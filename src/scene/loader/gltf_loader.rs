use std::path::Path;
use std::collections::{
  BTreeMap,
  VecDeque,
};

use glam::DMat4;

use crate::error::{HalaRigError, HalaRigErrorKind};
use super::super::{
  cpu::scene::{HalaScene, ROOT_NODE_INDEX},
  cpu::mesh::{HalaMesh, HalaMeshBone, HalaVertexWeight},
};

/// The name of the root node created when a glTF scene has several root nodes.
pub const SYNTHETIC_ROOT_NAME: &str = "<Root>";

/// The glTF loader.
pub struct HalaGltfLoader;

/// The implementation of the glTF loader.
impl HalaGltfLoader {
  /// Load the glTF file from the given path.
  /// param path The path of the glTF or GLB file.
  /// return The loaded scene.
  pub fn load<P: AsRef<Path>>(path: P) -> Result<HalaScene, HalaRigError> {
    let path = path.as_ref();
    let (gltf, buffers, _) = gltf::import(path)
      .map_err(|err| HalaRigError::new(
        HalaRigErrorKind::SceneLoad,
        &format!("Load glTF file \"{:?}\" failed.", path),
        Some(Box::new(err))))?;

    let num_of_scenes = gltf.scenes().len();
    let gltf_scene = gltf.default_scene()
      .or_else(|| gltf.scenes().next())
      .ok_or_else(|| HalaRigError::new(HalaRigErrorKind::SceneLoad, &format!("No scene in glTF file \"{:?}\".", path), None))?;
    if num_of_scenes > 1 {
      log::warn!("More than one scene in glTF file \"{:?}\". Only scene {} will be loaded.", path, gltf_scene.index());
    }
    log::debug!("Loading scene \"{}\".", gltf_scene.name().unwrap_or("<Unnamed>"));

    // Load all nodes. A single root node becomes the tree root, several get a common parent.
    let mut loaded_nodes = Vec::new();
    let mut node_indices = BTreeMap::new();
    let mut node_queue = VecDeque::new();
    let roots = gltf_scene.nodes().collect::<Vec<_>>();
    let mut scene = if roots.len() == 1 {
      let root = &roots[0];
      node_indices.insert(root.index(), ROOT_NODE_INDEX);
      loaded_nodes.push(root.clone());
      node_queue.extend(root.children().map(|child| (ROOT_NODE_INDEX, child)));
      HalaScene::new(&Self::node_name(root), Self::local_transform(root))
    } else {
      node_queue.extend(roots.iter().cloned().map(|node| (ROOT_NODE_INDEX, node)));
      HalaScene::new(SYNTHETIC_ROOT_NAME, DMat4::IDENTITY)
    };

    while let Some((parent_idx, node)) = node_queue.pop_front() {
      let current_index = scene.add_node(parent_idx, &Self::node_name(&node), Self::local_transform(&node))?;
      node_indices.insert(node.index(), current_index);
      node_queue.extend(node.children().map(|child| (current_index, child)));
      loaded_nodes.push(node);
    }

    // Collect the meshes instanced by the loaded nodes.
    // The first node instancing a mesh with a skin decides the skin of the mesh.
    let mut mesh_skins = BTreeMap::new();
    for node in loaded_nodes.iter() {
      if let Some(mesh) = node.mesh() {
        let skin = mesh_skins.entry(mesh.index()).or_insert(None);
        if skin.is_none() {
          *skin = node.skin();
        }
      }
    }

    // Load the instanced meshes in mesh order. Every primitive is a mesh of its own.
    for mesh in gltf.meshes() {
      let joint_names = match mesh_skins.get(&mesh.index()) {
        Some(Some(skin)) => Self::skin_joint_names(skin, &node_indices, &scene)?,
        Some(None) => Vec::new(),
        None => {
          log::debug!("Mesh {} is not instanced in the loaded scene. Skipped.", mesh.index());
          continue;
        },
      };
      for primitive in mesh.primitives() {
        let loaded_mesh = Self::load_primitive(&mesh, &primitive, &joint_names, &buffers)?;
        scene.add_mesh(loaded_mesh);
      }
    }

    log::debug!("Loaded {} nodes and {} meshes from \"{:?}\".", scene.nodes.len(), scene.meshes.len(), path);
    Ok(scene)
  }

  /// Get a unique name of the node.
  /// param node The gltf node.
  /// return The name.
  fn node_name(node: &gltf::Node) -> String {
    match node.name() {
      Some(name) => name.to_owned(),
      None => format!("<Unnamed {}>", node.index()),
    }
  }

  /// Get the local transform of the node in double precision.
  /// param node The gltf node.
  /// return The local transform.
  fn local_transform(node: &gltf::Node) -> DMat4 {
    let local_mtx = node.transform().matrix();
    DMat4::from_cols_array_2d(&local_mtx.map(|col| col.map(f64::from)))
  }

  /// Resolve the joint names of the skin.
  /// param skin The gltf skin.
  /// param node_indices The mapping from gltf node index to scene node index.
  /// param scene The scene being loaded.
  /// return The joint names in skin joint order.
  fn skin_joint_names(
    skin: &gltf::Skin,
    node_indices: &BTreeMap<usize, u32>,
    scene: &HalaScene,
  ) -> Result<Vec<String>, HalaRigError> {
    skin.joints().map(|joint| {
      node_indices.get(&joint.index())
        .map(|&idx| scene.nodes[idx as usize].name.clone())
        .ok_or_else(|| HalaRigError::new(
          HalaRigErrorKind::SceneLoad,
          &format!("Joint node {} of skin {} is not part of the loaded scene.", joint.index(), skin.index()),
          None))
    }).collect()
  }

  /// Load the vertex count and bone weights of the primitive.
  /// param mesh The gltf mesh.
  /// param primitive The gltf primitive.
  /// param joint_names The joint names of the skin, empty if the mesh is not skinned.
  /// param buffers The gltf buffers.
  /// return The loaded mesh.
  fn load_primitive(
    mesh: &gltf::Mesh,
    primitive: &gltf::Primitive,
    joint_names: &[String],
    buffers: &[gltf::buffer::Data],
  ) -> Result<HalaMesh, HalaRigError> {
    let mesh_name = format!("{}[{}]", mesh.name().unwrap_or("<Unnamed>"), primitive.index());
    log::debug!("Loading primitive \"{}\".", mesh_name);
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let num_of_vertices = match reader.read_positions() {
      Some(positions) => positions.count() as u32,
      None => {
        log::warn!("Primitive \"{}\" has no positions.", mesh_name);
        0
      },
    };

    let mut bone_weights = vec![Vec::<HalaVertexWeight>::new(); joint_names.len()];
    let mut set = 0;
    while let (Some(joints), Some(weights)) = (reader.read_joints(set), reader.read_weights(set)) {
      if joint_names.is_empty() {
        log::warn!("Primitive \"{}\" has joint attributes but no skin. Ignored.", mesh_name);
        break;
      }
      for (vertex_index, (joints, weights)) in joints.into_u16().zip(weights.into_f32()).enumerate() {
        for (&joint, &weight) in joints.iter().zip(weights.iter()) {
          if weight <= 0.0 {
            continue;
          }
          bone_weights.get_mut(joint as usize)
            .ok_or_else(|| HalaRigError::new(
              HalaRigErrorKind::SceneLoad,
              &format!("Primitive \"{}\" refers to joint {} outside its skin.", mesh_name, joint),
              None))?
            .push(HalaVertexWeight {
              vertex_index: vertex_index as u32,
              weight: f64::from(weight),
            });
        }
      }
      set += 1;
    }

    // Joints without any influence on this primitive are not bones of it.
    let bones = joint_names.iter()
      .zip(bone_weights)
      .filter(|(_, weights)| !weights.is_empty())
      .map(|(name, weights)| HalaMeshBone { name: name.clone(), weights })
      .collect::<Vec<_>>();

    Ok(HalaMesh {
      name: mesh_name,
      num_of_vertices,
      bones,
    })
  }
}
