use std::collections::BTreeMap;

use glam::DVec3;

use crate::error::{HalaRigError, HalaRigErrorKind};
use crate::scene::cpu::mesh::HalaMesh;
use super::transform::HalaJointTable;

/// A skeleton joint.
#[derive(Debug, Clone, PartialEq)]
pub struct HalaJoint {
  pub name: String,
  pub position: DVec3,
  pub parent: Option<String>,
}

/// A bone is an edge from the parent joint to the child joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HalaBone {
  /// The index of the parent joint.
  pub start: usize,
  /// The index of the child joint, whose name is the bone name.
  pub end: usize,
}

/// The minimal skeleton used by a set of meshes.
///
/// Joints and bones are kept in first-encounter order: meshes in mesh order,
/// bones in record order, and for each bone its parent joint before its end joint.
#[derive(Debug, Clone, Default)]
pub struct HalaSkeleton {
  pub joints: Vec<HalaJoint>,
  pub bones: Vec<HalaBone>,
  joint_indices: BTreeMap<String, usize>,
  bone_indices: BTreeMap<String, usize>,
}

/// The implementation of the skeleton.
impl HalaSkeleton {
  /// Collect the joints and bones referenced by the meshes.
  /// param meshes: The meshes.
  /// param joint_table: The world positions and parents of all scene nodes.
  /// return: The skeleton.
  pub fn collect(meshes: &[HalaMesh], joint_table: &HalaJointTable) -> Result<Self, HalaRigError> {
    let mut skeleton = Self::default();

    for mesh in meshes.iter() {
      for bone in mesh.bones.iter() {
        if skeleton.bone_indices.contains_key(&bone.name) {
          continue;
        }

        let parent_name = joint_table.parent_name(&bone.name)
          .ok_or_else(|| HalaRigError::new(
            HalaRigErrorKind::OrphanBone,
            &format!("Bone \"{}\" of mesh \"{}\" has no parent joint.", bone.name, mesh.name),
            None))?;
        let start = skeleton.add_joint(parent_name, joint_table)?;
        let end = skeleton.add_joint(&bone.name, joint_table)?;

        skeleton.bone_indices.insert(bone.name.clone(), skeleton.bones.len());
        skeleton.bones.push(HalaBone { start, end });
      }
    }

    log::debug!("Collected {} joints and {} bones.", skeleton.joints.len(), skeleton.bones.len());
    Ok(skeleton)
  }

  /// Add the named joint if it is new.
  /// param name: The joint name.
  /// param joint_table: The world positions and parents of all scene nodes.
  /// return: The index of the joint.
  fn add_joint(&mut self, name: &str, joint_table: &HalaJointTable) -> Result<usize, HalaRigError> {
    if let Some(&index) = self.joint_indices.get(name) {
      return Ok(index);
    }

    // Only reachable for parents, bone ends were resolved by parent_name already.
    let record = joint_table.get(name)
      .ok_or_else(|| HalaRigError::new(
        HalaRigErrorKind::OrphanBone,
        &format!("Joint \"{}\" is not part of the scene tree.", name),
        None))?;

    let index = self.joints.len();
    self.joints.push(HalaJoint {
      name: name.to_owned(),
      position: record.world_position,
      parent: record.parent.clone(),
    });
    self.joint_indices.insert(name.to_owned(), index);
    Ok(index)
  }

  /// Get the index of the named joint.
  /// param name: The joint name.
  /// return: The joint index or None.
  pub fn joint_index(&self, name: &str) -> Option<usize> {
    self.joint_indices.get(name).copied()
  }

  /// Get the column of the named bone in the weight matrix.
  /// param name: The bone name, i.e. the name of its end joint.
  /// return: The bone index or None.
  pub fn bone_index(&self, name: &str) -> Option<usize> {
    self.bone_indices.get(name).copied()
  }

  pub fn num_of_bones(&self) -> usize {
    self.bones.len()
  }
}
