pub mod transform;
pub mod skeleton;
pub mod vertex_offsets;
pub mod weights;

use std::path::Path;

use crate::error::{HalaRigError, HalaRigErrorKind};
use crate::io::{HalaDmat, HalaTgf};
use crate::scene::cpu::HalaScene;

pub use transform::{HalaJointRecord, HalaJointTable};
pub use skeleton::{HalaBone, HalaJoint, HalaSkeleton};
pub use vertex_offsets::HalaVertexOffsets;
pub use weights::HalaWeightMatrix;

/// The skeleton and skinning weights extracted from a scene.
#[derive(Debug, Clone, Default)]
pub struct HalaRig {
  pub skeleton: HalaSkeleton,
  pub vertex_offsets: HalaVertexOffsets,
  /// None when the scene has no bones or no vertices.
  pub weights: Option<HalaWeightMatrix>,
}

/// The implementation of the rig.
impl HalaRig {
  /// Extract the rig of the scene.
  /// A scene without meshes gives an empty rig.
  /// param scene: The scene.
  /// return: The rig.
  pub fn extract(scene: &HalaScene) -> Result<Self, HalaRigError> {
    if scene.meshes.is_empty() {
      log::info!("The scene has no meshes, nothing to extract.");
      return Ok(Self::default());
    }

    let joint_table = HalaJointTable::accumulate(scene)?;
    let skeleton = HalaSkeleton::collect(&scene.meshes, &joint_table)?;
    let vertex_offsets = HalaVertexOffsets::from_meshes(&scene.meshes);
    let weights = HalaWeightMatrix::build(&scene.meshes, &skeleton, &vertex_offsets)?;

    log::info!(
      "Extracted {} joints and {} bones over {} vertices of {} meshes.",
      skeleton.joints.len(),
      skeleton.bones.len(),
      vertex_offsets.total(),
      scene.meshes.len());
    Ok(Self {
      skeleton,
      vertex_offsets,
      weights,
    })
  }

  pub fn joints(&self) -> &[HalaJoint] {
    &self.skeleton.joints
  }

  pub fn bones(&self) -> &[HalaBone] {
    &self.skeleton.bones
  }

  pub fn is_empty(&self) -> bool {
    self.skeleton.joints.is_empty()
  }

  /// Save the skeleton to a TGF file.
  /// param path: The path of the file.
  /// return: The result.
  pub fn save_tgf<P: AsRef<Path>>(&self, path: P) -> Result<(), HalaRigError> {
    HalaTgf::write(path, self.joints(), self.bones())
  }

  /// Save the skinning weights to a DMAT file.
  /// param path: The path of the file.
  /// return: The result.
  pub fn save_dmat<P: AsRef<Path>>(&self, path: P) -> Result<(), HalaRigError> {
    let weights = self.weights.as_ref()
      .ok_or_else(|| HalaRigError::new(
        HalaRigErrorKind::DimensionMismatch,
        &format!(
          "No weight matrix for {} vertices and {} bones.",
          self.vertex_offsets.total(),
          self.skeleton.num_of_bones()),
        None))?;
    HalaDmat::write_matrix(path, weights)
  }
}
