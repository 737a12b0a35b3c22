use crate::error::{HalaRigError, HalaRigErrorKind};
use crate::scene::cpu::mesh::HalaMesh;
use super::skeleton::HalaSkeleton;
use super::vertex_offsets::HalaVertexOffsets;

/// A dense vertices by bones weight matrix, stored column by column.
#[derive(Debug, Clone, PartialEq)]
pub struct HalaWeightMatrix {
  pub num_of_rows: usize,
  pub num_of_cols: usize,
  data: Vec<f64>,
}

/// The implementation of the weight matrix.
impl HalaWeightMatrix {
  /// Create a zero matrix.
  /// param num_of_rows: The number of rows (vertices).
  /// param num_of_cols: The number of columns (bones).
  /// return: The matrix.
  pub fn zeros(num_of_rows: usize, num_of_cols: usize) -> Self {
    Self {
      num_of_rows,
      num_of_cols,
      data: vec![0.0; num_of_rows * num_of_cols],
    }
  }

  /// Create a matrix from column-major data.
  /// param num_of_rows: The number of rows.
  /// param num_of_cols: The number of columns.
  /// param data: The values, all rows of column 0 first.
  /// return: The matrix.
  pub fn from_column_major(num_of_rows: usize, num_of_cols: usize, data: Vec<f64>) -> Result<Self, HalaRigError> {
    if num_of_rows.checked_mul(num_of_cols) != Some(data.len()) {
      return Err(HalaRigError::new(
        HalaRigErrorKind::DimensionMismatch,
        &format!("{} values do not fill a {}x{} matrix.", data.len(), num_of_rows, num_of_cols),
        None));
    }
    Ok(Self { num_of_rows, num_of_cols, data })
  }

  /// Build the skinning weights of the meshes.
  /// No matrix is built when there are no bones or no vertices.
  /// param meshes: The meshes.
  /// param skeleton: The skeleton collected from the meshes.
  /// param offsets: The vertex offsets of the meshes.
  /// return: The matrix or None.
  pub fn build(
    meshes: &[HalaMesh],
    skeleton: &HalaSkeleton,
    offsets: &HalaVertexOffsets,
  ) -> Result<Option<Self>, HalaRigError> {
    // Every weight is checked first, an empty matrix does not excuse a bad index.
    for mesh in meshes.iter() {
      for bone in mesh.bones.iter() {
        if let Some(vertex_weight) = bone.weights.iter().find(|weight| weight.vertex_index >= mesh.num_of_vertices) {
          return Err(HalaRigError::new(
            HalaRigErrorKind::VertexIndexOutOfRange,
            &format!(
              "Bone \"{}\" weights vertex {} of mesh \"{}\" which has {} vertices.",
              bone.name, vertex_weight.vertex_index, mesh.name, mesh.num_of_vertices),
            None));
        }
      }
    }

    let num_of_bones = skeleton.num_of_bones();
    let num_of_vertices = offsets.total();
    if num_of_bones == 0 || num_of_vertices == 0 {
      log::debug!("Skip the weight matrix of {} vertices and {} bones.", num_of_vertices, num_of_bones);
      return Ok(None);
    }

    let mut matrix = Self::zeros(num_of_vertices, num_of_bones);
    for (mesh_index, mesh) in meshes.iter().enumerate() {
      let offset = offsets.offset(mesh_index)
        .ok_or_else(|| HalaRigError::new(
          HalaRigErrorKind::DimensionMismatch,
          &format!("Mesh \"{}\" has no vertex offset.", mesh.name),
          None))?;
      for bone in mesh.bones.iter() {
        let col = skeleton.bone_index(&bone.name)
          .ok_or_else(|| HalaRigError::new(
            HalaRigErrorKind::DimensionMismatch,
            &format!("Bone \"{}\" of mesh \"{}\" is not in the skeleton.", bone.name, mesh.name),
            None))?;
        for vertex_weight in bone.weights.iter() {
          // Meshes sharing a bone name share the column, the later write wins.
          matrix.set(offset + vertex_weight.vertex_index as usize, col, vertex_weight.weight);
        }
      }
    }

    log::debug!("Built a {}x{} weight matrix.", num_of_vertices, num_of_bones);
    Ok(Some(matrix))
  }

  /// Get a weight.
  /// param row: The global vertex index.
  /// param col: The bone index.
  /// return: The weight.
  pub fn get(&self, row: usize, col: usize) -> f64 {
    self.data[col * self.num_of_rows + row]
  }

  /// Set a weight.
  /// param row: The global vertex index.
  /// param col: The bone index.
  /// param weight: The weight.
  pub fn set(&mut self, row: usize, col: usize, weight: f64) {
    self.data[col * self.num_of_rows + row] = weight;
  }

  /// Get the weights of one bone over all vertices.
  /// param col: The bone index.
  /// return: The column.
  pub fn column(&self, col: usize) -> &[f64] {
    &self.data[col * self.num_of_rows..(col + 1) * self.num_of_rows]
  }

  pub fn as_slice(&self) -> &[f64] {
    &self.data
  }
}
