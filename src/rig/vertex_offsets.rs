use crate::scene::cpu::mesh::HalaMesh;

/// The global index of the first vertex of every mesh when all meshes are
/// concatenated in mesh order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HalaVertexOffsets {
  offsets: Vec<usize>,
  total: usize,
}

/// The implementation of the vertex offsets.
impl HalaVertexOffsets {
  /// Compute the offsets from the vertex counts.
  /// param mesh_vertex_counts: The vertex count of every mesh.
  /// return: The offsets.
  pub fn new<I: IntoIterator<Item = u32>>(mesh_vertex_counts: I) -> Self {
    let mut offsets = Vec::new();
    let mut total = 0usize;
    for count in mesh_vertex_counts {
      offsets.push(total);
      total += count as usize;
    }
    Self { offsets, total }
  }

  /// Compute the offsets of the meshes.
  /// param meshes: The meshes.
  /// return: The offsets.
  pub fn from_meshes(meshes: &[HalaMesh]) -> Self {
    Self::new(meshes.iter().map(|mesh| mesh.num_of_vertices))
  }

  pub fn offsets(&self) -> &[usize] {
    &self.offsets
  }

  /// Get the offset of the mesh.
  /// param mesh_index: The mesh index.
  /// return: The global index of the mesh's first vertex, None if there is no such mesh.
  pub fn offset(&self, mesh_index: usize) -> Option<usize> {
    self.offsets.get(mesh_index).copied()
  }

  /// The number of vertices of all meshes.
  pub fn total(&self) -> usize {
    self.total
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn offsets_are_running_sums() {
    let offsets = HalaVertexOffsets::new([4, 0, 3, 10]);
    assert_eq!(offsets.offsets(), &[0, 4, 4, 7]);
    assert_eq!(offsets.total(), 17);
    assert_eq!(offsets.offset(2), Some(4));
    assert_eq!(offsets.offset(4), None);
  }

  #[test]
  fn no_meshes_no_vertices() {
    let offsets = HalaVertexOffsets::from_meshes(&[]);
    assert!(offsets.offsets().is_empty());
    assert_eq!(offsets.total(), 0);
  }

  #[test]
  fn large_counts_do_not_wrap() {
    let offsets = HalaVertexOffsets::new([u32::MAX, u32::MAX]);
    assert_eq!(offsets.offset(1), Some(u32::MAX as usize));
    assert_eq!(offsets.total(), 2 * u32::MAX as usize);
  }
}
