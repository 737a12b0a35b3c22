/// The influence of one bone on one vertex of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalaVertexWeight {
  /// The vertex index local to the owning mesh.
  pub vertex_index: u32,
  pub weight: f64,
}

/// The sparse weights a mesh records for one named bone.
#[derive(Debug, Clone, Default)]
pub struct HalaMeshBone {
  /// The bone name, which is also the name of the bone's end joint node.
  pub name: String,
  pub weights: Vec<HalaVertexWeight>,
}

/// The implementation of the mesh bone.
impl HalaMeshBone {
  /// Create a new mesh bone.
  /// param name: The bone name.
  /// param weights: The (local vertex index, weight) pairs.
  /// return: The mesh bone.
  pub fn new(name: &str, weights: &[(u32, f64)]) -> Self {
    Self {
      name: name.to_owned(),
      weights: weights.iter()
        .map(|&(vertex_index, weight)| HalaVertexWeight { vertex_index, weight })
        .collect(),
    }
  }
}

/// A mesh as far as skinning is concerned: its vertex count and its bone weights.
#[derive(Debug, Clone, Default)]
pub struct HalaMesh {
  pub name: String,
  pub num_of_vertices: u32,
  pub bones: Vec<HalaMeshBone>,
}

/// The implementation of the mesh.
impl HalaMesh {
  /// Create a new mesh without bones.
  /// param name: The mesh name.
  /// param num_of_vertices: The number of vertices.
  /// return: The mesh.
  pub fn new(name: &str, num_of_vertices: u32) -> Self {
    Self {
      name: name.to_owned(),
      num_of_vertices,
      bones: Vec::new(),
    }
  }

  /// Add a bone to the mesh.
  /// param bone: The bone.
  /// return: The mesh.
  pub fn with_bone(mut self, bone: HalaMeshBone) -> Self {
    self.bones.push(bone);
    self
  }
}
