/// A node is a named local transform with a parent and child indices.
#[derive(Debug, Clone)]
pub struct HalaNode {
  pub name: String,
  pub parent: Option<u32>,
  pub children: Vec<u32>,
  pub local_transform: glam::DMat4,
}

/// The default implementation of the node.
impl Default for HalaNode {
  fn default() -> Self {
    Self {
      name: String::new(),
      parent: None,
      children: Vec::new(),
      local_transform: glam::DMat4::IDENTITY,
    }
  }
}

/// The implementation of the node.
impl HalaNode {
  /// Create a new node without parent and children.
  /// param name: The name of the node.
  /// param local_transform: The transform relative to the parent node.
  /// return: The node.
  pub fn new(name: &str, local_transform: glam::DMat4) -> Self {
    Self {
      name: name.to_owned(),
      local_transform,
      ..Default::default()
    }
  }
}
