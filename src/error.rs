use thiserror::Error;

/// The kind of a rig error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalaRigErrorKind {
  /// Two nodes in the scene tree share a name.
  DuplicateNodeName,
  /// A bone's end joint has no parent joint.
  OrphanBone,
  /// A bone weight refers to a vertex the mesh does not have.
  VertexIndexOutOfRange,
  /// Matrix or index dimensions do not agree.
  DimensionMismatch,
  /// Reading or writing a file failed.
  Io,
  /// A TGF or DMAT file is malformed.
  Parse,
  /// The scene arena refers to a node that does not exist.
  InvalidScene,
  /// The external scene importer failed.
  SceneLoad,
}

/// The error type of the hala-rig crate.
#[derive(Error, Debug)]
pub struct HalaRigError {
  kind: HalaRigErrorKind,
  msg: String,
  #[source]
  source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

/// The implementation of the error type of the hala-rig crate.
impl HalaRigError {
  /// Create a new error.
  /// param kind: The kind of the error.
  /// param msg: The message of the error.
  /// param source: The source of the error.
  /// return: The error.
  pub fn new(kind: HalaRigErrorKind, msg: &str, source: Option<Box<dyn std::error::Error + Send + Sync>>) -> Self {
    Self {
      kind,
      msg: msg.to_string(),
      source,
    }
  }

  pub fn kind(&self) -> HalaRigErrorKind {
    self.kind
  }

  pub fn message(&self) -> &str {
    &self.msg
  }
}

/// The implementation Display trait for the error type of the hala-rig crate.
impl std::fmt::Display for HalaRigError {
  /// Format the error.
  /// param f: The formatter.
  /// return: The result.
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.msg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn io_errors_keep_their_source() {
    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = HalaRigError::new(HalaRigErrorKind::Io, "Create file failed.", Some(Box::new(io)));
    assert_eq!(err.kind(), HalaRigErrorKind::Io);
    assert_eq!(err.to_string(), "Create file failed.");
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "denied");
  }
}
