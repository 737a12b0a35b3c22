pub use crate::error::{
  HalaRigError,
  HalaRigErrorKind,
};
pub use crate::scene::{
  HalaNode,
  HalaMesh,
  HalaMeshBone,
  HalaVertexWeight,
  HalaScene,
};
pub use crate::rig::{
  HalaRig,
  HalaJoint,
  HalaBone,
  HalaSkeleton,
  HalaWeightMatrix,
};
pub use crate::io::{
  HalaTgf,
  HalaDmat,
};
