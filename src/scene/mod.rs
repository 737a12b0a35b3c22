pub mod loader;
pub mod cpu;

pub use cpu::{
  HalaNode,
  HalaMesh,
  HalaMeshBone,
  HalaVertexWeight,
  HalaScene,
};
