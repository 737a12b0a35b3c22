pub mod node;
pub mod mesh;
pub mod scene;

pub use node::HalaNode;
pub use mesh::{
  HalaMesh,
  HalaMeshBone,
  HalaVertexWeight,
};
pub use scene::HalaScene;
