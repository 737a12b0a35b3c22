mod gltf_loader;

pub use gltf_loader::{
  HalaGltfLoader,
  SYNTHETIC_ROOT_NAME,
};
