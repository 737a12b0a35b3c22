pub mod number;
pub mod tgf;
pub mod dmat;

pub use tgf::HalaTgf;
pub use dmat::HalaDmat;
