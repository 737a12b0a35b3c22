pub mod prelude;
pub mod error;
pub mod scene;
pub mod rig;
pub mod io;
