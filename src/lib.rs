pub mod color;
pub mod config;
pub mod error;
pub mod fault;
pub mod grid;
pub mod io;
pub mod math;
pub mod pick;
pub mod results;
pub mod scene;
pub mod tessellation;
pub mod visualization;

pub use error::{Error, Result};
