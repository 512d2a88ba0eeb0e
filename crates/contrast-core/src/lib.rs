pub mod error;
pub mod consts;
pub mod raster;
pub mod histogram;
pub mod bounds;
pub mod remap;
pub mod parallel;
pub mod enhance;
pub mod config;
pub mod io;
