// Leaf modules of the frame engine, one per pipeline stage plus the shared
// frame container. Orchestration lives a level up, in `pipeline`.
pub mod chart;
pub mod compositor;
pub mod encoder;
pub mod frame;
pub mod grayscale;
pub mod histogram;
pub mod parameters;
pub mod tone_mapper;
