//! CPU path tracer, film accumulation and EXR output.

pub mod math;
pub mod sampler;
pub mod camera;
pub mod geometry;
pub mod bvh;
pub mod scene;
pub mod integrator;
pub mod film;
pub mod image_out;
