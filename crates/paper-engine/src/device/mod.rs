//! wgpu instance/adapter/device/queue and the window surface they present to.

mod gpu;
mod init;

pub use gpu::{Gpu, GpuFrame, SurfaceErrorAction};
pub use init::GpuInit;
