pub mod kernel;
pub mod sinkhorn;
pub mod soft;
