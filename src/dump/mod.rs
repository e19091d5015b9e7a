pub mod classifier;
pub mod event;
pub mod filter;
pub mod renderer;
pub mod service;

pub use service::DumpService;
