pub mod packet;
pub mod capture;
pub mod decoder;

pub use capture::PacketCapture;
