pub mod appointment;
pub mod client;
pub mod enums;
pub mod service;

pub use appointment::*;
pub use client::*;
pub use enums::*;
pub use service::*;
