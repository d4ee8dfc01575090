// src/api.rs

pub mod client;
pub use client::{RegisterLookup, RegisterSnapshot, SmcrApi};
pub mod raw;
pub use raw::RawRow;
pub mod http_client;
pub use http_client::HttpSmcrApi;
pub mod register;
pub use register::HttpRegisterLookup;
pub mod memory;
pub use memory::InMemorySmcrApi;
