pub mod backend;
pub mod error;
pub mod flows;
pub mod memory;
pub mod protocol;
pub mod session;
pub mod subscription;

#[cfg(all(target_family = "wasm", feature = "live"))]
pub mod live;

/// Backend the app runs against: the gateway client on live wasm
/// builds, the in-memory backend everywhere else.
#[cfg(all(target_family = "wasm", feature = "live"))]
pub type DefaultBackend = live::LiveClient;
#[cfg(not(all(target_family = "wasm", feature = "live")))]
pub type DefaultBackend = memory::MemoryBackend;
