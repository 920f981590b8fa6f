pub mod mock;

#[cfg(feature = "backend-xcap")]
pub mod xcap_backend;
