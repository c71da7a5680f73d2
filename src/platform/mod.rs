// mailsift - platform/mod.rs
//
// Platform abstraction layer: OS config paths and config.toml loading.

pub mod config;
