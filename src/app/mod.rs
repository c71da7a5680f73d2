// mailsift - app/mod.rs
//
// Application orchestration layer: owns file I/O and drives the core
// extract → dedup → classify pipeline over a batch of inputs.

pub mod pipeline;
