// src/lib.rs
//! Tidewater
//!
//! A small real-time demo that renders an animated water plane under a
//! cubemap skybox, built on wgpu and winit.

pub mod app;
pub mod config;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::TidewaterApp;
pub use config::SceneConfig;
