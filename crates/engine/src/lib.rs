//! Frame driver for the platformer: window and event loop, keyboard intents,
//! a rectangle draw list presented through a software framebuffer, and loop
//! metrics. Scenes plug in through [`Scene`].

pub mod app;

pub use app::{
    rasterize, run_app, run_app_with_metrics, AppError, DrawList, DrawRect, InputAction,
    InputSnapshot, LoopConfig, LoopMetricsSnapshot, MetricsHandle, Renderer, Rgba, Scene, Vec2,
    Viewport, SLOW_FRAME_ENV_VAR,
};
