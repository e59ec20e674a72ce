//! Procedural animated science diagrams.
//!
//! A diagram is described by a [`DiagramConfig`]: a kind name, an optional
//! title and a loosely-typed parameter bag. The bag is normalized once into
//! typed [`DiagramParams`]; from then on a scene is a pure function of time:
//!
//! ```
//! use storyviz::{AnimTime, DiagramConfig, DiagramKind, RenderOptions};
//!
//! let config = DiagramConfig::new(DiagramKind::Wave).with_title("Interference");
//! let scene = storyviz::render(&config, AnimTime::from_frame(15));
//! assert!(!scene.is_placeholder());
//!
//! let svg = storyviz::render_svg(&config, 15, &RenderOptions::default()).unwrap();
//! assert!(svg.contains("Interference"));
//! ```
//!
//! Bad parameters never fail a render; they draw a "No data available"
//! placeholder instead.

pub mod anim;
pub mod errors;
pub mod instance;
pub mod kind;
pub mod log;
pub mod mapper;
pub mod params;
pub mod particles;
pub mod render;
pub mod types;

pub use anim::{AnimTime, ComposedScheduler, FrameClock, FrameScheduler, Subscription, TickFn};
pub use errors::{ConfigError, RenderError};
pub use instance::{DiagramInstance, render, render_svg};
pub use kind::DiagramKind;
pub use params::{DiagramConfig, ParamBag, normalize};
pub use render::{Diagram, DiagramParams, RenderOptions, Scene, to_svg};
