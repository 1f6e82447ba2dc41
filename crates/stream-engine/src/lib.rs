//! Signlang Stream Engine
//!
//! Turns a live camera feed into a stable sequence of recognized signs.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                LifecycleController                │
//! │  toggle() / reset_word()      session start time  │
//! │  ┌─────────────────────────────────────────────┐  │
//! │  │                 StreamLoop                  │  │
//! │  │  FrameSource ──► Classifier ──► dispatch    │  │
//! │  │                                  │          │  │
//! │  │        ┌──────────────┬──────────┴───┐      │  │
//! │  │        ▼              ▼              ▼      │  │
//! │  │   Overlay      SequenceAccumulator  Display │  │
//! │  └─────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────┘
//! ```
//!
//! [`engine::spawn`] drives the controller from a tokio task at the display
//! refresh rate and exposes it through an [`engine::EngineHandle`].

pub mod accumulator;
pub mod engine;
pub mod lifecycle;
pub mod rotation;
pub mod stream_loop;

pub use accumulator::{ObserveOutcome, SequenceAccumulator, WordSnapshot};
pub use engine::{spawn, EngineHandle, EngineParts, EngineSettings, EngineSnapshot};
pub use lifecycle::{LifecycleController, SessionSummary, ToggleOutcome};
pub use stream_loop::{IterationOutcome, LoopSettings, SessionStats, StreamLoop};
