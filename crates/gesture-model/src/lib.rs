//! Signlang Gesture Model
//!
//! Defines the core data contracts for the gesture stream:
//! - **Frame:** A single captured video frame, consumed once
//! - **Recognition:** Per-frame classifier output and the derived top candidate
//! - **State:** Classifier running mode and stream loop state
//! - **Display:** Live output payloads and the reference sign catalogue
//!
//! Landmark coordinates are normalized to `[0.0, 1.0]` relative to the frame
//! dimensions, matching what hand-tracking classifiers emit.

pub mod display;
pub mod frame;
pub mod recognition;
pub mod state;

pub use display::*;
pub use frame::*;
pub use recognition::*;
pub use state::*;
