//! Step sequencing for install pipelines.
//!
//! A pipeline is a fixed, ordered list of [`Step`]s driven by a
//! [`Sequencer`]. When the run ends, the sequencer invokes exactly one of the
//! [`Finalizer`] callbacks:
//!
//! ```text
//! Idle ─► Running(0) ─► Running(1) ─► ... ─► Running(n-1) ─► Succeeded
//!            │              │                     │
//!            └──────────────┴───── error ─────────┴────────► Failed
//! ```
//!
//! There is no retry. A failed step's error reaches the failure finalizer
//! and the caller unchanged, wrapped in a [`StepFailure`].

mod id;
mod sequencer;

pub use id::PipelineId;
pub use sequencer::{Finalizer, PipelineState, Sequencer, Step, StepFailure};
