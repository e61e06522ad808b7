//! autoterm-engine — tag-driven power scheduling for a fleet of instances.
//!
//! Every cycle lists the fleet once, then for each resource:
//!
//! ```text
//! tags ──► PolicyExtractor ──► [Policy 0 .. Policy N-1]
//!                                   │ (one task each)
//!                                   ▼
//!             ScheduleEvaluator: on/off/kill/tgr/tgd → MatchVector
//!                                   │
//!                                   ▼
//!             decide(power_state, matches, bindings) → Decision
//!                                   │
//!                                   ▼
//!             target-group actions (binding order), then power action
//! ```
//!
//! Nothing is remembered between cycles. A kill schedule walks a running
//! instance to `Stopped` on one cycle and to `Terminated` on a later one,
//! purely from the observed power state.

pub mod decision;
pub mod error;
pub mod fleet;
pub mod policy;
pub mod processor;
pub mod schedule;
pub mod target_groups;

pub use decision::{Decision, MatchVector, decide, evaluate_policy};
pub use error::{EngineError, EngineResult, ScheduleError};
pub use fleet::{CycleReport, FleetOrchestrator};
pub use policy::PolicyExtractor;
pub use processor::{
    ActionOutcome, ActionStatus, PolicyReport, ResourceOutcome, ResourceProcessor, ResourceReport,
};
pub use schedule::{ScheduleEvaluator, ScheduleMatch};
pub use target_groups::{ParsedTargetGroups, parse_target_groups};
