//! Decision table: (power state, schedule matches) → actions.
//!
//! The decision is a pure function re-evaluated from scratch every cycle.
//!
//! ```text
//! conflicts:  on ∧ off        → error
//!             tgr ∧ tgd       → error
//!
//! target groups (Running, bindings, tgr ∨ tgd):
//!             tgd             → Deregister(b) for every binding
//!             tgr             → Register(b)   for every binding
//!
//! power (first match wins):
//!             Running ∧ (off ∨ kill)       → Stop
//!             Stopped ∧ on ∧ ¬kill         → Start
//!             Stopped ∧ kill               → Terminate
//!             otherwise                    → NoOp
//! ```
//!
//! A due `kill` never terminates a running instance; it stops it first and
//! terminates on a later cycle once the instance reports `Stopped`.

use chrono::{DateTime, Utc};

use autoterm_core::tags;
use autoterm_core::{Action, Policy, PowerState, TargetGroupBinding};

use crate::error::{EngineError, EngineResult};
use crate::schedule::{ScheduleEvaluator, ScheduleMatch};

/// Match state of each of a policy's five expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchVector {
    pub on: ScheduleMatch,
    pub off: ScheduleMatch,
    pub kill: ScheduleMatch,
    pub tgr: ScheduleMatch,
    pub tgd: ScheduleMatch,
}

impl Default for MatchVector {
    fn default() -> Self {
        Self {
            on: ScheduleMatch::NotConfigured,
            off: ScheduleMatch::NotConfigured,
            kill: ScheduleMatch::NotConfigured,
            tgr: ScheduleMatch::NotConfigured,
            tgd: ScheduleMatch::NotConfigured,
        }
    }
}

/// Actions decided for one policy in one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Register/deregister actions, one per binding, in binding order.
    pub target_groups: Vec<Action>,
    /// `Start`, `Stop`, `Terminate`, or `NoOp`.
    pub power: Action,
}

impl Decision {
    /// Every non-noop action, target groups first.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = self.target_groups.clone();
        if !self.power.is_noop() {
            actions.push(self.power.clone());
        }
        actions
    }

    pub fn is_noop(&self) -> bool {
        self.target_groups.is_empty() && self.power.is_noop()
    }
}

/// Evaluate all five expressions of `policy` at `now`.
///
/// The first malformed expression aborts the whole policy.
pub fn evaluate_policy(
    evaluator: &ScheduleEvaluator,
    policy: &Policy,
    suffix: &str,
    now: DateTime<Utc>,
) -> EngineResult<MatchVector> {
    let s = &policy.schedules;
    let eval = |base: &str, expr: &Option<String>| {
        evaluator
            .evaluate(expr.as_deref(), now)
            .map_err(|source| EngineError::Schedule {
                tag: tags::key(base, suffix),
                source,
            })
    };

    Ok(MatchVector {
        on: eval(tags::AUTO_ON, &s.on)?,
        off: eval(tags::AUTO_OFF, &s.off)?,
        kill: eval(tags::AUTO_KILL, &s.kill)?,
        tgr: eval(tags::AUTO_TGR, &s.tgr)?,
        tgd: eval(tags::AUTO_TGD, &s.tgd)?,
    })
}

/// Decide what to do with a resource in `power` state given `matches`.
pub fn decide(
    power: PowerState,
    matches: &MatchVector,
    bindings: &[TargetGroupBinding],
) -> EngineResult<Decision> {
    let on = matches.on.is_active();
    let off = matches.off.is_active();
    let kill = matches.kill.is_active();
    let tgr = matches.tgr.is_active();
    let tgd = matches.tgd.is_active();

    if on && off {
        return Err(EngineError::Conflict(
            "Auto On and Auto Off are both due; adjust the schedules so they do not overlap"
                .to_string(),
        ));
    }
    if tgr && tgd {
        return Err(EngineError::Conflict(
            "Auto TGR and Auto TGD are both due; adjust the schedules so they do not overlap"
                .to_string(),
        ));
    }

    let running = power == PowerState::Running;
    let stopped = power == PowerState::Stopped;

    let target_groups = if running && (tgr || tgd) {
        bindings
            .iter()
            .map(|b| {
                if tgd {
                    Action::DeregisterFromTargetGroup(b.clone())
                } else {
                    Action::RegisterToTargetGroup(b.clone())
                }
            })
            .collect()
    } else {
        Vec::new()
    };

    let power = if running && (off || kill) {
        Action::Stop
    } else if stopped && on && !kill {
        Action::Start
    } else if stopped && kill {
        Action::Terminate
    } else {
        Action::NoOp
    };

    Ok(Decision {
        target_groups,
        power,
    })
}
