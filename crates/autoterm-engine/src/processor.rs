//! Evaluates every policy of one resource and
//! dispatches the resulting actions.
//!
//! Each policy runs as its own task against an immutable snapshot of the
//! resource. A failing policy (bad expression, conflict, provider error)
//! is logged and reported without affecting its siblings. Within a policy,
//! the first failed dispatch ends the policy: its remaining actions are
//! reported as skipped.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::task::AbortHandle;
use tracing::{debug, error, info, warn};

use autoterm_core::tags;
use autoterm_core::{
    Action, AutotermConfig, Policy, PowerControl, ProviderError, ResourceId, ResourceState,
    TargetGroupBinding, TargetGroupControl,
};

use crate::decision::{decide, evaluate_policy};
use crate::error::EngineError;
use crate::policy::PolicyExtractor;
use crate::schedule::ScheduleEvaluator;
use crate::target_groups::parse_target_groups;

/// What happened to a single action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ActionStatus {
    /// Decided but not dispatched (dry run).
    Planned,
    /// The provider accepted the call.
    Applied,
    /// The target group named in the binding does not exist.
    TargetGroupNotFound,
    /// The provider call failed.
    Failed(String),
    /// Not attempted because an earlier action of the same policy failed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub action: Action,
    pub status: ActionStatus,
}

/// Outcome of one policy in one cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyReport {
    pub index: usize,
    pub disabled: bool,
    pub actions: Vec<ActionOutcome>,
    /// Schedule, conflict, or task failure that aborted the decision.
    pub error: Option<String>,
}

impl PolicyReport {
    fn new(index: usize) -> Self {
        Self {
            index,
            disabled: false,
            actions: Vec::new(),
            error: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ResourceOutcome {
    /// No tag key mentions `Auto`; the resource was not looked at.
    Skipped,
    /// `Terminator Disable All` is set.
    DisabledAll,
    Processed(Vec<PolicyReport>),
    /// The resource task did not finish (panic or cycle deadline).
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceReport {
    pub id: ResourceId,
    pub name: String,
    pub outcome: ResourceOutcome,
}

impl ResourceReport {
    pub fn new(resource: &ResourceState, outcome: ResourceOutcome) -> Self {
        Self {
            id: resource.id.clone(),
            name: resource.display_name().to_string(),
            outcome,
        }
    }

    pub fn policies(&self) -> &[PolicyReport] {
        match &self.outcome {
            ResourceOutcome::Processed(p) => p,
            _ => &[],
        }
    }

    /// Every action decided for this resource, across policies.
    pub fn actions(&self) -> impl Iterator<Item = &ActionOutcome> {
        self.policies().iter().flat_map(|p| p.actions.iter())
    }
}

/// Aborts the policy tasks of a resource when the resource's own future is
/// dropped, so a cancelled resource leaves nothing running behind it.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Runs extraction, decision, and dispatch for one resource at a time.
pub struct ResourceProcessor {
    extractor: PolicyExtractor,
    evaluator: ScheduleEvaluator,
    power: Arc<dyn PowerControl>,
    target_groups: Arc<dyn TargetGroupControl>,
    start_note: String,
    dry_run: bool,
}

impl ResourceProcessor {
    pub fn new(
        config: &AutotermConfig,
        power: Arc<dyn PowerControl>,
        target_groups: Arc<dyn TargetGroupControl>,
    ) -> Self {
        Self {
            extractor: PolicyExtractor::new(&config.policies),
            evaluator: ScheduleEvaluator::new(),
            power,
            target_groups,
            start_note: config.fleet.start_note.clone(),
            dry_run: false,
        }
    }

    /// Decide actions without dispatching them.
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Evaluate and act on every policy of `resource` at `now`.
    pub async fn process(
        self: Arc<Self>,
        resource: Arc<ResourceState>,
        now: DateTime<Utc>,
    ) -> ResourceReport {
        if !tags::has_auto_tags(&resource.tags) {
            return ResourceReport::new(&resource, ResourceOutcome::Skipped);
        }

        let id = resource.id.as_str();
        let name = resource.display_name();
        info!(resource = %id, %name, state = %resource.power_state, "processing resource tags");

        if tags::flag(&resource.tags, tags::DISABLE_ALL) {
            info!(resource = %id, %name, disable_all = true, "finished processing resource");
            return ResourceReport::new(&resource, ResourceOutcome::DisabledAll);
        }

        let parsed = parse_target_groups(tags::target_groups(&resource.tags));
        for entry in &parsed.rejected {
            warn!(resource = %id, %name, %entry, "invalid target group definition, entry ignored");
        }
        if !resource.target_groups.is_empty() {
            debug!(
                resource = %id,
                registered = resource.target_groups.len(),
                "live target group memberships"
            );
        }
        let bindings: Arc<[TargetGroupBinding]> = parsed.bindings.into();

        let policies = self.extractor.extract(&resource.tags);
        let mut handles = Vec::with_capacity(policies.len());
        let mut guard = AbortOnDrop(Vec::with_capacity(policies.len()));
        for policy in policies {
            let index = policy.index;
            let this = Arc::clone(&self);
            let resource = Arc::clone(&resource);
            let bindings = Arc::clone(&bindings);
            let handle = tokio::spawn(async move {
                this.run_policy(&resource, &bindings, &policy, now).await
            });
            guard.0.push(handle.abort_handle());
            handles.push((index, handle));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (index, handle) in handles {
            match handle.await {
                Ok(report) => reports.push(report),
                Err(e) => {
                    error!(resource = %id, policy = index, error = %e, "policy task failed");
                    let mut report = PolicyReport::new(index);
                    report.error = Some(format!("policy task failed: {e}"));
                    reports.push(report);
                }
            }
        }

        info!(
            resource = %id,
            %name,
            disable_all = false,
            policies = reports.len(),
            "finished processing resource"
        );
        ResourceReport::new(&resource, ResourceOutcome::Processed(reports))
    }

    /// Decide and dispatch one policy.
    async fn run_policy(
        &self,
        resource: &ResourceState,
        bindings: &[TargetGroupBinding],
        policy: &Policy,
        now: DateTime<Utc>,
    ) -> PolicyReport {
        let mut report = PolicyReport::new(policy.index);
        let id = resource.id.as_str();

        if policy.disabled {
            debug!(resource = %id, policy = policy.index, "policy disabled");
            report.disabled = true;
            return report;
        }

        let suffix = self.extractor.suffix(policy.index);
        let decision = match evaluate_policy(&self.evaluator, policy, &suffix, now)
            .and_then(|matches| decide(resource.power_state, &matches, bindings))
        {
            Ok(d) => d,
            Err(e) => {
                warn!(
                    resource = %id,
                    name = %resource.display_name(),
                    policy = policy.index,
                    error = %e,
                    "policy skipped this cycle"
                );
                report.error = Some(e.to_string());
                return report;
            }
        };

        if decision.is_noop() {
            debug!(resource = %id, policy = policy.index, state = %resource.power_state, "nothing due");
            return report;
        }

        if self.dry_run {
            report.actions = decision
                .actions()
                .into_iter()
                .map(|action| ActionOutcome {
                    action,
                    status: ActionStatus::Planned,
                })
                .collect();
            return report;
        }

        let mut failed = false;
        for action in decision.actions() {
            let status = if failed {
                ActionStatus::Skipped
            } else {
                self.dispatch(resource, policy, &action).await
            };
            if matches!(status, ActionStatus::Failed(_)) {
                failed = true;
            }
            report.actions.push(ActionOutcome { action, status });
        }
        if failed {
            let skipped = report
                .actions
                .iter()
                .filter(|a| a.status == ActionStatus::Skipped)
                .count();
            if skipped > 0 {
                warn!(
                    resource = %id,
                    policy = policy.index,
                    skipped,
                    "remaining actions of the policy skipped after a failed dispatch"
                );
            }
        }
        report
    }

    /// Send one action to the provider. Failures are logged, never raised.
    async fn dispatch(&self, resource: &ResourceState, policy: &Policy, action: &Action) -> ActionStatus {
        let result = match action {
            Action::RegisterToTargetGroup(binding) | Action::DeregisterFromTargetGroup(binding) => {
                self.dispatch_target_group(resource, policy, action, binding).await
            }
            Action::Start | Action::Stop | Action::Terminate => {
                self.dispatch_power(resource, policy, action).await
            }
            Action::NoOp => Ok(ActionStatus::Applied),
        };

        match result {
            Ok(status) => status,
            Err(e) => {
                let s = &policy.schedules;
                error!(
                    resource = %resource.id,
                    name = %resource.display_name(),
                    policy = policy.index,
                    auto_on = s.on.as_deref().unwrap_or_default(),
                    auto_off = s.off.as_deref().unwrap_or_default(),
                    auto_kill = s.kill.as_deref().unwrap_or_default(),
                    error = %e,
                    "failed to apply scheduled action"
                );
                ActionStatus::Failed(e.to_string())
            }
        }
    }

    async fn dispatch_target_group(
        &self,
        resource: &ResourceState,
        policy: &Policy,
        action: &Action,
        binding: &TargetGroupBinding,
    ) -> Result<ActionStatus, EngineError> {
        let wrap = |source: ProviderError| EngineError::Dispatch {
            action: action.to_string(),
            source,
        };
        let id = resource.id.as_str();

        let group = match self.target_groups.lookup(&binding.name).await.map_err(wrap)? {
            Some(g) => g,
            None => {
                warn!(
                    resource = %id,
                    target_group = %binding.name,
                    "target group named in tags was not found"
                );
                return Ok(ActionStatus::TargetGroupNotFound);
            }
        };

        match action {
            Action::DeregisterFromTargetGroup(_) => {
                self.target_groups.deregister(&group, id).await.map_err(wrap)?;
                info!(
                    resource = %id,
                    target_group = %group.name,
                    policy = policy.index,
                    cron = policy.schedules.tgd.as_deref().unwrap_or_default(),
                    "deregistered from target group"
                );
            }
            _ => {
                self.target_groups
                    .register(&group, id, binding.port)
                    .await
                    .map_err(wrap)?;
                info!(
                    resource = %id,
                    target_group = %group.name,
                    port = binding.port,
                    policy = policy.index,
                    cron = policy.schedules.tgr.as_deref().unwrap_or_default(),
                    "registered in target group"
                );
            }
        }
        Ok(ActionStatus::Applied)
    }

    async fn dispatch_power(
        &self,
        resource: &ResourceState,
        policy: &Policy,
        action: &Action,
    ) -> Result<ActionStatus, EngineError> {
        let wrap = |source: ProviderError| EngineError::Dispatch {
            action: action.to_string(),
            source,
        };
        let id = resource.id.as_str();
        let name = resource.display_name();
        let s = &policy.schedules;

        let change = match action {
            Action::Stop => {
                let cron = s.off.as_deref().or(s.kill.as_deref()).unwrap_or_default();
                info!(resource = %id, %name, policy = policy.index, %cron, "stopping instance");
                self.power.stop(id).await.map_err(wrap)?
            }
            Action::Start => {
                let cron = s.on.as_deref().unwrap_or_default();
                let note = format!("{}, Cron: {}", self.start_note, cron);
                info!(resource = %id, %name, policy = policy.index, %cron, "starting instance");
                self.power.start(id, &note).await.map_err(wrap)?
            }
            _ => {
                let cron = s.kill.as_deref().unwrap_or_default();
                info!(resource = %id, %name, policy = policy.index, %cron, "terminating instance");
                self.power.terminate(id).await.map_err(wrap)?
            }
        };

        info!(
            resource = %id,
            %name,
            previous = %change.previous,
            current = %change.current,
            "instance state changed"
        );
        Ok(ActionStatus::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use autoterm_core::{
        PowerState, ProviderFuture, ProviderResult, StateChange, TagSet, TargetGroupHandle,
    };
    use chrono::TimeZone;

    /// Records every call; fails calls for ids listed in `fail` and calls
    /// whose operation is listed in `fail_ops`.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail: Vec<String>,
        fail_ops: Vec<&'static str>,
        missing_groups: Vec<String>,
    }

    impl Recorder {
        fn record(&self, call: String, id: &str) -> ProviderResult<()> {
            let op_fails = self.fail_ops.iter().any(|op| call.starts_with(op));
            self.calls.lock().unwrap().push(call);
            if op_fails || self.fail.iter().any(|f| f == id) {
                Err(ProviderError::Api("boom".to_string()))
            } else {
                Ok(())
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    fn change(previous: PowerState, current: PowerState) -> StateChange {
        StateChange { previous, current }
    }

    impl PowerControl for Recorder {
        fn stop<'a>(&'a self, id: &'a str) -> ProviderFuture<'a, StateChange> {
            let r = self.record(format!("stop {id}"), id);
            Box::pin(async move { r.map(|_| change(PowerState::Running, PowerState::Stopped)) })
        }

        fn start<'a>(&'a self, id: &'a str, note: &'a str) -> ProviderFuture<'a, StateChange> {
            let r = self.record(format!("start {id} ({note})"), id);
            Box::pin(async move { r.map(|_| change(PowerState::Stopped, PowerState::Running)) })
        }

        fn terminate<'a>(&'a self, id: &'a str) -> ProviderFuture<'a, StateChange> {
            let r = self.record(format!("terminate {id}"), id);
            Box::pin(async move { r.map(|_| change(PowerState::Stopped, PowerState::Terminated)) })
        }
    }

    impl TargetGroupControl for Recorder {
        fn lookup<'a>(&'a self, name: &'a str) -> ProviderFuture<'a, Option<TargetGroupHandle>> {
            let found = !self.missing_groups.iter().any(|m| m == name);
            Box::pin(async move {
                Ok(found.then(|| TargetGroupHandle {
                    name: name.to_string(),
                    arn: format!("arn:tg/{name}"),
                }))
            })
        }

        fn register<'a>(
            &'a self,
            group: &'a TargetGroupHandle,
            id: &'a str,
            port: u16,
        ) -> ProviderFuture<'a, ()> {
            let r = self.record(format!("register {id} {}:{port}", group.name), id);
            Box::pin(async move { r })
        }

        fn deregister<'a>(
            &'a self,
            group: &'a TargetGroupHandle,
            id: &'a str,
        ) -> ProviderFuture<'a, ()> {
            let r = self.record(format!("deregister {id} {}", group.name), id);
            Box::pin(async move { r })
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 18, 0, 0).unwrap()
    }

    fn resource(id: &str, state: PowerState, pairs: &[(&str, &str)]) -> Arc<ResourceState> {
        let tags: TagSet = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Arc::new(ResourceState {
            id: id.to_string(),
            power_state: state,
            tags,
            target_groups: vec![],
        })
    }

    fn processor(recorder: Arc<Recorder>) -> Arc<ResourceProcessor> {
        Arc::new(ResourceProcessor::new(
            &AutotermConfig::default(),
            recorder.clone(),
            recorder,
        ))
    }

    #[tokio::test]
    async fn resource_without_auto_tags_is_skipped() {
        let rec = Arc::new(Recorder::default());
        let res = resource("i-1", PowerState::Running, &[("Name", "db"), ("Off", "* * * * *")]);

        let report = processor(rec.clone()).process(res, now()).await;
        assert_eq!(report.outcome, ResourceOutcome::Skipped);
        assert!(rec.calls().is_empty());
    }

    #[tokio::test]
    async fn disable_all_short_circuits() {
        let rec = Arc::new(Recorder::default());
        let res = resource(
            "i-1",
            PowerState::Running,
            &[("Auto Off", "* * * * *"), ("Terminator Disable All", "TRUE")],
        );

        let report = processor(rec.clone()).process(res, now()).await;
        assert_eq!(report.outcome, ResourceOutcome::DisabledAll);
        assert!(rec.calls().is_empty());
    }

    #[tokio::test]
    async fn running_with_off_due_is_stopped() {
        let rec = Arc::new(Recorder::default());
        let res = resource("i-1", PowerState::Running, &[("Auto Off", "* * * * *")]);

        let report = processor(rec.clone()).process(res, now()).await;
        assert_eq!(rec.calls(), vec!["stop i-1".to_string()]);
        assert_eq!(report.policies().len(), 1);
        assert_eq!(
            report.policies()[0].actions,
            vec![ActionOutcome {
                action: Action::Stop,
                status: ActionStatus::Applied
            }]
        );
    }

    #[tokio::test]
    async fn start_carries_note_with_expression() {
        let rec = Arc::new(Recorder::default());
        let res = resource("i-1", PowerState::Stopped, &[("Auto On", "0 18 * * *")]);

        processor(rec.clone()).process(res, now()).await;
        assert_eq!(
            rec.calls(),
            vec!["start i-1 (autoterm Auto On, Cron: 0 18 * * *)".to_string()]
        );
    }

    #[tokio::test]
    async fn bad_policy_does_not_block_siblings() {
        let rec = Arc::new(Recorder::default());
        let res = resource(
            "i-1",
            PowerState::Running,
            &[
                ("Auto Off", "definitely not cron"),
                ("Auto On 2", "* * * * *"),
                ("Auto Off 2", "* * * * *"),
                ("Auto Kill 3", "* * * * *"),
            ],
        );

        let report = processor(rec.clone()).process(res, now()).await;
        let policies = report.policies();
        assert_eq!(policies.len(), 3);
        assert!(policies[0].error.as_deref().unwrap().contains("Auto Off"));
        assert!(policies[1].error.as_deref().unwrap().contains("conflict"));
        assert!(policies[0].actions.is_empty());
        assert!(policies[1].actions.is_empty());
        assert_eq!(policies[2].actions[0].action, Action::Stop);
        assert_eq!(rec.calls(), vec!["stop i-1".to_string()]);
    }

    #[tokio::test]
    async fn target_groups_are_dispatched_before_power() {
        let rec = Arc::new(Recorder::default());
        let res = resource(
            "i-1",
            PowerState::Running,
            &[
                ("Target Groups", "web:80,api:8080"),
                ("Auto TGD", "* * * * *"),
                ("Auto Off", "* * * * *"),
            ],
        );

        processor(rec.clone()).process(res, now()).await;
        assert_eq!(
            rec.calls(),
            vec![
                "deregister i-1 web".to_string(),
                "deregister i-1 api".to_string(),
                "stop i-1".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn missing_target_group_is_skipped() {
        let rec = Arc::new(Recorder {
            missing_groups: vec!["gone".to_string()],
            ..Default::default()
        });
        let res = resource(
            "i-1",
            PowerState::Running,
            &[("TG", "gone:80,web:443"), ("Auto TGR", "* * * * *")],
        );

        let report = processor(rec.clone()).process(res, now()).await;
        let statuses: Vec<&ActionStatus> = report.actions().map(|a| &a.status).collect();
        assert_eq!(
            statuses,
            vec![&ActionStatus::TargetGroupNotFound, &ActionStatus::Applied]
        );
        assert_eq!(rec.calls(), vec!["register i-1 web:443".to_string()]);
    }

    #[tokio::test]
    async fn dispatch_failure_is_reported_not_raised() {
        let rec = Arc::new(Recorder {
            fail: vec!["i-1".to_string()],
            ..Default::default()
        });
        let res = resource("i-1", PowerState::Stopped, &[("Auto Kill", "* * * * *")]);

        let report = processor(rec.clone()).process(res, now()).await;
        let outcome = report.actions().next().unwrap();
        assert_eq!(outcome.action, Action::Terminate);
        assert!(matches!(outcome.status, ActionStatus::Failed(_)));
    }

    #[tokio::test]
    async fn failed_deregister_skips_rest_of_policy() {
        let rec = Arc::new(Recorder {
            fail_ops: vec!["deregister"],
            ..Default::default()
        });
        let res = resource(
            "i-1",
            PowerState::Running,
            &[
                ("Target Groups", "web:80,api:8080"),
                ("Auto TGD", "* * * * *"),
                ("Auto Off", "* * * * *"),
            ],
        );

        let report = processor(rec.clone()).process(res, now()).await;

        assert_eq!(rec.calls(), vec!["deregister i-1 web".to_string()]);
        let statuses: Vec<&ActionStatus> = report.actions().map(|a| &a.status).collect();
        assert!(matches!(statuses[0], ActionStatus::Failed(_)));
        assert_eq!(statuses[1..], [&ActionStatus::Skipped, &ActionStatus::Skipped]);
        assert_eq!(report.actions().last().unwrap().action, Action::Stop);
    }

    #[tokio::test]
    async fn failed_policy_does_not_skip_sibling_policy() {
        let rec = Arc::new(Recorder {
            fail_ops: vec!["deregister"],
            ..Default::default()
        });
        let res = resource(
            "i-1",
            PowerState::Running,
            &[
                ("TG", "web:80"),
                ("Auto TGD", "* * * * *"),
                ("Auto Off 2", "* * * * *"),
            ],
        );

        let report = processor(rec.clone()).process(res, now()).await;

        let mut calls = rec.calls();
        calls.sort();
        assert_eq!(calls, vec!["deregister i-1 web".to_string(), "stop i-1".to_string()]);
        assert_eq!(report.policies()[1].actions[0].status, ActionStatus::Applied);
    }

    #[tokio::test]
    async fn dropping_the_resource_future_aborts_policy_tasks() {
        let rec = Arc::new(Recorder::default());
        let gate = Arc::new(tokio::sync::Notify::new());

        struct Gated {
            rec: Arc<Recorder>,
            gate: Arc<tokio::sync::Notify>,
        }

        impl PowerControl for Gated {
            fn stop<'a>(&'a self, id: &'a str) -> ProviderFuture<'a, StateChange> {
                Box::pin(async move {
                    self.gate.notified().await;
                    self.rec.record(format!("stop {id}"), id)?;
                    Ok(change(PowerState::Running, PowerState::Stopped))
                })
            }

            fn start<'a>(&'a self, id: &'a str, note: &'a str) -> ProviderFuture<'a, StateChange> {
                self.rec.start(id, note)
            }

            fn terminate<'a>(&'a self, id: &'a str) -> ProviderFuture<'a, StateChange> {
                self.rec.terminate(id)
            }
        }

        let processor = Arc::new(ResourceProcessor::new(
            &AutotermConfig::default(),
            Arc::new(Gated {
                rec: rec.clone(),
                gate: gate.clone(),
            }),
            rec.clone(),
        ));
        let res = resource("i-1", PowerState::Running, &[("Auto Off", "* * * * *")]);

        let pending = tokio::time::timeout(
            std::time::Duration::from_millis(20),
            processor.process(res, now()),
        )
        .await;
        assert!(pending.is_err());

        gate.notify_one();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert!(rec.calls().is_empty());
    }

    #[tokio::test]
    async fn dry_run_plans_without_dispatch() {
        let rec = Arc::new(Recorder::default());
        let processor = Arc::new(
            ResourceProcessor::new(&AutotermConfig::default(), rec.clone(), rec.clone())
                .with_dry_run(true),
        );
        let res = resource("i-1", PowerState::Stopped, &[("Auto On", "* * * * *")]);

        let report = processor.process(res, now()).await;
        assert!(rec.calls().is_empty());
        assert_eq!(
            report.actions().cloned().collect::<Vec<_>>(),
            vec![ActionOutcome {
                action: Action::Start,
                status: ActionStatus::Planned
            }]
        );
    }

    #[tokio::test]
    async fn disabled_policy_is_reported_but_inert() {
        let rec = Arc::new(Recorder::default());
        let res = resource(
            "i-1",
            PowerState::Running,
            &[("Auto Off 2", "* * * * *"), ("Terminator Disable 2", "yes")],
        );

        let report = processor(rec.clone()).process(res, now()).await;
        assert_eq!(report.policies().len(), 1);
        assert!(report.policies()[0].disabled);
        assert!(rec.calls().is_empty());
    }
}
