//! Hierarchical (OSINT) execution model.

mod common;

use std::sync::Arc;

use osint_swarm::adapters::checkpoint::AutoAcceptCheckpoint;
use osint_swarm::adapters::runtime::MockRuntime;
use osint_swarm::domain::errors::DomainError;
use osint_swarm::domain::models::{
    ExecutionContext, ExecutionModel, InvestigationId, RunState, RunStateMachine, WorkerId,
    ACCOUNTS_FOUND,
};
use osint_swarm::domain::ports::{ManagerDecision, RequestKind, WorkerTurn};
use osint_swarm::services::{
    abort_pair, build_plan, AbortSignal, HierarchicalOrchestrator, InvestigationService,
    RunSettings,
};

use common::{invoke, osint, ScriptedManager};

fn scripted_service(
    runtime: &MockRuntime,
    manager: ScriptedManager,
    dir: &std::path::Path,
) -> InvestigationService {
    common::service(osint(), runtime, Arc::new(AutoAcceptCheckpoint), dir)
        .with_manager(Arc::new(manager))
}

#[tokio::test]
async fn test_rule_manager_covers_every_stage_in_agenda_order() {
    let dir = common::temp_dir();
    let runtime = MockRuntime::new();
    let svc = common::service(osint(), &runtime, Arc::new(AutoAcceptCheckpoint), dir.path());

    let outcome = svc
        .investigate("some_handle", AbortSignal::never())
        .await
        .unwrap();

    assert_eq!(runtime.stage_order().await, vec![0, 1, 3, 5, 2, 4, 6]);
    assert_eq!(outcome.result.model, ExecutionModel::Hierarchical);
    assert_eq!(outcome.result.covered_stages(), (0..7).collect::<Vec<_>>());
    assert_eq!(outcome.final_state, RunState::Completed);

    // Technical analysis is deferred and briefed for a bare handle
    let calls = runtime.calls().await;
    let technical = calls.iter().find(|c| c.stage_index == 2).unwrap();
    assert!(technical
        .instructions
        .as_deref()
        .unwrap()
        .starts_with("Brief pass:"));

    let path = outcome.report.unwrap();
    assert!(path
        .file_name()
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("investigation_"));
}

#[tokio::test]
async fn test_without_planning_agenda_follows_plan_order() {
    let dir = common::temp_dir();
    let runtime = MockRuntime::new();
    let svc = common::service(osint(), &runtime, Arc::new(AutoAcceptCheckpoint), dir.path())
        .with_settings(RunSettings {
            planning: false,
            ..common::settings(dir.path())
        });

    svc.investigate("some_handle", AbortSignal::never())
        .await
        .unwrap();

    assert_eq!(runtime.stage_order().await, (0..7).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_coverage_pass_runs_stages_the_manager_never_invoked() {
    let dir = common::temp_dir();
    let runtime = MockRuntime::new();
    let svc = scripted_service(&runtime, ScriptedManager::new([invoke(3)]), dir.path());

    let outcome = svc
        .investigate("some_handle", AbortSignal::never())
        .await
        .unwrap();

    assert_eq!(runtime.stage_order().await, vec![3, 0, 1, 2, 4, 5, 6]);
    assert_eq!(outcome.result.covered_stages().len(), 7);

    let calls = runtime.calls().await;
    assert!(calls[0].instructions.is_none());
    for call in &calls[1..] {
        assert!(call
            .instructions
            .as_deref()
            .unwrap()
            .starts_with("Coverage pass:"));
    }
}

#[tokio::test]
async fn test_manager_may_repeat_and_skip_stages() {
    let dir = common::temp_dir();
    let runtime = MockRuntime::new();
    let manager = ScriptedManager::new([
        invoke(2),
        ManagerDecision::Skip {
            stage_index: 0,
            reason: "nothing to analyze".to_string(),
        },
        ManagerDecision::Invoke {
            stage_index: 2,
            instructions: Some("dig into the mail server".to_string()),
        },
    ]);
    let svc = scripted_service(&runtime, manager, dir.path());

    let outcome = svc
        .investigate("some_handle", AbortSignal::never())
        .await
        .unwrap();

    // Skipped stage 0 is still attempted by the coverage pass
    assert_eq!(runtime.stage_order().await, vec![2, 2, 0, 1, 3, 4, 5, 6]);

    let records = &outcome.result.records;
    assert_eq!(records.len(), 8);
    assert_eq!(records[0].stage_index, 2);
    assert_eq!(records[1].stage_index, 2);

    let calls = runtime.calls().await;
    assert_eq!(calls[1].instructions.as_deref(), Some("dig into the mail server"));
    // The repeat sees the first output as background
    assert_eq!(calls[1].background, 1);
}

#[tokio::test]
async fn test_step_bound_stops_a_manager_that_never_finishes() {
    let dir = common::temp_dir();
    let runtime = MockRuntime::new();
    let svc = scripted_service(&runtime, ScriptedManager::stubborn(invoke(0)), dir.path());

    let outcome = svc
        .investigate("some_handle", AbortSignal::never())
        .await
        .unwrap();

    let order = runtime.stage_order().await;
    // 3 steps per stage, then the coverage pass
    assert_eq!(order.iter().filter(|&&i| i == 0).count(), 21);
    assert_eq!(&order[21..], &[1, 2, 3, 4, 5, 6]);
    assert_eq!(outcome.final_state, RunState::Completed);
}

#[tokio::test]
async fn test_unknown_stage_index_is_ignored() {
    let dir = common::temp_dir();
    let runtime = MockRuntime::new();
    let svc = scripted_service(&runtime, ScriptedManager::new([invoke(42)]), dir.path());

    let outcome = svc
        .investigate("some_handle", AbortSignal::never())
        .await
        .unwrap();

    assert_eq!(runtime.stage_order().await, (0..7).collect::<Vec<_>>());
    assert_eq!(outcome.result.records.len(), 7);
}

fn consult(to: &str, n: usize) -> WorkerTurn {
    WorkerTurn::Delegate {
        to: WorkerId::from(to),
        question: format!("question {n}"),
        draft: format!("{ACCOUNTS_FOUND}: draft {n}"),
    }
}

#[tokio::test]
async fn test_consultations_are_capped_within_one_invocation() {
    let dir = common::temp_dir();
    let runtime = MockRuntime::new();
    runtime
        .script(
            "lead_analyst",
            0,
            vec![
                consult("social_expert", 1),
                consult("technical_analyst", 2),
                consult("behavior_analyst", 3),
                consult("context_analyst", 4),
            ],
        )
        .await;
    let svc = scripted_service(&runtime, ScriptedManager::new([invoke(0)]), dir.path());

    let outcome = svc
        .investigate("some_handle", AbortSignal::never())
        .await
        .unwrap();

    let calls = runtime.calls().await;
    let stage_zero: Vec<_> = calls.iter().take(7).collect();
    let sub_questions = stage_zero
        .iter()
        .filter(|c| matches!(c.kind, RequestKind::SubQuestion { .. }))
        .count();
    assert_eq!(sub_questions, 3);
    assert_eq!(stage_zero[6].delegated, 3);
    assert_eq!(outcome.result.records[0].output, format!("{ACCOUNTS_FOUND}: draft 4"));
}

#[tokio::test]
async fn test_depth_zero_forces_draft_without_consulting() {
    let dir = common::temp_dir();
    let runtime = MockRuntime::new();
    runtime
        .script("lead_analyst", 0, vec![consult("social_expert", 1)])
        .await;
    let svc = scripted_service(&runtime, ScriptedManager::new([invoke(0)]), dir.path())
        .with_settings(RunSettings {
            max_delegation_depth: 0,
            ..common::settings(dir.path())
        });

    let outcome = svc
        .investigate("some_handle", AbortSignal::never())
        .await
        .unwrap();

    let calls = runtime.calls().await;
    assert!(calls
        .iter()
        .all(|c| matches!(c.kind, RequestKind::Stage)));
    assert_eq!(outcome.result.records[0].output, format!("{ACCOUNTS_FOUND}: draft 1"));
}

#[tokio::test]
async fn test_runtime_failure_becomes_a_gap_not_an_error() {
    let dir = common::temp_dir();
    let runtime = MockRuntime::new();
    runtime.fail_worker("technical_analyst").await;
    let svc = common::service(osint(), &runtime, Arc::new(AutoAcceptCheckpoint), dir.path());

    let outcome = svc
        .investigate("some_handle", AbortSignal::never())
        .await
        .unwrap();

    let technical = outcome
        .result
        .records
        .iter()
        .find(|r| r.stage_index == 2)
        .unwrap();
    assert!(technical.output.contains("Gaps:"));
    assert!(technical.output.contains("No data found"));
    assert_eq!(outcome.result.records.len(), 7);
}

#[tokio::test]
async fn test_abort_before_run_fails_machine() {
    let profile = osint();
    let runtime = MockRuntime::new();
    let plan = build_plan(&profile, "some_handle").unwrap();
    let (handle, signal) = abort_pair();
    handle.abort();
    let runner = common::runner(profile, &runtime, Arc::new(AutoAcceptCheckpoint), signal);
    let mut machine = RunStateMachine::new();

    let err = HierarchicalOrchestrator::new(runner, Arc::new(ScriptedManager::default()), true)
        .run(
            &plan,
            ExecutionContext::new(InvestigationId::new("inv"), "some_handle"),
            &mut machine,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Cancelled));
    assert!(matches!(machine.current(), RunState::Failed { .. }));
    assert!(runtime.calls().await.is_empty());
}
