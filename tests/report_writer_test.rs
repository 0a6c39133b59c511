//! Report file writing.

mod common;

use osint_swarm::domain::errors::ReportWriteError;
use osint_swarm::domain::models::{
    ExecutionContext, ExecutionModel, InvestigationId, InvestigationResult, Profile, StageOutput,
};
use osint_swarm::services::{build_plan, ReportWriter};

fn result_for(target: &str) -> InvestigationResult {
    let profile = Profile::darknet().unwrap();
    let plan = build_plan(&profile, target).unwrap();
    let mut ctx = ExecutionContext::new(InvestigationId::new("darknet_test"), target);
    for stage in plan.stages() {
        ctx.record(StageOutput::new(
            stage,
            format!("Accounts found: section {}", stage.index),
            1,
        ));
    }
    ctx.into_result(ExecutionModel::Sequential)
}

#[tokio::test]
async fn test_report_starts_with_header_and_names_target() {
    let dir = common::temp_dir();
    let profile = Profile::darknet().unwrap();
    let writer = ReportWriter::new(dir.path().join("nested/results"), profile.report.clone());

    let path = writer
        .write_report("alice", &result_for("alice"))
        .await
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let first = content.lines().find(|l| !l.trim().is_empty()).unwrap();
    assert_eq!(first, "Darknet Investigation Report");
    assert!(content.contains("Target: alice"));
    assert!(content.contains("Accounts found: section 4"));

    let name = path.file_name().unwrap().to_str().unwrap();
    let stamp = name
        .strip_prefix("darknet_investigation_")
        .and_then(|s| s.strip_suffix(".txt"))
        .unwrap();
    assert_eq!(stamp.len(), "YYYYMMDD_HHMMSS".len());
    assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y%m%d_%H%M%S").is_ok());
}

#[tokio::test]
async fn test_writes_within_one_second_may_share_a_path() {
    let dir = common::temp_dir();
    let profile = Profile::osint().unwrap();
    let writer = ReportWriter::new(dir.path(), profile.report.clone());

    let first = writer.write_report("first", &result_for("first")).await.unwrap();
    let second = writer
        .write_report("second", &result_for("second"))
        .await
        .unwrap();

    let content = std::fs::read_to_string(&second).unwrap();
    assert!(content.starts_with("OSINT Investigation Report"));
    assert!(content.contains("Target: second"));
    if first == second {
        assert!(!content.contains("Target: first"));
        assert_eq!(common::report_files(dir.path(), "investigation_").len(), 1);
    } else {
        assert_eq!(common::report_files(dir.path(), "investigation_").len(), 2);
    }
}

#[tokio::test]
async fn test_unwritable_directory_reports_error() {
    let dir = common::temp_dir();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let writer = ReportWriter::new(&blocker, Profile::darknet().unwrap().report);

    let err = writer
        .write_report("alice", &result_for("alice"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReportWriteError::CreateDir { .. }));
}
