// tests/pipeline_exec.rs

mod common;
use crate::common::builders::PipelineBuilder;
use crate::common::init_tracing;
use crate::common::recording_runner::{Invocation, RecordingRunner};

use groupwatch::pipeline::{Context, PipelineError, Scalar, TemplateError};

fn inv(program: &str, args: &[&str]) -> Invocation {
    Invocation {
        program: program.to_string(),
        args: args.iter().map(|a| a.to_string()).collect(),
    }
}

fn seed() -> Context {
    let mut ctx = Context::new();
    ctx.insert("Id".to_string(), "npp_d1".into());
    ctx
}

#[tokio::test]
async fn step_redefinition_of_existing_key_leaks_but_new_keys_do_not() {
    init_tracing();

    let pipeline = PipelineBuilder::new()
        .var("X", Scalar::Integer(1))
        .step(
            "first",
            &[("X", Scalar::Integer(2)), ("Y", Scalar::Integer(9))],
            "s1 ((X)) ((Y))",
        )
        .step("second", &[], "s2 ((X))")
        .build();
    let runner = RecordingRunner::new();

    let mut ctx = seed();
    pipeline.exec(&mut ctx, &runner).await.unwrap();

    assert_eq!(
        runner.invocations(),
        vec![inv("s1", &["2", "9"]), inv("s2", &["2"])]
    );
    assert_eq!(ctx.get("X"), Some(&Scalar::Integer(2)));
    assert!(!ctx.contains_key("Y"));
}

#[tokio::test]
async fn step_only_keys_are_invisible_to_later_steps() {
    init_tracing();

    let pipeline = PipelineBuilder::new()
        .step("first", &[("Y", Scalar::Integer(9))], "s1 ((Y))")
        .step("second", &[], "s2 ((Y))")
        .build();
    let runner = RecordingRunner::new();

    let mut ctx = seed();
    let err = pipeline.exec(&mut ctx, &runner).await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Template(TemplateError::MissingVariable { ref name, .. }) if name == "Y"
    ));
    assert_eq!(runner.programs(), vec!["s1".to_string()]);
}

#[tokio::test]
async fn seed_keys_redefined_by_a_step_change_for_later_steps() {
    let pipeline = PipelineBuilder::new()
        .step("rename", &[("Id", "((Id))-retry".into())], "a ((Id))")
        .command("b ((Id))")
        .build();
    let runner = RecordingRunner::new();

    let mut ctx = seed();
    pipeline.exec(&mut ctx, &runner).await.unwrap();

    assert_eq!(
        runner.invocations(),
        vec![inv("a", &["npp_d1-retry"]), inv("b", &["npp_d1-retry"])]
    );
}

#[tokio::test]
async fn pipeline_variables_see_seed_and_earlier_variables() {
    let pipeline = PipelineBuilder::new()
        .var("Out", "/output/((Id))")
        .var("Log", "((Out))/run.log")
        .var("Level", "3")
        .command("fit --out ((Out)) --log ((Log)) --level ((Level))")
        .build();
    let runner = RecordingRunner::new();

    let mut ctx = seed();
    pipeline.exec(&mut ctx, &runner).await.unwrap();

    assert_eq!(
        runner.invocations(),
        vec![inv(
            "fit",
            &["--out", "/output/npp_d1", "--log", "/output/npp_d1/run.log", "--level", "3"]
        )]
    );
    assert_eq!(ctx.get("Level"), Some(&Scalar::Integer(3)));
}

#[tokio::test]
async fn step_local_variables_see_earlier_local_variables() {
    let pipeline = PipelineBuilder::new()
        .step(
            "chain",
            &[("A", "((Id))-a".into()), ("B", "((A))-b".into())],
            "echo ((B))",
        )
        .build();
    let runner = RecordingRunner::new();

    let mut ctx = seed();
    pipeline.exec(&mut ctx, &runner).await.unwrap();

    assert_eq!(runner.invocations(), vec![inv("echo", &["npp_d1-a-b"])]);
    assert!(!ctx.contains_key("A"));
}

#[tokio::test]
async fn halts_on_first_failing_step() {
    init_tracing();

    let pipeline = PipelineBuilder::new()
        .command("s1")
        .command("s2 --fail")
        .command("s3")
        .build();
    let runner = RecordingRunner::new();
    runner.respond("s2", 3, "partial output", "boom");

    let mut ctx = seed();
    let err = pipeline.exec(&mut ctx, &runner).await.unwrap_err();

    assert_eq!(runner.programs(), vec!["s1".to_string(), "s2".to_string()]);
    match err {
        PipelineError::CommandFailed {
            step,
            program,
            code,
            output,
        } => {
            assert_eq!(step, "step-2");
            assert_eq!(program, "s2");
            assert_eq!(code, Some(3));
            assert_eq!(output, "partial output\nboom");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn spawn_failure_aborts_the_run() {
    let pipeline = PipelineBuilder::new()
        .command("missing-tool ((Id))")
        .command("after")
        .build();
    let runner = RecordingRunner::new();
    runner.missing("missing-tool");

    let mut ctx = seed();
    let err = pipeline.exec(&mut ctx, &runner).await.unwrap_err();

    assert!(matches!(err, PipelineError::Spawn { ref program, .. } if program == "missing-tool"));
    assert_eq!(runner.programs(), vec!["missing-tool".to_string()]);
}

#[tokio::test]
async fn empty_rendered_command_is_an_error() {
    let pipeline = PipelineBuilder::new()
        .var("Nothing", "")
        .command("((Nothing))")
        .build();
    let runner = RecordingRunner::new();

    let mut ctx = seed();
    let err = pipeline.exec(&mut ctx, &runner).await.unwrap_err();

    assert!(matches!(err, PipelineError::EmptyCommand { ref step } if step == "step-1"));
    assert!(runner.invocations().is_empty());
}

#[tokio::test]
async fn failing_pipeline_variable_runs_no_steps() {
    let pipeline = PipelineBuilder::new()
        .var("Out", "((Missing))/x")
        .command("s1")
        .build();
    let runner = RecordingRunner::new();

    let mut ctx = seed();
    let err = pipeline.exec(&mut ctx, &runner).await.unwrap_err();

    assert!(matches!(err, PipelineError::Template(_)));
    assert!(runner.invocations().is_empty());
}

#[test]
fn bare_steps_are_named_by_position() {
    let pipeline = PipelineBuilder::new()
        .command("a")
        .step("named", &[], "b")
        .command("c")
        .build();
    let names: Vec<_> = pipeline.steps().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["step-1", "named", "step-3"]);
}

#[test]
fn eval_variables_returns_local_context_and_updates_shared_keys() {
    let pipeline = PipelineBuilder::new()
        .step(
            "s",
            &[("Id", "changed".into()), ("Local", Scalar::Bool(true))],
            "x",
        )
        .build();
    let step = &pipeline.steps()[0];

    let mut shared = seed();
    let local = step.eval_variables(&mut shared).unwrap();

    assert_eq!(shared.get("Id"), Some(&Scalar::String("changed".to_string())));
    assert!(!shared.contains_key("Local"));
    assert_eq!(local.get("Local"), Some(&Scalar::Bool(true)));
    assert_eq!(local.get("Id"), Some(&Scalar::String("changed".to_string())));
}
