//! WARDEN command-line front end.
//!
//! Checks a single tool call or a whole plan file against the rule tables
//! (and the semantic checker, when enabled) without running anything.
//!
//! Usage:
//!   warden check delete_path --args '{"path": "C:\\Windows"}'
//!   warden plan plan.json --request "tidy up the build folder"
//!   warden --config warden.toml rules
//!
//! Exit status: 0 approved, 2 rejected or corrected, 1 on usage or
//! configuration errors.

mod document;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use warden_contracts::{
    error::{WardenError, WardenResult},
    verdict::{PlanOutcome, PlanVerdict, ValidationVerdict},
};

use settings::Settings;

// ── CLI definition ────────────────────────────────────────────────────────────

/// WARDEN: validate agent tool calls before they run.
#[derive(Parser, Debug)]
#[command(
    name = "warden",
    about = "Validate assistant tool calls and plans before execution",
    long_about = "Runs proposed actions through the static rule engine and, when\n\
                  enabled, the semantic checker. Nothing is ever executed."
)]
struct Cli {
    /// TOML file with [rules], [risk] and [semantic] sections.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print verdicts as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a single action.
    Check {
        /// Tool name, e.g. write_file.
        action: String,
        /// Arguments as a JSON object.
        #[arg(long, default_value = "{}", value_parser = parse_arguments)]
        args: Map<String, Value>,
        /// The user request the action is meant to serve.
        #[arg(long, default_value = "")]
        request: String,
    },
    /// Validate a plan file.
    Plan {
        /// JSON plan document.
        file: PathBuf,
        #[arg(long, default_value = "")]
        request: String,
    },
    /// Print the effective rule tables, risk profile and semantic settings.
    Rules,
}

fn parse_arguments(raw: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err("arguments must be a JSON object".to_string()),
        Err(e) => Err(format!("invalid JSON: {e}")),
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    // Set RUST_LOG=debug to see every rule evaluation.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS };
            // Nothing sensible is left to do if stderr itself is gone.
            let _ = e.print();
            return code;
        }
    };

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("warden: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Exit status for a verdict that did or did not approve everything.
fn verdict_code(approved: bool) -> u8 {
    if approved {
        0
    } else {
        2
    }
}

fn run(cli: &Cli) -> WardenResult<u8> {
    let settings = Settings::load(cli.config.as_deref())?;

    match &cli.command {
        Command::Check { action, args, request } => {
            let verdict = settings.build_validator().validate(action, args, request);
            if cli.json {
                println!("{}", to_json(&verdict)?);
            } else {
                print!("{}", render_action(action, &verdict));
            }
            Ok(verdict_code(verdict.approved))
        }
        Command::Plan { file, request } => {
            let plan = document::load_plan(file)?;
            let verdict = settings.build_validator().validate_plan(&plan, request);
            if cli.json {
                println!("{}", to_json(&verdict)?);
            } else {
                print!("{}", render_plan(&verdict));
            }
            Ok(verdict_code(verdict.outcome() == PlanOutcome::Approved))
        }
        Command::Rules => {
            if cli.json {
                println!("{}", to_json(&settings)?);
            } else {
                print!("{}", settings.to_toml()?);
            }
            Ok(0)
        }
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn to_json<T: serde::Serialize>(value: &T) -> WardenResult<String> {
    serde_json::to_string_pretty(value).map_err(|e| WardenError::ConfigError {
        reason: format!("failed to render JSON: {}", e),
    })
}

fn render_action(action: &str, verdict: &ValidationVerdict) -> String {
    let mut out = if verdict.approved {
        format!("APPROVED {action}\n")
    } else {
        format!("REJECTED {action}: {}\n", verdict.reason_str())
    };
    for warning in &verdict.warnings {
        out.push_str(&format!("  warning: {warning}\n"));
    }
    out
}

fn render_plan(verdict: &PlanVerdict) -> String {
    let label = match verdict.outcome() {
        PlanOutcome::Approved => "APPROVED",
        PlanOutcome::PartiallyApproved => "CORRECTED",
        PlanOutcome::Rejected => "REJECTED",
    };
    let mut out = format!("{label}\n{}\n", verdict.feedback);

    if verdict.outcome() == PlanOutcome::PartiallyApproved {
        if let Some(plan) = verdict.executable_plan() {
            out.push_str("\nExecutable steps:\n");
            for step in &plan.steps {
                out.push_str(&format!("  - {} {}\n", step.name, Value::Object(step.arguments.clone())));
            }
        }
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use warden_contracts::{
        action::{Action, Plan},
        verdict::BlockedStep,
    };

    use super::*;

    #[test]
    fn check_parses_arguments_and_globals() {
        let cli = Cli::try_parse_from([
            "warden",
            "check",
            "delete_path",
            "--args",
            r#"{"path": "build"}"#,
            "--json",
        ])
        .unwrap();

        assert!(cli.json);
        match cli.command {
            Command::Check { action, args, request } => {
                assert_eq!(action, "delete_path");
                assert_eq!(args.get("path"), Some(&json!("build")));
                assert!(request.is_empty());
            }
            other => panic!("expected check, got {other:?}"),
        }
    }

    #[test]
    fn non_object_arguments_are_a_usage_error() {
        for raw in ["[1]", "not json"] {
            let result = Cli::try_parse_from(["warden", "check", "read_file", "--args", raw]);
            assert!(result.is_err(), "{raw} should be refused");
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["warden", "rules", "--config", "w.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("w.toml")));
    }

    #[test]
    fn action_rendering() {
        let approved = render_action("git_push", &ValidationVerdict::approve(vec!["pushing to primary branch 'main'".into()]));
        let rejected = render_action("delete_path", &ValidationVerdict::reject("protected"));

        assert_eq!(approved, "APPROVED git_push\n  warning: pushing to primary branch 'main'\n");
        assert_eq!(rejected, "REJECTED delete_path: protected\n");
    }

    #[test]
    fn corrected_plan_rendering_lists_executable_steps() {
        let verdict = PlanVerdict {
            approved: false,
            corrected_plan: Some(Plan::new(
                vec![Action::new("read_file", json!({ "filename": "a.txt" }))],
                "inspect",
            )),
            blocked_steps: vec![BlockedStep {
                step_index: 2,
                action_name: "delete_path".into(),
                reason: "protected".into(),
            }],
            warnings: vec![],
            feedback: "Plan partially rejected".into(),
        };

        let out = render_plan(&verdict);

        assert!(out.starts_with("CORRECTED\nPlan partially rejected\n"));
        assert!(out.contains("  - read_file {\"filename\":\"a.txt\"}"));
    }

    #[test]
    fn end_to_end_plan_file_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let clean = dir.path().join("clean.json");
        let empty = dir.path().join("empty.json");
        std::fs::write(&clean, r#"{"steps":[{"action":"list_files","args":{"path":"src"}}]}"#).unwrap();
        std::fs::write(&empty, r#"{"summary":"nothing"}"#).unwrap();

        let run_file = |path: &std::path::Path| {
            let cli = Cli::try_parse_from(["warden", "--json", "plan", path.to_str().unwrap()]).unwrap();
            run(&cli).unwrap()
        };

        assert_eq!(run_file(&clean), 0);
        assert_eq!(run_file(&empty), 2);
    }
}
