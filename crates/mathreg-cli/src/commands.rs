use std::io::{self, Read};
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use mathreg_sdk::{
    ElementBuffer, MathObject, PublicCode, Rejected, SdkError, Session, SessionConfig,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::cli::*;
use crate::script::{parse_line, Op};

const DEMO_SCRIPT: &str = "\
# bind one object of each kind
scalar pi 3.14
vector v 1 2 3
matrix m 2 2 1 0 0 1
alias m identity
list
show pi
# unbinding leaves the other names alone
remove pi
remove m
show identity
list
";

pub fn load_config(path: Option<&Path>) -> anyhow::Result<SessionConfig> {
    match path {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(SessionConfig::default()),
    }
}

pub fn run_command(cli: Cli, config: SessionConfig) -> anyhow::Result<()> {
    match cli.command {
        Command::Run(args) => cmd_run(args, config, cli.format),
        Command::Demo(_) => cmd_demo(config, cli.format),
    }
}

fn cmd_run(args: RunArgs, config: SessionConfig, format: OutputFormat) -> anyhow::Result<()> {
    let source = if args.script == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("reading script from stdin")?;
        text
    } else {
        std::fs::read_to_string(&args.script)
            .with_context(|| format!("reading script {}", args.script))?
    };
    execute_script(&source, config, format)
}

fn cmd_demo(config: SessionConfig, format: OutputFormat) -> anyhow::Result<()> {
    if format == OutputFormat::Text {
        println!("{}", "Running built-in demo".bold());
    }
    execute_script(DEMO_SCRIPT, config, format)
}

// ---------------------------------------------------------------------------
// Script execution
// ---------------------------------------------------------------------------

/// The result of one script line.
#[derive(Debug, Serialize)]
struct Outcome {
    line: usize,
    command: String,
    code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<Value>,
}

/// A failed line: the public code plus a message.
#[derive(Debug)]
struct Failure {
    code: PublicCode,
    message: String,
}

impl From<SdkError> for Failure {
    fn from(err: SdkError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<Rejected> for Failure {
    fn from(rejected: Rejected) -> Self {
        rejected.into_error().into()
    }
}

fn execute_script(source: &str, config: SessionConfig, format: OutputFormat) -> anyhow::Result<()> {
    let mut session = Session::with_config(config).context("starting session")?;
    let outcomes = run_lines(&mut session, source);
    let released = session.shutdown().context("shutting down session")?;
    let failed = outcomes.iter().filter(|o| o.code != 0).count();

    match format {
        OutputFormat::Json => {
            let report = json!({
                "outcomes": outcomes,
                "failed": failed,
                "released": released,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            for outcome in &outcomes {
                print_outcome(outcome);
            }
            println!(
                "{} {} commands, {} failed, {} objects released",
                if failed == 0 { "✓".green().bold() } else { "✗".red().bold() },
                outcomes.len(),
                failed,
                released
            );
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} commands failed", outcomes.len());
    }
    Ok(())
}

/// Run every line against `session`, continuing past failures.
fn run_lines(session: &mut Session, source: &str) -> Vec<Outcome> {
    let mut outcomes = Vec::new();
    for (idx, text) in source.lines().enumerate() {
        let line = idx + 1;
        let op = match parse_line(text) {
            Ok(Some(op)) => op,
            Ok(None) => continue,
            Err(err) => {
                outcomes.push(Outcome {
                    line,
                    command: text.trim().to_string(),
                    code: PublicCode::InvalidInput.as_i32(),
                    error: Some(format!("{err:#}")),
                    output: None,
                });
                continue;
            }
        };
        let command = op.keyword().to_string();
        tracing::debug!(line, command = %command, "executing");
        let outcome = match execute(session, op) {
            Ok(output) => Outcome {
                line,
                command,
                code: PublicCode::Success.as_i32(),
                error: None,
                output,
            },
            Err(failure) => Outcome {
                line,
                command,
                code: failure.code.as_i32(),
                error: Some(failure.message),
                output: None,
            },
        };
        outcomes.push(outcome);
    }
    outcomes
}

fn execute(session: &mut Session, op: Op) -> Result<Option<Value>, Failure> {
    match op {
        Op::Scalar { name, value } => session.create_bind_scalar(value, &name)?,
        Op::Vector { name, values } => {
            session.create_bind_vector(ElementBuffer::from_f64s(&values), &name)?
        }
        Op::Matrix {
            name,
            rows,
            cols,
            values,
        } => session.create_bind_matrix(ElementBuffer::from_f64s(&values), rows, cols, &name)?,
        Op::Alias { existing, alias } => session.bind_alias(&existing, &alias)?,
        Op::Remove { name } => session.remove_binding(&name)?,
        Op::Show { name } => return show(session, &name).map(Some),
        Op::List => return Ok(Some(serde_json::to_value(session.bindings()).unwrap_or_default())),
    }
    Ok(None)
}

fn show(session: &Session, name: &str) -> Result<Value, Failure> {
    let Some(object) = session.value(name) else {
        return Err(Failure {
            code: PublicCode::InvalidInput,
            message: format!("name not bound: {name}"),
        });
    };
    let values = match object {
        MathObject::Scalar(s) => Some(vec![s.value()]),
        other => other.elements().and_then(ElementBuffer::as_f64s),
    };
    Ok(json!({
        "name": name,
        "kind": object.kind(),
        "shape": object.shape(),
        "refcount": session.refcount(name),
        "summary": object.to_string(),
        "values": values,
    }))
}

fn print_outcome(outcome: &Outcome) {
    let location = format!("line {}", outcome.line).dimmed();
    if let Some(error) = &outcome.error {
        println!(
            "{} {} {}: {} (code {})",
            "✗".red().bold(),
            location,
            outcome.command.yellow(),
            error,
            outcome.code
        );
        return;
    }
    match (outcome.command.as_str(), &outcome.output) {
        ("show", Some(value)) => {
            println!(
                "{} {} = {} (refs={})",
                location,
                value["name"].as_str().unwrap_or_default().bold(),
                value["summary"].as_str().unwrap_or_default(),
                value["refcount"]
            );
            if let Some(values) = value["values"].as_array() {
                let rendered: Vec<String> = values.iter().map(Value::to_string).collect();
                println!("    [{}]", rendered.join(", "));
            }
        }
        ("list", Some(Value::Array(bindings))) => {
            println!("{} {} binding(s)", location, bindings.len());
            for b in bindings {
                println!(
                    "    {} -> {} (type={}, refs={})",
                    b["name"].as_str().unwrap_or_default().bold(),
                    handle_label(&b["handle"]),
                    b["kind"].as_str().unwrap_or_default().cyan(),
                    b["refcount"]
                );
            }
        }
        (command, _) => println!("{} {} {}", "✓".green(), location, command),
    }
}

fn handle_label(handle: &Value) -> String {
    format!("obj#{}.{}", handle["slot"], handle["generation"])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::with_config(SessionConfig::default()).unwrap()
    }

    #[test]
    fn demo_script_runs_clean() {
        let mut s = session();
        let outcomes = run_lines(&mut s, DEMO_SCRIPT);
        assert!(outcomes.iter().all(|o| o.code == 0), "{outcomes:?}");
        assert_eq!(s.shutdown().unwrap(), 3);
    }

    #[test]
    fn failures_carry_line_and_code_and_run_continues() {
        let mut s = session();
        let script = "scalar x 1\nmatrix m 3 2 1 2 3 4 5 6 7 8\nbogus\nremove nope\nscalar y 2\n";
        let outcomes = run_lines(&mut s, script);
        let codes: Vec<(usize, i32)> = outcomes.iter().map(|o| (o.line, o.code)).collect();
        assert_eq!(codes, vec![(1, 0), (2, 2), (3, 1), (4, 1), (5, 0)]);
        assert!(s.lookup("y").is_some());
    }

    #[test]
    fn show_reports_values_and_refs() {
        let mut s = session();
        run_lines(&mut s, "vector v 1 2\nalias v w\n");
        let value = show(&s, "w").unwrap();
        assert_eq!(value["kind"], "Vector");
        assert_eq!(value["refcount"], 3);
        assert_eq!(value["values"], json!([1.0, 2.0]));
        assert_eq!(value["shape"], json!([1, 2]));
    }

    #[test]
    fn show_unbound_is_invalid_input() {
        let s = session();
        let failure = show(&s, "missing").unwrap_err();
        assert_eq!(failure.code, PublicCode::InvalidInput);
    }

    #[test]
    fn list_serializes_bindings() {
        let mut s = session();
        let outcomes = run_lines(&mut s, "scalar a 1\nlist\n");
        let listed = outcomes[1].output.as_ref().unwrap();
        assert_eq!(listed[0]["name"], "a");
        assert_eq!(listed[0]["refcount"], 2);
        assert_eq!(handle_label(&listed[0]["handle"]), "obj#0.0");
    }

    #[test]
    fn missing_config_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(dir.path().join("absent.toml").as_path())).is_err());
        assert_eq!(load_config(None).unwrap(), SessionConfig::default());
    }
}
