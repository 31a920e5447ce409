use std::env;
use std::fs;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use natmath::banner;
use natmath::engine::{Failure, Pipeline, Success};
use natmath::history::History;
use natmath::types::{AngleMode, RawInput};

const NATMATH_VERSION: &str = env!("CARGO_PKG_VERSION");
const NATMATH_ABOUT: &str =
    "natmath CLI – strict math evaluation with natural-language fallback.";

fn print_version() {
    println!("natmath version {}", NATMATH_VERSION);
}

fn print_about() {
    println!("{}", NATMATH_ABOUT);
}

fn print_help() {
    println!(
        r#"
natmath help

Expressions:
────────────────────────────────
2 + 3 * 4                      → Operators + - * / ^ (2^3^2 = 2^(3^2))
sqrt(16), exp(1)               → Functions sin cos tan log log10 ln exp sqrt
log(100)                       → Base 10 with one argument
log(100, 2)                    → Explicit base
ln(e), 2pi                     → Constants pi and e, implicit multiplication
sin(30 deg), cos(pi / 3 rad)   → Explicit angle units

Words:
────────────────────────────────
what is 2 + 2?                 → Filler words are stripped locally
five plus five                 → Sent to the remote normalizer (when configured)

Interactive commands:
────────────────────────────────
deg / rad                      → Switch angle mode for bare trig arguments
history                        → Show the last 20 results, newest first
history clear                  → Forget them
help, version, about, exit

Run:
────────────────────────────────
natmath [--deg] [--local]            → Interactive mode
natmath [--deg] [--local] calc.txt   → One expression per line (# and // comments)
natmath-server                       → REST API: POST /api/eval

Environment:
────────────────────────────────
NATMATH_AI_KEY / OPENAI_API_KEY → Enables the remote normalizer
NATMATH_AI_MODEL, NATMATH_AI_ENDPOINT, NATMATH_AI_TIMEOUT_SECS
RUST_LOG=debug                  → Pipeline tracing on stderr
"#
    );
}

fn report_success(done: &Success) {
    println!("= {}", done.result);
    if let Some(normalized) = &done.normalized {
        println!("  (read as: {normalized})");
    }
}

fn report_failure(failure: &Failure) {
    eprintln!("Error: {}", failure.error);
    if let Some(normalized) = &failure.normalized {
        eprintln!("  (read as: {normalized})");
    }
}

async fn run_script(path: &str, pipeline: &Pipeline, mode: AngleMode) -> Result<()> {
    let contents = fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    println!("Running script: {path}");

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            continue;
        }
        let input = match RawInput::new(line, mode) {
            Ok(input) => input,
            Err(_) => continue,
        };
        match pipeline.run(&input).await {
            Ok(done) => println!("{line} = {}", done.result),
            Err(failure) => eprintln!("Error: {line}: {failure}"),
        }
    }

    println!("Script finished.");
    Ok(())
}

async fn run_interactive(pipeline: &Pipeline, mut mode: AngleMode) -> Result<()> {
    let mut history = History::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("Enter an expression or a question (angle mode {mode}, `help` for more):");
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let trimmed = line.trim();

        match trimmed {
            "" => continue,
            "exit" | "quit" => {
                println!("Exiting...");
                break;
            }
            "help" => {
                print_help();
                continue;
            }
            "version" | "--version" | "-v" => {
                print_version();
                continue;
            }
            "about" | "--about" => {
                print_about();
                continue;
            }
            "deg" | "rad" => {
                mode = if trimmed == "deg" {
                    AngleMode::Deg
                } else {
                    AngleMode::Rad
                };
                println!("Angle mode: {mode}");
                continue;
            }
            "history clear" => {
                history.clear();
                println!("History cleared.");
                continue;
            }
            "history" => {
                if history.is_empty() {
                    println!("(no history)");
                }
                for (i, entry) in history.iter().enumerate() {
                    println!("{:>2}. {} = {}", i + 1, entry.input, entry.output);
                }
                continue;
            }
            _ => {}
        }

        let input = match RawInput::new(trimmed, mode) {
            Ok(input) => input,
            Err(_) => continue,
        };
        match pipeline.run(&input).await {
            Ok(done) => {
                report_success(&done);
                history.record(trimmed, done.result.to_string());
            }
            Err(failure) => report_failure(&failure),
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    natmath::logging::init("warn");

    let mut mode = AngleMode::Rad;
    let mut force_local = false;
    let mut script: Option<String> = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "help" | "--help" | "-h" => {
                banner::print_banner();
                print_help();
                return Ok(());
            }
            "--version" | "-v" => {
                print_version();
                return Ok(());
            }
            "--about" => {
                print_about();
                return Ok(());
            }
            "--deg" => mode = AngleMode::Deg,
            "--local" => force_local = true,
            _ => script = Some(arg),
        }
    }

    let pipeline = Pipeline::from_env(force_local);

    match script {
        Some(path) => run_script(&path, &pipeline, mode).await,
        None => {
            banner::print_banner();
            run_interactive(&pipeline, mode).await
        }
    }
}
