mod repl;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use engine::{Engine, EngineSettings};
use repl::{HELP, Input, parse_line, render_event, render_snapshot};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();

    let settings = match load_settings(std::env::args().skip(1)) {
        Ok(settings) => settings,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    match run(settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "terminal I/O failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init();
}

fn load_settings(mut args: impl Iterator<Item = String>) -> Result<EngineSettings, String> {
    let mut config = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = args.next().ok_or("--config requires a path")?;
                config = Some(PathBuf::from(path));
            }
            "--help" | "-h" => {
                return Err(format!("usage: cutplan [--config <settings.json>]\n\n{HELP}"));
            }
            other => return Err(format!("unexpected argument: {other}")),
        }
    }

    match config {
        Some(path) => EngineSettings::load(&path).map_err(|error| error.to_string()),
        None => Ok(EngineSettings::default()),
    }
}

fn run(settings: EngineSettings) -> io::Result<()> {
    let mut engine = Engine::from_settings(settings.clone());
    info!(quick_commands = settings.quick_commands, "engine ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    write!(stdout, "> ")?;
    stdout.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(Input::Quit)) => break,
            Ok(Some(Input::Help)) => writeln!(stdout, "{HELP}")?,
            Ok(Some(Input::Show)) => {
                writeln!(stdout, "{}", render_snapshot(&engine.snapshot(), &settings))?
            }
            Ok(Some(Input::Engine(command))) => match engine.handle_command(command) {
                Ok(events) => {
                    for event in &events {
                        writeln!(stdout, "{}", render_event(event, &settings))?;
                    }
                }
                Err(err) => writeln!(stdout, "error: {err}")?,
            },
            Err(message) => writeln!(stdout, "error: {message}")?,
        }
        write!(stdout, "> ")?;
        stdout.flush()?;
    }

    let snapshot = engine.snapshot();
    let json = serde_json::to_string_pretty(&snapshot).map_err(io::Error::other)?;
    writeln!(stdout, "\n{json}")?;
    Ok(())
}
