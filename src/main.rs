mod debug_report;

use chrono::{DateTime, NaiveDateTime, Utc};
use flextime::{Context, FlexTime, Preset, inspect};
use std::io::{self, IsTerminal, Read};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "FLEXTIME_LOG";

fn main() {
    init_tracing();

    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let mut ctx = Context::default();
    if let Some(reference_time) = config.reference_time {
        ctx.reference_time = reference_time;
    }
    let opts = config.preset.options();

    let started = Instant::now();
    let outcome = inspect(&config.input, &ctx).and_then(|inference| {
        let value = FlexTime::with_options(config.input.trim(), &ctx, &opts)?;
        Ok(debug_report::Report { tag: inference.tag, value, preset: config.preset, elapsed: started.elapsed() })
    });

    match outcome {
        Ok(report) => debug_report::print_run(&config.input, &report, config.color),
        Err(err) => {
            debug_report::print_failure(&config.input, &err, config.color);
            std::process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

struct CliConfig {
    input: String,
    reference_time: Option<DateTime<Utc>>,
    preset: Preset,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut reference_time = None;
    let mut preset = Preset::default();
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1).peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("flextime {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--reference" => {
                let value = args.next().ok_or_else(|| "error: --reference expects a value".to_string())?;
                reference_time = Some(parse_reference(&value)?);
            }
            "--preset" => {
                let value = args.next().ok_or_else(|| "error: --preset expects a value".to_string())?;
                preset = parse_preset(&value)?;
            }
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.trim().is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--reference=") => {
                reference_time = Some(parse_reference(arg.trim_start_matches("--reference="))?);
            }
            _ if arg.starts_with("--preset=") => {
                preset = parse_preset(arg.trim_start_matches("--preset="))?;
            }
            _ if arg.starts_with("--input=") => {
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(arg.trim_start_matches("--input=").to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let input = match input {
        Some(value) => value,
        None => read_stdin_input()?,
    };

    if input.trim().is_empty() {
        return Err(format!("error: no input provided\n\n{}", help_text()));
    }

    Ok(CliConfig { input, reference_time, preset, color })
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn parse_reference(value: &str) -> Result<DateTime<Utc>, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| format!("error: invalid --reference '{value}' (expected YYYY-MM-DDTHH:MM:SS)"))
}

fn parse_preset(value: &str) -> Result<Preset, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "components" => Ok(Preset::Components),
        "minimal" | "short" => Ok(Preset::Minimal),
        "full" | "iso" => Ok(Preset::Full),
        "flex" | "mask" => Ok(Preset::Flex),
        _ => Err(format!("error: invalid --preset '{value}' (expected components, minimal, full or flex)")),
    }
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    format!(
        "flextime {version}

Inspect how a date/time string is read: canonical format, instant,
precision mask and every rendering.

Usage:
  flextime [OPTIONS] [--] <input...>
  flextime [OPTIONS] --input <text>

Options:
  -i, --input <text>         Input text to read. If omitted, reads remaining args
                             or stdin when no args are provided.
  --reference <timestamp>    Reference time (UTC) for relative phrases, in
                             YYYY-MM-DDTHH:MM:SS. Default: now.
  --preset <name>            components, minimal, full or flex. Default: flex.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  {log_env}               tracing filter (e.g. debug). Default: warn.

Exit codes:
  0  Success.
  1  Input could not be read as a date/time.
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        log_env = LOG_ENV,
    )
}
