//! The tyin binary: parse one source file, infer types, print the
//! result in the requested format. Exit code 0 on success, 1 when the
//! file does not parse.

mod args;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tyin_common::LineMap;
use tyin_infer::InferOptions;

fn main() -> ExitCode {
    let args = args::CliArgs::parse();
    init_tracing();
    if args.no_color {
        colored::control::set_override(false);
    }

    match run(&args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{} {error:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TYIN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &args::CliArgs) -> anyhow::Result<ExitCode> {
    let filename = args.file.display().to_string();
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {filename}"))?;

    let parsed = tyin_parser::parse(&source);
    if parsed.diagnostics.iter().any(|d| d.is_error()) {
        let line_map = LineMap::build(&source);
        for diagnostic in &parsed.diagnostics {
            let position = line_map.position(diagnostic.span.start, &source);
            eprintln!(
                "{} {}:{}:{} {}",
                "parse error:".red().bold(),
                filename,
                position.line + 1,
                position.column + 1,
                diagnostic.message_text
            );
        }
        return Ok(ExitCode::FAILURE);
    }

    let mut options = InferOptions::default();
    if let Some(max_iterations) = args.max_iterations {
        options.max_iterations = max_iterations;
    }
    let result = tyin_infer::infer(&parsed.program, &source, &filename, &options);

    let rendered = tyin_emit::format_result(&result, args.format.into(), &source, &filename);
    print!("{rendered}");
    Ok(ExitCode::SUCCESS)
}
