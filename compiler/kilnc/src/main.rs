//! Kiln CLI entry point.

use std::io::{IsTerminal, Write};
use std::path::Path;

use kiln_diagnostic::emitter::ColorMode;
use kiln_diagnostic::ErrorGuaranteed;
use kiln_metadata::CanonicalCache;
use kilnc::commands::{self, Streams};
use kilnc::{manifest, parse_options, tracing_setup, DriverError};

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let is_tty = stderr.is_terminal();
    let mut out = stdout.lock();
    let mut err = stderr.lock();
    let mut streams = Streams {
        out: &mut out,
        err: &mut err,
        color: ColorMode::Auto,
        is_tty,
    };

    let result = match command.as_str() {
        "check" | "plan" | "emit-ir" => {
            let (options, positional) = match parse_options(&args[2..]) {
                Ok(parsed) => parsed,
                Err(e) => {
                    eprintln!("error: {e}");
                    eprintln!("Run `kiln help` for usage.");
                    std::process::exit(1);
                }
            };
            let [path] = positional.as_slice() else {
                eprintln!("Usage: kiln {command} <manifest.json> [options]");
                std::process::exit(1);
            };
            let path = Path::new(path);

            let result = manifest::load(path).and_then(|mut program| {
                commands::apply_options(&mut program, &options);
                let cache = CanonicalCache::global();
                match command.as_str() {
                    "check" => commands::check(&program, &options, &mut streams),
                    "plan" => commands::plan(&program, &options, cache, &mut streams),
                    _ => commands::emit_ir(&program, &options, cache, &mut streams),
                }
            });
            match result {
                Ok(errors) => Ok(errors),
                Err(e) => commands::report_failure(path, e, &mut streams),
            }
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: kiln explain <ERROR_CODE>");
                eprintln!("Example: kiln explain E2003");
                std::process::exit(1);
            }
            commands::explain(&args[2], &mut streams).or_else(|e| match e {
                DriverError::Output(_) => Err(e),
                other => {
                    eprintln!("error: {other}");
                    Ok(1)
                }
            })
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(0)
        }
        "version" | "--version" | "-V" => {
            println!("Kiln {}", env!("CARGO_PKG_VERSION"));
            Ok(0)
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            Ok(1)
        }
    };

    // `exit` skips destructors, so flush what the commands wrote.
    let status = result.and_then(|errors| {
        out.flush().map_err(DriverError::Output)?;
        err.flush().map_err(DriverError::Output)?;
        Ok(errors)
    });
    match status {
        Ok(errors) => {
            if ErrorGuaranteed::from_error_count(errors).is_some() {
                std::process::exit(1);
            }
        }
        Err(e) => {
            // The streams themselves failed; only the log and status remain.
            tracing::error!(error = %e, "could not write output");
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("Kiln: conformance synthesis and generic metadata planning");
    println!();
    println!("Usage: kiln <command> [options]");
    println!();
    println!("Commands:");
    println!("  check <manifest.json>    Synthesize Encodable/Decodable conformances");
    println!("  plan <manifest.json>     Plan metadata records for the manifest's requests");
    println!("  emit-ir <manifest.json>  Print records and access sequences as IR text");
    println!("  explain <code>           Explain an error code (e.g. E2003)");
    println!("  help                     Show this help message");
    println!("  version                  Show version information");
    println!();
    println!("Options:");
    println!("  --target=<32|64>         Override the manifest's pointer width");
    println!("  --module=<name>          Plan as if requested from another module");
    println!("  --max-depth=<n>          Generic nesting limit (default 64)");
    println!("  --error-limit=<n>        Stop reporting after n errors (default 50, 0 = all)");
    println!("  --json                   Machine-readable output (check, plan)");
    println!();
    println!("Environment:");
    println!("  KILN_LOG=<filter>        Enable tracing, e.g. KILN_LOG=kiln_metadata=debug");
    println!("  KILN_LOG_TREE=1          Print tracing as indented span trees");
}
