use ast2dot::cli::Args;
use ast2dot::{config, filter};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    ast2dot::telemetry::init_tracing();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(2)
        }
    }
}

fn run() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    if args.list {
        list_filters();
        return Ok(ExitCode::SUCCESS);
    }

    let (Some(input), Some(output)) = (args.input.as_deref(), args.output.as_deref()) else {
        anyhow::bail!("both INPUT and OUTPUT are required");
    };

    let start_dir = input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let loaded_cfg = config::load_config(args.config.as_deref(), start_dir)?;

    // Config-file defaults come first so CLI tokens read as the later word;
    // enabling a filter twice is idempotent anyway.
    let mut tokens: Vec<String> = Vec::new();
    if let Some((_path, cfg)) = &loaded_cfg {
        tokens.extend(cfg.filters.default.iter().cloned());
    }
    tokens.extend(args.format.iter().cloned());

    ast2dot::run_conversion(input, output, &tokens)?;
    Ok(ExitCode::SUCCESS)
}

fn list_filters() {
    for descriptor in filter::FILTERS {
        let note = if descriptor.deprecated {
            " (deprecated)"
        } else {
            ""
        };
        println!("{}\t{}{}", descriptor.token, descriptor.description, note);
    }
}
