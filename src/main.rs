use std::process::ExitCode;

use clap::Parser;

use fastq_subset::report::{write_html_report, write_json_report};
use fastq_subset::{run, Cli, InputSource, OutputPaths, Result};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match subset(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn subset(cli: &Cli) -> Result<()> {
    let config = cli.to_config()?;
    let outputs = OutputPaths::new(cli.out1(), cli.out2());

    let report = run(
        &config,
        &InputSource::from_path(&cli.read1),
        &InputSource::from_path(&cli.read2),
        &outputs,
    )?;

    if let Some(path) = &cli.json {
        write_json_report(path, &report)?;
    }
    if let Some(path) = &cli.html {
        write_html_report(path, &report)?;
    }

    println!(
        "Kept {} of {} read pairs: {}, {}",
        report.selected_pairs,
        report.total_pairs,
        outputs.out1.display(),
        outputs.out2.display()
    );
    Ok(())
}
