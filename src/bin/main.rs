use clap::{Arg, Command};
use log::error;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Debug)]
enum AppError {
    MissingInput,
    ConversionError(String),
}

/// Verbosity level for output
#[derive(Debug, Clone, Copy, PartialEq)]
enum Verbosity {
    Quiet,   // No output except errors
    Normal,  // Standard output
    Verbose, // Detailed output
}

fn build_command() -> Command {
    Command::new("mdpress")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Markdown study notes to styled PDF documents")
        .after_help(
            "EXAMPLES:\n  \
            mdpress learning-guide.md\n  \
            mdpress learning-guide.md my-guide.pdf\n  \
            mdpress notes.md -q\n",
        )
        .arg(
            Arg::new("input")
                .value_name("MARKDOWN_FILE")
                .help("Path to the Markdown file to convert"),
        )
        .arg(
            Arg::new("output")
                .value_name("OUTPUT_PDF")
                .help("Path to the output PDF (defaults to the input name with a .pdf extension)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Show detailed output including the resolved output path")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("quiet"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress all output except errors")
                .action(clap::ArgAction::SetTrue)
                .conflicts_with("verbose"),
        )
}

fn run(matches: clap::ArgMatches) -> Result<(), AppError> {
    // Determine verbosity level
    let verbosity = if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    };

    let input = matches
        .get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or(AppError::MissingInput)?;
    let output = matches.get_one::<String>("output").map(PathBuf::from);

    if verbosity != Verbosity::Quiet {
        println!();
        println!("{}", "=".repeat(60));
        println!("Markdown to PDF converter - styled for study notes");
        println!("{}", "=".repeat(60));
        println!();
        println!("Reading: {}", input.display());
        if verbosity == Verbosity::Verbose {
            let target = output
                .clone()
                .unwrap_or_else(|| mdpress::default_output_path(&input));
            println!("Output target: {}", target.display());
        }
        println!("Converting Markdown and rendering PDF...");
    }

    let written = mdpress::convert_file(&input, output.as_deref())
        .map_err(|e| AppError::ConversionError(e.to_string()))?;

    if verbosity != Verbosity::Quiet {
        println!();
        println!("{}", "=".repeat(60));
        println!("✓ PDF generated: {}", written.display());
        println!("{}", "=".repeat(60));

        if let Ok(metadata) = fs::metadata(&written) {
            let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
            println!("File size: {:.2} MB", size_mb);
        }
    }

    Ok(())
}

fn main() {
    // Initialize logger with environment variable control (RUST_LOG)
    env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .init();

    let mut cmd = build_command();
    let matches = cmd.clone().get_matches();

    if !matches.contains_id("input") {
        cmd.print_help().unwrap();
        println!();
        process::exit(1);
    }

    if let Err(e) = run(matches) {
        match e {
            AppError::MissingInput => error!("[X] No input file provided"),
            AppError::ConversionError(message) => error!("[X] Conversion error: {}", message),
        }
        println!();
        println!("✗ PDF generation failed");
        process::exit(1);
    }
}
