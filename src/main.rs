use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use jack_analyzer::analyzer::{compile_file, write_outputs, Analyzer};
use jack_analyzer::AnalyzeError;

/// Writes the parse tree of each Jack source file as nested XML tags.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// A .jack file, or a directory whose .jack files are all analyzed
    path: PathBuf,

    /// Also write the flat token listing as <Name>T.xml
    #[arg(short, long)]
    tokens: bool,

    /// Write outputs here instead of next to each source file
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Print outputs instead of writing files
    #[arg(long, conflicts_with = "out_dir")]
    stdout: bool,

    /// Report each file written and a summary of the batch
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<ExitCode, Box<dyn Error>> {
    let args = Args::parse();

    let analyzer = match Analyzer::new(&args.path) {
        Ok(analyzer) => analyzer,
        Err(err) => {
            eprintln!("error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    if let Some(dir) = &args.out_dir {
        fs::create_dir_all(dir)?;
    }

    // A failing file is reported and skipped; the rest of the batch still runs.
    let mut failures = 0;
    for input in analyzer.inputs() {
        if let Err(err) = analyze(input, &args) {
            eprintln!("error: {}", err);
            failures += 1;
        }
    }

    if args.verbose {
        eprintln!(
            "{} of {} file(s) analyzed",
            analyzer.inputs().len() - failures,
            analyzer.inputs().len()
        );
    }

    if failures == 0 {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn analyze(input: &Path, args: &Args) -> Result<(), AnalyzeError> {
    let compiled = compile_file(input, args.tokens)?;

    if args.stdout {
        let mut stdout = io::stdout().lock();
        let contents = compiled.tokens.iter().chain([&compiled.tree]);
        for text in contents {
            stdout
                .write_all(text.as_bytes())
                .map_err(|source| AnalyzeError::Io {
                    path: input.to_path_buf(),
                    source,
                })?;
        }
        return Ok(());
    }

    for path in write_outputs(input, &compiled, args.out_dir.as_deref())? {
        if args.verbose {
            eprintln!("wrote {}", path.display());
        }
    }
    Ok(())
}
