//! # Folio CLI
//!
//! Usage:
//!   folio request.json -o output.pdf
//!   echo '{ ... }' | folio -o output.pdf
//!   folio --report report.json -o report.pdf
//!   folio --example > request.json
//!   folio --fonts

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Lay out a JSON document request as a PDF.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about)]
struct Args {
    /// Request file; reads stdin when omitted.
    input: Option<PathBuf>,

    /// Where to write the PDF.
    #[arg(short, long, default_value = "output.pdf")]
    output: PathBuf,

    /// Treat the input as a report template instead of a document request.
    #[arg(long)]
    report: bool,

    /// Print a sample document request and exit.
    #[arg(long)]
    example: bool,

    /// List the font families a request may name and exit.
    #[arg(long)]
    fonts: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    if args.example {
        print!("{}", folio::request::example_request_json());
        return ExitCode::SUCCESS;
    }
    if args.fonts {
        print!("{}", font_list());
        return ExitCode::SUCCESS;
    }

    let input = match read_input(args.input.as_ref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("✗ Failed to read input: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rendered = if args.report {
        folio::render_report_json(&input)
    } else {
        folio::render_json(&input)
    };

    match rendered {
        Ok(pdf_bytes) => match fs::write(&args.output, &pdf_bytes) {
            Ok(()) => {
                eprintln!(
                    "✓ Written {} bytes to {}",
                    pdf_bytes.len(),
                    args.output.display()
                );
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("✗ Failed to write {}: {e}", args.output.display());
                ExitCode::FAILURE
            }
        },
        Err(e) => {
            eprintln!("✗ {e}");
            ExitCode::FAILURE
        }
    }
}

fn font_list() -> String {
    folio::layout::LayoutEngine::new()
        .available_fonts()
        .iter()
        .map(|name| format!("{name}\n"))
        .collect()
}

fn read_input(path: Option<&PathBuf>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fonts_flag_parses_without_input() {
        let args = Args::try_parse_from(["folio", "--fonts"]).unwrap();
        assert!(args.fonts);
        assert!(args.input.is_none());
    }

    #[test]
    fn font_list_has_one_family_per_line() {
        let list = font_list();
        let names: Vec<&str> = list.lines().collect();
        assert!(names.contains(&"helvetica"));
        assert!(names.contains(&"times"));
        assert!(names.contains(&"courier"));
    }
}
