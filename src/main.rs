//! mailprint – command-line email → PDF / groff converter.
//!
//! Usage:
//!   mailprint [message.eml] --header-font F --header-bold-font F --content-font F
//!   mailprint [message.eml] --format mom | preconv | groff -mom -Tpdf
//!
//! The message is read from stdin when no file is given, and the output goes
//! to stdout unless `--output` is set.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};

use mailprint::parse::parse_message;
use mailprint::{compute_layout, generate_pdf, render_script, FontPaths, RenderOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Self-contained PDF
    Pdf,
    /// groff mom script, to be formatted with `groff -mom -Tpdf`
    Mom,
    /// JSON page layout (debugging)
    Layout,
}

#[derive(Parser)]
#[command(name = "mailprint", version, about = "Render an email as a printable document")]
struct Cli {
    /// Message file (RFC 5322); stdin if omitted
    #[arg(value_name = "MESSAGE")]
    input: Option<PathBuf>,

    /// Output file; stdout if omitted
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pdf)]
    format: OutputFormat,

    /// Page format (A4 or Letter)
    #[arg(long, default_value = "A4")]
    page_format: String,

    /// Hide the Cc header
    #[arg(long)]
    no_cc: bool,

    /// Avatar image placed in the top-right corner
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// Regular header font file
    #[arg(long, value_name = "TTF")]
    header_font: Option<PathBuf>,

    /// Bold header font file
    #[arg(long, value_name = "TTF")]
    header_bold_font: Option<PathBuf>,

    /// Body font file
    #[arg(long, value_name = "TTF")]
    content_font: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let raw = match &cli.input {
        Some(path) => {
            fs::read(path).map_err(|e| format!("reading '{}': {e}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| format!("reading stdin: {e}"))?;
            buf
        }
    };

    let mut email = parse_message(&raw).map_err(|e| format!("parsing mail: {e}"))?;
    if cli.no_cc {
        email.cc.clear();
    }

    let mut opts = RenderOptions {
        page_format: cli.page_format.clone(),
        logo_path: cli.logo.clone(),
        ..RenderOptions::default()
    };

    let bytes = match cli.format {
        OutputFormat::Mom => {
            let mut buf = Vec::new();
            render_script(&email, &opts, &mut buf).map_err(|e| e.to_string())?;
            buf
        }
        OutputFormat::Pdf | OutputFormat::Layout => {
            opts.font_paths = font_paths(&cli)?;
            if cli.format == OutputFormat::Pdf {
                generate_pdf(&email, &opts).map_err(|e| e.to_string())?
            } else {
                let layout = compute_layout(&email, &opts).map_err(|e| e.to_string())?;
                layout.to_json().into_bytes()
            }
        }
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &bytes).map_err(|e| format!("writing '{}': {e}", path.display()))?;
            log::info!("Wrote '{}' ({} bytes)", path.display(), bytes.len());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .map_err(|e| format!("writing stdout: {e}"))?;
        }
    }
    Ok(())
}

fn font_paths(cli: &Cli) -> Result<FontPaths, String> {
    let require = |path: &Option<PathBuf>, flag: &str| {
        path.clone()
            .ok_or_else(|| format!("--{flag} is required for {:?} output", cli.format))
    };
    Ok(FontPaths {
        header: require(&cli.header_font, "header-font")?,
        header_bold: require(&cli.header_bold_font, "header-bold-font")?,
        content: require(&cli.content_font, "content-font")?,
    })
}
