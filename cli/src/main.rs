//! pdfmark CLI - PDF to Markdown conversion tool

mod friendly;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfmark::config::LoggingConfig;
use pdfmark::{Config, ConversionReport, Error, Pdfmark, DEFAULT_CACHE_DIR, DEFAULT_OUTPUT_DIR};

use friendly::{explain, Friendly};

#[derive(Parser)]
#[command(name = "pdfmark")]
#[command(version)]
#[command(about = "Convert PDF documents to clean Markdown", long_about = None)]
#[command(after_help = "Examples:
  pdfmark document.pdf              Convert a single PDF
  pdfmark --all                     Convert all PDFs in input/pdfs/
  pdfmark --preset simple doc.pdf   Use the simple preset")]
struct Cli {
    /// PDF file to convert
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// PDF file to convert (alternative to the positional argument)
    #[arg(long, value_name = "FILE", conflicts_with = "input")]
    pdf: Option<PathBuf>,

    /// Convert every PDF in the input directory
    #[arg(long)]
    all: bool,

    /// Directory searched by --all
    #[arg(long, value_name = "DIR", default_value = "input/pdfs")]
    input_dir: PathBuf,

    /// Output directory for Markdown files
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Directory for cached extractions
    #[arg(long, value_name = "DIR", default_value = DEFAULT_CACHE_DIR)]
    cache_dir: PathBuf,

    /// Always extract, ignoring cached results
    #[arg(long)]
    no_cache: bool,

    /// Configuration file
    #[arg(short, long, value_name = "PATH", default_value = "config.yaml")]
    config: PathBuf,

    /// Use a preset instead of the configuration file
    #[arg(long, value_name = "NAME", conflicts_with = "config")]
    preset: Option<String>,

    /// Only show errors
    #[arg(short, long)]
    quiet: bool,

    /// Show available presets and exit
    #[arg(long)]
    list_presets: bool,
}

fn main() {
    let cli = Cli::parse();

    if cli.list_presets {
        print_presets();
        return;
    }

    if !cli.quiet {
        println!("\n{}\n", "pdfmark".blue().bold());
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(explain(&e, &cli.config)),
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }

    let mut pdfmark = match Pdfmark::new(config) {
        Ok(p) => p.with_output_dir(&cli.output).with_cache_dir(&cli.cache_dir),
        Err(e) => fail(explain(&e, &cli.config)),
    };
    if cli.no_cache {
        pdfmark = pdfmark.without_cache();
    }

    let single = cli.input.as_ref().or(cli.pdf.as_ref());
    if cli.all && single.is_some() {
        log::warn!("--all ignored because a file was given");
    }

    let ok = match single {
        Some(path) => {
            check_input(path);
            cmd_file(&pdfmark, path, cli.quiet)
        }
        None => {
            // --all and no arguments both convert the whole input directory
            cmd_all(&pdfmark, &cli.input_dir, cli.quiet)
        }
    };

    if !ok {
        process::exit(1);
    }
}

fn load_config(cli: &Cli) -> pdfmark::Result<Config> {
    match &cli.preset {
        Some(name) => {
            let config = pdfmark::get_preset(name)?;
            if !cli.quiet {
                println!("Using preset: {}\n", name.cyan());
            }
            Ok(config)
        }
        None => Config::load(&cli.config),
    }
}

/// Install env_logger with the configured level, unless `RUST_LOG` is set.
fn init_logging(logging: &LoggingConfig) -> pdfmark::Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(logging.level_filter()?);
    builder.parse_default_env();

    if let Some(file) = &logging.file {
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        let target = File::options().create(true).append(true).open(file)?;
        builder.target(env_logger::Target::Pipe(Box::new(target)));
    }

    builder
        .try_init()
        .map_err(|e| Error::Other(format!("logger already initialized: {}", e)))
}

fn check_input(path: &Path) {
    if !path.exists() {
        fail(Friendly {
            message: format!("Could not find PDF file: {}", path.display()),
            hint: Some("Please check that the file path is correct.".to_string()),
        });
    }
    let is_pdf_name = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if !is_pdf_name {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        fail(Friendly {
            message: format!("'{}' doesn't appear to be a PDF file.", name),
            hint: Some("Make sure the file has a .pdf extension.".to_string()),
        });
    }
}

fn cmd_file(pdfmark: &Pdfmark, path: &Path, quiet: bool) -> bool {
    let spinner = if quiet {
        ProgressBar::hidden()
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    };
    spinner.set_message(format!("Processing: {}", file_name(path)));

    let result = pdfmark.convert_file(path);
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            if !quiet {
                print_report(&report);
            }
            true
        }
        Err(e) => {
            print_friendly(&explain(&e, path));
            false
        }
    }
}

fn cmd_all(pdfmark: &Pdfmark, dir: &Path, quiet: bool) -> bool {
    let files = match pdfmark::pdf_files(dir) {
        Ok(files) => files,
        Err(e) => {
            print_friendly(&explain(&e, dir));
            return false;
        }
    };

    if !quiet {
        println!("Found {} PDF(s) to process\n", files.len());
    }

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    let mut converted: Vec<ConversionReport> = Vec::new();
    let mut failed = 0usize;

    for path in &files {
        pb.set_message(file_name(path));
        match pdfmark.convert_file(path) {
            Ok(report) => {
                if !quiet {
                    pb.suspend(|| print_report(&report));
                }
                converted.push(report);
            }
            Err(e) => {
                failed += 1;
                log::error!("Failed to process {}: {}", path.display(), e);
                pb.suspend(|| print_friendly(&explain(&e, path)));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    if let Err(e) = pdfmark.finish_batch(&converted) {
        print_friendly(&explain(&e, pdfmark.output_dir()));
        failed += 1;
    }

    if !quiet {
        println!("{}", "=".repeat(40).blue());
        println!("{}", "Summary:".bold());
        println!(
            "{}",
            format!("  Successfully processed: {}", converted.len()).green()
        );
        if failed > 0 {
            println!("{}", format!("  Failed: {}", failed).red());
        }
        println!(
            "{}",
            format!("\nOutput saved to: {}", pdfmark.output_dir().display()).cyan()
        );
    }

    failed == 0
}

fn print_report(report: &ConversionReport) {
    println!("  {}", file_name(&report.source));
    if report.from_cache {
        println!("    {}", "Using cached data".cyan());
    }
    println!("    {}", format!("Extracted {} pages", report.pages).green());
    if report.tables > 0 {
        println!("    {}", format!("Found {} tables", report.tables).green());
    }
    if let Some(main) = report.outputs.first() {
        println!("    {} {}", "Saved to:".green(), main.display());
    }
    if report.outputs.len() > 1 {
        println!(
            "    {}",
            format!("Split into {} parts", report.outputs.len() - 1).dimmed()
        );
    }
}

fn print_presets() {
    println!("\n{}\n", "Available Presets:".bold());
    for (name, description) in pdfmark::list_presets() {
        println!("  {}", name.cyan().bold());
        println!("    {}\n", description);
    }
}

fn print_friendly(friendly: &Friendly) {
    eprintln!("{} {}", "Error:".red().bold(), friendly.message);
    if let Some(hint) = &friendly.hint {
        eprintln!("{} {}", "Hint:".yellow(), hint);
    }
}

fn fail(friendly: Friendly) -> ! {
    print_friendly(&friendly);
    process::exit(1);
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
