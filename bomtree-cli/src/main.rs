//! bomtree CLI - resolve PDM BOM exports from the command line.

use bomtree::export::{self, default_export_name};
use bomtree::views::{drawing_list, part_summary, shipset_requirements};
use bomtree::{BomCore, BomError, ResolveOptions, ResolvedBom};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bomtree")]
#[command(about = "Hierarchical BOM resolver for flat PDM exports", long_about = None)]
#[command(version)]
struct Cli {
    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an export into an indented assembly tree
    Resolve {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Summarize quantities per part number
    Parts {
        #[command(flatten)]
        input: InputArgs,

        /// Scale quantities to this many shipsets
        #[arg(long, value_name = "N")]
        shipsets: Option<u64>,
    },

    /// List unique drawing numbers
    Drawings {
        #[command(flatten)]
        input: InputArgs,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Path to the PDM BOM export (.csv, UTF-8 or UTF-16)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "human")]
    format: OutputFormat,

    /// Write to this file, or into this directory under the default export name
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Configuration name that means "use the file name alone"
    #[arg(long, value_name = "TOKEN", default_value = "NOCONFIG")]
    no_config_token: String,

    /// Treat every row as top-level when the export has no Level column
    #[arg(long)]
    allow_missing_level: bool,
}

impl InputArgs {
    fn options(&self) -> ResolveOptions {
        ResolveOptions {
            no_config_token: self.no_config_token.clone(),
            require_level_column: !self.allow_missing_level,
            ..ResolveOptions::default()
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
    /// CSV table
    Csv,
}

impl OutputFormat {
    fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Human => "txt",
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Resolve { input } => handle_resolve(&input),
        Commands::Parts { input, shipsets } => handle_parts(&input, shipsets),
        Commands::Drawings { input } => handle_drawings(&input),
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "bomtree=debug,bomtree_cli=debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load(input: &InputArgs) -> Result<ResolvedBom, BomError> {
    BomCore::resolve_csv(&input.file, &input.options())
}

/// Stdout, a named file, or a default-named file inside a directory.
fn open_output(input: &InputArgs) -> Result<Box<dyn Write>, BomError> {
    let Some(output) = &input.output else {
        return Ok(Box::new(io::stdout()));
    };
    let path = if output.is_dir() {
        output.join(default_export_name(&input.file, input.format.extension())?)
    } else {
        output.clone()
    };
    tracing::info!("Writing {}", path.display());
    Ok(Box::new(BufWriter::new(File::create(&path)?)))
}

fn handle_resolve(input: &InputArgs) -> Result<(), BomError> {
    let bom = load(input)?;
    let mut out = open_output(input)?;
    match input.format {
        OutputFormat::Human => output_tree(&mut out, &bom, &input.file)?,
        OutputFormat::Json => export::write_bom_json(&mut out, &bom)?,
        OutputFormat::Csv => export::write_bom_csv(&mut out, &bom)?,
    }
    out.flush()?;
    Ok(())
}

fn handle_parts(input: &InputArgs, shipsets: Option<u64>) -> Result<(), BomError> {
    let bom = load(input)?;
    let mut out = open_output(input)?;

    if let Some(shipsets) = shipsets {
        let requirements = shipset_requirements(&bom, shipsets)?;
        match input.format {
            OutputFormat::Human => {
                writeln!(out, "\nShipset requirements: {} x {}", shipsets, top_name(&bom))?;
                writeln!(out, "{}", "─".repeat(60))?;
                for req in &requirements {
                    writeln!(
                        out,
                        "  {:<24} {:>8} {:>10}  {}",
                        req.part_number,
                        req.assembly_qty,
                        req.shipset_qty,
                        req.description.as_deref().unwrap_or("")
                    )?;
                }
            }
            OutputFormat::Json => {
                let document = serde_json::json!({
                    "source": input.file.display().to_string(),
                    "shipsets": shipsets,
                    "parts": requirements,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
            }
            OutputFormat::Csv => export::write_csv(&mut out, &requirements)?,
        }
    } else {
        let parts = part_summary(&bom)?;
        match input.format {
            OutputFormat::Human => {
                writeln!(out, "\nParts: {}", top_name(&bom))?;
                writeln!(out, "{}", "─".repeat(60))?;
                for part in &parts {
                    writeln!(
                        out,
                        "  {:<24} {:<9} {:>6} {:>10.3}  {}",
                        part.part_number,
                        part.part_type.as_str(),
                        part.total_qty,
                        part.total_weight,
                        part.description.as_deref().unwrap_or("")
                    )?;
                }
                writeln!(out, "\n  Unique parts: {}", parts.len())?;
            }
            OutputFormat::Json => {
                let document = serde_json::json!({
                    "source": input.file.display().to_string(),
                    "parts": parts,
                });
                writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
            }
            OutputFormat::Csv => export::write_csv(&mut out, &parts)?,
        }
    }
    out.flush()?;
    Ok(())
}

fn handle_drawings(input: &InputArgs) -> Result<(), BomError> {
    let bom = load(input)?;
    let drawings = drawing_list(&bom);
    let mut out = open_output(input)?;
    match input.format {
        OutputFormat::Human => {
            writeln!(out, "\nDrawings: {}", top_name(&bom))?;
            writeln!(out, "{}", "─".repeat(60))?;
            for drawing in &drawings {
                writeln!(
                    out,
                    "  {:<12} {:<4} {:<10} {}",
                    drawing.drawing_number,
                    drawing.revision.as_deref().unwrap_or("-"),
                    drawing.state.as_deref().unwrap_or("-"),
                    drawing.description.as_deref().unwrap_or("")
                )?;
            }
            writeln!(out, "\n  Total drawings: {}", drawings.len())?;
        }
        OutputFormat::Json => {
            let document = serde_json::json!({
                "source": input.file.display().to_string(),
                "drawings": drawings,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;
        }
        OutputFormat::Csv => export::write_csv(&mut out, &drawings)?,
    }
    out.flush()?;
    Ok(())
}

fn top_name(bom: &ResolvedBom) -> &str {
    bom.top_assembly().unwrap_or("(empty)")
}

fn output_tree(out: &mut dyn Write, bom: &ResolvedBom, file: &Path) -> Result<(), BomError> {
    writeln!(out, "\nFile: {}", file.display())?;
    writeln!(out, "{}", "─".repeat(60))?;

    if bom.rows.is_empty() {
        writeln!(out, "  No CAD rows found")?;
        return Ok(());
    }

    for row in &bom.rows {
        let label = format!("{}{}", "  ".repeat(row.depth), row.new_level);
        let mut flags = Vec::new();
        if row.is_drawing {
            flags.push("DWG");
        }
        if row.is_duplicate {
            flags.push("DUP");
        }
        writeln!(
            out,
            "  {:<16} {:<24} {:<9} {:>5} {:>7}  {}",
            label,
            row.part_number,
            row.part_type.as_str(),
            row.qty,
            row.total_qty,
            flags.join(" ")
        )?;
    }

    let s = &bom.stats;
    writeln!(out, "\n  Summary:")?;
    writeln!(out, "    Rows:        {} ({} dropped)", s.rows, s.dropped_rows)?;
    writeln!(out, "    Top-level:   {}", s.roots)?;
    writeln!(out, "    Max depth:   {}", s.max_depth)?;
    writeln!(out, "    DSS parts:   {}", s.dss_parts)?;
    writeln!(out, "    DSS assys:   {}", s.dss_assemblies)?;
    writeln!(out, "    COTS:        {}", s.cots)?;
    writeln!(out, "    Duplicates:  {}", s.duplicates)?;
    writeln!(out, "    Drawings:    {}", s.drawings)?;
    Ok(())
}
