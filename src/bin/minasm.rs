use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use minasm::image::render_listing;
use minasm::{AsmConfig, Assembler, InstructionSet, Segment};

#[derive(Parser, Debug)]
#[command(author, version, about = "Assemble source for the minimal 16-bit machine")]
struct Opts {
    /// Assembly source (one statement per line)
    #[arg(value_name = "SOURCE")]
    input: PathBuf,
    /// Output image; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Image format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Assembler configuration as JSON (missing keys take defaults)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Export labels to JSON (Vec<{ name, address, segment }>)
    #[arg(long, value_name = "FILE")]
    labels_out: Option<PathBuf>,
    /// Write an address / bits / disassembly listing
    #[arg(long, value_name = "FILE")]
    listing: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// One zero-padded bit string per address
    Text,
    Json,
}

#[derive(Debug, Clone, serde::Serialize)]
struct LabelKV {
    name: String,
    address: u32,
    segment: Segment,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let cfg = match &opts.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str::<AsmConfig>(&text).with_context(|| format!("parsing {}", path.display()))?
        }
        None => AsmConfig::default(),
    };
    let isa = InstructionSet::standard();
    let asm = Assembler::new(&isa, cfg)?;

    let source = fs::read_to_string(&opts.input).with_context(|| format!("reading {}", opts.input.display()))?;
    let lines: Vec<&str> = source.lines().collect();

    let labels = asm.pass_one(&lines).with_context(|| format!("in {}", opts.input.display()))?;
    let image = asm.pass_two(&lines, &labels).with_context(|| format!("in {}", opts.input.display()))?;

    let rendered = match opts.format {
        OutputFormat::Text => image.render(),
        OutputFormat::Json => serde_json::to_string_pretty(&image)?,
    };
    match &opts.output {
        Some(path) => fs::write(path, rendered)?,
        None => print!("{rendered}"),
    }

    if let Some(path) = &opts.labels_out {
        let kv: Vec<LabelKV> = labels
            .iter()
            .map(|(name, l)| LabelKV { name: name.to_string(), address: l.address, segment: l.segment })
            .collect();
        fs::write(path, serde_json::to_string_pretty(&kv)?)?;
    }

    if let Some(path) = &opts.listing {
        fs::write(path, render_listing(&image.listing(&isa, asm.config())))?;
    }

    Ok(())
}
