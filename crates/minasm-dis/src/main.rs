use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

use minasm::disasm::decode;
use minasm::{AsmConfig, InstructionSet};
use minasm_dis::load_image;

#[derive(Parser, Debug)]
#[command(author, version, about = "Dump and disassemble minasm memory images", long_about=None)]
struct Cli {
    /// Bits per word (text images only; JSON images carry their width)
    #[arg(long, default_value_t = 16u32)]
    width: u32,
    /// Register count used to validate decoded register fields
    #[arg(long, default_value_t = 8u32)]
    registers: u32,
    /// Image path (bit-string text or JSON)
    #[arg(value_name = "IMAGE")]
    input: String,
    /// Subcommand
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print segment bounds
    Segments,
    /// Dump words in [start, end)
    Words {
        /// Start address (hex or dec)
        #[arg(long)]
        start: Option<String>,
        /// End address (hex or dec, exclusive)
        #[arg(long)]
        end: Option<String>,
    },
    /// Disassemble words in [start, end); defaults to the text segment
    Disasm {
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        /// Show instruction bits
        #[arg(long)]
        show_bits: bool,
    },
}

fn parse_u32(s: &str) -> Result<u32> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse::<u32>()?)
    }
}

fn bounds(start: Option<&str>, end: Option<&str>, default_end: usize, depth: usize) -> Result<(usize, usize)> {
    let start = start.map(parse_u32).transpose()?.unwrap_or(0) as usize;
    let end = end.map(parse_u32).transpose()?.map(|e| e as usize).unwrap_or(default_end);
    anyhow::ensure!(start <= end && end <= depth, "range {start:#x}..{end:#x} is outside the image");
    Ok((start, end))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let img = load_image(Path::new(&cli.input), cli.width)?;
    let cfg = AsmConfig {
        num_registers: cli.registers,
        memory_depth: img.depth() as u32,
        memory_width: img.width,
        ..AsmConfig::default()
    };
    cfg.validate()?;
    let isa = InstructionSet::standard();

    match cli.cmd {
        Command::Segments => {
            println!("{:<6} {:<8} {:<8}", "name", "start", "end");
            println!("{:<6} {:#06x}   {:#06x}", "text", 0, img.text_end);
            println!("{:<6} {:#06x}   {:#06x}", "data", img.data_start, img.depth());
        }
        Command::Words { start, end } => {
            let (start, end) = bounds(start.as_deref(), end.as_deref(), img.depth(), img.depth())?;
            for addr in start..end {
                println!("{addr:#06x}  {}", img.bit_string(img.words[addr]));
            }
        }
        Command::Disasm { start, end, show_bits } => {
            let (start, end) = bounds(start.as_deref(), end.as_deref(), img.text_end as usize, img.depth())?;
            let mut pc = start;
            while pc < end {
                let (len, text) = match decode(&isa, &cfg, &img.words[pc..end]) {
                    Some(d) => (d.len, d.to_string()),
                    None => (1, format!(".word {:#x}", img.words[pc])),
                };
                if show_bits {
                    let bits: Vec<String> = img.words[pc..pc + len].iter().map(|w| img.bit_string(*w)).collect();
                    println!("{pc:#06x}  {:<34} {text}", bits.join(" "));
                } else {
                    println!("{pc:#06x}  {text}");
                }
                pc += len;
            }
        }
    }
    Ok(())
}
