//! huffpack CLI
//! Usage:
//!   huffpack [--text] compress   <input> <output> [config.json]
//!   huffpack [--text] decompress <input> <output>
//!   huffpack [--text] tree       <input> <output.dot>
//!
//! Files are coded byte by byte; `--text` codes UTF-8 text one character
//! at a time instead.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::{env, process};

use anyhow::{bail, Context, Result};
use huffpack::{
    decode_from_reader, decompress_str, encode_from_reader, CodecConfig, HuffmanCodec,
    HuffmanTree,
};

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  huffpack [--text] compress   <input> <output> [config.json]");
    eprintln!("  huffpack [--text] decompress <input> <output>");
    eprintln!("  huffpack [--text] tree       <input> <output.dot>");
    eprintln!();
    eprintln!("Input is coded as raw bytes unless --text is given, which codes");
    eprintln!("UTF-8 text one character per symbol.");
    process::exit(1);
}

fn read_text(path: &Path) -> Result<Vec<char>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {} as UTF-8 text", path.display()))?;
    Ok(text.chars().collect())
}

fn run(args: &[String]) -> Result<()> {
    let text = args.iter().any(|a| a == "--text");
    let args: Vec<String> = args.iter().filter(|a| *a != "--text").cloned().collect();
    if args.len() < 4 {
        usage();
    }
    let command = args[1].as_str();
    let input_path = Path::new(&args[2]);
    let output_path = Path::new(&args[3]);

    let input_len = fs::metadata(input_path)
        .with_context(|| format!("failed to read {}", input_path.display()))?
        .len();

    match (command, args.len()) {
        ("compress", 4) | ("compress", 5) => {
            let config = match args.get(4) {
                Some(path) => CodecConfig::load(Path::new(path))
                    .with_context(|| format!("failed to load config {}", path))?,
                None => CodecConfig::default(),
            };
            // Build the whole artifact before touching the destination.
            let mut artifact = Vec::new();
            let written = if text {
                let chars = read_text(input_path)?;
                artifact = HuffmanCodec::compress_with(&chars, &config)
                    .with_context(|| format!("failed to compress {}", input_path.display()))?
                    .serialize();
                artifact.len()
            } else {
                let input = File::open(input_path)?;
                encode_from_reader(input, &mut artifact, &config)
                    .with_context(|| format!("failed to compress {}", input_path.display()))?
            };
            fs::write(output_path, &artifact)
                .with_context(|| format!("failed to write {}", output_path.display()))?;
            println!("Done. {} bytes → {} bytes", input_len, written);
        }
        ("decompress", 4) => {
            let mut decoded = Vec::new();
            let written = if text {
                let artifact = fs::read(input_path)?;
                decoded = decompress_str(&artifact)
                    .with_context(|| format!("failed to decompress {}", input_path.display()))?
                    .into_bytes();
                decoded.len()
            } else {
                let input = File::open(input_path)?;
                decode_from_reader(input, &mut decoded)
                    .with_context(|| format!("failed to decompress {}", input_path.display()))?
            };
            fs::write(output_path, &decoded)
                .with_context(|| format!("failed to write {}", output_path.display()))?;
            println!("Done. {} bytes → {} bytes", input_len, written);
        }
        ("tree", 4) => {
            let (dot, leaves, depth) = if text {
                let tree = HuffmanTree::from_symbols(&read_text(input_path)?)
                    .with_context(|| format!("failed to build tree for {}", input_path.display()))?;
                (tree.to_dot(), tree.leaf_count(), tree.depth())
            } else {
                let tree = HuffmanTree::from_symbols(&fs::read(input_path)?)
                    .with_context(|| format!("failed to build tree for {}", input_path.display()))?;
                (tree.to_dot(), tree.leaf_count(), tree.depth())
            };
            let mut out = BufWriter::new(File::create(output_path)?);
            out.write_all(dot.as_bytes())?;
            out.flush()?;
            println!(
                "Done. {} leaves, depth {} → {}",
                leaves,
                depth,
                output_path.display()
            );
        }
        (other, _) => bail!("unknown command or wrong arguments: {}", other),
    }
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
