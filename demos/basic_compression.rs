use huffpack::{decode_from_reader, encode_from_reader, CodecConfig, HuffmanTree};
use std::fs::File;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let sample_path = dir.path().join("sample.txt");
    let packed_path = dir.path().join("sample.huff");
    let restored_path = dir.path().join("decompressed.txt");

    let sample_text = "Hello, world! This is a sample text for Huffman compression. \
                      The quick brown fox jumps over the lazy dog. \
                      Huffman encoding is a greedy algorithm that builds optimal prefix codes.";

    std::fs::write(&sample_path, sample_text)?;
    println!("Created sample file: {} bytes", sample_text.len());

    let tree = HuffmanTree::from_symbols(sample_text.as_bytes())?;
    println!("Tree: {} leaves, depth {}", tree.leaf_count(), tree.depth());

    let written = encode_from_reader(
        File::open(&sample_path)?,
        File::create(&packed_path)?,
        &CodecConfig::default(),
    )?;
    let ratio = written as f64 / sample_text.len() as f64;
    println!("Compressed to: {} bytes ({:.1}% of original)", written, ratio * 100.0);

    decode_from_reader(File::open(&packed_path)?, File::create(&restored_path)?)?;
    let decompressed_text = std::fs::read_to_string(&restored_path)?;

    if sample_text != decompressed_text {
        return Err("Decompression verification failed".into());
    }
    println!("Decompression successful! Data matches exactly.");

    Ok(())
}
