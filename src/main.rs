use std::env;
use std::fs;
use std::process;

use zenmdec::pnm::PnmImage;
use zenmdec::{
    build_tables, compress_table, CodeTree, Encoder, TableLayout, TileMode,
};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  zenmdec encode <input.pnm> <output.bin> [luma_scale] [chroma_scale] [mono]");
    eprintln!("  zenmdec table <output.bin> [compress] [tree.json]");
    eprintln!();
    eprintln!("encode: compress a binary PGM/PPM image into an MDEC bitstream");
    eprintln!("  luma_scale / chroma_scale: quantization scales 0-63 (defaults 8 / 16)");
    eprintln!("  mono: emit 8x8 monochrome blocks instead of 16x16 macroblocks");
    eprintln!();
    eprintln!("table: emit the VLC decoder lookup tables as 32-bit words");
    eprintln!("  compress: run-length compress the table data");
    eprintln!("  tree.json: read the code tree from JSON instead of the built-in one");
}

fn parse_scale(arg: &str) -> u8 {
    match arg.parse::<u8>() {
        Ok(scale) if scale <= 63 => scale,
        _ => {
            eprintln!("Invalid quantization scale: {}", arg);
            print_usage();
            process::exit(1);
        }
    }
}

fn words_to_bytes(words: &[u32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 4);
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes
}

fn run_encode(args: &[String]) {
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }
    let input_path = &args[0];
    let output_path = &args[1];

    let mut encoder = Encoder::new();
    if args.len() > 2 {
        encoder = encoder.luma_scale(parse_scale(&args[2]));
    }
    if args.len() > 3 {
        encoder = encoder.chroma_scale(parse_scale(&args[3]));
    }
    if args.len() > 4 {
        if args[4] != "mono" {
            eprintln!("Invalid mode: {}", args[4]);
            print_usage();
            process::exit(1);
        }
        encoder = encoder.mode(TileMode::Monochrome);
    }

    let image = PnmImage::open(input_path)
        .and_then(|pnm| pnm.to_ycbcr())
        .unwrap_or_else(|e| {
            eprintln!("Error reading image: {}", e);
            process::exit(1);
        });

    let encoded = encoder.encode(&image).unwrap_or_else(|e| {
        eprintln!("Error encoding image: {}", e);
        process::exit(1);
    });

    if let Err(e) = fs::write(output_path, encoded.to_le_bytes()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
    println!(
        "{} words ({} chunks) written to {}",
        encoded.words().len(),
        encoded.chunk_count(),
        output_path
    );
}

fn run_table(args: &[String]) {
    if args.is_empty() {
        print_usage();
        process::exit(1);
    }
    let output_path = &args[0];
    let compress = args.len() > 1 && args[1] == "compress";

    let tree = if args.len() > 2 {
        let json = fs::read_to_string(&args[2]).unwrap_or_else(|e| {
            eprintln!("Error reading tree file: {}", e);
            process::exit(1);
        });
        CodeTree::from_json_str(&json).unwrap_or_else(|e| {
            eprintln!("Error parsing tree file: {}", e);
            process::exit(1);
        })
    } else {
        CodeTree::default()
    };

    let tables = build_tables(&tree, &TableLayout::default()).unwrap_or_else(|e| {
        eprintln!("Error building lookup tables: {}", e);
        process::exit(1);
    });

    let words = if compress {
        compress_table(&tables.concatenated()).unwrap_or_else(|e| {
            eprintln!("Error compressing tables: {}", e);
            process::exit(1);
        })
    } else {
        tables.concatenated()
    };

    if let Err(e) = fs::write(output_path, words_to_bytes(&words)) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
    println!("{} words written to {}", words.len(), output_path);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    match args[1].as_str() {
        "encode" => run_encode(&args[2..]),
        "table" => run_table(&args[2..]),
        _ => {
            eprintln!("Invalid command: {}", args[1]);
            print_usage();
            process::exit(1);
        }
    }
}
