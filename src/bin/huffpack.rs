/// huffpack – Huffman file compressor.
///
///   huffpack encode -i file.txt -o file.huff
///   huffpack decode -i file.huff -o file.txt
///   huffpack encode -i file.txt -o file.huff --json      → report as JSON
///   huffpack decode -i file.huff -o out --config cfg.json → custom size limits
use std::env;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use huffpack::{compress_file, decompress_file, CodecConfig, HuffmanCodec};

fn usage() {
    eprintln!("huffpack - Huffman coding compression tool");
    eprintln!();
    eprintln!("Usage: huffpack <encode|decode> -i <INPUT> -o <OUTPUT> [OPTIONS]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  encode             Compress a file");
    eprintln!("  decode             Decompress a file");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -i, --input PATH   Input file");
    eprintln!("  -o, --output PATH  Output file");
    eprintln!("  --config PATH      JSON file with size limits");
    eprintln!("  --json             Print the size report as JSON");
    eprintln!("  -h, --help         Show this help");
    eprintln!();
    eprintln!("Example: huffpack encode -i test.txt -o test.huff");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Encode,
    Decode,
}

#[derive(Debug)]
struct Opts {
    mode: Mode,
    input: String,
    output: String,
    config: Option<String>,
    json: bool,
}

fn parse_args(args: &[String]) -> Result<Option<Opts>> {
    let mut mode = None;
    let mut input = None;
    let mut output = None;
    let mut config = None;
    let mut json = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "encode" if mode.is_none() => mode = Some(Mode::Encode),
            "decode" if mode.is_none() => mode = Some(Mode::Decode),
            "-i" | "--input" => {
                input = Some(iter.next().context("missing argument for -i")?.clone());
            }
            "-o" | "--output" => {
                output = Some(iter.next().context("missing argument for -o")?.clone());
            }
            "--config" => {
                config = Some(iter.next().context("missing argument for --config")?.clone());
            }
            "--json" => json = true,
            "-h" | "--help" => return Ok(None),
            other => bail!("unexpected argument '{other}'"),
        }
    }

    let Some(mode) = mode else {
        bail!("specify 'encode' or 'decode'");
    };
    let (Some(input), Some(output)) = (input, output) else {
        bail!("both input and output files are required");
    };
    Ok(Some(Opts {
        mode,
        input,
        output,
        config,
        json,
    }))
}

fn run(opts: &Opts) -> Result<()> {
    let config = match &opts.config {
        Some(path) => {
            CodecConfig::load(path).with_context(|| format!("loading config '{path}'"))?
        }
        None => CodecConfig::default(),
    };
    let codec = HuffmanCodec::new(config);

    let report = match opts.mode {
        Mode::Encode => compress_file(&opts.input, &opts.output, &codec)
            .with_context(|| format!("compressing '{}'", opts.input))?,
        Mode::Decode => decompress_file(&opts.input, &opts.output, &codec)
            .with_context(|| format!("decompressing '{}' (file may be corrupt)", opts.input))?,
    };

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let verb = match opts.mode {
            Mode::Encode => "compressed",
            Mode::Decode => "decompressed",
        };
        println!("Successfully {verb} '{}' to '{}'", opts.input, opts.output);
        println!("{report}");
    }
    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().skip(1).collect();
    let opts = match parse_args(&args) {
        Ok(Some(opts)) => opts,
        Ok(None) => {
            usage();
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("huffpack: {e}");
            usage();
            return ExitCode::FAILURE;
        }
    };

    match run(&opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("huffpack: {e:#}");
            ExitCode::FAILURE
        }
    }
}
