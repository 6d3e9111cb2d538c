mod codec;
mod corpus;
mod dict;
mod encoding;
mod model;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use corpus::Corpus;
use dict::DictionaryOptimizer;
use model::CompressionModel;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Default dictionary size, same as the packer's offset window
const DEFAULT_DICT_SIZE: usize = 64 * 1024;

#[derive(Parser)]
#[command(name = "sdc")]
#[command(about = "Shared-dictionary compression for corpora of small, similar documents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a shared dictionary from a corpus and write it to disk
    Build {
        /// Corpus: a directory (one document per file) or a text file
        /// (one document per line with --per-line, else a single document)
        corpus: PathBuf,

        /// Output path for the dictionary blob
        #[arg(short, long, default_value = "sdc.dict")]
        output: PathBuf,

        /// Dictionary size in bytes
        #[arg(long, default_value_t = DEFAULT_DICT_SIZE)]
        dict_size: usize,

        /// Treat the corpus file as one document per line
        #[arg(long)]
        per_line: bool,
    },
    /// Compress one document with a trained dictionary
    Compress {
        /// Input document
        input: PathBuf,

        /// Dictionary blob written by `build` (omit for dictionary-less
        /// compression)
        #[arg(short, long)]
        dict: Option<PathBuf>,

        /// Output path (default: INPUT.sdc)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Decompress a document produced by `compress`
    Decompress {
        /// Compressed input
        input: PathBuf,

        /// Dictionary blob the document was compressed with
        #[arg(short, long)]
        dict: Option<PathBuf>,

        /// Output path (default: INPUT minus its .sdc extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the substrings a dictionary would pack, with their scores
    Dump {
        /// Corpus to train on
        corpus: PathBuf,

        #[arg(long, default_value_t = DEFAULT_DICT_SIZE)]
        dict_size: usize,

        #[arg(long)]
        per_line: bool,
    },
    /// Train on a corpus and report how well it compresses itself
    Stats {
        /// Corpus to train and measure
        corpus: PathBuf,

        #[arg(long, default_value_t = DEFAULT_DICT_SIZE)]
        dict_size: usize,

        #[arg(long)]
        per_line: bool,

        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            corpus,
            output,
            dict_size,
            per_line,
        } => build(&corpus, &output, dict_size, per_line),
        Commands::Compress {
            input,
            dict,
            output,
        } => compress(&input, dict.as_deref(), output),
        Commands::Decompress {
            input,
            dict,
            output,
        } => decompress(&input, dict.as_deref(), output),
        Commands::Dump {
            corpus,
            dict_size,
            per_line,
        } => dump(&corpus, dict_size, per_line),
        Commands::Stats {
            corpus,
            dict_size,
            per_line,
            json,
        } => stats(&corpus, dict_size, per_line, json),
    }
}

/// Load a corpus from a directory or a file
fn load_corpus(path: &Path, per_line: bool) -> Result<Corpus> {
    let corpus = if path.is_dir() {
        Corpus::from_dir(path)?
    } else if per_line {
        Corpus::from_lines(path)?
    } else {
        let doc = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Corpus::from_docs([doc])
    };

    if corpus.is_empty() {
        eprintln!("warning: corpus {} contains no documents", path.display());
    }
    Ok(corpus)
}

/// Load a model from an optional dictionary blob path
fn load_model(dict: Option<&Path>) -> Result<CompressionModel> {
    match dict {
        Some(path) => {
            let mut file = File::open(path)
                .with_context(|| format!("failed to open dictionary {}", path.display()))?;
            CompressionModel::load(&mut file)
                .with_context(|| format!("failed to load dictionary {}", path.display()))
        }
        None => Ok(CompressionModel::with_dictionary(None)),
    }
}

fn build(corpus_path: &Path, output: &Path, dict_size: usize, per_line: bool) -> Result<()> {
    let corpus = load_corpus(corpus_path, per_line)?;
    let model = CompressionModel::build(model::ModelVariant::Substring, &corpus, dict_size)?;

    let mut out = File::create(output)
        .with_context(|| format!("failed to create {}", output.display()))?;
    model.save(&mut out)?;

    if let CompressionModel::Substring(model) = &model {
        println!(
            "Trained {} byte dictionary from {} documents -> {}",
            model.dictionary().len(),
            corpus.len(),
            output.display()
        );
    }
    Ok(())
}

fn compress(input: &Path, dict: Option<&Path>, output: Option<PathBuf>) -> Result<()> {
    let model = load_model(dict)?;
    let doc = std::fs::read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let compressed = model.compress(&doc)?;

    let output = output.unwrap_or_else(|| input.with_extension(joined_extension(input, "sdc")));
    std::fs::write(&output, &compressed)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "{} bytes -> {} bytes ({})",
        doc.len(),
        compressed.len(),
        output.display()
    );
    Ok(())
}

fn decompress(input: &Path, dict: Option<&Path>, output: Option<PathBuf>) -> Result<()> {
    let model = load_model(dict)?;
    let data = std::fs::read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let restored = model.decompress(&data)?;

    let output = match output {
        Some(path) => path,
        None => {
            if input.extension().is_none_or(|e| e != "sdc") {
                bail!("cannot infer output name for {}; pass --output", input.display());
            }
            input.with_extension("")
        }
    };
    std::fs::write(&output, &restored)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "{} bytes -> {} bytes ({})",
        data.len(),
        restored.len(),
        output.display()
    );
    Ok(())
}

/// "file.txt" + "sdc" -> "txt.sdc" so `with_extension` appends rather than
/// replaces
fn joined_extension(path: &Path, ext: &str) -> String {
    match path.extension() {
        Some(existing) => format!("{}.{ext}", existing.to_string_lossy()),
        None => ext.to_string(),
    }
}

fn dump(corpus_path: &Path, dict_size: usize, per_line: bool) -> Result<()> {
    let corpus = load_corpus(corpus_path, per_line)?;
    let mut optimizer = DictionaryOptimizer::new(&corpus);
    let dictionary = optimizer.optimize(dict_size);

    println!("Dictionary: {} bytes", dictionary.len());
    for (bytes, score) in optimizer.substring_scores(dict_size) {
        println!("{score}\t{}", String::from_utf8_lossy(&bytes));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct StatsReport {
    documents: usize,
    dictionary_bytes: usize,
    raw_bytes: u64,
    compressed_bytes: u64,
    ratio: f64,
}

fn stats(corpus_path: &Path, dict_size: usize, per_line: bool, json: bool) -> Result<()> {
    let corpus = load_corpus(corpus_path, per_line)?;
    let model = CompressionModel::build(model::ModelVariant::Substring, &corpus, dict_size)?;
    let dictionary_bytes = match &model {
        CompressionModel::Substring(m) => m.dictionary().len(),
        CompressionModel::Noop => 0,
    };

    // The model is read-only, so documents compress in parallel.
    let sizes: Vec<(u64, u64)> = corpus
        .iter()
        .collect::<Vec<_>>()
        .par_iter()
        .map(|doc| {
            let compressed = model.compress(doc)?;
            Ok((doc.len() as u64, compressed.len() as u64))
        })
        .collect::<Result<_>>()?;

    let raw_bytes: u64 = sizes.iter().map(|s| s.0).sum();
    let compressed_bytes: u64 = sizes.iter().map(|s| s.1).sum();
    let report = StatsReport {
        documents: corpus.len(),
        dictionary_bytes,
        raw_bytes,
        compressed_bytes,
        ratio: if raw_bytes > 0 {
            compressed_bytes as f64 / raw_bytes as f64
        } else {
            0.0
        },
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Documents:        {}", report.documents);
        println!("Dictionary:       {} bytes", report.dictionary_bytes);
        println!("Raw corpus:       {} bytes", report.raw_bytes);
        println!("Compressed:       {} bytes", report.compressed_bytes);
        println!("Ratio:            {:.3}", report.ratio);
    }
    Ok(())
}
