use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::fp::{build_fp_tree, fp_growth, min_support_count, CombinationDispatcher};
use crate::output::PatternSink;
use crate::verify::PatternSet;
use crate::{datagen, input, Result};

#[derive(Parser)]
#[command(name = "fpgrow", version, about = "Parallel FP-Growth frequent pattern miner")]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mine frequent patterns from a transaction file
    Mine(MineArgs),
    /// Compare two pattern files as sets of (itemset, support) pairs
    Verify(VerifyArgs),
    /// Generate a random transaction file
    Generate(GenerateArgs),
}

#[derive(Args)]
pub struct MineArgs {
    /// Minimum support as a fraction of the transaction count, in [0, 1]
    pub min_support: f64,

    /// Input file: one transaction per line, comma-separated item ids
    pub input: PathBuf,

    /// Output pattern file
    pub output: PathBuf,

    /// Worker threads for single-path enumeration (default: available cores)
    #[arg(long)]
    pub threads: Option<usize>,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Pattern file to check
    pub output: PathBuf,

    /// Expected pattern file
    pub expected: PathBuf,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Destination transaction file
    pub output: PathBuf,

    /// Number of transactions
    #[arg(long, default_value = "1000")]
    pub transactions: usize,

    /// Item universe size
    #[arg(long, default_value = "100")]
    pub items: usize,

    /// Maximum items per transaction
    #[arg(long, default_value = "20")]
    pub max_len: usize,

    /// RNG seed (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Command::Mine(args) => run_mine(args),
            Command::Verify(args) => run_verify(args),
            Command::Generate(args) => run_generate(args),
        }
    }
}

fn run_mine(args: MineArgs) -> Result<()> {
    if !(0.0..=1.0).contains(&args.min_support) {
        bail!("minimum support must lie in [0, 1], got {}", args.min_support);
    }

    let start = Instant::now();
    let (transactions, item_freq) = input::read_transactions_file(&args.input)?;
    debug!(transactions = transactions.len(), elapsed = ?start.elapsed(), "input");
    if transactions.is_empty() {
        bail!("no transactions in {}", args.input.display());
    }

    let min_count = min_support_count(args.min_support, transactions.len());
    let start = Instant::now();
    let tree = build_fp_tree(&transactions, item_freq, min_count);
    debug!(nodes = tree.nodes.len(), elapsed = ?start.elapsed(), "build_fptree");

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let sink = PatternSink::new(BufWriter::new(file));
    let dispatcher = CombinationDispatcher::new(args.threads);

    let start = Instant::now();
    fp_growth(&tree, min_count, transactions.len(), &dispatcher, &sink)?;
    debug!(elapsed = ?start.elapsed(), "fpgrowth");

    let mut writer = sink.into_inner()?;
    writer
        .flush()
        .with_context(|| format!("flushing {}", args.output.display()))?;

    info!(
        transactions = transactions.len(),
        min_count,
        workers = dispatcher.workers(),
        "mining complete"
    );
    Ok(())
}

fn run_verify(args: VerifyArgs) -> Result<()> {
    let actual = PatternSet::parse_file(&args.output)?;
    let expected = PatternSet::parse_file(&args.expected)?;

    let report = actual.diff(&expected);
    if report.is_clean() {
        println!("ok: {} patterns match", actual.len());
        Ok(())
    } else {
        print!("{report}");
        bail!(
            "pattern files differ ({} missing, {} unexpected, {} mismatched, {} repeated)",
            report.missing.len(),
            report.unexpected.len(),
            report.mismatched.len(),
            report.duplicates.len()
        );
    }
}

fn run_generate(args: GenerateArgs) -> Result<()> {
    if args.items == 0 {
        bail!("item universe must not be empty");
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let transactions =
        datagen::generate_transactions(&mut rng, args.transactions, args.items, args.max_len);

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    let mut writer = BufWriter::new(file);
    datagen::write_transactions(&mut writer, &transactions)
        .with_context(|| format!("writing {}", args.output.display()))?;
    writer.flush().context("flushing transaction file")?;

    info!(
        transactions = transactions.len(),
        items = args.items,
        "generated transaction file"
    );
    Ok(())
}
