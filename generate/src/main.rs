use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;

use slugforge::{DictionarySet, Generator, Pattern};

#[derive(Parser, Debug)]
#[clap(
    name = "generate",
    about = "A program to generate human-readable identifiers from a pattern."
)]
struct Args {
    /// Dictionary file (.yaml/.yml/.json, or a compiled .dict).
    #[clap(short = 'f', long)]
    file: PathBuf,

    /// Pattern to expand, e.g. "{adjective}-{noun}-{number:4x}".
    #[clap(short = 'p', long)]
    pattern: String,

    /// Number of identifiers to generate.
    #[clap(short = 'c', long, default_value = "1")]
    count: u64,

    /// First sequence number.
    #[clap(short = 's', long, default_value = "0")]
    sequence: u64,

    /// Seed; a random one is drawn when omitted.
    #[clap(long)]
    seed: Option<String>,
}

fn load_dictionaries(path: &Path) -> anyhow::Result<DictionarySet> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let set = match extension {
        "dict" => DictionarySet::read(BufReader::new(file))?,
        "yaml" | "yml" => {
            let mut data = String::new();
            BufReader::new(file).read_to_string(&mut data)?;
            DictionarySet::from_yaml_str(&data)?
        }
        "json" => {
            let mut data = String::new();
            BufReader::new(file).read_to_string(&mut data)?;
            DictionarySet::from_json_str(&data)?
        }
        other => bail!("unsupported dictionary format: .{other}"),
    };
    Ok(set)
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    let generator = Generator::new(load_dictionaries(&args.file)?);
    let seed = match args.seed {
        Some(seed) => seed,
        None => {
            let seed = generator.random_seed();
            eprintln!("Using random seed: {seed}");
            seed
        }
    };

    let pattern = Pattern::parse_arc(args.pattern.as_str())?;
    let settings = generator.capacity_of(&pattern)?;
    eprintln!("Pattern capacity: {}", settings.capacity);

    generator.generate_batch_with_settings(
        &settings,
        &pattern,
        &seed,
        args.sequence,
        args.count,
        |slug| println!("{slug}"),
    )?;

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
