use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;

use slugforge::DictionarySet;

#[derive(Parser, Debug)]
#[clap(
    name = "compile",
    about = "A program to compile a dictionary file into the binary dictionary-set format."
)]
struct Args {
    /// Dictionary file mapping kinds to word tables (.yaml/.yml/.json).
    #[clap(short = 'i', long)]
    dict_in: PathBuf,

    /// File to which the binary dictionary set is output.
    #[clap(short = 'o', long)]
    dictset_out: PathBuf,
}

fn load_dictionaries(path: &Path) -> anyhow::Result<DictionarySet> {
    let mut data = String::new();
    BufReader::new(File::open(path).with_context(|| format!("opening {}", path.display()))?)
        .read_to_string(&mut data)?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let set = match extension {
        "yaml" | "yml" => DictionarySet::from_yaml_str(&data)?,
        "json" => DictionarySet::from_json_str(&data)?,
        other => bail!("unsupported dictionary format: .{other}"),
    };
    Ok(set)
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    eprintln!("Compiling the dictionary set...");
    let start = Instant::now();
    let set = load_dictionaries(&args.dict_in)?;
    for stats in set.stats() {
        if stats.language.is_empty() {
            eprintln!("{}: {} words", stats.kind, stats.count);
        } else {
            eprintln!("{}-{}: {} words", stats.kind, stats.language, stats.count);
        }
    }

    let mut wtr = BufWriter::new(
        File::create(&args.dictset_out)
            .with_context(|| format!("creating {}", args.dictset_out.display()))?,
    );
    let num_bytes = set.write(&mut wtr)?;
    eprintln!(
        "Wrote {} bytes in {:.2} [sec]",
        num_bytes,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
