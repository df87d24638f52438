//! ABC to JSON converter

use abc2ly::ly::TuneJson;
use abc2ly::Translator;
use clap::Parser;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "abc2json")]
#[command(version = "0.1.0")]
#[command(about = "Convert ABC tunes to JSON", long_about = None)]
struct Args {
    /// Input ABC file
    input: PathBuf,

    /// Output JSON file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output compact JSON (default is pretty-printed)
    #[arg(short, long)]
    compact: bool,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut translator = Translator::new();
    translator.context.filename = args.input.display().to_string();

    let file = File::open(&args.input)?;
    translator.read_input(file)?;

    let tune = TuneJson::new(&translator.header, &translator.context);

    let json_string = if args.compact {
        serde_json::to_string(&tune)?
    } else {
        serde_json::to_string_pretty(&tune)?
    };

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(json_string.as_bytes())?;
            file.write_all(b"\n")?;
        }
        None => {
            println!("{}", json_string);
        }
    }

    Ok(())
}
