use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "abc2ly")]
#[command(version = "0.1.0")]
#[command(about = "ABC to LilyPond converter", long_about = None)]
struct Args {
    /// Output LilyPond file
    output: PathBuf,

    /// Input ABC file (reads from stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    let mut translator = abc2ly::Translator::new();

    let result = match &args.input {
        Some(path) => translator.translate_file(path, &args.output),
        None => translator.translate(std::io::stdin(), &args.output),
    };

    // Syntax diagnostics render their caret report through Display
    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
