use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use wordgrid::candidates::{candidates_from_response, CrosswordLimits};
use wordgrid::{place_words, render_clues, render_grid, WordgridError, DEFAULT_GRID_SIZE};

/// Lay out crossword words in a square grid
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// File holding the candidate words, either plain JSON or a model response containing it.
    /// Reads stdin when omitted or `-`.
    input: Option<PathBuf>,

    /// Side length of the grid
    #[arg(short = 's', long, default_value_t = DEFAULT_GRID_SIZE)]
    grid_size: usize,

    /// Stop after placing this many words, kept between 3 and 10 (default: place as many as fit)
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Print the placement as JSON instead of a rendered grid
    #[arg(long)]
    json: bool,

    /// Log each placement decision (same as setting WORDGRID_DEBUG)
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    wordgrid::logging::init_logger(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(input: Option<&PathBuf>) -> Result<String, io::Error> {
    match input {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path),
        _ => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn run(cli: &Cli) -> Result<(), WordgridError> {
    let text = read_input(cli.input.as_ref())?;

    let limits = CrosswordLimits {
        grid_size: cli.grid_size,
        max_word_length: cli.grid_size,
        ..CrosswordLimits::default()
    };
    let count = cli.count.map(|count| limits.clamp_word_count(count));

    let mut candidates = candidates_from_response(&text, &limits)?;
    if let Some(count) = count {
        candidates = limits.take_requested(candidates, count);
    }

    let result = place_words(&candidates, limits.grid_size, count.unwrap_or(usize::MAX))?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).map_err(WordgridError::Output)?;
        println!("{json}");
        return Ok(());
    }

    println!("{}", render_grid(&result.grid));
    println!();
    println!("{}", render_clues(&result.clues));

    for &candidate_id in &result.unplaced {
        eprintln!("Not placed: {}", candidates[candidate_id].text);
    }
    eprintln!("{:?}", result.statistics);

    Ok(())
}
