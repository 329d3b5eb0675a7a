use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use minesweeper_ai::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Plays one game of minesweeper with the knowledge-based agent.
#[derive(Parser, Debug)]
#[command(name = "minesweeper-ai", version, about = "Autonomous minesweeper player")]
struct Cli {
    #[arg(long, default_value_t = 8)]
    height: usize,

    #[arg(long, default_value_t = 8)]
    width: usize,

    #[arg(long, default_value_t = 8)]
    mines: usize,

    /// Seed for the mine layout and the agent's guesses. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between moves, in milliseconds.
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,

    /// Print every inference step.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

enum Outcome {
    Won,
    Lost(Cell),
    Stuck,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // --- 1. Initialization ---
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut game = Minesweeper::new(cli.height, cli.width, cli.mines, &mut rng)?;
    let mut kb = KnowledgeBase::new(cli.height, cli.width);

    println!("--- Minesweeper AI ---");
    println!("Strategy: play proven-safe cells, guess randomly otherwise.");
    println!("Mine layout:");
    print!("{game}");

    // --- 2. Game Loop ---
    let mut move_count = 0;
    let outcome = loop {
        if game.won() {
            break Outcome::Won;
        }

        let Some(next) = next_move(&kb, &mut rng) else {
            break Outcome::Stuck;
        };

        move_count += 1;
        println!("\n--- Move #{move_count} ---");
        match next.kind {
            MoveKind::Safe => println!("AI making safe move {}", next.cell),
            MoveKind::Random => println!("No known safe moves, AI making random move {}", next.cell),
        }

        // --- 3. Reveal and learn ---
        let count = match game.reveal(next.cell)? {
            Reveal::Mine => break Outcome::Lost(next.cell),
            Reveal::Count(count) => count,
        };

        kb.add_knowledge_traced(next.cell, usize::from(count), &mut |event| {
            if cli.verbose {
                println!("  {event}");
            }
        })
        .with_context(|| format!("inconsistent knowledge after revealing {}", next.cell))?;

        for &mine in kb.mines() {
            game.flag(mine)?;
        }

        print_view(&game, &kb);

        if cli.delay_ms > 0 {
            thread::sleep(Duration::from_millis(cli.delay_ms));
        }
    };

    // --- 4. Final Result ---
    println!("\n--- Game Over ---");
    match outcome {
        Outcome::Won => println!("Result: the AI flagged all {} mines.", game.mines().len()),
        Outcome::Lost(cell) => println!("Result: the AI hit a mine at {cell}."),
        Outcome::Stuck => println!("Result: no moves left to make."),
    }
    println!(
        "Moves: {move_count}, known safe: {}, known mines: {}",
        kb.safes().len(),
        kb.mines().len()
    );

    Ok(())
}

/// Prints the board as the agent sees it.
fn print_view(game: &Minesweeper, kb: &KnowledgeBase) {
    print!("   ");
    for col in 0..kb.width() {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(kb.width()));

    for row in 0..kb.height() {
        print!("{:^2}|", row);
        for col in 0..kb.width() {
            let cell = Cell::new(row, col);
            let display = if kb.moves_made().contains(&cell) {
                format!(" {} ", game.nearby_mines(cell))
            } else if kb.mines().contains(&cell) {
                " F ".to_string()
            } else if kb.safes().contains(&cell) {
                " . ".to_string()
            } else {
                " ■ ".to_string()
            };
            print!("{}", display);
        }
        println!();
    }
}
