extern crate clap;
extern crate thiserror;

use std::{collections::HashSet, io, time::Instant};

use bfswarm::{
    genome,
    lexer::{lexer::Lexer, LexerError, LexerTokenKind},
    ByteCodeVM, ExecutionReport, DEFAULT_MAX_STEPS,
};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rand::{rngs::SmallRng, SeedableRng};
use thiserror::Error;
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Run, inspect and evolve swarm tapes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The program file to operate on, read as raw bytes
    #[arg()]
    program: String,

    #[arg(value_enum)]
    commands: Vec<Commands>,

    /// Treat PROGRAM as the tape itself rather than a file path
    #[arg(short = 'e', long)]
    inline: bool,

    #[arg(short, long, default_value_t = DEFAULT_MAX_STEPS)]
    max_steps: usize,

    /// How many leading cells to show as the memory pattern
    #[arg(short, long, default_value_t = ExecutionReport::DEFAULT_PATTERN_LEN)]
    pattern_len: usize,

    /// Bytes queued for the `,` instruction
    #[arg(short, long)]
    input: Option<String>,

    /// Seed for mutate/replicate, random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(short, long, default_value_t = 1)]
    generations: usize,
}

#[derive(ValueEnum, Debug, Clone, Hash, PartialEq, Eq)]
enum Commands {
    /// Output the tokens
    Tokens,
    /// Check the brackets balance
    Check,
    /// Run the program
    Run,
    /// Run the program and show what a caller reads back
    Report,
    /// Apply random point mutations
    Mutate,
    /// Produce a replica
    Replicate,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("Couldn't read program: {0}")]
    FileIO(#[from] io::Error),

    #[error(transparent)]
    Lexer(#[from] LexerError),
}

/// Readable rendering of a tape, filler bytes are escaped
fn display_tape(tape: &[u8]) -> String {
    tape.iter()
        .flat_map(|b| std::ascii::escape_default(*b))
        .map(char::from)
        .collect()
}

/// A fresh vm fed with `input`, after one reset, load and run cycle
fn run_program(program: &[u8], input: Option<&str>, max_steps: usize) -> ByteCodeVM {
    let mut vm = ByteCodeVM::new();
    if let Some(input) = input {
        vm.push_input(input.as_bytes());
    }
    vm.reset();
    vm.load(program);
    vm.run(max_steps);
    vm
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();
    let commands: HashSet<Commands> = HashSet::from_iter(args.commands.iter().cloned());

    let program = if args.inline {
        args.program.as_bytes().to_vec()
    } else {
        println!("Running {}", args.program);
        std::fs::read(&args.program)?
    };
    println!("Program {}", display_tape(&program).cyan());

    if commands.contains(&Commands::Tokens) {
        let (tokens, _) = Lexer::new(&program).collect();
        for token in tokens.iter() {
            match &token.kind {
                LexerTokenKind::Comment(c) => println!("\t\t{}", display_tape(c).dimmed()),
                kind => print!(
                    "{}",
                    match kind {
                        LexerTokenKind::Increment => ">",
                        LexerTokenKind::Decrement => "<",
                        LexerTokenKind::DerefIncrement => "+",
                        LexerTokenKind::DerefDecrement => "-",
                        LexerTokenKind::Write => ".",
                        LexerTokenKind::Read => ",",
                        LexerTokenKind::JumpStart => "[",
                        LexerTokenKind::JumpEnd => "]",
                        _ => "",
                    }
                ),
            }
        }
        println!();
    }

    if commands.contains(&Commands::Check) {
        println!("{}", "Starting check".blue());
        let now = Instant::now();
        // an unbalanced program still runs, but check reports it as a failure
        let tokens = Lexer::new(&program).collect_results().inspect_err(|e| {
            eprintln!("{0:}: {1:}", "Error".red(), e);
        })?;
        println!(
            "{} {} tokens, complexity {} in {:.2?}",
            "Balanced".green(),
            tokens.len(),
            genome::complexity(&program),
            now.elapsed()
        );
    }

    if commands.contains(&Commands::Run) {
        println!("{}", "Starting run".blue());
        let now = Instant::now();
        let vm = run_program(&program, args.input.as_deref(), args.max_steps);
        println!(
            "{} {} operations in {:.2?}",
            "Finished run with".green(),
            vm.operation_count(),
            now.elapsed()
        );
        println!(
            "state {:?}, data pointer {}, code pointer {}",
            vm.state(),
            vm.data_pointer(),
            vm.code_pointer()
        );
        println!("output {:?}", vm.output());
    }

    if commands.contains(&Commands::Report) {
        let vm = run_program(&program, args.input.as_deref(), args.max_steps);
        println!("{:#?}", ExecutionReport::capture(&vm, args.pattern_len));
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    let mut rng = SmallRng::seed_from_u64(seed);

    if commands.contains(&Commands::Mutate) {
        println!("{} {}", "Mutating with seed".blue(), seed);
        let mut tape = program.clone();
        for generation in 1..=args.generations {
            match genome::mutate(&mut rng, &mut tape) {
                Some(mutation) => println!(
                    "{:>4} {:?} -> {}",
                    generation,
                    mutation,
                    display_tape(&tape)
                ),
                None => {
                    println!("{}", "Nothing to mutate in an empty tape".yellow());
                    break;
                }
            }
        }
    }

    if commands.contains(&Commands::Replicate) {
        println!("{} {}", "Replicating with seed".blue(), seed);
        let replica = genome::replicate(&mut rng, &program);
        println!(
            "{} (complexity {})",
            display_tape(&replica),
            genome::complexity(&replica)
        );
    }

    Ok(())
}
