use clap::Parser;
use log::info;
use notacalc::{evaluate, evaluate_simple, EvalOutcome, Notation};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

/// Evaluates arithmetic expressions in infix, prefix, or postfix notation.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Options {
    /// Notation of the expressions: infix, prefix (pn), or postfix (rpn)
    #[arg(short, long, default_value = "infix")]
    notation: Notation,

    /// Expression to evaluate. Without expression an interactive session is started.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    expression: Vec<String>,
}

const HELP: &str = "commands: :infix, :prefix, :postfix, :simple A B OP, :help, :quit";

enum Command<'a> {
    Switch(Notation),
    Simple(&'a str, &'a str, &'a str),
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> Option<Command<'_>> {
    let rest = line.strip_prefix(':')?;
    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or("");
    Some(match name {
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "help" => Command::Help,
        "simple" => match (words.next(), words.next(), words.next()) {
            (Some(a), Some(b), Some(op)) => Command::Simple(a, b, op),
            _ => Command::Unknown(line),
        },
        _ => match name.parse::<Notation>() {
            Ok(notation) => Command::Switch(notation),
            Err(_) => Command::Unknown(line),
        },
    })
}

fn print_outcome(outcome: &EvalOutcome) {
    match outcome {
        EvalOutcome::Ok(_) => println!("{outcome}"),
        EvalOutcome::Err(_) => eprintln!("Error {outcome}"),
    }
}

fn repl(mut notation: Notation) -> io::Result<()> {
    let mut buffer = String::new();
    let mut stdout = io::stdout();
    let mut stdin = io::stdin().lock();
    loop {
        stdout.write_all(format!("{notation}> ").as_bytes())?;
        stdout.flush()?;
        buffer.clear();
        if stdin.read_line(&mut buffer)? == 0 {
            // end of input
            println!();
            return Ok(());
        }
        let line = buffer.trim();
        if line.is_empty() {
            continue;
        }
        match parse_command(line) {
            Some(Command::Quit) => return Ok(()),
            Some(Command::Help) => println!("{HELP}"),
            Some(Command::Switch(new_notation)) => {
                info!("switching from {} to {}", notation, new_notation);
                notation = new_notation;
            }
            Some(Command::Simple(a, b, op)) => print_outcome(&evaluate_simple(a, b, op)),
            Some(Command::Unknown(cmd)) => eprintln!("unknown command {cmd}, {HELP}"),
            None => print_outcome(&evaluate(line, notation)),
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let options = Options::parse();
    if options.expression.is_empty() {
        match repl(options.notation) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error {e}");
                ExitCode::FAILURE
            }
        }
    } else {
        let outcome = evaluate(&options.expression.join(" "), options.notation);
        print_outcome(&outcome);
        if outcome.is_ok() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}
