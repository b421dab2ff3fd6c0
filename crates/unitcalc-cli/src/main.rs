//! unitcalc - Command-line calculator for dimensioned quantities
//!
//! Usage:
//!   unitcalc "[2 lb/ft^2] * [3 ft]"        # Single expression
//!   echo "[6 ft] * 2" | unitcalc           # Pipe mode
//!   unitcalc -f wall.calc -p wall.json     # File mode with parameters
//!   unitcalc -i                            # Interactive REPL

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::{debug, Level};
use unitcalc_core::{Calculator, DisplayConfig, Markup, Parameters, Value};

#[derive(Parser, Debug)]
#[command(name = "unitcalc")]
#[command(about = "A calculator for quantities with units", long_about = None)]
struct Args {
    /// Expression to evaluate
    expression: Option<String>,

    /// Read expressions from file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Load named values from a JSON parameter document
    #[arg(short, long, value_name = "PARAMS")]
    params: Option<PathBuf>,

    /// Interactive REPL mode
    #[arg(short, long)]
    interactive: bool,

    /// Show only the result (no input echo)
    #[arg(short, long)]
    quiet: bool,

    /// Decimal places for results (0-64)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u8).range(..=64))]
    digits: Option<u8>,

    /// Unit symbol order, e.g. lb,ft
    #[arg(long, value_delimiter = ',', value_name = "SYMBOLS")]
    order: Vec<String>,

    /// Render results as LaTeX
    #[arg(long)]
    latex: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn display_config(&self, base: DisplayConfig) -> DisplayConfig {
        let mut display = base;
        if self.latex {
            display = display.with_markup(Markup::Latex);
        }
        if let Some(digits) = self.digits {
            display = display.with_digits(usize::from(digits));
        }
        if !self.order.is_empty() {
            display = display.with_order(self.order.iter().cloned());
        }
        display
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut calc = match &args.params {
        Some(path) => {
            let params = Parameters::from_path(path)
                .with_context(|| format!("Failed to load parameters from {}", path.display()))?;
            debug!(count = params.len(), "parameters loaded");
            let display = args.display_config(params.display().clone());
            let mut calc = Calculator::with_parameters(params);
            calc.set_display(display);
            calc
        }
        None => {
            let mut calc = Calculator::new();
            calc.set_display(args.display_config(DisplayConfig::plain()));
            calc
        }
    };

    // Determine input source
    if let Some(expr) = &args.expression {
        // Single expression mode
        eval_and_print(&mut calc, expr, args.quiet)?;
    } else if let Some(path) = &args.file {
        // File mode
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        eval_lines(&mut calc, content.lines().map(|l| io::Result::Ok(l.to_string())), args.quiet)?;
    } else if args.interactive {
        // Interactive REPL
        run_repl(&mut calc, args.quiet)?;
    } else if !io::stdin().is_terminal() {
        // Pipe mode (stdin is not a tty)
        let stdin = io::stdin();
        eval_lines(&mut calc, stdin.lock().lines(), args.quiet)?;
    } else {
        // No input, show help
        eprintln!("Usage: unitcalc <expression>");
        eprintln!("       unitcalc -f <file> [-p <params.json>]");
        eprintln!("       unitcalc -i");
        eprintln!("       echo \"[6 ft] * 2\" | unitcalc");
        std::process::exit(1);
    }

    Ok(())
}

/// Evaluate lines in order, stopping at the first failure
fn eval_lines(
    calc: &mut Calculator,
    lines: impl Iterator<Item = io::Result<String>>,
    quiet: bool,
) -> Result<()> {
    for (number, line) in lines.enumerate() {
        let line = line?;
        eval_and_print(calc, &line, quiet).with_context(|| format!("line {}", number + 1))?;
    }
    Ok(())
}

fn render(calc: &Calculator, value: &Value) -> String {
    value.render(calc.display())
}

fn eval_and_print(calc: &mut Calculator, input: &str, quiet: bool) -> Result<()> {
    let result = calc.eval(input)?;

    match result {
        Some(value) if quiet => println!("{}", render(calc, &value)),
        Some(value) => {
            // Pad input to align results
            let padding = 40usize.saturating_sub(input.len());
            println!(
                "{}{:>width$} = {}",
                input,
                "",
                render(calc, &value),
                width = padding
            );
        }
        None if quiet => {}
        None => println!("{input}"),
    }
    Ok(())
}

fn run_repl(calc: &mut Calculator, quiet: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("unitcalc - Quantity Calculator");
    println!("Type expressions to calculate. Press Ctrl+D to exit.\n");

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            println!();
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // Special commands
        match line.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "clear" => {
                calc.clear();
                println!("Cleared.");
                continue;
            }
            "help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        if let Err(e) = eval_and_print(calc, line, quiet) {
            eprintln!("error: {e}");
        }
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"
Commands:
  help     Show this help
  clear    Clear all variables and history
  quit     Exit the REPL

Examples:
  [2 lb/ft^2] * [3 ft]          Quantity arithmetic
  H = [6 ft]                    Variable assignment
  0.5 * [120 lb/ft^3] * H^2     Use variable
  fos = [1.62]                  Dimensionless value
  fos >= 1.5                    Comparison
  deg(45) + deg(10)             Angles in degrees
  tan(deg(45))                  Trigonometry
  digits(H / [7 sec], 1)        Decimal places override
"#
    );
}
