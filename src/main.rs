use clap::{Parser as ClapParser, Subcommand};
use dynexpr::EvalOptions;
use dynexpr::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "dynexpr")]
#[command(about = "dynexpr - evaluate dynamic expressions against JSON data")]
#[command(version)]
struct Cli {
    /// Log evaluation steps to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Maximum nesting depth accepted by the parser
    #[arg(long, global = true, default_value_t = EvalOptions::default().max_depth)]
    max_depth: usize,

    /// Maximum height of the expression tree (operators and member chains)
    #[arg(long, global = true, default_value_t = EvalOptions::default().max_height)]
    max_height: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an expression
    Eval {
        /// The expression to evaluate
        expression: String,

        /// JSON root object (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Validate syntax and print the parenthesised tree
    Check {
        /// The expression to validate
        expression: String,
    },

    /// Print the token stream
    Tokens {
        /// The expression to tokenize
        expression: String,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Ignore the error if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let eval = EvalOptions {
        max_depth: cli.max_depth,
        max_height: cli.max_height,
    };

    let result = match cli.command {
        Commands::Eval {
            expression,
            input,
            pretty,
        } => run_eval(expression, input, pretty, eval),
        Commands::Check { expression } => run_check(expression, eval),
        Commands::Tokens { expression } => {
            for line in cli::token_listing(&expression) {
                println!("{}", line);
            }
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_eval(
    expression: String,
    input: Option<String>,
    pretty: bool,
    eval: EvalOptions,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer).filter(|s| !s.trim().is_empty())
        }
        None => None,
    };

    let options = CheckOptions {
        expression,
        input,
        syntax_only: false,
        eval,
    };

    if let CheckResult::Success(output) = cli::execute_check(&options)? {
        let json = if pretty {
            serde_json::to_string_pretty(&output)
        } else {
            serde_json::to_string(&output)
        }?;
        println!("{}", json);
    }
    Ok(())
}

fn run_check(expression: String, eval: EvalOptions) -> Result<(), CliError> {
    let options = CheckOptions {
        expression,
        input: None,
        syntax_only: true,
        eval,
    };

    if let CheckResult::SyntaxValid(tree) = cli::execute_check(&options)? {
        println!("Syntax is valid: {}", tree);
    }
    Ok(())
}
