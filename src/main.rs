use clap::{Parser as ClapParser, Subcommand};
use log::LevelFilter;
use objfilter::cli::{self, CheckOptions, CheckResult, CliError, ExpanderKind};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "objfilter")]
#[command(about = "objfilter - filter structured records with a compact query language")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query and filter JSON records with it
    Check {
        /// The query to run
        query: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// How path segments are looked up
        #[arg(short, long, value_enum, default_value_t = ExpanderKind::Attribute)]
        expander: ExpanderKind,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only parse and compile, print the filter tree
        #[arg(long)]
        syntax_only: bool,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'objfilter docs' to list categories)
        category: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            query,
            input,
            expander,
            pretty,
            syntax_only,
        } => run_check(CheckOptions {
            query,
            input,
            pretty,
            syntax_only,
            expander,
        }),
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run_check(mut options: CheckOptions) -> Result<(), CliError> {
    if options.input.is_none() && !options.syntax_only && !atty::is(atty::Stream::Stdin) {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        options.input = Some(buffer);
    }

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid(tree) => println!("{}", tree),
        CheckResult::Success(output) => {
            let json = if options.pretty {
                serde_json::to_string_pretty(&output)
            } else {
                serde_json::to_string(&output)
            }?;
            println!("{}", json);
        }
    }
    Ok(())
}
