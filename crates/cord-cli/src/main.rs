//! `cord`: run a script, evaluate a one-liner, or start the REPL.

mod repl;

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::{Parser as ClapParser, Subcommand};

use cord_compiler::{compile, Parser as CordParser};
use cord_runtime::{exec, Context, IoAdapters, RuntimeBuilder};

#[derive(ClapParser)]
#[command(name = "cord")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the Cord concatenative language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Intern symbols sharing one allocation per identifier
    #[arg(long, global = true)]
    intern_symbols: bool,

    /// Additional directories to search when resolving `import`.
    /// `CORD_MODULE_PATH` (OS path-list separated) is also consulted and
    /// appended after these.
    #[arg(long = "module-path", value_name = "DIR", global = true)]
    module_path: Vec<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Cord source file
    Run {
        /// Input source file
        file: PathBuf,
    },
    /// Evaluate a single expression and print the resulting stack
    Eval {
        /// Cord source text
        source: String,
    },
    /// Start an interactive REPL
    Repl,
}

/// Exit codes: `0` success, `1` an uncaught top-level error (from
/// `run_source`/`run_file`, via `ExitCode::FAILURE`), `2` command-line
/// misuse. Code `2` isn't produced here explicitly — `Cli::parse()` below
/// already terminates the process with it on a usage error before `main`'s
/// body would otherwise return.
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let module_path = resolve_module_path(cli.module_path);

    let runtime = RuntimeBuilder::new()
        .intern_symbols(cli.intern_symbols)
        .io(IoAdapters::default())
        .module_loader(Box::new(cord_compiler::SourceModuleLoader::new(module_path)))
        .build();

    match cli.command.unwrap_or(Commands::Repl) {
        Commands::Run { file } => run_file(runtime, &file),
        Commands::Eval { source } => run_source(runtime, &source, "<eval>", true),
        Commands::Repl => {
            repl::run(runtime);
            ExitCode::SUCCESS
        }
    }
}

/// `--module-path` entries come first (highest priority), followed by every
/// directory named in `CORD_MODULE_PATH` (colon-separated on POSIX,
/// semicolon-separated on Windows — `env::split_paths` already knows which),
/// falling back to the current directory when neither is set.
fn resolve_module_path(explicit: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut path = explicit;
    if let Some(from_env) = std::env::var_os("CORD_MODULE_PATH") {
        path.extend(std::env::split_paths(&from_env));
    }
    if path.is_empty() {
        path.push(PathBuf::from("."));
    }
    path
}

fn run_file(runtime: Rc<cord_runtime::Runtime>, file: &std::path::Path) -> ExitCode {
    tracing::info!(file = %file.display(), "running script");
    let source = match cord_compiler::read_source_file(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("cord: cannot read {}: {e}", file.display());
            return ExitCode::FAILURE;
        }
    };
    run_source(runtime, &source, &file.display().to_string(), false)
}

fn run_source(
    runtime: Rc<cord_runtime::Runtime>,
    source: &str,
    filename: &str,
    print_stack: bool,
) -> ExitCode {
    let tokens = match CordParser::new(source, filename).parse() {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("cord: {e}");
            return ExitCode::FAILURE;
        }
    };
    let values = compile(&tokens, &runtime);
    let mut ctx = Context::new(runtime);
    for value in &values {
        if !exec(&mut ctx, value) {
            if let Some(err) = ctx.current_error() {
                eprintln!("cord: {err}");
            }
            return ExitCode::FAILURE;
        }
    }
    if print_stack {
        repl::print_stack(&ctx);
    }
    ExitCode::SUCCESS
}
