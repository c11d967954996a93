//! Able CLI
//!
//! Runs scripts that the Able parser has already turned into a JSON syntax
//! tree. Usage: `able run FILE.json` or `able check FILE.json`.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use able::ast::{Program, Stmt};
use able::{EvalContext, EvalError, Interpreter, ModuleLoader, Value, DEFAULT_MAX_CALL_DEPTH};

/// Able - run scripts from their syntax tree
#[derive(Parser)]
#[command(name = "able")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluation runtime for the Able scripting language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a script
    Run {
        /// JSON syntax tree of the script
        file: PathBuf,

        /// Maximum call depth before a stack overflow is reported
        #[arg(long = "max-depth", default_value_t = DEFAULT_MAX_CALL_DEPTH)]
        max_depth: usize,

        /// Log every executed statement to stderr
        #[arg(long)]
        trace: bool,
    },

    /// Load a syntax tree without running it
    Check {
        /// JSON syntax tree of the script
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let trace = matches!(cli.command, Command::Run { trace: true, .. });
    init_tracing(trace);

    let result = match cli.command {
        Command::Run {
            file,
            max_depth,
            trace,
        } => handle_run(&file, max_depth, trace),
        Command::Check { file } => handle_check(&file),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<EvalError>() {
                Some(eval_error) => eprintln!("{}", eval_error.report()),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

/// Install a stderr subscriber when `RUST_LOG` is set or `--trace` is given.
fn init_tracing(trace: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if trace {
        EnvFilter::new("able=trace")
    } else {
        return;
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .init();
}

fn load_program(path: &Path) -> Result<Program> {
    let source =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&source)
        .with_context(|| format!("failed to parse syntax tree in {}", path.display()))
}

fn handle_run(path: &Path, max_depth: usize, trace: bool) -> Result<()> {
    let program = load_program(path)?;
    debug!(file = %path.display(), nodes = program.node_count(), "loaded program");

    let ctx = EvalContext::with_max_call_depth(max_depth).with_trace(trace);
    let mut interp = Interpreter::with_context(ctx);
    interp
        .global_env()
        .set("__file__", Value::string(path.display().to_string()));
    let root = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();
    interp.set_module_loader(Box::new(JsonModuleLoader { root }));

    interp.run_program(&program)?;
    Ok(())
}

fn handle_check(path: &Path) -> Result<()> {
    let program = load_program(path)?;
    println!(
        "{}: {} statements, {} nodes",
        path.display(),
        program.statements.len(),
        program.node_count()
    );
    Ok(())
}

/// Resolves `import a/b` to `a/b.json` next to the running script.
struct JsonModuleLoader {
    root: PathBuf,
}

impl ModuleLoader for JsonModuleLoader {
    fn load(&mut self, module: &str) -> able::Result<Vec<Stmt>> {
        let path = self.root.join(format!("{module}.json"));
        let load_error = |message: String| EvalError::ModuleLoad {
            module: module.to_string(),
            message,
            span: None,
        };
        let source = fs::read_to_string(&path)
            .map_err(|e| load_error(format!("{}: {}", path.display(), e)))?;
        let program: Program = serde_json::from_str(&source)
            .map_err(|e| load_error(format!("{}: {}", path.display(), e)))?;
        Ok(program.statements)
    }
}
