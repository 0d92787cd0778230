use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, WrapErr};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use ntr_core::commands::NO_TEST_TO_RUN;
use ntr_core::{
    build_exact_pattern, discover, provide_code_lenses, resolve_run_target, ActiveEditor, CommandArgs, Config,
    Document, FileUri, Invocation, RunTarget,
};

mod console;
mod host;

#[derive(Parser)]
#[command(name = "ntr")]
#[command(about = "Run node:test declarations in per-workspace terminal sessions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List test declarations in a file or directory
    List {
        /// File or directory to scan
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the exact-match name pattern for a test name
    Pattern {
        /// Test name as written in source
        name: String,
    },
    /// Print the code lenses of a file as JSON
    Lenses {
        file: PathBuf,
    },
    /// Print the command line a run would send
    Command(TargetArgs),
    /// Run a test or file in a session and wait for it to close
    Run {
        #[command(flatten)]
        target: TargetArgs,
        /// Workspace root; may be repeated
        #[arg(long = "workspace", short = 'w')]
        workspaces: Vec<PathBuf>,
    },
    /// Serve JSON command requests read from stdin, one per line
    Session {
        /// Workspace root; may be repeated
        #[arg(long = "workspace", short = 'w')]
        workspaces: Vec<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

#[derive(Args)]
struct TargetArgs {
    /// Test file
    file: PathBuf,
    /// Name of the test to run
    #[arg(long, short = 'n', conflicts_with = "line")]
    name: Option<String>,
    /// 1-based line; runs the declaration at or above it
    #[arg(long, short = 'l')]
    line: Option<usize>,
    /// Run in watch mode
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ntr_core=info,ntr=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load().wrap_err("Failed to load configuration")?;

    match cli.command {
        Commands::List { path, json } => handle_list(&path, json, &config)?,
        Commands::Pattern { name } => println!("{}", build_exact_pattern(&name)),
        Commands::Lenses { file } => handle_lenses(&file, &config)?,
        Commands::Command(target) => {
            let resolved = resolve_target(&target)?;
            let invocation = Invocation::new(resolved.file.fs_path())
                .with_test_name(resolved.test_name)
                .with_watch(target.watch);
            println!("{}", invocation.command_line(&config.runner));
        }
        Commands::Run { target, workspaces } => {
            let watch = target.watch;
            let resolved = resolve_target(&target)?;
            host::run_once(config, workspace_roots(workspaces)?, resolved, watch).await?;
        }
        Commands::Session { workspaces } => {
            host::serve(config, workspace_roots(workspaces)?).await?;
        }
        Commands::Config => print!("{}", config.to_toml_string()),
    }

    Ok(())
}

fn handle_list(path: &Path, json: bool, config: &Config) -> color_eyre::Result<()> {
    let found = discover(path, &config.documents).wrap_err_with(|| format!("Failed to scan {}", path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&found)?);
        return Ok(());
    }

    if found.is_empty() {
        println!("No test declarations found.");
        return Ok(());
    }

    for file in &found {
        println!("{}", file.path.display());
        for declaration in &file.declarations {
            println!("  {:>4}  {}", declaration.line + 1, declaration.name);
        }
    }
    Ok(())
}

fn handle_lenses(file: &Path, config: &Config) -> color_eyre::Result<()> {
    let document = Document::open(absolute(file)?).wrap_err_with(|| format!("Failed to read {}", file.display()))?;
    let lenses = provide_code_lenses(&document, &config.documents);
    println!("{}", serde_json::to_string_pretty(&lenses)?);
    Ok(())
}

/// The file and optional test name selected on the command line.
fn resolve_target(target: &TargetArgs) -> color_eyre::Result<RunTarget> {
    let file = FileUri::file(absolute(&target.file)?);

    if let Some(name) = &target.name {
        return Ok(RunTarget {
            file,
            test_name: Some(name.clone()),
        });
    }

    let Some(line) = target.line else {
        return Ok(RunTarget { file, test_name: None });
    };

    let document = Document::open(file.fs_path())
        .wrap_err_with(|| format!("Failed to read {}", target.file.display()))?;
    let editor = ActiveEditor::new(document, line.saturating_sub(1));
    resolve_run_target(&CommandArgs::None, &editor).ok_or_else(|| eyre!(NO_TEST_TO_RUN))
}

/// Canonical workspace roots, defaulting to the current directory.
fn workspace_roots(paths: Vec<PathBuf>) -> color_eyre::Result<Vec<PathBuf>> {
    if paths.is_empty() {
        return Ok(vec![absolute(&std::env::current_dir()?)?]);
    }

    paths
        .iter()
        .map(|path| {
            if !path.is_dir() {
                bail!("Workspace root is not a directory: {}", path.display());
            }
            absolute(path)
        })
        .collect()
}

fn absolute(path: &Path) -> color_eyre::Result<PathBuf> {
    std::fs::canonicalize(path).wrap_err_with(|| format!("Cannot resolve {}", path.display()))
}
