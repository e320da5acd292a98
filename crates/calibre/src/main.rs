use std::io::{self, Write as _};
use std::process::ExitCode;

use anyhow::Context;
use calibre_db::{FileParse as _, RootDatabase, check_file};
use calibre_errors::{Diagnostic, Renderer};
use calibre_inputs::File;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(version, about = "Parser tooling for calibre sources")]
struct Options {
    /// Render diagnostics without colors. Also enabled by `NO_COLOR`.
    #[arg(long, global = true)]
    plain: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the concrete syntax tree.
    Parse {
        path: Utf8PathBuf,
        /// Also list syntax errors below the tree.
        #[arg(long)]
        errors: bool,
    },
    /// Print the significant tokens, one per line.
    Tokens { path: Utf8PathBuf },
    /// Report diagnostics. Exits with a failure status if there are any.
    Check { path: Utf8PathBuf },
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let options = Options::parse();
    let renderer = if options.plain || std::env::var_os("NO_COLOR").is_some() {
        Renderer::plain()
    } else {
        Renderer::styled()
    };

    let db = RootDatabase::default();
    let mut stdout = io::stdout().lock();

    match options.command {
        Command::Parse { path, errors } => {
            let file = load(&db, path)?;
            let parse = file.parse(&db);
            let dump = if errors { parse.debug_dump() } else { parse.tree().debug_dump() };
            write!(stdout, "{dump}")?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Tokens { path } => {
            let file = load(&db, path)?;
            let text = file.text(&db);
            let (tokens, errors) = calibre_parse::tokenize(text);
            for token in tokens {
                writeln!(stdout, "{:?}@{:?} {:?}", token.kind, token.range, &text[token.range])?;
            }
            report(&db, file, &renderer, &errors);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { path } => {
            let file = load(&db, path)?;
            let diagnostics = check_file(&db, file);
            report(&db, file, &renderer, diagnostics);
            Ok(if diagnostics.is_empty() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
    }
}

fn load(db: &RootDatabase, path: Utf8PathBuf) -> anyhow::Result<File> {
    let text =
        std::fs::read_to_string(&path).with_context(|| format!("failed to read `{path}`"))?;
    Ok(File::new(db, path, text))
}

fn report(db: &RootDatabase, file: File, renderer: &Renderer, diagnostics: &[Diagnostic]) {
    let path = file.path(db).as_str();
    let text = file.text(db);

    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.render(renderer, path, text));
    }
}
