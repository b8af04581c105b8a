use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use folio_assist::{Assistant, DocumentContext, ProviderKind};
use folio_common::config::default_config_path;
use folio_common::telemetry::{self, TelemetryConfig};
use folio_common::{Config, FileStore, SnapshotStore};
use folio_editor_core::{
    EditorDocument, Position, apply_fragment, completion, diff_lines, packages,
};
use miette::{IntoDiagnostic, Result};

mod workspace;

#[derive(Parser)]
#[command(version, about = "Folio - LaTeX editing helpers: completion, packages, diffs and an assistant", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to config file (.toml or .json)
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file and an empty workspace
    Init {
        /// Workspace file
        #[arg(long, default_value = workspace::DEFAULT_STORE)]
        store: PathBuf,

        /// Replace an existing workspace
        #[arg(long)]
        force: bool,
    },
    /// Show completions at a position in a file
    Complete {
        file: PathBuf,

        #[command(flatten)]
        at: CursorArgs,

        /// Offer completions even when nothing has been typed
        #[arg(long)]
        explicit: bool,

        /// Print every candidate instead of filtering by the typed prefix
        #[arg(long)]
        all: bool,

        #[arg(long)]
        json: bool,
    },
    /// List, add or remove \usepackage directives
    Packages {
        #[command(subcommand)]
        command: PackageCommand,
    },
    /// Line-by-line comparison of two files
    Diff {
        old: PathBuf,
        new: PathBuf,

        #[arg(long)]
        json: bool,
    },
    /// Ask the assistant about a file
    Ask {
        file: PathBuf,

        /// What to ask or request
        message: String,

        /// Provider to route to (openai, anthropic, gemini, groq)
        #[arg(short, long)]
        provider: Option<String>,

        #[command(flatten)]
        at: CursorArgs,

        /// Apply the reply's code to the file
        #[arg(long)]
        apply: bool,
    },
    /// List providers and whether a key is configured
    Providers,
    /// Manage a stored multi-file workspace
    Workspace(workspace::WorkspaceArgs),
}

#[derive(Subcommand)]
enum PackageCommand {
    List {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },
    Add {
        file: PathBuf,
        name: String,

        /// Options placed in [...]
        #[arg(long)]
        options: Option<String>,
    },
    Remove {
        file: PathBuf,
        name: String,
    },
}

#[derive(Args, Clone, Copy, Default)]
struct CursorArgs {
    /// 1-based line of the cursor (default: end of file)
    #[arg(long)]
    line: Option<usize>,

    /// 1-based column of the cursor (default: end of line)
    #[arg(long)]
    column: Option<usize>,
}

impl CursorArgs {
    /// Place the cursor in `doc`. Missing line means end of file; missing
    /// column means end of line.
    fn place(&self, doc: &mut EditorDocument) {
        match self.line {
            None => doc.set_cursor(doc.len_chars()),
            Some(line) => {
                let column = self.column.map(|c| c.saturating_sub(1)).unwrap_or(usize::MAX);
                doc.set_cursor_position(Position::new(line.saturating_sub(1), column));
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();

    let cli = Cli::parse();

    let mut telemetry_config = TelemetryConfig::from_env("folio-cli");
    if cli.verbose {
        telemetry_config = telemetry_config.with_level(tracing::Level::DEBUG);
    }
    telemetry::init(telemetry_config);

    match cli.command {
        Commands::Complete {
            file,
            at,
            explicit,
            all,
            json,
        } => complete(&file, at, explicit, all, json)?,
        Commands::Packages { command } => run_packages(command)?,
        Commands::Diff { old, new, json } => diff(&old, &new, json)?,
        Commands::Ask {
            file,
            message,
            provider,
            at,
            apply,
        } => {
            let config = load_config(cli.config.as_deref()).await?;
            ask(config, &file, &message, provider.as_deref(), at, apply).await?;
        }
        Commands::Providers => {
            let config = load_config(cli.config.as_deref()).await?;
            providers(&config);
        }
        Commands::Init { store, force } => init(cli.config.as_deref(), &store, force).await?,
        Commands::Workspace(args) => workspace::run(args).await?,
    }

    Ok(())
}

fn config_path(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(default_config_path()?),
    }
}

async fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut config = Config::load(&FileStore::new(config_path(path)?)).await?;
    config.apply_env();
    Ok(config)
}

async fn init(config: Option<&Path>, store: &Path, force: bool) -> Result<()> {
    let config_path = config_path(config)?;
    if tokio::fs::try_exists(&config_path).await.into_diagnostic()? {
        println!("Config already at {}", config_path.display());
    } else {
        let file = FileStore::new(&config_path);
        Config::default().save(&file).await?;
        println!("✓ Wrote config to {}", config_path.display());
    }

    let store = SnapshotStore::new(store.to_path_buf());
    if workspace::init(&store, force).await? {
        println!("✓ Created workspace at {}", store.path().display());
    } else {
        println!("Workspace already at {} (use --force to replace)", store.path().display());
    }
    Ok(())
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .map_err(|e| e.wrap_err(format!("could not read {}", path.display())))
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)
        .into_diagnostic()
        .map_err(|e| e.wrap_err(format!("could not write {}", path.display())))
}

fn print_json(value: &impl serde::Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn complete(file: &Path, at: CursorArgs, explicit: bool, all: bool, json: bool) -> Result<()> {
    let text = read_file(file)?;
    let mut doc = EditorDocument::new(&text, 1);
    at.place(&mut doc);

    let Some(mut result) = doc.completions(explicit) else {
        if json {
            println!("null");
        } else {
            println!("No completions here (use --explicit to force)");
        }
        return Ok(());
    };
    if !all {
        result.options = completion::rank(&result.options, &result.typed);
    }

    if json {
        return print_json(&result);
    }

    let from = doc.position_of(result.from);
    println!(
        "{:?} completion for {:?} at {}:{}",
        result.context,
        result.typed,
        from.line + 1,
        from.column + 1
    );
    for option in &result.options {
        match option.detail {
            Some(detail) => println!("  {:<24} {detail}", option.label),
            None => println!("  {}", option.label),
        }
    }
    Ok(())
}

fn run_packages(command: PackageCommand) -> Result<()> {
    match command {
        PackageCommand::List { file, json } => {
            let found = packages::installed_packages(&read_file(&file)?);
            if json {
                return print_json(&found);
            }
            if found.is_empty() {
                println!("No packages in {}", file.display());
            }
            for package in found {
                let options = package
                    .options
                    .map(|o| format!(" [{o}]"))
                    .unwrap_or_default();
                println!("{:>4}  {}{options}", package.line + 1, package.name);
            }
        }
        PackageCommand::Add {
            file,
            name,
            options,
        } => {
            let updated = packages::add_package(&read_file(&file)?, &name, options.as_deref())?;
            write_file(&file, &updated)?;
            println!("✓ Added {name}");
        }
        PackageCommand::Remove { file, name } => {
            let updated = packages::remove_package(&read_file(&file)?, &name)?;
            write_file(&file, &updated)?;
            println!("✓ Removed {name}");
        }
    }
    Ok(())
}

fn diff(old: &Path, new: &Path, json: bool) -> Result<()> {
    let old_text = read_file(old)?;
    let new_text = read_file(new)?;
    let diff = diff_lines(&old_text, &new_text);
    if json {
        return print_json(&diff);
    }
    print!("{diff}");
    let summary = diff.summary();
    println!(
        "{} modified, {} added, {} removed, {} unchanged",
        summary.modified, summary.added, summary.removed, summary.unchanged
    );
    Ok(())
}

async fn ask(
    config: Config,
    file: &Path,
    message: &str,
    provider: Option<&str>,
    at: CursorArgs,
    apply: bool,
) -> Result<()> {
    let text = read_file(file)?;
    let undo_depth = config.editor.undo_depth;
    let assistant = Assistant::new(config);
    let kind: ProviderKind = match provider {
        Some(name) => name.parse()?,
        None => assistant.default_provider()?,
    };

    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());
    let context = DocumentContext::new(filename, text.clone());

    println!("→ Asking {}...", kind.display_name());
    let reply = assistant.ask(kind, &context, message).await?;
    println!("{}", reply.text);

    if !apply {
        return Ok(());
    }
    let Some(fragment) = reply.primary_fragment() else {
        println!("⚠ Reply has no code to apply");
        return Ok(());
    };

    let mut doc = EditorDocument::new(&text, undo_depth);
    at.place(&mut doc);
    let (placement, _) = apply_fragment(&mut doc, fragment);
    write_file(file, &doc.content())?;
    println!("✓ Applied ({placement:?}) to {}", file.display());
    Ok(())
}

fn providers(config: &Config) {
    for kind in ProviderKind::ALL {
        let settings = config.provider(kind.name());
        let has_key = settings.is_some_and(|s| s.api_key.is_some());
        let model = settings
            .and_then(|s| s.model.as_deref())
            .unwrap_or(kind.default_model());
        let marker = if kind.name() == config.default_provider {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {:<10} {:<28} {}",
            kind.name(),
            model,
            if has_key {
                "key configured".to_owned()
            } else {
                format!("no key (set {})", kind.api_key_env())
            }
        );
    }
}

fn init_miette() {
    let hook = miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(3)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }));
    if hook.is_err() {
        eprintln!("couldn't set the miette hook");
    }
    miette::set_panic_hook();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn cursor_args_are_one_based() {
        let mut doc = EditorDocument::new("ab\ncd\n", 1);
        CursorArgs {
            line: Some(2),
            column: Some(2),
        }
        .place(&mut doc);
        assert_eq!(doc.cursor(), 4);

        CursorArgs {
            line: Some(1),
            column: None,
        }
        .place(&mut doc);
        assert_eq!(doc.cursor(), 2);

        CursorArgs::default().place(&mut doc);
        assert_eq!(doc.cursor(), 6);
    }

    #[test]
    fn ask_flags() {
        let cli = Cli::try_parse_from([
            "folio", "ask", "main.tex", "add a table", "-p", "groq", "--line", "3", "--apply",
        ])
        .unwrap();
        match cli.command {
            Commands::Ask {
                provider,
                at,
                apply,
                ..
            } => {
                assert_eq!(provider.as_deref(), Some("groq"));
                assert_eq!(at.line, Some(3));
                assert!(apply);
            }
            _ => panic!("expected ask"),
        }
    }
}
