use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use kimchi::{
    config::{load_exclusions, load_translations},
    jar::{
        analysis::{archive_contains, archive_literals, compare_jars},
        io::patch_jar,
        types::RewriteOptions,
    },
    types::{ProcessingEvent, StageProgress},
};

/// Translate string literals inside JAR class files
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite string literals of every class in a jar
    Patch(PatchArgs),
    /// List translatable literals
    Strings {
        /// Input JAR
        jar: PathBuf,

        /// Only this class entry, e.g. com/example/Main.class
        #[arg(long)]
        class: Option<String>,
    },
    /// Check that a text made it into a jar
    Verify {
        /// Patched JAR
        jar: PathBuf,

        text: String,
    },
    /// List class entries that differ between two jars
    Compare {
        old: PathBuf,
        new: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
struct PatchArgs {
    /// Input JAR
    jar_in: PathBuf,

    /// Output JAR, defaults to patching the input in place
    jar_out: Option<PathBuf>,

    /// Translation file, later files override earlier ones
    #[arg(short, long = "translations", required = true)]
    translations: Vec<PathBuf>,

    /// Exclusion file
    #[arg(short = 'x', long = "exclusions")]
    exclusions: Vec<PathBuf>,

    /// Rewrite classes whose member tables cannot be read, protecting only
    /// the names found in the constant pool
    #[arg(long)]
    pool_only_fallback: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Patch(args) => patch(args),
        Command::Strings { jar, class } => strings(jar, class),
        Command::Verify { jar, text } => verify(jar, text),
        Command::Compare { old, new, json } => compare(old, new, json),
    }
}

fn patch(args: PatchArgs) -> anyhow::Result<()> {
    let translations = load_translations(&args.translations)?;
    let exclusions = load_exclusions(&args.exclusions, true)?;
    let options = if args.pool_only_fallback {
        RewriteOptions::pool_only_fallback()
    } else {
        RewriteOptions::default()
    };
    let jar_out = args.jar_out.unwrap_or_else(|| args.jar_in.clone());

    info!(
        "Loaded {} translations, {} blocked classes, {} blocked strings",
        translations.len(),
        exclusions.blocked_classes.len(),
        exclusions.blocked_strings.len()
    );

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{msg:18} [{bar:30}] {percent:>3}%")?.progress_chars("=>-"),
    );

    let stats = patch_jar(
        &args.jar_in,
        &jar_out,
        &translations,
        &exclusions,
        &options,
        |event: ProcessingEvent| {
            bar.set_message(event.stage.as_str());
            match event.progress {
                StageProgress::Percentage(value) => bar.set_position((value * 100.0) as u64),
                StageProgress::Done => bar.set_position(100),
                StageProgress::Unknown => {}
            }
        },
    );
    bar.finish_and_clear();
    let stats = stats.with_context(|| format!("Patching {} failed", args.jar_in.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} {} of {} classes patched, {} unchanged",
        "Done:".green().bold(),
        stats.patched,
        stats.total,
        stats.unchanged()
    );
    if stats.errors > 0 {
        println!(
            "{} {} classes could not be parsed and were kept as is",
            "Warning:".yellow().bold(),
            stats.errors
        );
    }
    println!("Written to {}", jar_out.display());

    Ok(())
}

fn strings(jar: PathBuf, class: Option<String>) -> anyhow::Result<()> {
    let literals = archive_literals(&jar, &RewriteOptions::default())?;

    for (name, strings) in &literals {
        if class.as_deref().is_some_and(|wanted| wanted != name.as_str()) {
            continue;
        }
        println!("{}", name.cyan());
        for text in strings {
            println!("  {:?}", text);
        }
    }

    if let Some(wanted) = class {
        if !literals.contains_key(&wanted) {
            bail!("No literals found in {}", wanted);
        }
    }

    Ok(())
}

fn verify(jar: PathBuf, text: String) -> anyhow::Result<()> {
    match archive_contains(&jar, &text)? {
        Some(class) => {
            println!("{} found in {}", "OK:".green().bold(), class);
            Ok(())
        }
        None => bail!("{:?} not found in {}", text, jar.display()),
    }
}

fn compare(old: PathBuf, new: PathBuf, json: bool) -> anyhow::Result<()> {
    let diff = compare_jars(&old, &new)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
        return Ok(());
    }

    for name in &diff.changed {
        println!("{} {}", "~".yellow(), name);
    }
    for name in &diff.removed {
        println!("{} {}", "-".red(), name);
    }
    for name in &diff.added {
        println!("{} {}", "+".green(), name);
    }
    if diff.is_empty() {
        println!("No class differences");
    }

    Ok(())
}
