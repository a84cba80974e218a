use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use similar::{ChangeTag, TextDiff};
use std::fs;
use std::path::{Path, PathBuf};
use tsx_sweep::config::{discover_rule_files, load_from_path};
use tsx_sweep::rules::{preset, RuleSet};
use tsx_sweep::{locate, Rewriter, RewriteResult};

#[derive(Parser)]
#[command(name = "tsx-sweep")]
#[command(about = "Batch regex rewriter for React/TSX page components", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite every file matching the glob pattern in place
    Run {
        /// Glob pattern selecting the files to rewrite
        #[arg(default_value = preset::DEFAULT_PATTERN)]
        pattern: String,

        /// Rule file (.toml) or directory of rule files (built-in rules if omitted)
        #[arg(short, long)]
        rules: Option<PathBuf>,

        /// Dry run - classify files without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Show unified diff of changes
        #[arg(short, long)]
        diff: bool,
    },

    /// Report which files would change, without writing
    Check {
        /// Glob pattern selecting the files to inspect
        #[arg(default_value = preset::DEFAULT_PATTERN)]
        pattern: String,

        /// Rule file (.toml) or directory of rule files (built-in rules if omitted)
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },

    /// List the active rules and what they do
    List {
        /// Rule file (.toml) or directory of rule files (built-in rules if omitted)
        #[arg(short, long)]
        rules: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            pattern,
            rules,
            dry_run,
            diff,
        } => cmd_run(&pattern, rules, dry_run, diff),

        Commands::Check { pattern, rules } => cmd_check(&pattern, rules),

        Commands::List { rules } => cmd_list(rules),
    }
}

/// Resolve the active rule set: built-in cleanup rules, a single rule file,
/// or every `.toml` file in a directory (sorted, concatenated in order).
fn resolve_rules(source: Option<PathBuf>) -> Result<(RuleSet, String)> {
    let Some(path) = source else {
        return Ok((preset::page_cleanup(), "built-in page cleanup".to_string()));
    };

    if path.is_dir() {
        let files = discover_rule_files(&path);
        if files.is_empty() {
            anyhow::bail!("no .toml rule files found in {}", path.display());
        }

        let mut rules = RuleSet::new();
        for file in &files {
            let loaded = load_from_path(file)?;
            rules.extend(loaded.compile()?);
        }
        return Ok((rules, format!("{} ({} files)", path.display(), files.len())));
    }

    let loaded = load_from_path(&path)?;
    let label = if loaded.meta.name.is_empty() {
        path.display().to_string()
    } else {
        loaded.meta.name.clone()
    };
    Ok((loaded.compile()?, label))
}

/// Show a unified diff between original and rewritten content.
fn display_diff(file: &Path, original: &str, modified: &str) {
    println!(
        "\n{}",
        format!("--- {} (original)", file.display()).dimmed()
    );
    println!("{}", format!("+++ {} (rewritten)", file.display()).dimmed());

    let diff = TextDiff::from_lines(original, modified);

    for change in diff.iter_all_changes() {
        let sign = match change.tag() {
            ChangeTag::Delete => format!("-{}", change).red(),
            ChangeTag::Insert => format!("+{}", change).green(),
            ChangeTag::Equal => format!(" {}", change).normal(),
        };
        print!("{}", sign);
    }
    println!();
}

fn cmd_run(pattern: &str, rules: Option<PathBuf>, dry_run: bool, show_diff: bool) -> Result<()> {
    let (rules, label) = resolve_rules(rules)?;
    let rewriter = Rewriter::new(rules);

    let paths = locate::expand(pattern).context("failed to expand file pattern")?;

    println!("Rules: {}", label);
    println!("Pattern: {}", pattern);
    if paths.is_empty() {
        println!("{}", "No files matched".yellow());
        return Ok(());
    }
    if dry_run {
        println!("{}", "[DRY RUN - no files will be written]".cyan());
    }
    println!();

    let mut total_modified = 0;
    let mut total_unchanged = 0;
    let mut total_failed = 0;

    for path in &paths {
        // Capture the original text up front so a diff can be shown without
        // a second read after the file has been rewritten.
        let before = if show_diff {
            fs::read_to_string(path).ok()
        } else {
            None
        };

        let result = if dry_run {
            rewriter.check(path)
        } else {
            rewriter.process(path)
        };

        match &result {
            RewriteResult::Modified { file, fired } => {
                let verb = if dry_run { "Would modify" } else { "Modified" };
                println!(
                    "{} {}: {} ({})",
                    "✓".green(),
                    verb,
                    file.display(),
                    fired.join(", ")
                );
                total_modified += 1;

                if show_diff {
                    if let Some(before) = &before {
                        if let Some(after) = rewriter.rewrite(before) {
                            display_diff(file, before, &after);
                        }
                    }
                }
            }
            RewriteResult::Unchanged { file } => {
                println!("{} Unchanged: {}", "⊙".yellow(), file.display());
                total_unchanged += 1;
            }
            RewriteResult::Failed { file, error } => {
                eprintln!("{} Failed: {}", "✗".red(), file.display());
                eprintln!("  {}", error);
                total_failed += 1;
            }
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  {} modified", format!("{}", total_modified).green());
    println!("  {} unchanged", format!("{}", total_unchanged).yellow());
    println!("  {} failed", format!("{}", total_failed).red());

    if total_failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_check(pattern: &str, rules: Option<PathBuf>) -> Result<()> {
    let (rules, label) = resolve_rules(rules)?;
    let rewriter = Rewriter::new(rules);

    let report = rewriter
        .scan(pattern)
        .context("failed to expand file pattern")?;

    println!("{}", "Rewrite Status Report".bold());
    println!("Rules: {}", label);
    println!("Pattern: {}", pattern);
    println!();

    let mut would_modify = Vec::new();
    let mut clean = Vec::new();
    let mut failed = Vec::new();

    for result in &report.results {
        match result {
            RewriteResult::Modified { file, fired } => {
                would_modify.push((file.clone(), fired.join(", ")))
            }
            RewriteResult::Unchanged { file } => clean.push(file.clone()),
            RewriteResult::Failed { file, error } => {
                failed.push((file.clone(), error.to_string()))
            }
        }
    }

    if !would_modify.is_empty() {
        println!(
            "{} {} ({} files)",
            "✓".green(),
            "WOULD MODIFY".green().bold(),
            would_modify.len()
        );
        for (file, fired) in &would_modify {
            println!("  - {} ({})", file.display(), fired.dimmed());
        }
        println!();
    }

    if !clean.is_empty() {
        println!(
            "{} {} ({} files)",
            "⊙".yellow(),
            "CLEAN".yellow().bold(),
            clean.len()
        );
        for file in &clean {
            println!("  - {}", file.display());
        }
        println!();
    }

    if !failed.is_empty() {
        println!(
            "{} {} ({} files)",
            "✗".red(),
            "FAILED".red().bold(),
            failed.len()
        );
        for (file, reason) in &failed {
            println!("  - {} ({})", file.display(), reason.dimmed());
        }
        println!();
    }

    if !failed.is_empty() {
        std::process::exit(1);
    }

    Ok(())
}

fn cmd_list(rules: Option<PathBuf>) -> Result<()> {
    let (rules, label) = resolve_rules(rules)?;

    println!("{} {}", "Rule set:".bold(), label);
    println!();

    for rule in rules.iter() {
        println!("  {} {}", rule.name().bold(), rule.summary().dimmed());
    }

    Ok(())
}
