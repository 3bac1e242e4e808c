//! amendoc CLI - rule-driven document amendment tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use amendoc::observe::{LogObserver, PipelineEvent, PipelineObserver};
use amendoc::rules::presets;
use amendoc::{
    locate_in_file, Batch, BatchOptions, BatchReport, Clauses, FailurePolicy, PatternSpec,
    RuleRegistry,
};

#[derive(Parser)]
#[command(name = "amendoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Insert, replace and renumber clauses in DOCX documents", long_about = None)]
struct Cli {
    /// Input documents (amended with the contract presets)
    #[arg(value_name = "FILES")]
    inputs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Amend documents with a set of rules
    Run {
        /// Input documents
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR", env = "AMENDOC_OUTPUT_DIR", default_value = "amended")]
        output: PathBuf,

        /// JSON rule file (replaces the contract presets)
        #[arg(long, value_name = "FILE", env = "AMENDOC_RULES")]
        rules: Option<PathBuf>,

        /// Built-in rule set to use (repeatable)
        #[arg(long, value_name = "NAME", conflicts_with = "rules")]
        preset: Vec<String>,

        /// JSON file of named clauses
        #[arg(long, value_name = "FILE")]
        clauses: Option<PathBuf>,

        /// Named clause, as NAME=TEXT (repeatable)
        #[arg(long = "clause", value_name = "NAME=TEXT")]
        clause: Vec<String>,

        /// Stop at the first failed document
        #[arg(long)]
        abort_on_error: bool,

        /// Layout of replaced text
        #[arg(long, value_enum, default_value = "single-block")]
        layout: Layout,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the plain text of a document
    Text {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Find an anchor in a document
    Locate {
        /// Input document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Pattern text (several phrases for `phrases`)
        #[arg(value_name = "PATTERN", required = true)]
        patterns: Vec<String>,

        /// Matching strategy
        #[arg(short, long, value_enum, default_value = "exact")]
        strategy: Strategy,

        /// Case-insensitive regex
        #[arg(short = 'i', long)]
        ignore_case: bool,
    },

    /// List rule sets
    Rules {
        /// JSON rule file (built-in presets if not specified)
        #[arg(long, value_name = "FILE", env = "AMENDOC_RULES")]
        rules: Option<PathBuf>,

        /// Print rule sets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Rebuild the whole text as one block
    SingleBlock,
    /// Rebuild only the affected paragraphs
    Paragraphs,
}

impl From<Layout> for amendoc::TextLayout {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::SingleBlock => amendoc::TextLayout::SingleBlock,
            Layout::Paragraphs => amendoc::TextLayout::Paragraphs,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Whitespace-insensitive literal
    Exact,
    /// Paragraph containing every phrase
    Phrases,
    /// Block starting with a prefix
    Heading,
    /// Regular expression
    Regex,
}

struct RunArgs {
    inputs: Vec<PathBuf>,
    output: PathBuf,
    rules: Option<PathBuf>,
    presets: Vec<String>,
    clauses: Option<PathBuf>,
    clause: Vec<String>,
    abort_on_error: bool,
    layout: Layout,
    json: bool,
}

impl RunArgs {
    fn presets_only(inputs: Vec<PathBuf>) -> Self {
        Self {
            inputs,
            output: PathBuf::from(amendoc::batch::DEFAULT_OUTPUT_DIR),
            rules: None,
            presets: Vec::new(),
            clauses: None,
            clause: Vec::new(),
            abort_on_error: false,
            layout: Layout::SingleBlock,
            json: false,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Run {
            inputs,
            output,
            rules,
            preset,
            clauses,
            clause,
            abort_on_error,
            layout,
            json,
        }) => cmd_run(RunArgs {
            inputs,
            output,
            rules,
            presets: preset,
            clauses,
            clause,
            abort_on_error,
            layout,
            json,
        }),
        Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref()),
        Some(Commands::Locate {
            input,
            patterns,
            strategy,
            ignore_case,
        }) => cmd_locate(&input, patterns, strategy, ignore_case),
        Some(Commands::Rules { rules, json }) => cmd_rules(rules.as_deref(), json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: amend with the presets if inputs are given
            if cli.inputs.is_empty() {
                println!("{}", "Usage: amendoc <FILES>...".yellow());
                println!("       amendoc --help for more information");
                Ok(())
            } else {
                cmd_run(RunArgs::presets_only(cli.inputs))
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Progress bar driven by pipeline events; everything is also logged.
struct ProgressObserver {
    bar: ProgressBar,
    log: LogObserver,
}

impl PipelineObserver for ProgressObserver {
    fn on_event(&mut self, event: &PipelineEvent<'_>) {
        match event {
            PipelineEvent::DocumentStarted { path } => {
                let name = path.file_name().unwrap_or_default().to_string_lossy();
                self.bar.set_message(name.into_owned());
            }
            PipelineEvent::DocumentWritten { .. } => self.bar.inc(1),
            PipelineEvent::DocumentFailed { path, error } => {
                self.bar.println(format!(
                    "{} {}: {}",
                    "Failed".red(),
                    path.display(),
                    error
                ));
                self.bar.inc(1);
            }
            PipelineEvent::Unclassified { path } => {
                self.bar.println(format!(
                    "{} {} (no matching rule set, copied unchanged)",
                    "Copied".yellow(),
                    path.display()
                ));
            }
            _ => {}
        }
        self.bar.suspend(|| self.log.on_event(event));
    }
}

fn load_rules(
    rules: Option<&Path>,
    preset_names: &[String],
) -> Result<RuleRegistry, Box<dyn std::error::Error>> {
    if let Some(path) = rules {
        return Ok(RuleRegistry::from_json_file(path)?);
    }
    if preset_names.is_empty() {
        return Ok(RuleRegistry::with_defaults());
    }

    let mut registry = RuleRegistry::new();
    for name in preset_names {
        let rule_set = presets::by_name(name).ok_or_else(|| {
            let known: Vec<String> = presets::all().into_iter().map(|r| r.name).collect();
            format!("Unknown preset {:?} (known: {})", name, known.join(", "))
        })?;
        registry.register(rule_set);
    }
    Ok(registry)
}

fn load_clauses(
    file: Option<&Path>,
    pairs: &[String],
) -> Result<Clauses, Box<dyn std::error::Error>> {
    let mut clauses = match file {
        Some(path) => Clauses::from_json_file(path)?,
        None => Clauses::new(),
    };
    for pair in pairs {
        let (name, text) = Clauses::parse_pair(pair)?;
        clauses.insert(name, text);
    }
    Ok(clauses)
}

fn cmd_run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = load_rules(args.rules.as_deref(), &args.presets)?;
    let clauses = load_clauses(args.clauses.as_deref(), &args.clause)?;

    let policy = if args.abort_on_error {
        FailurePolicy::AbortOnFirst
    } else {
        FailurePolicy::Isolate
    };
    let options = BatchOptions::new()
        .with_output_dir(&args.output)
        .with_failure_policy(policy)
        .with_text_layout(args.layout.into());
    let batch = Batch::new(registry).with_options(options);

    let bar = ProgressBar::new(args.inputs.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    let mut observer = ProgressObserver {
        bar,
        log: LogObserver,
    };

    let report = batch.run_with_observer(&args.inputs, &clauses, &mut observer)?;
    observer.bar.finish_and_clear();

    if args.json {
        println!("{}", report.to_json()?);
    } else {
        print_report(&report);
    }

    if report.is_success() {
        Ok(())
    } else {
        Err(format!("{} document(s) failed", report.failed()).into())
    }
}

fn print_report(report: &BatchReport) {
    println!("{}", "Amended documents:".green().bold());
    let count = report.outcomes.len();
    for (i, outcome) in report.outcomes.iter().enumerate() {
        let branch = if i + 1 == count { "└─" } else { "├─" };
        match (&outcome.output, &outcome.error) {
            (Some(output), _) => {
                let rule_set = outcome.rule_set.as_deref().unwrap_or("unchanged");
                println!(
                    "  {} {} {} [{}]",
                    branch.dimmed(),
                    output.display(),
                    "←".dimmed(),
                    rule_set.cyan()
                );
            }
            (None, Some(failure)) => {
                println!(
                    "  {} {} {} {}",
                    branch.dimmed(),
                    failure.path.display(),
                    failure.kind.red(),
                    failure.message.dimmed()
                );
            }
            (None, None) => {}
        }
    }

    println!(
        "\n{} {} amended, {} failed",
        "Done!".green().bold(),
        report.succeeded(),
        report.failed()
    );
}

fn cmd_text(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let text = amendoc::extract_text(input)?;

    if let Some(path) = output {
        fs::write(path, &text)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}

fn cmd_locate(
    input: &Path,
    patterns: Vec<String>,
    strategy: Strategy,
    ignore_case: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let joined = patterns.join(" ");
    let pattern = match strategy {
        Strategy::Exact => PatternSpec::exact(joined),
        Strategy::Phrases => PatternSpec::all_phrases(patterns),
        Strategy::Heading => PatternSpec::heading_prefix(joined),
        Strategy::Regex if ignore_case => PatternSpec::regex_ci(joined),
        Strategy::Regex => PatternSpec::regex(joined),
    };

    let (anchor, text) = locate_in_file(input, &pattern)?;

    println!("{}", "Anchor".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Pattern".bold(), pattern);
    println!("{}: {}", "Block".bold(), anchor.block);
    println!("{}: {}..{}", "Span".bold(), anchor.span.start, anchor.span.end);
    println!();
    println!("{}", text);

    Ok(())
}

fn cmd_rules(rules: Option<&Path>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let registry = match rules {
        Some(path) => RuleRegistry::from_json_file(path)?,
        None => {
            let mut registry = RuleRegistry::new();
            for rule_set in presets::all() {
                registry.register(rule_set);
            }
            registry
        }
    };

    if json {
        println!("{}", registry.to_json()?);
        return Ok(());
    }

    println!("{}", "Rule Sets".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for rule_set in registry.rule_sets() {
        println!(
            "{} {} ({} steps)",
            rule_set.name.bold(),
            serde_json::to_string(&rule_set.matcher)?.dimmed(),
            rule_set.steps.len()
        );
        for step in &rule_set.steps {
            match &step.pattern {
                Some(pattern) => println!("  {} {} at {}", "─".dimmed(), step.rule.op(), pattern),
                None => println!("  {} {}", "─".dimmed(), step.rule.op()),
            }
        }
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "amendoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Rule-driven document amendment tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/amendoc".dimmed());
    println!("License: MIT");
}
