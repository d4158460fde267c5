//! Waypoint - Checkpoint Reporting Suite
//!
//! Analyzes a task-list document, generates checkpoint reports from a
//! template, and merges report summaries into the checkpoint index.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use waypoint::analyzer::TaskListAnalyzer;
use waypoint::index::{extract_achievements, CheckpointFilename, IndexMerger, MergeReport};
use waypoint::report::{
    collect_interactive, detect_checkpoint_number, CheckpointContext, ReportAssembler,
};
use waypoint::{ProgressSummary, ProjectSettings, Result, WaypointError};

#[derive(Parser)]
#[command(name = "waypoint")]
#[command(version = "0.1.0")]
#[command(about = "Checkpoint reporting for task-list driven implementation work", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory (defaults to current directory)
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a task-list document and print the progress summary as JSON
    Analyze {
        /// Path to the task-list document
        tasks_file: PathBuf,
    },

    /// Generate a checkpoint report and merge it into the index
    Generate {
        /// Path to the task-list document
        #[arg(long)]
        tasks_file: PathBuf,

        /// Directory receiving the report (and holding the index document)
        #[arg(long)]
        output_dir: PathBuf,

        /// Checkpoint description label (e.g. "US1-Complete")
        #[arg(long)]
        description: String,

        /// Override the auto-detected checkpoint number
        #[arg(long, value_name = "NN")]
        checkpoint_num: Option<String>,

        /// Override the template path from settings
        #[arg(long)]
        template: Option<PathBuf>,

        /// Skip interactive context collection (narrative sections render
        /// their to-be-completed markers)
        #[arg(long)]
        non_interactive: bool,
    },

    /// Merge an existing checkpoint report into the index document
    UpdateIndex {
        /// Path to the index document
        #[arg(long)]
        index: PathBuf,

        /// Checkpoint filename (e.g. CHECKPOINT-02_US1-Complete_T001-T039.md)
        #[arg(long)]
        checkpoint_file: String,

        /// Override the checkpoint number parsed from the filename
        #[arg(long, value_name = "NN")]
        checkpoint_num: Option<String>,

        /// Overall progress percentage
        #[arg(long)]
        progress: u32,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing. Diagnostics go to stderr so stdout stays
    // machine-readable.
    let filter = if cli.verbose {
        "waypoint=debug,info"
    } else {
        "waypoint=info,warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Resolve project path
    let project_path = cli.project.canonicalize().unwrap_or(cli.project.clone());

    if !project_path.exists() {
        eprintln!(
            "{} Project directory does not exist: {}",
            "Error:".red().bold(),
            project_path.display()
        );
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Analyze { tasks_file } => run_analyze(&tasks_file),
        Commands::Generate {
            tasks_file,
            output_dir,
            description,
            checkpoint_num,
            template,
            non_interactive,
        } => run_generate(
            &project_path,
            &tasks_file,
            &output_dir,
            &description,
            checkpoint_num,
            template,
            non_interactive,
        ),
        Commands::UpdateIndex {
            index,
            checkpoint_file,
            checkpoint_num,
            progress,
        } => run_update_index(&index, &checkpoint_file, checkpoint_num, progress),
    };

    if let Err(err) = result {
        eprintln!("{} {}", "Error:".red().bold(), err);
        std::process::exit(err.exit_code());
    }
}

fn run_analyze(tasks_file: &Path) -> Result<()> {
    let summary = TaskListAnalyzer::new().analyze_file(tasks_file)?;

    // Machine-readable summary on stdout, human summary on stderr.
    println!("{}", serde_json::to_string_pretty(&summary)?);
    print_summary_diagnostics(&summary);
    Ok(())
}

fn run_generate(
    project: &Path,
    tasks_file: &Path,
    output_dir: &Path,
    description: &str,
    checkpoint_num: Option<String>,
    template: Option<PathBuf>,
    non_interactive: bool,
) -> Result<()> {
    let settings = ProjectSettings::load(project)?;

    if !output_dir.exists() {
        return Err(WaypointError::missing_file(output_dir));
    }

    let template_path = template.unwrap_or_else(|| settings.template_path(project));
    if !template_path.exists() {
        return Err(WaypointError::missing_file(template_path));
    }
    let template_text = std::fs::read_to_string(&template_path).map_err(|e| {
        WaypointError::template(format!("failed to read {}: {}", template_path.display(), e))
    })?;

    eprintln!("Analyzing {}...", tasks_file.display());
    let summary = TaskListAnalyzer::new().analyze_file(tasks_file)?;

    let checkpoint_num =
        checkpoint_num.unwrap_or_else(|| detect_checkpoint_number(output_dir));

    print_summary_diagnostics(&summary);
    eprintln!("{} Checkpoint #{}", "✓".green(), checkpoint_num);

    let context = if non_interactive {
        CheckpointContext::empty()
    } else {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut out = std::io::stderr();
        collect_interactive(&mut input, &mut out)?
    };

    eprintln!("\nGenerating checkpoint report...");
    let assembler = ReportAssembler::new(summary.clone(), context, checkpoint_num.as_str(), description)
        .with_resume_command(settings.resume_command(&summary.feature_id));
    let report_path = assembler.write(&template_text, output_dir)?;
    let filename = assembler.filename();
    eprintln!("{} Generated: {}", "✓".green(), filename);
    eprintln!("{} Location: {}", "✓".green(), report_path.display());

    // Merge into the index when it is present.
    let index_path = output_dir.join(&settings.index_file);
    if index_path.exists() {
        eprintln!("\nUpdating {}...", settings.index_file);
        let report_body = std::fs::read_to_string(&report_path)?;
        let parsed = CheckpointFilename::parse(&filename)?;
        let progress = summary.progress_percentage.round() as u32;
        let merge_report = IndexMerger::from_filename(&parsed, progress)
            .with_achievements(extract_achievements(&report_body))
            .merge_file(&index_path)?;
        print_merge_diagnostics(&merge_report, &settings.index_file);
    } else {
        eprintln!(
            "{} {} not found - skipping index update",
            "!".yellow(),
            settings.index_file
        );
    }

    eprintln!("\nNext: {}", settings.resume_command(&summary.feature_id));
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn run_update_index(
    index: &Path,
    checkpoint_file: &str,
    checkpoint_num: Option<String>,
    progress: u32,
) -> Result<()> {
    let parsed = CheckpointFilename::parse(checkpoint_file)?;
    let checkpoint_num = checkpoint_num.unwrap_or_else(|| parsed.number().to_string());

    // Pull achievements from the report when it sits next to the index.
    let achievements = match index.parent().map(|dir| dir.join(checkpoint_file)) {
        Some(report_path) if report_path.exists() => {
            extract_achievements(&std::fs::read_to_string(&report_path)?)
        }
        _ => Vec::new(),
    };

    let merge_report = IndexMerger::new(
        checkpoint_num,
        checkpoint_file,
        parsed.description(),
        parsed.task_range(),
        progress,
    )
    .with_achievements(achievements)
    .merge_file(index)?;

    print_merge_diagnostics(&merge_report, &index.display().to_string());
    Ok(())
}

fn print_summary_diagnostics(summary: &ProgressSummary) {
    eprintln!();
    eprintln!("{} Found {} total tasks", "✓".green(), summary.total_tasks);
    eprintln!(
        "{} Found {} completed tasks ({}%)",
        "✓".green(),
        summary.completed_tasks,
        summary.progress_percentage
    );
    eprintln!("{} Task range: {}", "✓".green(), summary.task_range);
    if let Some(ref next) = summary.next_task {
        eprintln!("{} Next task: {}", "✓".green(), next);
    }
    eprintln!(
        "{} Phases analyzed: {}",
        "✓".green(),
        summary.phases.len()
    );
}

fn print_merge_diagnostics(report: &MergeReport, index_name: &str) {
    eprintln!("{} Updated: {}", "✓".green(), index_name);
    if !report.progress_table.is_applied() {
        eprintln!("  {} progress table row not patched", "-".dimmed());
    }
    if !report.footer.is_applied() {
        eprintln!("  {} next-checkpoint footer not patched", "-".dimmed());
    }
    if !report.timestamp.is_applied() {
        eprintln!("  {} last-updated timestamp not patched", "-".dimmed());
    }
}
