use clap::{Args, Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lca_app::{
    AppResult, RunOptions, RunProgressEvent, RunRequest, RunResponse, StoreOverride,
    project_service, query, run_service,
};
use lca_project::Role;

#[derive(Parser)]
#[command(name = "geolca")]
#[command(about = "geolca - cradle-to-gate LCA pipeline for geopolymer concrete", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct StoreArgs {
    /// Use an in-memory model store instead of the configured one
    #[arg(long)]
    memory: bool,
    /// Override the IPC server port
    #[arg(long)]
    port: Option<u16>,
}

impl From<StoreArgs> for StoreOverride {
    fn from(args: StoreArgs) -> Self {
        StoreOverride {
            memory: args.memory,
            port: args.port,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax and structure
    Validate {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Show the project's bill of materials
    Inventory {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Register flows and processes and build the product system
    Build {
        /// Path to the project YAML file
        project_path: PathBuf,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// Analyse impact results without touching the model store
    Analyze {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Build the model, then analyse impact results
    Run {
        /// Path to the project YAML file
        project_path: PathBuf,
        #[command(flatten)]
        store: StoreArgs,
    },
    /// List saved runs for a project
    Runs {
        /// Path to the project YAML file
        project_path: PathBuf,
    },
    /// Show the critical-process summary of a saved run
    ShowRun {
        /// Path to the project YAML file
        project_path: PathBuf,
        /// Run ID to display
        run_id: String,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Inventory { project_path } => cmd_inventory(&project_path),
        Commands::Build {
            project_path,
            store,
        } => cmd_build(&project_path, store.into()),
        Commands::Analyze { project_path } => cmd_run(
            &project_path,
            RunOptions {
                build_model: false,
                ..RunOptions::default()
            },
        ),
        Commands::Run {
            project_path,
            store,
        } => cmd_run(
            &project_path,
            RunOptions {
                store: store.into(),
                ..RunOptions::default()
            },
        ),
        Commands::Runs { project_path } => cmd_runs(&project_path),
        Commands::ShowRun {
            project_path,
            run_id,
        } => cmd_show_run(&project_path, &run_id),
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    let inventory = project_service::load_inventory(project_path, &project)?;
    println!("✓ Project is valid ({} inventory rows)", inventory.len());
    Ok(())
}

fn cmd_inventory(project_path: &Path) -> AppResult<()> {
    let project = project_service::load_project(project_path)?;
    let summary = project_service::summarize(project_path, &project);
    let inventory = project_service::load_inventory(project_path, &project)?;

    println!("{} ({})", summary.name, summary.functional_unit);
    println!("  store: {}", summary.store);
    println!(
        "  linking: {} / {}",
        summary.linking.default_providers, summary.linking.preferred_type
    );
    println!("Inventory: {}", summary.inventory.display());
    for row in inventory.rows() {
        let marker = match row.role {
            Role::Input => " ",
            Role::Output => "*",
        };
        let amount = row
            .amount
            .map(|a| format!("{a:.4}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} {:<24} {:>12} {:<8} {}",
            marker,
            row.flow,
            amount,
            row.property,
            row.process_name()
        );
    }
    Ok(())
}

fn cmd_build(project_path: &Path, store: StoreOverride) -> AppResult<()> {
    println!("Building model for: {}", project_path.display());

    let report = run_service::build_project_model(
        project_path,
        store,
        Some(&mut |event| render_cli_progress(&event)),
    )?;
    clear_progress_line();

    let ps = &report.product_system;
    println!("✓ Product system created: {} ({})", ps.name, ps.id);
    println!(
        "  Flows: {} created, {} reused",
        report.flows_created, report.flows_reused
    );
    println!(
        "  Processes: {} created, {} reused",
        report.processes_created, report.processes_reused
    );
    println!("  Included processes: {}", ps.processes.len());
    println!("  Provider links: {}", ps.links.len());
    if !ps.excluded.is_empty() {
        println!("  Not reached from root: {}", ps.excluded.len());
    }
    for d in &ps.dangling {
        println!("  ! no provider for '{}' in '{}'", d.flow, d.process);
    }
    Ok(())
}

fn cmd_run(project_path: &Path, options: RunOptions) -> AppResult<()> {
    println!("Running: {}", project_path.display());
    let request = RunRequest {
        project_path,
        options,
    };

    let mut last_stage = String::new();
    let response = run_service::run_pipeline_with_progress(
        &request,
        Some(&mut |event| {
            let stage_key = format!("{:?}", event.stage);
            if stage_key != last_stage {
                render_cli_progress(&event);
                last_stage = stage_key;
            }
        }),
    )?;
    clear_progress_line();

    print_response(&response);
    Ok(())
}

fn print_response(response: &RunResponse) {
    println!("✓ Run completed: {}", response.run_id);
    if let Some(model) = &response.model {
        println!(
            "  Product system: {} ({} processes)",
            model.product_system.name,
            model.product_system.processes.len()
        );
    }
    for m in &response.mismatches {
        println!(
            "  ! {}: impact {:?}, contributions {:?}",
            m.category, m.impact, m.contributions
        );
    }
    println!("  Critical processes:");
    for c in &response.summary.categories {
        let critical = if c.critical.is_empty() {
            "-".to_string()
        } else {
            c.critical.join(", ")
        };
        println!("    {:<32} {}", c.category, critical);
    }
    println!(
        "  Most critical: {}",
        response.summary.most_critical.join(", ")
    );
    println!("  Outputs: {}", response.run_dir.display());
}

fn cmd_runs(project_path: &Path) -> AppResult<()> {
    let runs = query::list_runs(project_path)?;
    if runs.is_empty() {
        println!("No saved runs");
    } else {
        println!("Saved runs:");
        for run in runs {
            println!("  {}  {}  {}", run.run_id, run.timestamp, run.rule);
        }
    }
    Ok(())
}

fn cmd_show_run(project_path: &Path, run_id: &str) -> AppResult<()> {
    let summary = query::get_run_summary(project_path, run_id)?;
    println!("Run {}", summary.run_id);
    println!("  Timestamp: {}", summary.timestamp);
    println!("  Rule: {}", summary.rule);
    for (category, critical) in &summary.critical {
        println!("  {:<32} {}", category, critical.join(", "));
    }
    for (label, count) in &summary.counts {
        println!("  {:<16} critical in {} categories", label, count);
    }
    println!("  Most critical: {}", summary.most_critical.join(", "));
    if summary.mismatches > 0 {
        println!("  Reconciliation mismatches: {}", summary.mismatches);
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_cli_progress(event: &RunProgressEvent) {
    let mut line = format!(
        "\r{}  elapsed={:.2}s",
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    print!("{line}");
    let _ = io::stdout().flush();
}
