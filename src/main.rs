use clap::{Parser, ValueEnum};
use std::collections::HashMap;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

use quickprint::config::SchedulerConfig;
use quickprint::driver::{RunEvent, RunSummary};
use quickprint::scheduler::{PolicyKind, PrintJob};
use quickprint::spooler::{PrintSpooler, RunHandle};

#[derive(Parser, Debug)]
#[command(name = "quickprint")]
#[command(version)]
#[command(about = "Smart print scheduler simulator")]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print a fixed set of jobs once and exit
    Run(RunArgs),

    /// Interactive session: add jobs, pick a policy, start runs
    Shell {
        #[command(flatten)]
        scheduling: SchedulingArgs,
    },
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Parser, Debug)]
struct SchedulingArgs {
    /// Scheduling policy: "round-robin" or "priority-sjn"
    #[arg(long, short = 'p', default_value = "round-robin", value_parser = parse_policy)]
    policy: PolicyKind,

    /// Maximum pages per job per round-robin sweep
    #[arg(long, default_value = "10")]
    time_slice: u32,

    /// Simulated time to print one page, in milliseconds (0 disables pacing)
    #[arg(long, default_value = "500")]
    page_delay_ms: u64,
}

impl SchedulingArgs {
    fn to_config(&self) -> SchedulerConfig {
        SchedulerConfig::new(self.policy)
            .with_time_slice(self.time_slice)
            .with_page_delay(Duration::from_millis(self.page_delay_ms))
    }
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Job to print, as NAME:PAGES:PRIORITY (repeatable, 1 = highest priority)
    /// Example: --job report.pdf:12:2 --job memo.txt:3:1
    #[arg(long = "job", short = 'j', required = true, value_parser = parse_job_spec)]
    jobs: Vec<JobSpec>,

    #[command(flatten)]
    scheduling: SchedulingArgs,

    /// Output format
    #[arg(long, short = 'o', default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Debug, Clone)]
struct JobSpec {
    name: String,
    pages: u32,
    priority: u32,
}

// =============================================================================
// Helper Functions
// =============================================================================

fn parse_policy(s: &str) -> Result<PolicyKind, String> {
    s.parse().map_err(|e: quickprint::error::PrintError| e.to_string())
}

/// Parse NAME:PAGES:PRIORITY. The name may itself contain colons.
fn parse_job_spec(s: &str) -> Result<JobSpec, String> {
    let mut parts = s.rsplitn(3, ':');
    let (Some(priority), Some(pages), Some(name)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("invalid job '{}', expected NAME:PAGES:PRIORITY", s));
    };

    let pages = pages
        .trim()
        .parse()
        .map_err(|_| format!("invalid page count '{}' in job '{}'", pages, s))?;
    let priority = priority
        .trim()
        .parse()
        .map_err(|_| format!("invalid priority '{}' in job '{}'", priority, s))?;

    Ok(JobSpec {
        name: name.to_string(),
        pages,
        priority,
    })
}

fn render_event(event: &RunEvent, jobs: &HashMap<u64, PrintJob>) {
    match event {
        RunEvent::JobStarted { job_id } => {
            if let Some(job) = jobs.get(job_id) {
                println!("Processing: {}", job);
            }
        }
        RunEvent::PageProgress {
            job_id,
            page_number,
            ..
        } => {
            if let Some(job) = jobs.get(job_id) {
                println!(
                    "\tPrinting page {}/{} of '{}'...",
                    page_number, job.total_pages(), job.name()
                );
            }
        }
        RunEvent::JobCompleted { job_id } => {
            if let Some(job) = jobs.get(job_id) {
                println!("Completed: {}", job);
                println!();
            }
        }
        RunEvent::Progress {
            pages_printed,
            total_pages,
            fraction,
        } => {
            println!(
                "\t[{:>5.1}%] {}/{} pages",
                fraction * 100.0,
                pages_printed,
                total_pages
            );
        }
        RunEvent::RunFinished => {
            println!("All jobs printed.");
        }
    }
}

fn render_summary(summary: &RunSummary) {
    println!("{}", "-".repeat(40));
    println!("Run ID:         {}", summary.run_id);
    println!("Policy:         {}", summary.policy);
    println!("Jobs completed: {}", summary.jobs_completed);
    println!("Pages printed:  {}", summary.pages_printed);
    println!("Allocations:    {}", summary.allocations);
    if summary.policy == PolicyKind::RoundRobin {
        println!("Sweeps:         {}", summary.sweeps);
    }
    println!("Elapsed:        {} ms", summary.elapsed_ms);
}

fn render_job_table(jobs: &[PrintJob]) {
    if jobs.is_empty() {
        println!("No jobs queued.");
        return;
    }
    println!(
        "{:<6} {:<28} {:<8} {:<10} STATUS",
        "ID", "NAME", "PAGES", "PRIORITY"
    );
    println!("{}", "-".repeat(68));
    for job in jobs {
        println!("{}", format_job_row(job));
    }
}

fn format_job_row(job: &PrintJob) -> String {
    // Truncate long names to keep the columns aligned
    let name = if job.name().chars().count() > 28 {
        format!("{}...", job.name().chars().take(25).collect::<String>())
    } else {
        job.name().to_string()
    };
    format!(
        "{:<6} {:<28} {:<8} {:<10} {}",
        job.id(),
        name,
        job.total_pages(),
        job.priority(),
        job.status()
    )
}

/// Stream a run's events to stdout as they arrive.
async fn follow_run(
    handle: RunHandle,
    time_slice: u32,
    output_format: OutputFormat,
) -> Result<RunSummary, Box<dyn std::error::Error>> {
    let jobs: HashMap<u64, PrintJob> = handle.jobs.iter().map(|j| (j.id(), j.clone())).collect();

    if let OutputFormat::Table = output_format {
        match handle.policy {
            PolicyKind::RoundRobin => println!(
                "Starting Round Robin Scheduling with time slice = {} pages",
                time_slice
            ),
            PolicyKind::PrioritySjn => println!("Starting Priority + SJN Scheduling"),
        }
    }

    let (mut events, task) = handle.into_parts();
    while let Some(event) = events.next().await {
        match output_format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&event)?),
            OutputFormat::Table => render_event(&event, &jobs),
        }
    }

    let summary = task.await?;
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string(&summary)?),
        OutputFormat::Table => render_summary(&summary),
    }
    Ok(summary)
}

// =============================================================================
// Command Handlers
// =============================================================================

async fn handle_run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.scheduling.to_config();
    let spooler = PrintSpooler::new(config)?;

    for spec in &args.jobs {
        spooler.add_job(&spec.name, spec.pages, spec.priority).await?;
    }

    let handle = spooler.start_run(None).await?;
    follow_run(handle, spooler.config().time_slice, args.output).await?;
    Ok(())
}

const SHELL_HELP: &str = "\
Commands:
  add <name> <pages> <priority>   queue a print job (priority 1 = highest)
  list                            show queued jobs
  policy <round-robin|priority-sjn>
  slice <pages>                   round-robin time slice
  start                           run the scheduler over the queued jobs
  clear                           remove all queued jobs
  help                            show this message
  quit                            leave the session";

async fn handle_shell(scheduling: SchedulingArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut spooler = PrintSpooler::new(scheduling.to_config())?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("QuickPrint Scheduler (policy: {})", spooler.config().policy);
    println!("Type 'help' for commands.");

    while let Some(line) = lines.next_line().await? {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, rest)) = words.split_first() else {
            continue;
        };

        match command {
            "add" => {
                if rest.len() < 3 {
                    eprintln!("Usage: add <name> <pages> <priority>");
                    continue;
                }
                // Everything before the last two words is the document name
                let (name_words, numbers) = rest.split_at(rest.len() - 2);
                let (Ok(pages), Ok(priority)) =
                    (numbers[0].parse::<u32>(), numbers[1].parse::<u32>())
                else {
                    eprintln!("Invalid input: pages and priority must be non-negative integers");
                    continue;
                };
                match spooler.add_job(&name_words.join(" "), pages, priority).await {
                    Ok(job) => println!("Added {}", job),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            "list" => render_job_table(&spooler.jobs().await),
            "policy" => match rest.first().map(|p| p.parse::<PolicyKind>()) {
                Some(Ok(kind)) => {
                    spooler.set_policy(kind);
                    println!("Policy set to {}", kind);
                }
                Some(Err(e)) => eprintln!("Error: {}", e),
                None => println!("Policy: {}", spooler.config().policy),
            },
            "slice" => match rest.first().map(|n| n.parse::<u32>()) {
                Some(Ok(n)) => match spooler.set_time_slice(n) {
                    Ok(()) => println!("Time slice set to {} pages", n),
                    Err(e) => eprintln!("Error: {}", e),
                },
                Some(Err(_)) => eprintln!("Invalid input: time slice must be an integer"),
                None => println!("Time slice: {} pages", spooler.config().time_slice),
            },
            "start" => match spooler.start_run(None).await {
                Ok(handle) => {
                    follow_run(handle, spooler.config().time_slice, OutputFormat::Table).await?;
                }
                Err(e) => eprintln!("Error: {}", e),
            },
            "clear" => {
                spooler.clear().await;
                println!("All jobs cleared.");
            }
            "help" => println!("{}", SHELL_HELP),
            "quit" | "exit" => break,
            other => eprintln!("Unknown command '{}'. Type 'help' for commands.", other),
        }
    }

    Ok(())
}

// =============================================================================
// Main Entry Point
// =============================================================================

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Commands::Run(run_args) => handle_run(run_args).await?,
        Commands::Shell { scheduling } => handle_shell(scheduling).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_spec_parses_three_fields() {
        let spec = parse_job_spec("report.pdf:12:2").unwrap();
        assert_eq!(spec.name, "report.pdf");
        assert_eq!(spec.pages, 12);
        assert_eq!(spec.priority, 2);
    }

    #[test]
    fn job_spec_name_may_contain_colons() {
        let spec = parse_job_spec("C:/docs/a.pdf:3:1").unwrap();
        assert_eq!(spec.name, "C:/docs/a.pdf");
        assert_eq!(spec.pages, 3);
    }

    #[test]
    fn job_spec_rejects_missing_fields_and_non_numbers() {
        assert!(parse_job_spec("report.pdf:12").is_err());
        assert!(parse_job_spec("report.pdf:twelve:1").is_err());
        assert!(parse_job_spec("report.pdf:12:-1").is_err());
    }

    #[test]
    fn policy_flag_accepts_aliases() {
        assert_eq!(parse_policy("rr").unwrap(), PolicyKind::RoundRobin);
        assert!(parse_policy("lottery").is_err());
    }

    #[test]
    fn cli_parses_run_command() {
        let args = Args::try_parse_from([
            "quickprint",
            "run",
            "--job",
            "a.pdf:5:2",
            "--job",
            "b.pdf:3:1",
            "--policy",
            "priority-sjn",
            "--page-delay-ms",
            "0",
        ])
        .unwrap();
        let Commands::Run(run) = args.command else {
            panic!("expected run command");
        };
        assert_eq!(run.jobs.len(), 2);
        assert_eq!(run.scheduling.policy, PolicyKind::PrioritySjn);
        assert_eq!(run.scheduling.to_config().page_delay, Duration::ZERO);
    }

    #[test]
    fn job_row_shows_status() {
        let mut job = PrintJob::new(3, "report.pdf", 2, 1).unwrap();
        assert!(format_job_row(&job).ends_with("queued"));
        job.print_page();
        assert!(format_job_row(&job).ends_with("printing"));
        job.print_page();
        assert!(format_job_row(&job).ends_with("completed"));
        assert!(format_job_row(&job).starts_with("3      report.pdf"));
    }
}
