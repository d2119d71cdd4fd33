use clap::{Parser, Subcommand};
use cmep_workflow::{
    affordance, closure, progress, ActionToken, RequestSnapshot, SnapshotCodec, StepStatus,
    WorkflowOverview,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cmep")]
#[command(about = "CMEP request workflow inspection CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the workflow overview for a snapshot file
    Inspect {
        /// Path to a request snapshot JSON file
        file: PathBuf,
    },
    /// List every action token with its current affordance
    Actions {
        /// Path to a request snapshot JSON file
        file: PathBuf,
    },
    /// Run the close-eligibility pre-check
    CheckClose {
        /// Path to a request snapshot JSON file
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("cmep=info".parse()?))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect { file }) => match load_snapshot(&file) {
            Ok(snapshot) => inspect(&snapshot),
            Err(e) => eprintln!("Error reading snapshot: {}", e),
        },
        Some(Commands::Actions { file }) => match load_snapshot(&file) {
            Ok(snapshot) => actions(&snapshot),
            Err(e) => eprintln!("Error reading snapshot: {}", e),
        },
        Some(Commands::CheckClose { file }) => match load_snapshot(&file) {
            Ok(snapshot) => check_close(&snapshot),
            Err(e) => eprintln!("Error reading snapshot: {}", e),
        },
        None => {
            println!("Use 'cmep --help' for commands");
        }
    }

    Ok(())
}

fn load_snapshot(path: &Path) -> Result<RequestSnapshot, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let snapshot = SnapshotCodec::parse(&text)?;
    tracing::debug!(request_id = snapshot.request_id, "parsed snapshot from {}", path.display());
    Ok(snapshot)
}

fn inspect(snapshot: &RequestSnapshot) {
    match &snapshot.code {
        Some(code) => println!("Request #{} ({})", snapshot.request_id, code),
        None => println!("Request #{}", snapshot.request_id),
    }
    println!("State: {}", snapshot.operative_state);

    println!();
    for step in progress::progress_strip(snapshot.operative_state) {
        let marker = match step.status {
            StepStatus::Completed => "x",
            StepStatus::Current => ">",
            StepStatus::Pending => " ",
        };
        println!("  [{}] {} - {}", marker, step.label, step.description);
    }

    let overview = WorkflowOverview::of(snapshot);
    println!();
    println!("Phases:");
    println!("  administrative: {}", overview.administrative);
    match overview.payment_note {
        Some(note) => println!("  payment: {} ({})", overview.payment, note),
        None => println!("  payment: {}", overview.payment),
    }
    match overview.evaluation_note {
        Some(note) => println!("  evaluation: {} ({})", overview.evaluation, note),
        None => println!("  evaluation: {}", overview.evaluation),
    }

    if let Some(reason) = &snapshot.cancellation_reason {
        println!();
        println!("Cancelled: {}", reason);
    }
}

fn actions(snapshot: &RequestSnapshot) {
    for token in ActionToken::ALL {
        if affordance::is_allowed(snapshot, token) {
            println!("{:<22} enabled", token.as_wire());
        } else {
            println!(
                "{:<22} disabled - {}",
                token.as_wire(),
                affordance::explain_disabled(snapshot, token)
            );
        }
    }
}

fn check_close(snapshot: &RequestSnapshot) {
    let missing = closure::missing_close_requirements(snapshot);
    if missing.is_empty() {
        println!("All closing requirements met.");
    } else {
        println!("Cannot close yet. Missing:");
        for requirement in missing {
            println!("  - {}", requirement);
        }
    }
}
