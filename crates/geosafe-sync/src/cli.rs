//! geosafe-cli tool
//!
//! One-shot report browsing and moderation against the report service.
//!
//! Usage:
//!   geosafe-cli list [CATEGORY]
//!   geosafe-cli mine
//!   geosafe-cli heatmap [CATEGORY]
//!   geosafe-cli submit <lat> <lon> <category> <title> <description>
//!   geosafe-cli approve <id>
//!   geosafe-cli delete <id>

use geosafe_consensus::ApprovalPolicy;
use geosafe_geo::heatmap;
use geosafe_model::{filter_by_category, visible_to, Category, Identity, Location, Report, ReportDraft};
use geosafe_sync::{identity_from_env, DeleteOutcome, SyncConfig, SyncEngine, SyncNode};
use std::process::exit;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Parsed command line.
#[derive(Debug)]
enum Command {
    List { category: Option<Category> },
    Mine,
    Heatmap { category: Option<Category> },
    Submit(ReportDraft),
    Approve { id: String },
    Delete { id: String },
}

fn print_usage() {
    eprintln!("geosafe-cli - Browse and moderate GeoSafe crime reports");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  geosafe-cli list [CATEGORY]        List reports, optionally one category");
    eprintln!("  geosafe-cli mine                   List reports you may manage");
    eprintln!("  geosafe-cli heatmap [CATEGORY]     Show density tiers per report");
    eprintln!("  geosafe-cli submit <lat> <lon> <category> <title> <description>");
    eprintln!("                                     Submit a new report");
    eprintln!("  geosafe-cli approve <id>           Approve a pending report");
    eprintln!("  geosafe-cli delete <id>            Delete a report (admin only)");
    eprintln!();
    eprintln!("Categories: THEFT, HIT_AND_RUN, MURDER, OTHER");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  GEOSAFE_API_URL    Report service (default: http://localhost:3000)");
    eprintln!("  GEOSAFE_DATA_DIR   Data directory (default: ./geosafe-data)");
    eprintln!("  GEOSAFE_USER       Acting username");
    eprintln!("  GEOSAFE_ADMIN      Act as admin when set to 1/true/yes");
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    exit(1);
}

fn category_arg(arg: Option<&String>) -> Option<Category> {
    arg.map(|raw| Category::parse(raw).unwrap_or_else(|| fail(format!("unknown category {:?}", raw))))
}

fn id_arg(args: &[String], cmd: &str) -> String {
    match args.get(2) {
        Some(id) => id.clone(),
        None => fail(format!("{} requires a report id argument", cmd)),
    }
}

fn coordinate(raw: &str, name: &str) -> f64 {
    raw.parse()
        .unwrap_or_else(|_| fail(format!("{} must be a number, got {:?}", name, raw)))
}

fn parse_command(args: &[String]) -> Command {
    if args.len() < 2 {
        print_usage();
        exit(1);
    }

    match args[1].as_str() {
        "list" => Command::List {
            category: category_arg(args.get(2)),
        },
        "mine" => Command::Mine,
        "heatmap" => Command::Heatmap {
            category: category_arg(args.get(2)),
        },
        "submit" => {
            if args.len() < 7 {
                fail("submit requires <lat> <lon> <category> <title> <description>");
            }
            let location = Location::new(coordinate(&args[2], "lat"), coordinate(&args[3], "lon"));
            let category = category_arg(args.get(4)).unwrap_or_default();
            Command::Submit(ReportDraft::new(
                location,
                args[5].clone(),
                args[6..].join(" "),
                category,
            ))
        }
        "approve" => Command::Approve {
            id: id_arg(args, "approve"),
        },
        "delete" => Command::Delete {
            id: id_arg(args, "delete"),
        },
        "-h" | "--help" | "help" => {
            print_usage();
            exit(0);
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            exit(1);
        }
    }
}

fn print_reports(reports: &[&Report], policy: ApprovalPolicy) {
    if reports.is_empty() {
        println!("(none)");
        return;
    }
    for report in reports {
        println!(
            "{}  [{:?}]  {}  {}  by {}  ({} approvals, {} needed)",
            report.id,
            report.status,
            report.category.label(),
            report.title,
            report.reported_by,
            report.approvers.len(),
            policy.remaining(report),
        );
    }
}

async fn execute(engine: &SyncEngine, identity: &Identity, command: Command) -> geosafe_sync::Result<()> {
    // Browsing falls back to the local cache when the service is down
    if let Err(e) = engine.poll_once().await {
        eprintln!("Warning: showing cached reports ({})", e);
    }
    let snapshot = engine.snapshot();

    match command {
        Command::List { category } => {
            print_reports(&filter_by_category(&snapshot, category), engine.policy());
        }
        Command::Mine => {
            print_reports(&visible_to(&snapshot, identity), engine.policy());
        }
        Command::Heatmap { category } => {
            let targets = filter_by_category(&snapshot, category);
            let cells = heatmap(targets, &snapshot);
            if cells.is_empty() {
                println!("(none)");
            }
            for cell in cells {
                println!(
                    "{}  {:<6}  density {}  ({:.5}, {:.5})",
                    cell.report_id,
                    cell.tier.as_str(),
                    cell.density,
                    cell.center.latitude,
                    cell.center.longitude
                );
            }
        }
        Command::Submit(draft) => {
            let created = engine.submit(draft, identity).await?;
            println!("Report submitted: {} [{:?}]", created.id, created.status);
        }
        Command::Approve { id } => {
            let updated = engine.approve(&id, identity).await?;
            println!(
                "Report approved: {} [{:?}] approvers: {}",
                updated.id,
                updated.status,
                updated.approvers.join(", ")
            );
        }
        Command::Delete { id } => match engine.delete_with_fallback(&id, identity).await? {
            DeleteOutcome::Removed => println!("Report deleted: {}", id),
            DeleteOutcome::LocalOnly => {
                println!("Report {} hidden locally; the service did not confirm the delete", id)
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geosafe_sync=error".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = parse_command(&args);

    let mut config = SyncConfig::from_env().unwrap_or_else(|e| fail(e));
    // Separate cache so the CLI can run next to a sync node
    config.data_dir = config.data_dir.join("cli");
    let identity = identity_from_env();

    let node = SyncNode::open(config).await.unwrap_or_else(|e| fail(e));
    let engine = node.engine();

    if let Err(e) = execute(&engine, &identity, command).await {
        fail(e);
    }
}
