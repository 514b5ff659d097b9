use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use hotel_backoffice::{
    config::{self, AppConfig},
    db::{self, DbPool},
    events::{Event, EventSender},
    services::{
        business_date,
        hr::{HrService, PayrollReport},
        notifications::{GenerationReport, NotificationService},
        rooms::{AvailabilityQuery, AvailableRoom, RoomService},
    },
};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "backoffice-cli", about = "Operational commands for the hotel back office")]
struct Cli {
    #[arg(
        long,
        global = true,
        action = ArgAction::SetTrue,
        help = "Render command output as pretty JSON"
    )]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the notification job once
    Notify {
        /// Business date to evaluate, today when omitted
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List rooms free for a stay
    Availability {
        #[arg(long)]
        check_in: NaiveDate,
        #[arg(long)]
        check_out: NaiveDate,
        #[arg(long)]
        room_class_id: Option<Uuid>,
        #[arg(long)]
        guests: Option<i32>,
    },
    /// Print the prorated payroll for a month
    Payroll {
        #[arg(long)]
        year: i32,
        #[arg(long)]
        month: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let context = CliContext::initialize().await?;

    match cli.command {
        Commands::Notify { date } => {
            let report = context
                .notification_service()
                .generate(business_date(date))
                .await
                .context("notification run failed")?;
            if cli.json {
                print_json(&report)?;
            } else {
                render_generation(&report);
            }
        }
        Commands::Availability {
            check_in,
            check_out,
            room_class_id,
            guests,
        } => {
            let rooms = context
                .room_service()
                .find_available_rooms(AvailabilityQuery {
                    check_in,
                    check_out,
                    room_class_id,
                    guests,
                })
                .await
                .context("availability search failed")?;
            if cli.json {
                print_json(&rooms)?;
            } else if rooms.is_empty() {
                println!("No rooms available from {check_in} to {check_out}");
            } else {
                rooms.iter().for_each(render_available_room);
            }
        }
        Commands::Payroll { year, month } => {
            let report = context
                .hr_service()
                .payroll(year, month)
                .await
                .context("payroll calculation failed")?;
            if cli.json {
                print_json(&report)?;
            } else {
                render_payroll(&report);
            }
        }
    }

    Ok(())
}

struct CliContext {
    config: AppConfig,
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl CliContext {
    async fn initialize() -> Result<Self> {
        let config = config::load_config().context("failed to load application config")?;
        config::init_tracing(config.log_level(), config.log_json);

        let db_pool = db::establish_connection_from_app_config(&config)
            .await
            .context("failed to connect to database")?;
        let db = Arc::new(db_pool);

        let (event_tx, mut event_rx) = mpsc::channel::<Event>(32);
        let event_sender = Arc::new(EventSender::new(event_tx));

        tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                debug!(target: "backoffice_cli", event = ?event, "received async event");
            }
        });

        Ok(Self {
            config,
            db,
            event_sender,
        })
    }

    fn room_service(&self) -> RoomService {
        RoomService::new(self.db.clone(), self.event_sender.clone())
    }

    fn hr_service(&self) -> HrService {
        HrService::new(self.db.clone(), self.event_sender.clone())
    }

    fn notification_service(&self) -> NotificationService {
        NotificationService::new(
            self.db.clone(),
            self.event_sender.clone(),
            self.config.notification_lookahead_days,
        )
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_generation(report: &GenerationReport) {
    println!(
        "Notification run for {}: {} created, {} already present",
        report.run_date, report.created, report.skipped
    );
    for (kind, count) in &report.by_kind {
        println!("  {kind}: {count}");
    }
}

fn render_available_room(entry: &AvailableRoom) {
    println!(
        "- Room {} • {} • floor {} • {} night(s) • {}",
        entry.room.room_number,
        entry.room_class.name,
        entry.room.floor,
        entry.nights,
        entry.total_price
    );
}

fn render_payroll(report: &PayrollReport) {
    println!("Payroll {}-{:02}", report.year, report.month);
    for entry in &report.entries {
        println!(
            "- {} {} • {}/{} days • {}",
            entry.employee_number,
            entry.full_name,
            entry.days_employed,
            entry.days_in_month,
            entry.gross_pay
        );
    }
    println!("Total: {}", report.total);
}
