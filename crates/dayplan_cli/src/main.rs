//! `dayplan` command-line entry point.
//!
//! # Responsibility
//! - Map subcommands onto planner and notification use-cases.
//! - Render agendas and notification lists as plain text.
//!
//! # Invariants
//! - Every invocation opens one connection and shares it across both stores.
//! - Logging failures never block a command.

mod config;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use config::PlannerConfig;
use dayplan_core::db::{open_db, DbError};
use dayplan_core::schedule::dates::{is_today, parse_date};
use dayplan_core::{
    core_version, init_logging, Importance, Notification, NotificationId, NotificationService,
    NotificationServiceError, NotificationView, PlannerService, PlannerServiceError, RepoError,
    SqliteNotificationRepository, SqliteTaskRepository, TaskDraft, TaskId, TaskKind, TimeOfDay,
};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

type Planner<'conn> =
    PlannerService<SqliteTaskRepository<'conn>, SqliteNotificationRepository<'conn>>;
type Inbox<'conn> = NotificationService<SqliteNotificationRepository<'conn>>;

/// Personal day planner: tasks, meetings and weekly classes.
#[derive(Parser)]
#[command(name = "dayplan", version)]
struct Cli {
    /// SQLite database file
    #[arg(long = "db", env = "DAYPLAN_DB_PATH", global = true, value_name = "PATH")]
    db_path: Option<PathBuf>,

    /// Directory for rolling log files
    #[arg(long, env = "DAYPLAN_LOG_DIR", global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, env = "DAYPLAN_LOG_LEVEL", global = true, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a task, meeting or class
    Add {
        title: String,

        /// task|meeting|class
        #[arg(short, long, default_value = "task")]
        kind: TaskKind,

        /// Anchor date (YYYY-MM-DD); defaults to today
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "09:00", value_name = "HH:MM")]
        start: TimeOfDay,

        #[arg(long, default_value = "10:00", value_name = "HH:MM")]
        end: TimeOfDay,

        /// critical|high|medium|low
        #[arg(short, long, default_value = "low")]
        importance: Importance,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        room: Option<String>,

        /// Repeat weekly until this date (classes only)
        #[arg(long, value_parser = parse_date, value_name = "YYYY-MM-DD")]
        until: Option<NaiveDate>,
    },
    /// Edit a template by its ID or by a generated occurrence ID
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        kind: Option<TaskKind>,

        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,

        #[arg(long, value_name = "HH:MM")]
        start: Option<TimeOfDay>,

        #[arg(long, value_name = "HH:MM")]
        end: Option<TimeOfDay>,

        #[arg(short, long)]
        importance: Option<Importance>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        room: Option<String>,

        /// Repeat weekly until this date
        #[arg(long, value_parser = parse_date, value_name = "YYYY-MM-DD", conflicts_with = "once")]
        until: Option<NaiveDate>,

        /// Stop repeating
        #[arg(long)]
        once: bool,
    },
    /// Delete a template by its exact ID
    Delete { id: TaskId },
    /// Show the agenda for one day
    Day {
        /// YYYY-MM-DD; defaults to today
        #[arg(short, long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// List notifications, newest first
    Notifications {
        #[arg(long, value_enum, default_value_t = ViewArg::Recent)]
        view: ViewArg,

        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// Mark a notification as read
    Read { id: NotificationId },
    /// Archive a notification
    Archive { id: NotificationId },
    /// Delete a notification
    Dismiss { id: NotificationId },
    /// Print the core version
    Version,
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    All,
    Recent,
    Unread,
    Archived,
}

impl From<ViewArg> for NotificationView {
    fn from(value: ViewArg) -> Self {
        match value {
            ViewArg::All => Self::All,
            ViewArg::Recent => Self::Recent,
            ViewArg::Unread => Self::Unread,
            ViewArg::Archived => Self::Archived,
        }
    }
}

#[derive(Debug)]
enum CliError {
    Db(DbError),
    Repo(RepoError),
    Planner(PlannerServiceError),
    Notifications(NotificationServiceError),
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "database error: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Planner(err) => write!(f, "{err}"),
            Self::Notifications(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Planner(err) => Some(err),
            Self::Notifications(err) => Some(err),
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<RepoError> for CliError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<PlannerServiceError> for CliError {
    fn from(value: PlannerServiceError) -> Self {
        Self::Planner(value)
    }
}

impl From<NotificationServiceError> for CliError {
    fn from(value: NotificationServiceError) -> Self {
        Self::Notifications(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = PlannerConfig::resolve(cli.db_path, cli.log_dir, cli.log_level);

    if let Err(err) = init_logging(&config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }

    let result = match cli.command {
        Commands::Version => {
            print_version();
            Ok(())
        }
        command => run(command, &config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, config: &PlannerConfig) -> Result<(), CliError> {
    let conn = open_db(&config.db_path)?;
    let planner = PlannerService::new(
        SqliteTaskRepository::try_new(&conn)?,
        SqliteNotificationRepository::try_new(&conn)?,
    );
    let inbox = NotificationService::new(SqliteNotificationRepository::try_new(&conn)?);
    info!(
        "event=cli_open module=cli status=ok db_path={}",
        config.db_path.display()
    );

    match command {
        Commands::Add {
            title,
            kind,
            date,
            start,
            end,
            importance,
            description,
            room,
            until,
        } => {
            let mut draft = TaskDraft::new(title, kind, date.unwrap_or_else(today))
                .with_times(start, end);
            draft.importance = importance;
            draft.description = description;
            draft.room = room;
            if let Some(end_date) = until {
                draft = draft.recurring_until(end_date);
            }
            let task = planner.create_task(draft)?;
            println!("{} created: {}", task.kind.label(), task.id);
        }
        Commands::Edit {
            id,
            title,
            kind,
            date,
            start,
            end,
            importance,
            description,
            room,
            until,
            once,
        } => {
            let mut draft = TaskDraft::from(&planner.resolve_task(&id)?);
            if let Some(value) = title {
                draft.title = value;
            }
            if let Some(value) = kind {
                draft.kind = value;
            }
            if let Some(value) = date {
                draft.date = value;
            }
            if let Some(value) = start {
                draft.start_time = value;
            }
            if let Some(value) = end {
                draft.end_time = value;
            }
            if let Some(value) = importance {
                draft.importance = value;
            }
            if description.is_some() {
                draft.description = description;
            }
            if room.is_some() {
                draft.room = room;
            }
            if let Some(end_date) = until {
                draft = draft.recurring_until(end_date);
            }
            if once {
                draft.is_recurring = false;
                draft.recurring_end_date = None;
            }
            let task = planner.edit(&id, draft)?;
            println!("{} updated: {}", task.kind.label(), task.id);
        }
        Commands::Delete { id } => {
            let task = planner.delete_task(&id)?;
            println!("{} deleted: {}", task.kind.label(), task.id);
        }
        Commands::Day { date } => print_day(&planner, date.unwrap_or_else(today))?,
        Commands::Notifications { view, limit } => {
            print_notifications(&inbox, view.into(), limit)?
        }
        Commands::Read { id } => {
            inbox.mark_read(id)?;
            println!("marked read: {id}");
        }
        Commands::Archive { id } => {
            inbox.archive(id)?;
            println!("archived: {id}");
        }
        Commands::Dismiss { id } => {
            inbox.delete(id)?;
            println!("dismissed: {id}");
        }
        Commands::Version => print_version(),
    }

    Ok(())
}

fn print_version() {
    println!("dayplan {}", core_version());
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_day(planner: &Planner<'_>, date: NaiveDate) -> Result<(), CliError> {
    let agenda = planner.agenda_for(date)?;
    let marker = if is_today(&date) { " (today)" } else { "" };
    println!("{}{marker}", agenda.heading());

    let occurrences = agenda.occurrences();
    if occurrences.is_empty() {
        println!("  nothing scheduled");
        return Ok(());
    }

    for occurrence in occurrences {
        let template = occurrence.template();
        let room = template
            .room
            .as_deref()
            .map(|room| format!(" @ {room}"))
            .unwrap_or_default();
        println!(
            "  {}-{}  [{}/{}] {}{}  ({})",
            occurrence.start_time(),
            occurrence.end_time(),
            occurrence.kind().as_str(),
            occurrence.importance().as_str(),
            occurrence.title(),
            room,
            occurrence.display_id()
        );
    }
    Ok(())
}

fn print_notifications(
    inbox: &Inbox<'_>,
    view: NotificationView,
    limit: Option<u32>,
) -> Result<(), CliError> {
    let notifications = inbox.list(view, limit)?;
    println!("{} unread", inbox.unread_count()?);
    for notification in &notifications {
        println!("{}", render_notification(notification));
    }
    Ok(())
}

fn render_notification(notification: &Notification) -> String {
    let state = if notification.is_archived {
        "archived"
    } else if notification.is_read {
        "read"
    } else {
        "new"
    };
    format!(
        "  {} [{}] {}: {} ({})  {}",
        notification.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        state,
        notification.title,
        notification.message,
        notification.task_id,
        notification.id
    )
}
