use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "daybook", about = concat!("daybook v", env!("CARGO_PKG_VERSION"), " - daily todo files in plain markdown"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Journal root holding the YYYY/MM/DD tree
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Config file (default: ~/.config/daybook/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Treat this date as today (YYYY-MM-DD)
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// More log output on stderr (repeat for more)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the todo file path for a day
    Path(DayArgs),
    /// List tasks for a day
    List(ListArgs),
    /// Flip a task between open and done
    Toggle(ToggleArgs),
    /// Add a task, optionally under a parent task
    Add(AddArgs),
    /// Carry unfinished tasks from past days into today
    Migrate(MigrateArgs),
    /// Show open tasks across every day, newest first
    Active(ActiveArgs),
    /// Query tasks across a range of days, newest first
    Tasks(TasksArgs),
}

#[derive(Args)]
pub struct DayArgs {
    /// Day to use (YYYY-MM-DD, default: today)
    #[arg(short, long)]
    pub date: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub day: DayArgs,
    /// Only tasks with this status (open, done, moved)
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Task id (line number shown by `list`)
    pub id: usize,
    #[command(flatten)]
    pub day: DayArgs,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Nest under the task on this line
    #[arg(long, value_name = "ID")]
    pub parent: Option<usize>,
    #[command(flatten)]
    pub day: DayArgs,
}

#[derive(Args)]
pub struct MigrateArgs {
    /// Report what would move without writing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct ActiveArgs {
    /// Maximum number of tasks to show
    #[arg(long, default_value = "50")]
    pub limit: usize,
}

#[derive(Args)]
pub struct TasksArgs {
    /// First day to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,
    /// Last day to include (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,
    /// Only tasks with this status (open, done, moved)
    #[arg(long)]
    pub status: Option<String>,
    /// Maximum number of tasks to show
    #[arg(long, default_value = "100")]
    pub limit: usize,
    /// Number of matching tasks to skip
    #[arg(long, default_value = "0")]
    pub offset: usize,
}
