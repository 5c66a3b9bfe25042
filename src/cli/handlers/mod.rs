use std::error::Error;
use std::path::PathBuf;

use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ROOT_ENV};
use crate::io::journal::Journal;
use crate::model::day::DayKey;
use crate::model::task::TaskStatus;
use crate::ops::archive::{DatedTask, TaskQuery};
use crate::ops::migrate::MigrateError;
use crate::ops::{archive, migrate, task_ops};

type CmdResult = Result<(), Box<dyn Error>>;

/// Everything a command needs, resolved once from flags, env and config
struct Context {
    journal: Journal,
    today: DayKey,
    json: bool,
}

impl Context {
    /// `--date` if given, otherwise today
    fn day(&self, args: &DayArgs) -> Result<DayKey, Box<dyn Error>> {
        match &args.date {
            Some(s) => parse_day(s),
            None => Ok(self.today),
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let ctx = build_context(&cli)?;

    match cli.command {
        Commands::Path(args) => cmd_path(&ctx, args),
        Commands::List(args) => cmd_list(&ctx, args),
        Commands::Toggle(args) => cmd_toggle(&ctx, args),
        Commands::Add(args) => cmd_add(&ctx, args),
        Commands::Migrate(args) => cmd_migrate(&ctx, args),
        Commands::Active(args) => cmd_active(&ctx, args),
        Commands::Tasks(args) => cmd_tasks(&ctx, args),
    }
}

fn build_context(cli: &Cli) -> Result<Context, Box<dyn Error>> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config_io::default_config_path);
    let config = config_io::load_config(&config_path)?;
    let root = config_io::resolve_root(
        cli.root.as_deref(),
        std::env::var_os(ROOT_ENV).map(PathBuf::from),
        &config,
        &config_path,
    )?;
    let today = match &cli.today {
        Some(s) => parse_day(s)?,
        None => DayKey::new(Local::now().date_naive()),
    };
    tracing::debug!(root = %root.display(), today = %today, "resolved journal");

    Ok(Context {
        journal: Journal::new(root, &config),
        today,
        json: cli.json,
    })
}

fn parse_day(s: &str) -> Result<DayKey, Box<dyn Error>> {
    DayKey::parse(s).ok_or_else(|| format!("invalid date '{}': expected YYYY-MM-DD", s).into())
}

fn parse_status(s: &str) -> Result<TaskStatus, Box<dyn Error>> {
    TaskStatus::parse_name(s)
        .ok_or_else(|| format!("invalid status '{}': use open, done or moved", s).into())
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_path(ctx: &Context, args: DayArgs) -> CmdResult {
    let day = ctx.day(&args)?;
    println!("{}", ctx.journal.todo_path(day).display());
    Ok(())
}

fn cmd_list(ctx: &Context, args: ListArgs) -> CmdResult {
    let day = ctx.day(&args.day)?;
    let status = args.status.as_deref().map(parse_status).transpose()?;
    let tasks = archive::day_tasks(&ctx.journal, day, status)?;

    if ctx.json {
        return print_json(&DayListJson {
            day,
            path: ctx.journal.todo_path(day).display().to_string(),
            tasks: tasks.iter().map(task_to_json).collect(),
        });
    }

    if tasks.is_empty() {
        println!("no tasks for {}", day);
        return Ok(());
    }
    for task in &tasks {
        println!("{}", format_task(task));
    }
    Ok(())
}

fn cmd_active(ctx: &Context, args: ActiveArgs) -> CmdResult {
    let tasks = archive::active_tasks(&ctx.journal, args.limit)?;
    print_dated(ctx, &tasks, "no open tasks")
}

fn cmd_tasks(ctx: &Context, args: TasksArgs) -> CmdResult {
    let query = TaskQuery {
        status: args.status.as_deref().map(parse_status).transpose()?,
        from: args.from.as_deref().map(parse_day).transpose()?,
        to: args.to.as_deref().map(parse_day).transpose()?,
        limit: args.limit,
        offset: args.offset,
    };
    let tasks = archive::query_tasks(&ctx.journal, &query)?;
    print_dated(ctx, &tasks, "no matching tasks")
}

fn print_dated(ctx: &Context, tasks: &[DatedTask], empty: &str) -> CmdResult {
    if ctx.json {
        let out: Vec<DatedTaskJson> = tasks.iter().map(dated_to_json).collect();
        return print_json(&out);
    }

    if tasks.is_empty() {
        println!("{}", empty);
        return Ok(());
    }
    for task in tasks {
        println!("{}", format_dated(task));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_toggle(ctx: &Context, args: ToggleArgs) -> CmdResult {
    let day = ctx.day(&args.day)?;
    let outcome = task_ops::toggle_task(&ctx.journal, day, args.id)?;

    if ctx.json {
        return print_json(&toggle_to_json(args.id, outcome));
    }
    match outcome {
        task_ops::ToggleOutcome::Toggled(status) => println!("{} {}", args.id, status),
        task_ops::ToggleOutcome::Unchanged => println!("{} unchanged", args.id),
    }
    Ok(())
}

fn cmd_add(ctx: &Context, args: AddArgs) -> CmdResult {
    let day = ctx.day(&args.day)?;
    let id = task_ops::add_task(&ctx.journal, day, &args.text, args.parent)?;

    if ctx.json {
        return print_json(&AddJson {
            id,
            path: ctx.journal.todo_path(day).display().to_string(),
        });
    }
    println!("{}", id);
    Ok(())
}

fn cmd_migrate(ctx: &Context, args: MigrateArgs) -> CmdResult {
    let report = match migrate::migrate(&ctx.journal, ctx.today, args.dry_run) {
        Ok(report) => report,
        Err(MigrateError::TodayMissing(path)) => {
            // Informational: the day has not been started yet
            if ctx.json {
                return print_json(&serde_json::json!({
                    "today": ctx.today,
                    "migrated": 0,
                    "today_missing": true,
                    "path": path.display().to_string(),
                }));
            }
            println!(
                "today's file {} does not exist yet; start the day first, then migrate",
                path.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if ctx.json {
        return print_json(&report);
    }
    println!("{}", format_migration(&report));
    Ok(())
}
