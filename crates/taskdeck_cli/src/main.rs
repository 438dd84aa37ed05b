//! Command-line presentation layer.
//!
//! # Responsibility
//! - Wire database, repository, service, and query cache together.
//! - Map subcommands onto the five task service operations.
//! - Surface only the service's generic error messages to the user.

use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;
use taskdeck_core::{
    db::open_db, CacheInvalidator, QueryCache, SqliteTaskRepository, Task, TaskService,
};
use uuid::Uuid;

const TASK_LIST_KEY: &str = "task_list";
const DEFAULT_DB_PATH: &str = "taskdeck.db";

const USAGE: &str = "usage: taskdeck [--db <path>] <command>

commands:
  list                         show all tasks, newest first
  add <title> [description]    create a task
  done <id>                    mark a task completed
  reopen <id>                  mark a task pending
  edit <id> <title> [descr.]   replace title/description
  rm <id>                      delete a task

options:
  --db <path>   database file (default: taskdeck.db); log files go to a
                `logs` directory next to it";

#[derive(Debug)]
struct CliArgs {
    db_path: String,
    command: Vec<String>,
}

fn main() -> ExitCode {
    match run(env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Vec<String>) -> Result<(), String> {
    let args = parse_args(args)?;

    // Logging is best effort; a broken log dir must not block task commands.
    if let Some(log_dir) = log_dir_for(&args.db_path) {
        let log_dir = log_dir.to_string_lossy();
        if let Err(message) =
            taskdeck_core::init_logging(taskdeck_core::default_log_level(), &log_dir)
        {
            eprintln!("warning: logging disabled: {message}");
        }
    }

    let conn = open_db(&args.db_path)
        .map_err(|err| format!("cannot open `{}`: {err}", args.db_path))?;

    let cache: Rc<QueryCache<Vec<Task>>> = Rc::new(QueryCache::new());
    let service = TaskService::with_signal(
        SqliteTaskRepository::new(&conn),
        CacheInvalidator::new(Rc::clone(&cache), TASK_LIST_KEY),
    );

    let mut parts = args.command.into_iter();
    let command = parts.next().ok_or_else(|| USAGE.to_string())?;

    match command.as_str() {
        "list" => {
            let tasks = cache
                .fetch_or_load(TASK_LIST_KEY, || service.list_tasks())
                .map_err(|err| err.to_string())?;
            print_tasks(&tasks);
        }
        "add" => {
            let title = parts.next().ok_or("add: missing <title>")?;
            let description = parts.next();
            let task = service
                .create_task(&title, description.as_deref())
                .map_err(|err| err.to_string())?;
            println!("created {}", task.id);
        }
        "done" | "reopen" => {
            let id = parse_id(parts.next())?;
            let status = if command == "done" { "completed" } else { "pending" };
            let task = service
                .set_task_status(id, status)
                .map_err(|err| err.to_string())?;
            println!("{} is now {}", task.id, task.status);
        }
        "edit" => {
            let id = parse_id(parts.next())?;
            let title = parts.next().ok_or("edit: missing <title>")?;
            let description = parts.next();
            let task = service
                .update_task(id, &title, description.as_deref())
                .map_err(|err| err.to_string())?;
            println!("updated {}", task.id);
        }
        "rm" => {
            let id = parse_id(parts.next())?;
            service.delete_task(id).map_err(|err| err.to_string())?;
            println!("deleted {id}");
        }
        _ => return Err(USAGE.to_string()),
    }

    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<CliArgs, String> {
    let mut args = args.into_iter().peekable();

    let mut db_path = DEFAULT_DB_PATH.to_string();
    if args.peek().map(String::as_str) == Some("--db") {
        args.next();
        db_path = args.next().ok_or("--db: missing <path>")?;
    }

    let command: Vec<String> = args.collect();
    if command.is_empty() {
        return Err(USAGE.to_string());
    }

    Ok(CliArgs { db_path, command })
}

/// Absolute `logs` directory next to the database file, when resolvable.
fn log_dir_for(db_path: &str) -> Option<PathBuf> {
    let absolute = std::path::absolute(Path::new(db_path)).ok()?;
    Some(absolute.parent()?.join("logs"))
}

fn parse_id(arg: Option<String>) -> Result<Uuid, String> {
    let raw = arg.ok_or("missing <id>")?;
    Uuid::parse_str(&raw).map_err(|_| format!("invalid task id `{raw}`"))
}

fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("no tasks");
        return;
    }

    for task in tasks {
        let marker = match task.status {
            taskdeck_core::TaskStatus::Completed => "x",
            taskdeck_core::TaskStatus::Pending => " ",
        };
        match &task.description {
            Some(description) => println!("[{marker}] {}  {}  ({description})", task.id, task.title),
            None => println!("[{marker}] {}  {}", task.id, task.title),
        }
    }
}
