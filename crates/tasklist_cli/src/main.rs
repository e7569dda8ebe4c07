use clap::{CommandFactory, Parser};
use std::io::{self, Write};
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasklist_cli::cli::{Cli, Command, collect_overrides};
use tasklist_core::config::{self, Config, ConfigOverrides, Palette};
use tasklist_core::error::AppError;
use tasklist_core::model::Task;
use tasklist_core::notify::{self, Notifier};
use tasklist_core::prompt::{AssumeYes, ConfirmationPrompt};
use tasklist_core::storage::json_store;
use tasklist_core::store::{ClearOutcome, DeleteOutcome, Stats, TaskStore};

struct AppContext {
    store_path: PathBuf,
    palette: Palette,
    notifier: Box<dyn Notifier>,
}

/// y/N prompt on the terminal. Anything but an explicit yes declines.
struct StdinPrompt;

impl ConfirmationPrompt for StdinPrompt {
    fn confirm(&self, message: &str) -> bool {
        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }

        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn confirmation(assume_yes: bool) -> Box<dyn ConfirmationPrompt> {
    if assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(StdinPrompt)
    }
}

fn status_label(task: &Task) -> &'static str {
    if task.completed { "completed" } else { "pending" }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Task")]
    text: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Completed")]
    completed_at: String,
}

fn print_tasks_table(tasks: &[&Task]) {
    if tasks.is_empty() {
        println!("No tasks to show.");
        return;
    }

    let rows: Vec<TaskRow> = tasks
        .iter()
        .map(|task| TaskRow {
            id: task.id,
            text: task.text.clone(),
            status: status_label(task).to_string(),
            created_at: task.created_at.clone(),
            completed_at: task.completed_at.clone().unwrap_or_else(|| "-".to_string()),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
}

fn print_tasks_json(tasks: &[&Task]) -> Result<(), AppError> {
    let json =
        serde_json::to_string(tasks).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let json =
        serde_json::to_string(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn stats_line(stats: Stats) -> String {
    format!(
        "{} total | {} completed | {} pending",
        stats.total, stats.completed, stats.pending
    )
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch.is_whitespace() => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            None => current.push(ch),
        }
    }

    if quote.is_some() {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn expand_alias(args: Vec<String>, config: &Config) -> Result<Vec<String>, AppError> {
    let Some(first) = args.first() else {
        return Ok(args);
    };
    let Some(expansion) = config.aliases.get(first) else {
        return Ok(args);
    };

    let mut expanded = split_command_line(expansion)?;
    expanded.extend(args.into_iter().skip(1));
    Ok(expanded)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(cli: Cli, store: &mut TaskStore, ctx: &AppContext) -> Result<(), AppError> {
    match cli.command {
        Command::Add { text } => {
            let text = match text {
                Some(value) if !value.trim().is_empty() => value,
                _ => return Err(AppError::invalid_input("task text is required")),
            };

            let task = store.add_task(&text)?;
            json_store::save_store(&ctx.store_path, store)?;
            let _ = ctx.notifier.notify("Task added", &task.text);
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!(
                    "Added task: {} (#{})",
                    ctx.palette.accentize(&task.text),
                    task.id
                );
            }
        }
        Command::Toggle { id } => {
            // Unknown ids are a silent no-op.
            if let Some(task) = store.toggle_task(id)? {
                json_store::save_store(&ctx.store_path, store)?;
                let action = if task.completed { "Completed" } else { "Reopened" };
                let _ = ctx
                    .notifier
                    .notify(&format!("{action} task"), &task.text);
                if cli.json {
                    print_task_json(&task)?;
                } else {
                    println!(
                        "{action} task: {} (#{})",
                        ctx.palette.accentize(&task.text),
                        task.id
                    );
                }
            }
        }
        Command::Delete { id } => {
            let prompt = confirmation(cli.yes);
            match store.delete_task(id, prompt.as_ref()) {
                DeleteOutcome::Deleted(task) => {
                    json_store::save_store(&ctx.store_path, store)?;
                    let _ = ctx.notifier.notify("Task deleted", &task.text);
                    if cli.json {
                        print_task_json(&task)?;
                    } else {
                        println!(
                            "Deleted task: {} (#{})",
                            ctx.palette.accentize(&task.text),
                            task.id
                        );
                    }
                }
                DeleteOutcome::Declined => println!("Deletion cancelled."),
                DeleteOutcome::NotFound => {}
            }
        }
        Command::Clear => {
            let prompt = confirmation(cli.yes);
            match store.clear_completed(prompt.as_ref()) {
                ClearOutcome::Cleared(count) => {
                    json_store::save_store(&ctx.store_path, store)?;
                    let _ = ctx
                        .notifier
                        .notify("Tasks cleared", &format!("{count} completed task(s) removed"));
                    if cli.json {
                        println!("{}", serde_json::json!({ "cleared": count }));
                    } else {
                        println!("Cleared {count} completed task(s).");
                    }
                }
                ClearOutcome::Declined => println!("Clear cancelled."),
                ClearOutcome::NothingToClear => println!("No completed tasks to clear."),
            }
        }
        Command::Filter { filter } => {
            store.set_filter(filter);
            json_store::save_store(&ctx.store_path, store)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({ "currentFilter": store.current_filter().as_str() })
                );
            } else {
                println!("Filter set to {}.", store.current_filter());
            }
        }
        Command::List { filter } => {
            let tasks: Vec<&Task> = match filter {
                Some(chosen) => store
                    .tasks()
                    .iter()
                    .filter(|task| chosen.matches(task))
                    .collect(),
                None => store.filtered_view().collect(),
            };

            if cli.json {
                print_tasks_json(&tasks)?;
            } else {
                print_tasks_table(&tasks);
                println!("{}", ctx.palette.mutedize(&stats_line(store.stats())));
            }
        }
        Command::Stats => {
            let stats = store.stats();
            if cli.json {
                println!(
                    "{}",
                    serde_json::json!({
                        "total": stats.total,
                        "completed": stats.completed,
                        "pending": stats.pending,
                    })
                );
            } else {
                println!("{}", stats_line(stats));
            }
        }
    }

    Ok(())
}

fn run_interactive(config: &Config, ctx: &AppContext) -> Result<(), AppError> {
    let load = json_store::load_store_with_fallback(&ctx.store_path);
    if let Some(err) = load.error {
        eprintln!("WARN: {err} (starting with an empty list)");
    }
    let mut store = load.store;

    let mut input = String::new();
    loop {
        input.clear();
        let bytes = io::stdin()
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line).and_then(|args| expand_alias(args, config)) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("tasklist".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, &mut store, ctx) {
            eprintln!("ERROR: {err}");
        }
    }

    // Session-end save, mirroring the in-session saves.
    json_store::save_store(&ctx.store_path, &store)
}

fn effective_config(overrides: &ConfigOverrides) -> Config {
    let load = config::load_config_with_fallback();
    if let Some(err) = load.error {
        eprintln!("WARN: {err}");
    }
    config::merge_overrides(&load.config, overrides)
}

fn build_context(config: &Config) -> Result<AppContext, AppError> {
    let store_path = json_store::store_path()?;
    let palette = config::palette_for_theme(config.theme.as_deref());
    let notifier = notify::notifier_from_env(config)?;
    Ok(AppContext {
        store_path,
        palette,
        notifier,
    })
}

fn run_once(cli: Cli) -> Result<(), AppError> {
    let overrides = collect_overrides(&cli.config_override)?;
    let config = effective_config(&overrides);
    let ctx = build_context(&config)?;

    let load = json_store::load_store_with_fallback(&ctx.store_path);
    if let Some(err) = load.error {
        eprintln!("WARN: {err} (starting with an empty list)");
    }
    let mut store = load.store;

    run_command(cli, &mut store, &ctx)
}

fn run_session() -> Result<(), AppError> {
    let config = effective_config(&ConfigOverrides::default());
    let ctx = build_context(&config)?;
    run_interactive(&config, &ctx)
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_session() {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_once(cli) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
