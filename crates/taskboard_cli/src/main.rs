mod cli;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use cli::{Cli, Command, ConfigOverrideTarget, parse_config_override};
use serde::Serialize;
use std::io::{self, BufRead};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use taskboard_core::config::{
    Config, ConfigOverrides, Palette, load_config_with_fallback, merge_overrides,
    palette_for_theme,
};
use taskboard_core::error::AppError;
use taskboard_core::model::{Category, Priority, PriorityLevel, Task, TaskDraft};
use taskboard_core::remote::HttpTaskRemote;
use taskboard_core::sync::{SyncController, toggle_checklist_item, with_next_status};
use taskboard_core::view::{
    ChecklistProgress, FilterKind, checklist_progress, compute_stats, filter_tasks, is_overdue,
    parse_deadline,
};
use time::UtcOffset;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "TASKBOARD_LOG";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TaskView<'a> {
    #[serde(flatten)]
    task: &'a Task,
    overdue: bool,
    checklist_progress: ChecklistProgress,
}

impl<'a> TaskView<'a> {
    fn new(task: &'a Task) -> Self {
        Self {
            task,
            overdue: is_overdue(task),
            checklist_progress: checklist_progress(task),
        }
    }
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Deadline")]
    deadline: String,
    #[tabled(rename = "Checklist")]
    checklist: String,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        let progress = checklist_progress(task);
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            status: status_label(task),
            priority: format!("{} ({})", task.priority_level().as_str(), task.ai_score()),
            deadline: task.deadline.clone().unwrap_or_else(|| "-".to_string()),
            checklist: if progress.total_count == 0 {
                "-".to_string()
            } else {
                format!("{}/{}", progress.completed_count, progress.total_count)
            },
        }
    }
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Tasks")]
    count: i64,
}

fn status_label(task: &Task) -> String {
    if is_overdue(task) {
        format!("{} (overdue)", task.status.as_str())
    } else {
        task.status.as_str().to_string()
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let rendered =
        serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{rendered}");
    Ok(())
}

fn print_tasks_table(tasks: &[Task], palette: &Palette) {
    if tasks.is_empty() {
        println!("{}", palette.mutedize("No tasks."));
        return;
    }

    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");
}

fn print_task_details(task: &Task, palette: &Palette) {
    println!("{}", palette.accentize(&format!("{} | {}", task.id, task.title)));
    if !task.description.is_empty() {
        println!("{}", task.description);
    }
    println!("Status: {}", task.status.as_str());
    println!(
        "Priority: {} ({})",
        task.priority_level().as_str(),
        task.ai_score()
    );
    println!("Category: {} ({})", task.category_name, task.category_id);
    match task.deadline.as_deref() {
        Some(deadline) if is_overdue(task) => {
            println!("Deadline: {}", palette.alertize(&format!("{deadline} (overdue)")))
        }
        Some(deadline) => println!("Deadline: {deadline}"),
        None => println!("Deadline: -"),
    }
    if !task.tags.is_empty() {
        println!("Tags: {}", task.tags.join(", "));
    }

    let progress = checklist_progress(task);
    if progress.total_count > 0 {
        println!(
            "Checklist: {}/{} ({:.0}%)",
            progress.completed_count, progress.total_count, progress.percent
        );
        for item in task.checklist() {
            let mark = if item.completed { "x" } else { " " };
            println!("  [{}] {} {}", mark, item.id, item.text);
        }
    }
    println!(
        "{}",
        palette.mutedize(&format!(
            "Created {} | Updated {}",
            task.created_at, task.updated_at
        ))
    );
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
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(std::mem::take(&mut current));
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn apply_config_overrides(base: &Config, raw: &[String]) -> Result<Config, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry).map_err(AppError::invalid_input)?;
        match parsed.target {
            ConfigOverrideTarget::ApiBaseUrl => overrides.api_base_url = Some(parsed.value),
            ConfigOverrideTarget::Theme => overrides.theme = Some(parsed.value),
            ConfigOverrideTarget::DefaultFilter => overrides.default_filter = Some(parsed.value),
        }
    }

    let merged = merge_overrides(base, &overrides);
    if let Some(filter) = merged.default_filter.as_deref()
        && FilterKind::parse(filter).is_none()
    {
        return Err(AppError::invalid_input(format!(
            "default_filter must be one of all, urgent, today, pending (got '{filter}')"
        )));
    }
    Ok(merged)
}

fn parse_priority(raw: &str) -> Result<Priority, AppError> {
    PriorityLevel::parse(raw)
        .map(Priority::from_level)
        .ok_or_else(|| {
            AppError::invalid_input(format!(
                "priority must be one of low, medium, high, urgent (got '{}')",
                raw.trim()
            ))
        })
}

/// An empty value clears the deadline.
fn parse_deadline_arg(raw: &str) -> Result<Option<String>, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match parse_deadline(trimmed, UtcOffset::UTC) {
        Some(_) => Ok(Some(trimmed.to_string())),
        None => Err(AppError::invalid_input(format!(
            "deadline must be RFC 3339 or YYYY-MM-DD (got '{trimmed}')"
        ))),
    }
}

fn task_not_found(id: &str) -> AppError {
    AppError::invalid_input(format!("task not found: {id}"))
}

struct Session {
    controller: SyncController<HttpTaskRemote>,
    config: Config,
}

impl Session {
    fn new(config: Config) -> Self {
        tracing::debug!(base_url = config.base_url(), "starting session");
        Self {
            controller: SyncController::new(HttpTaskRemote::new(config.base_url())),
            config,
        }
    }

    async fn load_task(&self, id: &str) -> Result<Task, AppError> {
        self.controller.fetch_all().await?;
        self.controller.task(id).ok_or_else(|| task_not_found(id))
    }

    async fn run_command(&self, cli: Cli) -> Result<(), AppError> {
        let config = apply_config_overrides(&self.config, &cli.config_override)?;
        if config.base_url() != self.config.base_url() {
            return Err(AppError::invalid_input(
                "api_base_url cannot change inside an interactive session",
            ));
        }
        let palette = palette_for_theme(config.theme.as_deref());

        match cli.command {
            Command::List { filter, search } => {
                let filter = match filter.as_deref() {
                    Some(raw) => FilterKind::parse(raw).ok_or_else(|| {
                        AppError::invalid_input(format!(
                            "filter must be one of all, urgent, today, pending (got '{raw}')"
                        ))
                    })?,
                    None => config.default_filter(),
                };
                let tasks = self.controller.fetch_all().await?;
                let visible = filter_tasks(&tasks, filter, search.as_deref().unwrap_or(""));
                if cli.json {
                    let views: Vec<TaskView<'_>> = visible.iter().map(TaskView::new).collect();
                    print_json(&views)?;
                } else {
                    print_tasks_table(&visible, &palette);
                }
            }
            Command::Stats => {
                let tasks = self.controller.fetch_all().await?;
                let stats = compute_stats(&tasks);
                if cli.json {
                    print_json(&stats)?;
                } else {
                    println!("Total: {}", stats.total);
                    println!("Completed: {}", stats.completed);
                    println!("Pending: {}", stats.pending);
                    println!("Urgent: {}", stats.urgent);
                }
            }
            Command::Show { id } => {
                let task = self.load_task(&id).await?;
                if cli.json {
                    print_json(&TaskView::new(&task))?;
                } else {
                    print_task_details(&task, &palette);
                }
            }
            Command::Add {
                title,
                description,
                priority,
                category_id,
                deadline,
                tags,
                items,
            } => {
                let mut draft = TaskDraft::new(&title)?;
                if let Some(description) = description {
                    draft.description = description.trim().to_string();
                }
                if let Some(priority) = priority.as_deref() {
                    draft.priority = parse_priority(priority)?;
                }
                draft.category_id = category_id;
                if let Some(deadline) = deadline.as_deref() {
                    draft.deadline = parse_deadline_arg(deadline)?;
                }
                for tag in &tags {
                    draft.add_tag(tag);
                }
                for item in &items {
                    draft.add_checklist_item(item);
                }

                let task = self.controller.create_task(&draft).await?;
                if cli.json {
                    print_json(&TaskView::new(&task))?;
                } else {
                    println!(
                        "{}",
                        palette.accentize(&format!("Created task: {} ({})", task.title, task.id))
                    );
                }
            }
            Command::Edit {
                id,
                title,
                description,
                priority,
                deadline,
            } => {
                let mut task = self.load_task(&id).await?;
                if let Some(title) = title {
                    let trimmed = title.trim();
                    if trimmed.is_empty() {
                        return Err(AppError::invalid_input("title is required"));
                    }
                    task.title = trimmed.to_string();
                }
                if let Some(description) = description {
                    task.description = description.trim().to_string();
                }
                if let Some(priority) = priority.as_deref() {
                    task.priority = parse_priority(priority)?;
                }
                if let Some(deadline) = deadline.as_deref() {
                    task.deadline = parse_deadline_arg(deadline)?;
                }

                let updated = self.controller.update_task(&task).await?;
                if cli.json {
                    print_json(&TaskView::new(&updated))?;
                } else {
                    println!("Updated task: {} ({})", updated.title, updated.id);
                }
            }
            Command::Cycle { id } => {
                let task = self.load_task(&id).await?;
                let updated = self.controller.update_task(&with_next_status(&task)).await?;
                if cli.json {
                    print_json(&TaskView::new(&updated))?;
                } else {
                    println!(
                        "Task {} is now {}",
                        updated.id,
                        palette.accentize(updated.status.as_str())
                    );
                }
            }
            Command::Toggle { id, item_id } => {
                let task = self.load_task(&id).await?;
                if !task.checklist().iter().any(|item| item.id == item_id) {
                    return Err(AppError::invalid_input(format!(
                        "checklist item not found: {item_id}"
                    )));
                }
                let updated = self
                    .controller
                    .update_task(&toggle_checklist_item(&task, &item_id))
                    .await?;
                if cli.json {
                    print_json(&TaskView::new(&updated))?;
                } else {
                    let progress = checklist_progress(&updated);
                    println!(
                        "Checklist for {}: {}/{} done",
                        updated.id, progress.completed_count, progress.total_count
                    );
                }
            }
            Command::Delete { id } => {
                let task = self.load_task(&id).await?;
                self.controller.delete_task(&task.id).await?;
                if cli.json {
                    print_json(&TaskView::new(&task))?;
                } else {
                    println!("Deleted task: {} ({})", task.title, task.id);
                }
            }
            Command::Categories => {
                let categories = self.controller.fetch_categories().await?;
                if cli.json {
                    print_json(&categories)?;
                } else {
                    print_categories_table(&categories, &palette);
                }
            }
        }

        Ok(())
    }

    async fn run_interactive(&self) -> Result<(), AppError> {
        let mut input = String::new();
        let stdin = io::stdin();
        let mut stdin_lock = stdin.lock();

        loop {
            input.clear();
            let bytes = stdin_lock
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

            let args = match split_command_line(line) {
                Ok(args) => args,
                Err(err) => {
                    eprintln!("ERROR: {}", err);
                    continue;
                }
            };

            if args.is_empty() {
                continue;
            }

            let mut argv = Vec::with_capacity(args.len() + 1);
            argv.push("taskboard".to_string());
            argv.extend(args);

            let cli = match Cli::try_parse_from(argv) {
                Ok(cli) => cli,
                Err(err) => {
                    eprintln!("ERROR: {}", normalize_parse_error(err));
                    continue;
                }
            };

            if let Err(err) = self.run_command(cli).await {
                eprintln!("ERROR: {}", err);
            }
        }

        Ok(())
    }
}

fn print_categories_table(categories: &[Category], palette: &Palette) {
    if categories.is_empty() {
        println!("{}", palette.mutedize("No categories."));
        return;
    }

    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|category| CategoryRow {
            id: category.id,
            name: category.name.clone(),
            count: category.count,
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::psql());
    println!("{table}");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config() -> Config {
    let load = load_config_with_fallback();
    if let Some(err) = load.error {
        tracing::warn!(error = %err, "using default configuration");
    }
    load.config
}

fn run(cli: Option<Cli>) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::io(err.to_string()))?;

    let base = load_config();
    match cli {
        Some(cli) => {
            let session = Session::new(apply_config_overrides(&base, &cli.config_override)?);
            runtime.block_on(session.run_command(cli))
        }
        None => runtime.block_on(Session::new(base).run_interactive()),
    }
}

fn main() {
    init_tracing();

    let mut args = std::env::args_os();
    args.next();
    let cli = if args.next().is_none() {
        None
    } else {
        match Cli::try_parse() {
            Ok(cli) => Some(cli),
            Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                err.exit()
            }
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                std::process::exit(1);
            }
        }
    };

    if let Err(err) = run(cli) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
