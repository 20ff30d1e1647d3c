use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info};

use crate::api::{HttpApi, MemoryApi, SharedApi};
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, default_config_path};
use crate::model::{
    BoardId, ClientConfig, CreateTagForm, State, Tag, Task, TaskForm, find_state, parse_due_date,
};
use crate::ops::filter::TaskFilter;
use crate::ops::grouping::order_tasks_by_state;
use crate::store::{BoardDetails, Boards, CreateTag, CreateTask, DeleteTask, EditTask, Outcome, Tasks};

type CmdResult = Result<(), Box<dyn Error>>;

/// Environment variable overriding the configured server URL
pub const SERVER_ENV: &str = "KB_SERVER";

// ---------------------------------------------------------------------------
// Setup shared with the TUI
// ---------------------------------------------------------------------------

/// The config file in use: `--config` if given, else the default location
pub fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path)
}

/// Load config.toml and apply `KB_SERVER`, then `--server`
pub fn effective_config(cli: &Cli) -> Result<ClientConfig, Box<dyn Error>> {
    let mut config = config_io::load_config(&config_path(cli))?;
    if let Ok(url) = std::env::var(SERVER_ENV)
        && !url.trim().is_empty()
    {
        config.server.url = url;
    }
    if let Some(url) = &cli.server {
        config.server.url = url.clone();
    }
    Ok(config)
}

/// The API the commands talk to: sample data with `--demo`, else the server
pub fn connect(cli: &Cli, config: &ClientConfig) -> Result<SharedApi, Box<dyn Error>> {
    if cli.demo {
        info!("using demo data");
        return Ok(Arc::new(MemoryApi::demo()));
    }
    info!("using server {}", config.server.url);
    Ok(Arc::new(HttpApi::new(&config.server)?))
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let Some(command) = &cli.command else {
        return Err("no command given (try `kb --help`)".into());
    };

    // Config commands work without a reachable server
    if let Commands::Config(cmd) = command {
        return cmd_config(&cli, &cmd.action, json);
    }

    let config = effective_config(&cli)?;
    let api = connect(&cli, &config)?;

    match command {
        // Read commands
        Commands::Boards => cmd_boards(&api, json),
        Commands::States(args) => cmd_states(&api, args, json),
        Commands::Tags(args) => cmd_tags(&api, args, json),
        Commands::Tasks(args) => cmd_tasks(&api, args, json),

        // Write commands
        Commands::Add(args) => cmd_add(&api, args, json),
        Commands::Edit(args) => cmd_edit(&api, args, json),
        Commands::Rm(args) => cmd_rm(&api, args, json),
        Commands::TagCreate(args) => cmd_tag_create(&api, args, json),

        Commands::Config(_) => unreachable!("handled above"),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Turn a finished action into a value, or its holder's error message
fn finish<T>(outcome: Option<Outcome<T>>, error: &str) -> Result<T, Box<dyn Error>> {
    match outcome {
        Some(Outcome::Succeeded(value)) => Ok(value),
        Some(Outcome::Failed) => Err(error.to_string().into()),
        None => Err("request was not started".into()),
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// States and tags of a board, or the error that stopped them loading
fn load_details(api: &SharedApi, board_id: BoardId) -> Result<BoardDetails, Box<dyn Error>> {
    let mut details = BoardDetails::new();
    details.set_board(api, Some(board_id));
    details.wait();
    if !details.error().is_empty() {
        return Err(details.error().to_string().into());
    }
    Ok(details)
}

fn load_tasks(api: &SharedApi, board_id: BoardId) -> Result<Tasks, Box<dyn Error>> {
    let mut tasks = Tasks::new();
    tasks.set_board(api, Some(board_id));
    tasks.wait();
    if !tasks.error.is_empty() {
        return Err(tasks.error.clone().into());
    }
    Ok(tasks)
}

fn resolve_state<'a>(states: &'a [State], key: &str, board_id: BoardId) -> Result<&'a State, Box<dyn Error>> {
    find_state(states, key).ok_or_else(|| format!("no state '{}' on board {}", key, board_id).into())
}

fn resolve_tag<'a>(tags: &'a [Tag], name: &str, board_id: BoardId) -> Result<&'a Tag, Box<dyn Error>> {
    let name = name.trim_start_matches('#');
    tags.iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| format!("no tag '{}' on board {} (create it with `kb tag-create`)", name, board_id).into())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_boards(api: &SharedApi, json: bool) -> CmdResult {
    let mut boards = Boards::new();
    boards.fetch(api);
    boards.wait();
    if !boards.error().is_empty() {
        return Err(boards.error().to_string().into());
    }
    if json {
        return print_json(boards.boards());
    }
    for board in boards.boards() {
        println!("{}", format_board_line(board));
    }
    Ok(())
}

fn cmd_states(api: &SharedApi, args: &BoardArg, json: bool) -> CmdResult {
    let details = load_details(api, args.board)?;
    if json {
        return print_json(&details.states);
    }
    for state in &details.states {
        println!("{}", format_state_line(state));
    }
    Ok(())
}

fn cmd_tags(api: &SharedApi, args: &BoardArg, json: bool) -> CmdResult {
    let details = load_details(api, args.board)?;
    if json {
        return print_json(&details.tags);
    }
    for tag in &details.tags {
        println!("{}", format_tag_line(tag));
    }
    Ok(())
}

fn cmd_tasks(api: &SharedApi, args: &TasksArgs, json: bool) -> CmdResult {
    let details = load_details(api, args.board)?;
    let tasks = load_tasks(api, args.board)?;

    let states: Vec<State> = match &args.state {
        Some(key) => vec![resolve_state(&details.states, key, args.board)?.clone()],
        None => details.states.clone(),
    };
    let filter = TaskFilter {
        pattern: None,
        tag: args.tag.as_ref().map(|t| t.trim_start_matches('#').to_string()),
    };
    let matching: Vec<Task> = filter.apply(tasks.tasks()).into_iter().cloned().collect();
    debug!("{} of {} tasks match", matching.len(), tasks.tasks().len());

    let grouped = order_tasks_by_state(&matching, &states);
    if json {
        return print_json(&grouped_json(&grouped, &states));
    }
    if grouped.is_empty() {
        println!("No tasks");
        return Ok(());
    }
    for line in format_grouped(&grouped, &states) {
        println!("{}", line);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(api: &SharedApi, args: &AddArgs, json: bool) -> CmdResult {
    let details = load_details(api, args.board)?;
    let state = match &args.state {
        Some(key) => resolve_state(&details.states, key, args.board)?,
        None => details
            .states
            .first()
            .ok_or_else(|| format!("board {} has no states", args.board))?,
    };

    let mut form = TaskForm::blank(state.id);
    form.name = args.name.trim().to_string();
    if form.name.is_empty() {
        return Err("name is required".into());
    }
    form.description = args.description.clone().unwrap_or_default();
    if let Some(due) = &args.due {
        form.set_due_date(parse_due_date(due)?);
    }
    for name in &args.tags {
        let tag = resolve_tag(&details.tags, name, args.board)?;
        if !form.has_tag(tag.id) {
            form.toggle_tag(tag);
        }
    }

    let mut create = CreateTask::new();
    create.create_task(api, form.into_creating(args.board));
    let task = finish(create.wait(), create.error())?;
    if json {
        return print_json(&task);
    }
    println!("Created {}", format_task_line(&task).trim_start());
    Ok(())
}

fn cmd_edit(api: &SharedApi, args: &EditArgs, json: bool) -> CmdResult {
    let details = load_details(api, args.board)?;
    let tasks = load_tasks(api, args.board)?;
    let task = tasks
        .tasks()
        .iter()
        .find(|t| t.id == args.task)
        .ok_or_else(|| format!("no task {} on board {}", args.task, args.board))?;

    let mut form = TaskForm::from(task);
    if let Some(name) = &args.name {
        form.name = name.trim().to_string();
        if form.name.is_empty() {
            return Err("name is required".into());
        }
    }
    if let Some(description) = &args.description {
        form.description = description.clone();
    }
    if args.clear_due {
        form.set_due_date(None);
    } else if let Some(due) = &args.due {
        form.set_due_date(parse_due_date(due)?);
    }
    if let Some(key) = &args.state {
        form.state_id = resolve_state(&details.states, key, args.board)?.id;
    }
    for name in &args.toggle_tags {
        form.toggle_tag(resolve_tag(&details.tags, name, args.board)?);
    }

    let mut edit = EditTask::new();
    edit.edit_task(api, form);
    let updated = finish(edit.wait(), edit.error())?;
    if json {
        return print_json(&updated);
    }
    let state = details.states.iter().find(|s| s.id == updated.state_id);
    for line in format_task_detail(&updated, state) {
        println!("{}", line);
    }
    Ok(())
}

fn cmd_rm(api: &SharedApi, args: &RmArgs, json: bool) -> CmdResult {
    let mut delete = DeleteTask::new();
    delete.delete_task(api, args.task);
    let deleted = finish(delete.wait(), delete.error())?;
    if json {
        return print_json(&DeletedJson { deleted });
    }
    println!("Deleted task {}", deleted);
    Ok(())
}

fn cmd_tag_create(api: &SharedApi, args: &TagCreateArgs, json: bool) -> CmdResult {
    let mut create = CreateTag::new();
    create.create_tag(
        api,
        CreateTagForm {
            board_id: args.board,
            name: args.name.trim_start_matches('#').to_string(),
        },
    );
    let tag = finish(create.wait(), create.error())?;
    if json {
        return print_json(&tag);
    }
    println!("Created {}", format_tag_line(&tag).trim_start());
    Ok(())
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn cmd_config(cli: &Cli, action: &ConfigAction, json: bool) -> CmdResult {
    let path = config_path(cli);
    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Show => {
            let mut config = effective_config(cli)?;
            if config.server.token.is_some() {
                config.server.token = Some("********".to_string());
            }
            if json {
                return print_json(&config);
            }
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigAction::Set(args) => {
            let mut doc = config_io::read_document(&path)?;
            config_io::set_value(&mut doc, &args.key, &args.value)?;
            config_io::write_document(&path, &doc)?;
            info!("set {} in {}", args.key, path.display());
            if !json {
                println!("{} = {}", args.key, args.value);
            }
        }
    }
    Ok(())
}
