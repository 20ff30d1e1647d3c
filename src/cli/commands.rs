use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kb", about = concat!("kanban v", env!("CARGO_PKG_VERSION"), " - boards, states and tasks from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Board server base URL (overrides config and KB_SERVER)
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Read config from this file instead of the default location
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Use built-in sample data instead of a server
    #[arg(long, global = true)]
    pub demo: bool,

    /// Open the TUI on this board
    #[arg(long)]
    pub board: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List boards
    Boards,
    /// List a board's workflow states
    States(BoardArg),
    /// List a board's tags
    Tags(BoardArg),
    /// List a board's tasks, grouped by state
    Tasks(TasksArgs),
    /// Create a task
    Add(AddArgs),
    /// Change a task
    Edit(EditArgs),
    /// Delete a task
    Rm(RmArgs),
    /// Create a tag on a board
    TagCreate(TagCreateArgs),
    /// Show or change configuration
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct BoardArg {
    /// Board id
    pub board: u64,
}

#[derive(Args)]
pub struct TasksArgs {
    /// Board id
    pub board: u64,
    /// Only tasks in this state (id or name)
    #[arg(long)]
    pub state: Option<String>,
    /// Only tasks with this tag
    #[arg(long)]
    pub tag: Option<String>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Board id
    pub board: u64,
    /// Task name
    pub name: String,
    /// Task description
    #[arg(long, short)]
    pub description: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// State id or name (default: the board's first state)
    #[arg(long)]
    pub state: Option<String>,
    /// Tag name (repeatable)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Board id
    pub board: u64,
    /// Task id
    pub task: u64,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New description
    #[arg(long, short)]
    pub description: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<String>,
    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
    /// Move to this state (id or name)
    #[arg(long)]
    pub state: Option<String>,
    /// Add the tag if absent, remove it if present (repeatable)
    #[arg(long = "toggle-tag")]
    pub toggle_tags: Vec<String>,
}

#[derive(Args)]
pub struct RmArgs {
    /// Task id
    pub task: u64,
}

#[derive(Args)]
pub struct TagCreateArgs {
    /// Board id
    pub board: u64,
    /// Tag name
    pub name: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the config file location
    Path,
    /// Print the effective configuration
    Show,
    /// Set a value, e.g. `kb config set server.url https://boards.example.com/api/`
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Dotted key: server.url, server.token, server.timeout_secs, ui.show_key_hints,
    /// ui.colors.<name>, ui.tag_colors.<tag>
    pub key: String,
    pub value: String,
}
