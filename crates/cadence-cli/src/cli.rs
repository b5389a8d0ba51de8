use cadence_core::models::FrequencyKind;
use clap::{Args, Parser, Subcommand};

/// Recurring task scheduler backed by a local SQLite task list
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Account scope to operate on (defaults to the configured account)
    #[arg(long, global = true)]
    pub account: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage recurrence rules
    #[command(subcommand)]
    Rule(RuleCommand),
    /// Show the next due dates a rule would produce
    Preview(PreviewCommand),
    /// Generate tasks for upcoming occurrences of every active rule
    Refresh(RefreshCommand),
    /// Complete a local task and generate its successor
    Done(DoneCommand),
    /// Report a completion by rule and due date
    Complete(CompleteCommand),
    /// List local tasks
    Tasks(TasksCommand),
}

#[derive(Subcommand, Debug, Clone)]
pub enum RuleCommand {
    /// Create a recurrence rule
    Add(RuleAddCommand),
    /// Change an existing rule; omitted fields keep their value
    Edit(RuleEditCommand),
    /// Stop generating tasks for a rule, keeping its history
    Disable(RuleIdArg),
    /// Resume generating tasks for a disabled rule
    Enable(RuleIdArg),
    /// List rules of the current account
    List(RuleListCommand),
    /// Show a rule with its generated instances
    Show(RuleIdArg),
}

#[derive(Args, Debug, Clone)]
pub struct RuleIdArg {
    /// Rule ID or a unique prefix of it
    pub id: String,
}

/// Recurrence pattern options shared by `rule add` and `rule edit`.
#[derive(Args, Debug, Clone, Default)]
pub struct PatternArgs {
    /// Frequency: daily, weekly, monthly, yearly or custom
    #[arg(long)]
    pub every: Option<FrequencyKind>,
    /// Repeat every N periods
    #[arg(long)]
    pub interval: Option<u32>,
    /// Weekdays for weekly/custom rules (e.g. "mon,wed,fri")
    #[arg(long)]
    pub on: Option<String>,
    /// Day of month for monthly/yearly rules
    #[arg(long)]
    pub day: Option<u32>,
    /// Month (1-12) for yearly rules
    #[arg(long)]
    pub month: Option<u32>,
}

#[derive(Args, Debug, Clone)]
pub struct RuleAddCommand {
    /// Title copied onto every generated task
    pub title: String,
    #[arg(short, long)]
    pub notes: Option<String>,
    /// List the generated tasks are placed in
    #[arg(short, long, default_value = "inbox")]
    pub list: String,
    /// First day of the series (e.g. "2024-01-01", "tomorrow")
    #[arg(long)]
    pub start: Option<String>,
    /// Last day an occurrence may fall on
    #[arg(long)]
    pub until: Option<String>,
    /// The plain task this rule was promoted from
    #[arg(long)]
    pub source: Option<String>,
    #[command(flatten)]
    pub pattern: PatternArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RuleEditCommand {
    pub id: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub notes: Option<String>,
    #[arg(long, conflicts_with = "notes")]
    pub notes_clear: bool,
    #[arg(short, long)]
    pub list: Option<String>,
    #[arg(long)]
    pub start: Option<String>,
    #[arg(long)]
    pub until: Option<String>,
    #[arg(long, conflicts_with = "until")]
    pub until_clear: bool,
    #[command(flatten)]
    pub pattern: PatternArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RuleListCommand {
    /// Include disabled rules
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewCommand {
    pub id: String,
    /// Number of occurrences to show
    #[arg(short, long, default_value_t = 5)]
    pub count: usize,
    /// Preview occurrences after this date instead of today
    #[arg(long)]
    pub after: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct RefreshCommand {
    /// Days to look ahead (defaults to the configured lookahead)
    #[arg(long)]
    pub horizon: Option<u32>,
    /// Treat this date as today
    #[arg(long)]
    pub today: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct DoneCommand {
    /// Task ID or a unique prefix of it
    pub id: String,
}

#[derive(Args, Debug, Clone)]
pub struct CompleteCommand {
    pub rule_id: String,
    /// Due date of the completed occurrence
    pub due: String,
}

#[derive(Args, Debug, Clone)]
pub struct TasksCommand {
    /// Include completed tasks
    #[arg(short, long)]
    pub all: bool,
}
