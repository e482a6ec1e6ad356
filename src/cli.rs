//! CLI argument definitions.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::model::TaskMode;

/// Top-level CLI parser for `taskerize`.
#[derive(Debug, Parser)]
#[command(name = "taskerize", version, about = "Work the Taskerize board from the terminal")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the board.
    Board,
    /// List the users tasks can be assigned to.
    Users,
    /// Create, edit, delete or move tasks.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Create, rename, delete or move columns.
    #[command(subcommand)]
    Column(ColumnCommand),
    /// Ask who should take a task.
    Suggest {
        /// Task id.
        id: String,
        /// Weighting of the suggestion; defaults to proficiency.
        #[arg(long, value_enum, default_value_t = ModeArg::Effective)]
        mode: ModeArg,
        /// Assign the suggested user right away.
        #[arg(long)]
        accept: bool,
    },
}

/// `taskerize task …`
#[derive(Debug, Subcommand)]
pub enum TaskCommand {
    /// Add a task at the end of a column.
    Add {
        /// Title of the column receiving the task.
        #[arg(long)]
        column: String,
        /// Task fields.
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Change a task's fields; omitted fields keep their value.
    Edit {
        /// Task id.
        id: String,
        /// Task fields.
        #[command(flatten)]
        fields: TaskFields,
        /// Remove the assignee.
        #[arg(long, conflicts_with = "assignee")]
        unassign: bool,
    },
    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },
    /// Drag a task onto a column, or onto another task.
    Move {
        /// Task id.
        id: String,
        /// Title of the destination column.
        #[arg(long, required_unless_present = "before")]
        to: Option<String>,
        /// Drop onto this task instead, taking its position.
        #[arg(long, conflicts_with = "to")]
        before: Option<String>,
    },
}

/// `taskerize column …`
#[derive(Debug, Subcommand)]
pub enum ColumnCommand {
    /// Add an empty column.
    Add {
        /// Column title.
        title: String,
    },
    /// Rename an empty column.
    Rename {
        /// Current title.
        title: String,
        /// New title.
        new_title: String,
    },
    /// Delete an empty column.
    Delete {
        /// Column title.
        title: String,
    },
    /// Drag a column onto another one. Column order is not stored remotely.
    Move {
        /// Title of the dragged column.
        title: String,
        /// Title of the column it is dropped on.
        #[arg(long)]
        onto: String,
    },
}

/// Task form fields shared by `task add` and `task edit`.
#[derive(Debug, Clone, Default, Args)]
pub struct TaskFields {
    /// Title.
    #[arg(long)]
    pub title: Option<String>,
    /// Description.
    #[arg(long)]
    pub description: Option<String>,
    /// Deadline, `YYYY-MM-DD`.
    #[arg(long)]
    pub due: Option<NaiveDate>,
    /// Id of the assigned user.
    #[arg(long)]
    pub assignee: Option<String>,
    /// Required technology; repeat for several.
    #[arg(long = "tech")]
    pub technologies: Vec<String>,
    /// Execution mode.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

/// Execution mode as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Most proficient user.
    Effective,
    /// User who learns the most.
    Learning,
}

impl From<ModeArg> for TaskMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Effective => Self::Effective,
            ModeArg::Learning => Self::Learning,
        }
    }
}
