use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pace", version, author, about = "Track habits, streaks and self-adjusting goals")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new habit
    Add {
        /// Habit name
        name: String,
        /// Free-form type tag, e.g. steps
        #[arg(long)]
        kind: Option<String>,
        /// Daily numeric goal
        #[arg(long)]
        goal: Option<u32>,
        /// Reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
    },
    /// List habits with today's status
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Mark a habit as completed
    Done {
        /// Habit name
        habit: String,
        /// Amount achieved, e.g. steps walked
        #[arg(long)]
        value: Option<u32>,
        /// Day to record (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove a completion
    Undo {
        /// Habit name
        habit: String,
        /// Day to clear (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Show how many habits are done today
    Today,
    /// Show the current streak and this week's completions for a habit
    Streak {
        /// Habit name
        habit: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Recompute goals from recent history
    Review {
        /// Only review this habit
        habit: Option<String>,
        /// Show decisions without saving them
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete a habit and its history
    Delete {
        /// Habit name
        habit: String,
    },
}
