use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaceError {
    #[error("Habit '{0}' not found")]
    HabitNotFound(String),

    #[error("A habit named '{0}' already exists")]
    DuplicateHabit(String),

    #[error("Invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Cannot record a completion for {0}, it is in the future")]
    FutureDate(String),

    #[error("Invalid reminder time '{0}', expected HH:MM")]
    InvalidReminder(String),

    #[error("Habit name cannot be empty")]
    EmptyHabitName,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
