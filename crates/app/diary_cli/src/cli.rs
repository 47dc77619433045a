use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "diary", version, about = "Diary school client", long_about = None)]
pub struct Cli {
    /// API root URL (overrides DIARY_API_URL).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Credentials file (overrides DIARY_CREDENTIALS_PATH).
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,
    /// Sign in and store the token pair
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long, env = "DIARY_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Resolve a path and run the route guard on it
    Navigate { path: String },
    /// Teacher views
    #[command(subcommand)]
    Teacher(TeacherCommand),
    /// Student views
    #[command(subcommand)]
    Student(StudentCommand),
}

#[derive(Subcommand, Debug)]
pub enum TeacherCommand {
    #[command(subcommand)]
    Lessons(LessonCommand),
    #[command(subcommand)]
    Schedules(ScheduleCommand),
    #[command(subcommand)]
    Students(StudentAdminCommand),
    #[command(subcommand)]
    Marks(MarkCommand),
    /// List lesson periods
    Periods,
    #[command(subcommand)]
    Hometasks(HomeTaskCommand),
}

#[derive(Subcommand, Debug)]
pub enum LessonCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
    },
    Update {
        id: i64,
        #[arg(long)]
        name: String,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct ScheduleArgs {
    #[arg(long)]
    pub lesson: i64,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date: String,
    #[arg(long)]
    pub period: i64,
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCommand {
    List,
    Create(ScheduleArgs),
    Update {
        id: i64,
        #[command(flatten)]
        args: ScheduleArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct StudentArgs {
    #[arg(long)]
    pub username: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long)]
    pub password: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub date_of_birth: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum StudentAdminCommand {
    List,
    Create(StudentArgs),
    Update {
        id: i64,
        #[command(flatten)]
        args: StudentArgs,
    },
    Delete {
        id: i64,
    },
    /// Marks of one student
    Marks {
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct MarkArgs {
    #[arg(long)]
    pub student: i64,
    #[arg(long)]
    pub schedule: i64,
    /// Whole number from 1 to 12
    #[arg(long)]
    pub mark: String,
}

#[derive(Subcommand, Debug)]
pub enum MarkCommand {
    List,
    Create(MarkArgs),
    Update {
        id: i64,
        #[command(flatten)]
        args: MarkArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Args, Debug)]
pub struct HomeTaskArgs {
    #[arg(long)]
    pub schedule: i64,
    #[arg(long)]
    pub description: String,
}

#[derive(Subcommand, Debug)]
pub enum HomeTaskCommand {
    List,
    Create(HomeTaskArgs),
    Update {
        id: i64,
        #[command(flatten)]
        args: HomeTaskArgs,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum StudentCommand {
    /// Lessons for one day
    Schedule {
        #[arg(long)]
        date: Option<String>,
    },
    /// All scheduled lessons, optionally for one day
    Schedules {
        #[arg(long)]
        date: Option<String>,
    },
    Marks,
    /// Home tasks on or after a date
    Hometasks {
        #[arg(long)]
        date: Option<String>,
    },
}
