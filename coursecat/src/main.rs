//! coursecat - Browse the course catalog from the terminal

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use libcoursecat::format::{format_students, truncate_text, RatingBand};
use libcoursecat::logging::LoggingConfig;
use libcoursecat::service::CoursecatService;
use libcoursecat::{Config, Course, CoursecatError, ThemeMode, User};

#[derive(Parser, Debug)]
#[command(name = "coursecat")]
#[command(version)]
#[command(about = "Browse courses, keep favourites and switch themes")]
#[command(long_about = "\
coursecat - Browse the course catalog from the terminal

DESCRIPTION:
    coursecat lists and searches the course catalog, keeps a list of
    favourite courses and remembers your theme between runs. Favourites,
    theme and session are stored locally and restored on every start.

COMMANDS:
    status      Show session, theme and favourites
    login       Sign in (demo account, any email works)
    register    Record a demo account
    logout      Sign out
    courses     List or search courses
    show        Show one course in full
    favourites  List favourite courses
    fav         Add, remove or toggle a favourite
    theme       Show, toggle or set the theme

    Everything except status, login and register needs a session.

USAGE EXAMPLES:
    coursecat login ada@example.com
    coursecat courses
    coursecat courses --search rust
    coursecat show 2
    coursecat fav toggle 2
    coursecat favourites --format json | jq '.[].title'
    coursecat theme toggle
    coursecat theme dark

CONFIGURATION:
    Configuration file: ~/.config/coursecat/config.toml
    State database:     ~/.local/share/coursecat/state.db

    Override with environment variables:
        COURSECAT_CONFIG      - Path to config file
        COURSECAT_LOG_FORMAT  - Log format: text, json or pretty
        COURSECAT_LOG_LEVEL   - Log level (default: warn)

EXIT CODES:
    0 - Success
    1 - Operation failed (storage, catalog or configuration error)
    2 - Not logged in
    3 - Invalid input
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: text or json
    #[arg(short, long, global = true, default_value = "text")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show session, theme and favourites
    Status,

    /// Sign in with a demo account
    Login {
        /// Email address; the part before '@' becomes the display name
        email: String,
    },

    /// Record a demo account without signing in
    Register {
        /// Display name
        name: String,

        /// Email address
        email: String,
    },

    /// Sign out
    Logout,

    /// List courses
    Courses {
        /// Only courses whose title, description or category contain TERM
        #[arg(short, long, value_name = "TERM")]
        search: Option<String>,
    },

    /// Show one course in full
    Show {
        /// Course id
        id: u32,
    },

    /// List favourite courses
    Favourites,

    /// Change favourites
    Fav {
        #[command(subcommand)]
        action: FavAction,
    },

    /// Show the theme, or change it with `toggle`, `light` or `dark`
    Theme {
        /// toggle, light or dark
        mode: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum FavAction {
    /// Mark a course as favourite
    Add { id: u32 },
    /// Unmark a course
    Remove { id: u32 },
    /// Flip a course's favourite mark
    Toggle { id: u32 },
}

impl Commands {
    fn requires_session(&self) -> bool {
        !matches!(
            self,
            Commands::Status | Commands::Login { .. } | Commands::Register { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct CourseView<'a> {
    #[serde(flatten)]
    course: &'a Course,
    favourite: bool,
}

#[derive(Serialize)]
struct StatusReport {
    authenticated: bool,
    user: Option<User>,
    theme: ThemeMode,
    favourites: Vec<u32>,
    unreadable_keys: Vec<&'static str>,
}

#[derive(Serialize)]
struct FavouriteChange {
    id: u32,
    favourite: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.verbose).init();

    if let Err(e) = run(cli).await {
        let code = exit_code(&e);
        eprintln!("Error: {:#}", e);
        if code == 2 {
            eprintln!("Sign in first: coursecat login <email>");
        }
        std::process::exit(code);
    }
}

fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CoursecatError>()
        .map(CoursecatError::exit_code)
        .unwrap_or(1)
}

async fn run(cli: Cli) -> Result<()> {
    let format = if cli.format == "json" {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let config = Config::load_or_default().context("Failed to load configuration")?;
    // Hydration happens here, before the session gate below.
    let service = CoursecatService::from_config(config)
        .await
        .context("Failed to open coursecat state")?;

    tracing::debug!(command = ?cli.command, "running command");

    if cli.command.requires_session() {
        service.require_authenticated()?;
    }

    match cli.command {
        Commands::Status => status(&service, format),
        Commands::Login { email } => {
            let user = service.session().login(&email).await?;
            match format {
                OutputFormat::Json => print_json(&user),
                OutputFormat::Text => {
                    println!("Logged in as {} <{}>", user.name, user.email);
                    Ok(())
                }
            }
        }
        Commands::Register { name, email } => {
            let registration = service.session().register(&name, &email).await?;
            match format {
                OutputFormat::Json => print_json(&registration.user),
                OutputFormat::Text => {
                    println!(
                        "Registered {} <{}>. Sign in with: coursecat login {}",
                        registration.user.name, registration.user.email, registration.user.email
                    );
                    Ok(())
                }
            }
        }
        Commands::Logout => {
            service.session().logout().await;
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({ "authenticated": false })),
                OutputFormat::Text => {
                    println!("Logged out");
                    Ok(())
                }
            }
        }
        Commands::Courses { search } => {
            let courses = match search {
                Some(term) => service.courses().search(&term).await?,
                None => {
                    service.courses().load_courses().await?;
                    service.state().courses.items
                }
            };
            print_courses(&service, &courses, format)
        }
        Commands::Show { id } => {
            let course = service.courses().details(id).await?;
            let favourite = service.courses().is_favourite(id);
            match format {
                OutputFormat::Json => print_json(&CourseView {
                    course: &course,
                    favourite,
                }),
                OutputFormat::Text => {
                    print_course_details(&course, favourite);
                    Ok(())
                }
            }
        }
        Commands::Favourites => {
            service.courses().load_courses().await?;
            let courses = service.courses().favourite_courses();
            print_courses(&service, &courses, format)
        }
        Commands::Fav { action } => {
            let (id, favourite) = match action {
                FavAction::Add { id } => {
                    service.courses().details(id).await?;
                    service.preferences().add_favourite(id).await;
                    (id, true)
                }
                FavAction::Remove { id } => {
                    service.preferences().remove_favourite(id).await;
                    (id, false)
                }
                FavAction::Toggle { id } => {
                    service.courses().details(id).await?;
                    (id, service.preferences().toggle_favourite(id).await)
                }
            };
            match format {
                OutputFormat::Json => print_json(&FavouriteChange { id, favourite }),
                OutputFormat::Text => {
                    if favourite {
                        println!("Course {} is a favourite", id);
                    } else {
                        println!("Course {} is not a favourite", id);
                    }
                    Ok(())
                }
            }
        }
        Commands::Theme { mode } => {
            let theme = match mode.as_deref() {
                None => service.preferences().theme(),
                Some(m) if m.trim().eq_ignore_ascii_case("toggle") => {
                    service.preferences().toggle_theme().await
                }
                Some(other) => service.preferences().set_theme_str(other).await?,
            };
            match format {
                OutputFormat::Json => print_json(&serde_json::json!({ "theme": theme })),
                OutputFormat::Text => {
                    println!("Theme: {}", theme);
                    Ok(())
                }
            }
        }
    }
}

fn status(service: &CoursecatService, format: OutputFormat) -> Result<()> {
    let state = service.state();
    let report = StatusReport {
        authenticated: state.is_authenticated(),
        user: state.current_user().cloned(),
        theme: state.theme.mode,
        favourites: state.favourites.items.clone(),
        unreadable_keys: service.hydration().failed_keys(),
    };

    match format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Text => {
            match &report.user {
                Some(user) if report.authenticated => {
                    println!("Logged in as {} <{}>", user.name, user.email)
                }
                _ => println!("Not logged in"),
            }
            println!("Theme: {}", report.theme);
            println!("Favourites: {}", report.favourites.len());
            if !report.unreadable_keys.is_empty() {
                println!(
                    "Reset to defaults (stored value unreadable): {}",
                    report.unreadable_keys.join(", ")
                );
            }
            Ok(())
        }
    }
}

fn print_courses(
    service: &CoursecatService,
    courses: &[Course],
    format: OutputFormat,
) -> Result<()> {
    let views: Vec<CourseView<'_>> = courses
        .iter()
        .map(|course| CourseView {
            course,
            favourite: service.courses().is_favourite(course.id),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&views),
        OutputFormat::Text => {
            if views.is_empty() {
                println!("No courses found");
                return Ok(());
            }
            for view in views {
                print_course_summary(view.course, view.favourite);
            }
            Ok(())
        }
    }
}

fn print_course_summary(course: &Course, favourite: bool) {
    let marker = if favourite { "♥" } else { " " };
    println!("{} {:>3}  {}", marker, course.id, course.title);
    println!(
        "       {} | {} | {} | ★ {:.1} | {}",
        course.category,
        course.level,
        course.duration,
        course.rating,
        format_students(course.students)
    );
    println!("       {}", truncate_text(&course.description, 72));
}

fn print_course_details(course: &Course, favourite: bool) {
    println!("{}", course.title);
    println!();
    println!("{}", course.description);
    println!();
    println!("Id:        {}", course.id);
    println!("Category:  {}", course.category);
    println!("Status:    {}", course.status);
    println!("Level:     {}", course.level);
    println!("Duration:  {}", course.duration);
    println!("Lessons:   {}", course.lessons);
    println!(
        "Rating:    {:.1} ({})",
        course.rating,
        RatingBand::for_rating(course.rating).as_str()
    );
    println!("Students:  {}", format_students(course.students));
    println!("Favourite: {}", if favourite { "yes" } else { "no" });
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to encode output")?;
    println!("{}", json);
    Ok(())
}
