use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use fittrack_core::*;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Fitness tracking system", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Args)]
struct AuthArgs {
    /// Account username
    #[arg(long)]
    username: String,

    /// Account password (prompted when omitted)
    #[arg(long)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Signup {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Show the dashboard greeting, clock and quick stats
    Dashboard {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Calculate BMI from weight (kg) and height (cm)
    Bmi {
        #[arg(long)]
        weight_kg: f64,

        #[arg(long)]
        height_cm: f64,
    },

    /// Log a completed exercise session
    Log {
        #[command(flatten)]
        auth: AuthArgs,

        /// Exercise name
        #[arg(long)]
        exercise: String,

        #[arg(long)]
        sets: u32,

        #[arg(long)]
        reps: u32,

        /// Weight lifted in kg (omit when not applicable)
        #[arg(long)]
        weight_kg: Option<f64>,

        /// Estimated calories burned
        #[arg(long)]
        calories: u32,
    },

    /// Show exercise history, most recent first
    History {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Manage fitness goals
    Goal {
        #[command(flatten)]
        auth: AuthArgs,

        #[command(subcommand)]
        action: GoalAction,
    },

    /// Show aggregate workout statistics
    Summary {
        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Print chart series data for a metric (calories, sets, reps, weight)
    Chart {
        #[command(flatten)]
        auth: AuthArgs,

        #[arg(long)]
        metric: String,

        /// Emit the series as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Export exercise history to a CSV file
    Export {
        #[command(flatten)]
        auth: AuthArgs,

        #[arg(long)]
        out: PathBuf,
    },

    /// List the built-in demo exercises
    Exercises,
}

#[derive(Subcommand)]
enum GoalAction {
    /// Add a new goal
    Add {
        /// Goal category (e.g. "Weight Loss", "Strength")
        #[arg(long)]
        goal_type: String,

        #[arg(long)]
        description: String,

        #[arg(long)]
        target: f64,

        #[arg(long)]
        current: f64,

        /// Unit (e.g. kg, km, reps)
        #[arg(long)]
        unit: String,

        /// Optional end date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
    },

    /// List goals (active only unless --all)
    List {
        #[arg(long)]
        all: bool,
    },

    /// Update tracked progress for a goal
    Update {
        #[arg(long)]
        id: i64,

        #[arg(long)]
        current: f64,

        /// Set the completion flag (left untouched when omitted)
        #[arg(long)]
        completed: Option<bool>,
    },

    /// Delete a goal by id
    Delete {
        #[arg(long)]
        id: i64,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    fittrack_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let db_path = match cli.data_dir {
        Some(dir) => dir.join(fittrack_core::config::DATABASE_FILE),
        None => config.database_path(),
    };
    tracing::debug!("Using database at {:?}", db_path);

    // The store is only opened for commands that touch it, so `bmi` and
    // `exercises` never create a database file as a side effect
    match cli.command {
        Commands::Signup { auth } => {
            let mut session = open_session(&db_path)?;
            cmd_signup(&mut session, &auth)
        }
        Commands::Dashboard { auth } => {
            let mut session = open_session(&db_path)?;
            log_in(&mut session, &auth)?;
            cmd_dashboard(&session, &config)
        }
        Commands::Bmi {
            weight_kg,
            height_cm,
        } => cmd_bmi(weight_kg, height_cm),
        Commands::Log {
            auth,
            exercise,
            sets,
            reps,
            weight_kg,
            calories,
        } => {
            let mut session = open_session(&db_path)?;
            log_in(&mut session, &auth)?;
            cmd_log(&session, exercise, sets, reps, weight_kg, calories)
        }
        Commands::History { auth } => {
            let mut session = open_session(&db_path)?;
            log_in(&mut session, &auth)?;
            cmd_history(&session)
        }
        Commands::Goal { auth, action } => {
            let mut session = open_session(&db_path)?;
            log_in(&mut session, &auth)?;
            cmd_goal(&session, action)
        }
        Commands::Summary { auth } => {
            let mut session = open_session(&db_path)?;
            log_in(&mut session, &auth)?;
            cmd_summary(&session)
        }
        Commands::Chart { auth, metric, json } => {
            let mut session = open_session(&db_path)?;
            log_in(&mut session, &auth)?;
            cmd_chart(&session, &metric, json)
        }
        Commands::Export { auth, out } => {
            let mut session = open_session(&db_path)?;
            log_in(&mut session, &auth)?;
            cmd_export(&session, &out)
        }
        Commands::Exercises => cmd_exercises(),
    }
}

fn open_session(db_path: &std::path::Path) -> Result<AppSession> {
    Ok(AppSession::new(Store::open(db_path)?))
}

// ----------------------------------------------------------------------
// Authentication helpers
// ----------------------------------------------------------------------

fn resolve_password(auth: &AuthArgs) -> Result<String> {
    if let Some(password) = &auth.password {
        return Ok(password.clone());
    }

    print!("Password: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim_end_matches(['\r', '\n']).to_string())
}

fn log_in(session: &mut AppSession, auth: &AuthArgs) -> Result<()> {
    let password = resolve_password(auth)?;
    if session.log_in(&auth.username, &password) {
        Ok(())
    } else {
        eprintln!("Invalid username or password.");
        Err(Error::Other("login failed".into()))
    }
}

// ----------------------------------------------------------------------
// Commands
// ----------------------------------------------------------------------

fn cmd_signup(session: &mut AppSession, auth: &AuthArgs) -> Result<()> {
    if auth.username.trim().is_empty() {
        return Err(Error::Validation("username must not be empty".into()));
    }

    let password = resolve_password(auth)?;
    if password.is_empty() {
        return Err(Error::Validation("password must not be empty".into()));
    }

    if session.sign_up(&auth.username, &password) {
        println!("✓ Account created. You can now log in as {}.", auth.username);
        Ok(())
    } else {
        eprintln!("Username {:?} is already taken.", auth.username);
        Err(Error::Other("signup failed".into()))
    }
}

fn cmd_dashboard(session: &AppSession, config: &Config) -> Result<()> {
    let Some(user) = session.current_user() else {
        return Err(Error::Other("not logged in".into()));
    };

    let now = Local::now();
    println!("Welcome, {}!", user.username);
    println!(
        "{}",
        now.format(&format!(
            "{}\n{}",
            config.display.date_format, config.display.time_format
        ))
    );

    let summary = session.workout_summary();
    let active_goals = session.goals(false).len();
    println!();
    println!("  Workouts logged: {}", summary.total_workouts);
    println!("  Active goals:    {}", active_goals);

    Ok(())
}

fn cmd_bmi(weight_kg: f64, height_cm: f64) -> Result<()> {
    let bmi = calculate_bmi(weight_kg, height_cm)?;
    let category = BmiCategory::classify(bmi);

    println!("Your BMI: {:.2}", bmi);
    println!("Category: {}", category);
    Ok(())
}

fn cmd_log(
    session: &AppSession,
    exercise: String,
    sets: u32,
    reps: u32,
    weight_kg: Option<f64>,
    calories: u32,
) -> Result<()> {
    if exercise.trim().is_empty() {
        return Err(Error::Validation("exercise name must not be empty".into()));
    }
    if sets == 0 || reps == 0 || calories == 0 {
        return Err(Error::Validation(
            "sets, reps and calories must be positive".into(),
        ));
    }
    if let Some(weight) = weight_kg {
        if weight <= 0.0 {
            return Err(Error::Validation("weight must be positive".into()));
        }
    }

    let entry = NewExerciseLog {
        exercise_name: exercise,
        sets,
        reps,
        weight_kg,
        calories,
        logged_at: Local::now().naive_local(),
    };

    if session.log_exercise(&entry) {
        println!("✓ Exercise logged!");
        Ok(())
    } else {
        eprintln!("Failed to log exercise. Please try again.");
        Err(Error::Other("exercise logging failed".into()))
    }
}

fn cmd_history(session: &AppSession) -> Result<()> {
    let logs = session.exercise_logs();
    if logs.is_empty() {
        println!("No exercise logs found yet.");
        return Ok(());
    }

    println!("Date/Time             Exercise          Sets Reps Weight   Calories");
    println!("--------------------------------------------------------------------");
    for log in logs {
        let weight = log
            .weight_kg
            .map(|w| format!("{:.1} kg", w))
            .unwrap_or_else(|| "-".into());
        println!(
            "{}   {:<15}  {:>4} {:>4} {:>8} {:>8}",
            log.logged_at.format(DATETIME_FORMAT),
            log.exercise_name,
            log.sets,
            log.reps,
            weight,
            log.calories,
        );
    }

    Ok(())
}

fn cmd_goal(session: &AppSession, action: GoalAction) -> Result<()> {
    match action {
        GoalAction::Add {
            goal_type,
            description,
            target,
            current,
            unit,
            end_date,
        } => {
            if goal_type.trim().is_empty() || description.trim().is_empty() || unit.trim().is_empty()
            {
                return Err(Error::Validation(
                    "goal type, description and unit must not be empty".into(),
                ));
            }
            if target <= 0.0 {
                return Err(Error::Validation("target value must be positive".into()));
            }
            if current < 0.0 {
                return Err(Error::Validation(
                    "current value must not be negative".into(),
                ));
            }

            let end_date = match end_date {
                Some(raw) => Some(NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(|_| {
                    Error::Validation("end date must be in YYYY-MM-DD format".into())
                })?),
                None => None,
            };

            let goal = NewGoal {
                goal_type,
                description,
                target_value: target,
                current_value: current,
                unit,
                start_date: Local::now().date_naive(),
                end_date,
            };

            if session.add_goal(&goal) {
                println!("✓ Goal added!");
                Ok(())
            } else {
                eprintln!("Failed to add goal. Please try again.");
                Err(Error::Other("goal creation failed".into()))
            }
        }

        GoalAction::List { all } => {
            let goals = session.goals(all);
            if goals.is_empty() {
                println!("No fitness goals set yet.");
                return Ok(());
            }

            println!("Id    Type            Description           Progress        Status      End Date");
            println!("--------------------------------------------------------------------------------");
            for goal in goals {
                let end_date = goal
                    .end_date
                    .map(|d| d.format(DATE_FORMAT).to_string())
                    .unwrap_or_else(|| "N/A".into());
                println!(
                    "{:<5} {:<15} {:<21} {}/{} {:<6} {:<11} {}",
                    goal.id,
                    goal.goal_type,
                    goal.description,
                    goal.current_value,
                    goal.target_value,
                    goal.unit,
                    goal_status_label(&goal),
                    end_date,
                );
            }
            Ok(())
        }

        GoalAction::Update {
            id,
            current,
            completed,
        } => {
            if current < 0.0 {
                return Err(Error::Validation(
                    "current value must not be negative".into(),
                ));
            }

            if session.update_goal_progress(id, current, completed) {
                println!("✓ Goal progress updated!");
                Ok(())
            } else {
                eprintln!("Failed to update goal progress.");
                Err(Error::Other("goal update failed".into()))
            }
        }

        GoalAction::Delete { id } => {
            if session.delete_goal(id) {
                println!("✓ Goal deleted.");
                Ok(())
            } else {
                eprintln!("Failed to delete goal.");
                Err(Error::Other("goal deletion failed".into()))
            }
        }
    }
}

fn cmd_summary(session: &AppSession) -> Result<()> {
    println!("--- Workout Analysis ---\n");

    let summary = session.workout_summary();
    if summary.total_workouts == 0 {
        println!("No workout data to analyze yet.");
        return Ok(());
    }

    println!("Total Workouts Logged: {}", summary.total_workouts);
    println!(
        "Total Estimated Calories Burned: {} kcal",
        summary.total_calories
    );
    println!("Average Sets per Workout: {:.1}", summary.avg_sets);
    println!("Average Reps per Workout: {:.1}", summary.avg_reps);
    println!();

    println!("Most Frequent Exercises:");
    for entry in &summary.top_exercises {
        println!("- {}: {} workouts", entry.name, entry.count);
    }
    println!();

    println!("Max Weight Lifted (per exercise):");
    if summary.max_weights.is_empty() {
        println!("No weight data logged yet.");
    } else {
        for (name, max_weight) in &summary.max_weights {
            println!("- {}: {:.1} kg", name, max_weight);
        }
    }

    Ok(())
}

fn cmd_chart(session: &AppSession, metric: &str, json: bool) -> Result<()> {
    let metric = parse_metric(metric)?;
    let series = session.chart_series(metric);

    if json {
        println!("{}", serde_json::to_string(&series).map_err(|e| Error::Other(e.to_string()))?);
        return Ok(());
    }

    println!("{}", metric.label());
    if series.is_empty() {
        println!("No exercise data available.");
        return Ok(());
    }

    for point in series {
        let value = point
            .value
            .map(|v| format!("{v}"))
            .unwrap_or_else(|| "-".into());
        println!("{}  {}", point.at.format(DATETIME_FORMAT), value);
    }

    Ok(())
}

fn parse_metric(raw: &str) -> Result<ChartMetric> {
    match raw.to_lowercase().as_str() {
        "calories" => Ok(ChartMetric::Calories),
        "sets" => Ok(ChartMetric::Sets),
        "reps" => Ok(ChartMetric::Reps),
        "weight" => Ok(ChartMetric::Weight),
        other => Err(Error::Validation(format!(
            "unknown metric {:?} (expected calories, sets, reps or weight)",
            other
        ))),
    }
}

fn cmd_export(session: &AppSession, out: &std::path::Path) -> Result<()> {
    match session.export_history(out) {
        Some(count) => {
            println!("✓ Exported {} log rows", count);
            println!("  CSV: {}", out.display());
            Ok(())
        }
        None => {
            eprintln!("Failed to export history.");
            Err(Error::Other("export failed".into()))
        }
    }
}

fn cmd_exercises() -> Result<()> {
    let catalog = default_catalog();
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    println!("Available exercise demos:");
    for exercise in &catalog.exercises {
        println!("  {:<10} {}", exercise.id, exercise.name);
    }

    Ok(())
}
