//! Moraledu CLI
//!
//! Command-line front end for the moral education backend:
//! - Log in and out, inspect the current session
//! - Manage users, grades, classes and student-parent links
//! - Record behavior scores and awards, review observations
//! - Browse notifications and the leadership dashboard

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use moraledu::charts::{self, AwardMetrics, TimeRange};
use moraledu::config::{generate_default_config, Config};
use moraledu::csv_io::{self, CsvTable};
use moraledu::forms::submit;
use moraledu::model::{
    AwardDraft, AwardFilter, AwardType, ClassDraft, ClassType, GradeDraft, Id, NotificationFilter,
    ObservationDraft, ObservationFilter, PromotionRequest, ReportFilter, ReviewDecision,
    ReviewStatus, Role, RuleTree, ScoreDraft, ScoreFilter, ScoreType, SelfReportDraft,
    SelfReportFilter, UserDraft, UserFilter,
};
use moraledu::resources::{
    awards, classes, grades, notifications, observations, relationships, rules, scores,
    self_reports, users,
};
use moraledu::sections::{self, Section};
use moraledu::session::{self, LoginCredentials, SessionStore};
use moraledu::shell::{AppShell, Authenticator, View};
use moraledu::{logging, ApiClient, ApiError};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "moraledu")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Moral education platform client")]
#[command(long_about = "Command-line client for the moral education tracking backend.\nTracks behavior scores, awards and observations for students, parents and staff.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Backend API base URL (overrides config)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Config file (default: platform config dir, then ./moraledu.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exchange username and password for a token
    Login {
        username: String,
        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored token
    Logout,

    /// Show the signed-in user and their areas
    Whoami,

    /// User administration
    #[command(subcommand)]
    Users(UsersCommand),

    /// Link parents to students
    #[command(subcommand)]
    Links(LinksCommand),

    /// Grade administration
    #[command(subcommand)]
    Grades(GradesCommand),

    /// Class administration
    #[command(subcommand)]
    Classes(ClassesCommand),

    /// Show the rule taxonomy as a tree
    Rules,

    /// Behavior scores
    #[command(subcommand)]
    Scores(ScoresCommand),

    /// Awards
    #[command(subcommand)]
    Awards(AwardsCommand),

    /// Parent observations
    #[command(subcommand)]
    Observations(ObservationsCommand),

    /// Student self-reports
    #[command(subcommand)]
    SelfReports(SelfReportsCommand),

    /// Notifications
    #[command(subcommand)]
    Notifications(NotificationsCommand),

    /// Leadership analytics dashboard
    Dashboard {
        /// 7days, 30days, 90days, year or all
        #[arg(long, default_value = "30days")]
        range: TimeRange,
        #[arg(long)]
        grade: Option<Id>,
        #[arg(long)]
        class: Option<Id>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum UsersCommand {
    List {
        #[arg(long)]
        role: Option<Role>,
    },
    Create {
        username: String,
        #[arg(long)]
        role: Role,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        /// Home class (students)
        #[arg(long)]
        class: Option<Id>,
    },
    Delete {
        id: Id,
    },
    /// Upload a CSV of users (checked locally first)
    Import {
        path: PathBuf,
        /// Only run the local checks
        #[arg(long)]
        dry_run: bool,
    },
    /// Download all users as CSV
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Move students into another class
    Promote {
        #[arg(long)]
        target_class: Id,
        #[arg(long)]
        target_grade: Option<Id>,
        /// Student ids
        #[arg(required = true)]
        students: Vec<Id>,
    },
}

#[derive(Subcommand)]
pub enum LinksCommand {
    List,
    Assign { student: Id, parent: Id },
    Delete { id: Id },
}

#[derive(Subcommand)]
pub enum GradesCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: Id,
    },
}

#[derive(Subcommand)]
pub enum ClassesCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        grade: Id,
        /// Subject class instead of home class
        #[arg(long)]
        subject: bool,
    },
    Delete {
        id: Id,
    },
}

#[derive(clap::Args)]
pub struct ScoreFilterArgs {
    #[arg(long)]
    student: Option<Id>,
    #[arg(long)]
    class: Option<Id>,
    #[arg(long)]
    grade: Option<Id>,
    #[arg(long)]
    from: Option<NaiveDate>,
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl From<ScoreFilterArgs> for ScoreFilter {
    fn from(args: ScoreFilterArgs) -> Self {
        ScoreFilter {
            student: args.student,
            school_class: args.class,
            grade: args.grade,
            start_date: args.from,
            end_date: args.to,
        }
    }
}

#[derive(Subcommand)]
pub enum ScoresCommand {
    List(ScoreFilterArgs),
    Summary(ScoreFilterArgs),
    Export {
        #[command(flatten)]
        filter: ScoreFilterArgs,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Record a behavior score
    Record {
        #[arg(long)]
        student: Id,
        #[arg(long)]
        rule: Id,
        #[arg(long)]
        class: Id,
        #[arg(long, default_value = "1")]
        points: i32,
        #[arg(long)]
        negative: bool,
        /// Defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        comment: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AwardKind {
    Star,
    Badge,
    Certificate,
    Other,
}

impl From<AwardKind> for AwardType {
    fn from(kind: AwardKind) -> Self {
        match kind {
            AwardKind::Star => AwardType::Star,
            AwardKind::Badge => AwardType::Badge,
            AwardKind::Certificate => AwardType::Certificate,
            AwardKind::Other => AwardType::Other,
        }
    }
}

#[derive(Subcommand)]
pub enum AwardsCommand {
    List {
        #[arg(long)]
        student: Option<Id>,
        /// Show headline metrics instead of the list
        #[arg(long)]
        metrics: bool,
    },
    Grant {
        #[arg(long)]
        student: Id,
        name: String,
        #[arg(long, value_enum, default_value = "star")]
        kind: AwardKind,
        #[arg(long, default_value = "1")]
        level: i32,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value = "")]
        description: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Decision {
    Approve,
    Reject,
}

impl From<Decision> for ReviewDecision {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => ReviewDecision::Approved,
            Decision::Reject => ReviewDecision::Rejected,
        }
    }
}

#[derive(Subcommand)]
pub enum ObservationsCommand {
    List {
        #[arg(long)]
        student: Option<Id>,
        #[arg(long)]
        pending: bool,
    },
    Submit {
        #[arg(long)]
        student: Id,
        description: String,
        #[arg(long)]
        rule: Option<Id>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Review {
        id: Id,
        #[arg(value_enum)]
        decision: Decision,
    },
}

#[derive(Subcommand)]
pub enum SelfReportsCommand {
    List {
        #[arg(long)]
        student: Option<Id>,
    },
    Submit {
        #[arg(long)]
        student: Id,
        description: String,
        #[arg(long)]
        rule: Option<Id>,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Review {
        id: Id,
        #[arg(value_enum)]
        decision: Decision,
        #[arg(long)]
        comment: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum NotificationsCommand {
    List {
        #[arg(long)]
        unread: bool,
    },
    /// Number of unread notifications
    Count,
    Read {
        id: Id,
    },
    ReadAll,
}

/// Writes command results in the selected format
struct Output {
    format: OutputFormat,
}

impl Output {
    /// Print a list; `row` produces the table/CSV cells for one item
    fn list<T: Serialize>(
        &self,
        items: &[T],
        headers: &[&str],
        row: impl Fn(&T) -> Vec<String>,
    ) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(items)?),
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(std::io::stdout());
                writer.write_record(headers)?;
                for item in items {
                    writer.write_record(row(item))?;
                }
                writer.flush()?;
            }
            OutputFormat::Table => {
                if items.is_empty() {
                    println!("No results");
                    return Ok(());
                }
                let table = CsvTable {
                    headers: headers.iter().map(|h| h.to_string()).collect(),
                    rows: items.iter().map(row).collect(),
                };
                println!("{}", table.render());
            }
        }
        Ok(())
    }

    /// Print a single value; `describe` renders it for humans
    fn value<T: Serialize>(&self, value: &T, describe: impl FnOnce(&T)) -> anyhow::Result<()> {
        match self.format {
            OutputFormat::Json | OutputFormat::Csv => {
                println!("{}", serde_json::to_string_pretty(value)?)
            }
            OutputFormat::Table => describe(value),
        }
        Ok(())
    }

    /// Raw CSV bytes: to a file, or rendered to stdout
    fn csv_bytes(&self, data: &[u8], path: Option<PathBuf>) -> anyhow::Result<()> {
        if let Some(path) = path {
            std::fs::write(&path, data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported to {:?}", path);
            return Ok(());
        }
        match self.format {
            OutputFormat::Table => println!("{}", CsvTable::parse(data)?.render()),
            _ => std::io::stdout().write_all(data)?,
        }
        Ok(())
    }
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn read_password() -> anyhow::Result<String> {
    eprint!("Password: ");
    std::io::stderr().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_section<T>(title: &str, section: &Section<T>, describe: impl FnOnce(&T)) {
    println!("{title}");
    match section {
        Section::Loaded(value) => describe(value),
        Section::Failed(message) => println!("  unavailable: {message}"),
    }
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    logging::init(&config.logging);
    tracing::debug!(base_url = %config.api.base_url, "Using backend");

    let session = SessionStore::file(&config.session.file);
    let client = ApiClient::new(config.api.clone(), session.clone())?;
    let mut shell = AppShell::new(client.clone(), session);
    let out = Output { format: cli.format };

    // Login manages the token itself
    let is_login = matches!(cli.command, Commands::Login { .. });
    let result = run(cli.command, &client, &mut shell, &out).await;
    match result {
        Err(e) if !is_login => Err(apply_session_rule(&mut shell, e)),
        other => other,
    }
}

/// Every command is a top-level load: a 401 anywhere ends the session
fn apply_session_rule<A: Authenticator>(
    shell: &mut AppShell<A>,
    error: anyhow::Error,
) -> anyhow::Error {
    let Some(api_error) = error.downcast_ref::<ApiError>() else {
        return error;
    };
    let rejected = api_error.is_auth_failure();
    shell.handle_load_error(api_error);

    if rejected {
        error.context("The server rejected the stored token; you have been logged out. Run `moraledu login <username>`.")
    } else {
        error
    }
}

async fn run(
    command: Commands,
    client: &ApiClient,
    shell: &mut AppShell<ApiClient>,
    out: &Output,
) -> anyhow::Result<()> {
    match command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(p) => p,
                None => read_password()?,
            };
            let credentials = LoginCredentials::new(username, password);
            session::login(client, &credentials)
                .await
                .context("Login failed")?;
            println!("Logged in as {}", credentials.username);
        }

        Commands::Logout => {
            shell.logout()?;
            println!("Logged out");
        }

        Commands::Whoami => {
            match shell.mount().await {
                View::Login | View::Loading => bail!("Not logged in. Run `moraledu login <username>` first."),
                View::Authenticated(view) => {
                    if let Some(error) = &view.error {
                        bail!("Logged in, but the current user could not be loaded: {error}");
                    }
                }
            }
            if let Some(user) = shell.current_user() {
                let areas = shell.areas();
                out.value(user, |user| {
                    println!("{} ({})", user.display_name(), user.username);
                    println!("Role: {}", user.role.label());
                    let names: Vec<&str> = areas.iter().map(|a| a.label()).collect();
                    println!("Areas: {}", names.join(", "));
                })?;
            }
        }

        Commands::Users(cmd) => run_users(client, out, cmd).await?,
        Commands::Links(cmd) => run_links(client, out, cmd).await?,
        Commands::Grades(cmd) => run_grades(client, out, cmd).await?,
        Commands::Classes(cmd) => run_classes(client, out, cmd).await?,

        Commands::Rules => {
            let (chapters, dimensions, sub_items) = tokio::try_join!(
                rules::list_chapters(client),
                rules::list_dimensions(client, None),
                rules::list_sub_items(client, None),
            )
            .context("Failed to load rules")?;
            let tree = RuleTree::assemble(chapters, dimensions, sub_items);
            out.value(&tree, |tree| {
                for chapter in &tree.chapters {
                    println!("{} [{}]", chapter.chapter.name, chapter.chapter.id);
                    for dimension in &chapter.dimensions {
                        println!("  {} [{}]", dimension.dimension.name, dimension.dimension.id);
                        for item in &dimension.sub_items {
                            let max = item.max_score.map(|m| format!(" (max {m})")).unwrap_or_default();
                            println!("    {} [{}]{}", item.name, item.id, max);
                        }
                    }
                }
                println!();
                println!("{} rules in {} chapters", tree.sub_item_count(), tree.chapters.len());
            })?;
        }

        Commands::Scores(cmd) => run_scores(client, out, cmd).await?,
        Commands::Awards(cmd) => run_awards(client, out, cmd).await?,
        Commands::Observations(cmd) => run_observations(client, out, cmd).await?,
        Commands::SelfReports(cmd) => run_self_reports(client, out, cmd).await?,
        Commands::Notifications(cmd) => run_notifications(client, out, cmd).await?,

        Commands::Dashboard { range, grade, class } => {
            let mut filter = ReportFilter {
                grade_id: grade,
                class_id: class,
                ..Default::default()
            };
            range.apply(&mut filter, today());

            // Sections swallow their own errors, so confirm the session first
            if !matches!(shell.mount().await, View::Authenticated(_)) {
                bail!("Not logged in. Run `moraledu login <username>` first.");
            }
            let snapshot = sections::load_dashboard(client, &filter).await;
            out.value(&snapshot, |snapshot| {
                print_section("Behavior summary", &snapshot.score_summary, |s| {
                    println!("  Positive: {}  Negative: {}  Net: {}  Records: {}",
                        s.total_positive_points, s.total_negative_points, s.net_score, s.total_records);
                });
                print_section("Behavior trend", &snapshot.time_series, |series| {
                    for row in charts::merge_time_series(series) {
                        println!("  {}  +{:<5} -{:<5} net {}",
                            row.date, row.positive_points, row.negative_points, row.net_points);
                    }
                });
                print_section("Dimensions", &snapshot.dimensions, |dims| {
                    for d in charts::rank_dimensions(dims.clone()) {
                        println!("  {:<24} net {:>6} ({} records)", d.dimension_name, d.net_points, d.total_records);
                    }
                });
                print_section("Awards by type", &snapshot.award_analytics, |a| {
                    for share in charts::award_type_shares(&a.awards_by_type) {
                        println!("  {:<12} {:>4} ({:.1}%)", share.label, share.count, share.percent);
                    }
                });
                print_section("Engagement", &snapshot.engagement, |e| {
                    println!("  Parents: {} active, {} observations, {:.1}% approved",
                        e.parent_engagement.active_parents, e.parent_engagement.total_observations,
                        e.parent_engagement.approval_rate);
                    println!("  Students: {} active, {} reports, {:.1}% approved",
                        e.student_engagement.active_students, e.student_engagement.total_reports,
                        e.student_engagement.approval_rate);
                    println!("  Teachers: {} active, {} scores",
                        e.teacher_engagement.active_teachers, e.teacher_engagement.total_scores);
                });
                print_section("Organisation", &snapshot.classes, |classes| {
                    let grades = snapshot.grades.loaded().map(Vec::len).unwrap_or_default();
                    println!("  {} grades, {} classes", grades, classes.len());
                });
            })?;
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)?;
                    println!("Config written to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

async fn run_users(client: &ApiClient, out: &Output, cmd: UsersCommand) -> anyhow::Result<()> {
    match cmd {
        UsersCommand::List { role } => {
            let users = users::list(client, &UserFilter { role })
                .await
                .context("Failed to fetch users")?;
            out.list(&users, &["ID", "Username", "Name", "Role", "Class"], |u| {
                vec![
                    u.id.to_string(),
                    u.username.clone(),
                    u.display_name(),
                    u.role.label().to_string(),
                    u.school_class_details
                        .as_ref()
                        .map(|c| c.name.clone())
                        .unwrap_or_default(),
                ]
            })?;
        }
        UsersCommand::Create {
            username,
            role,
            password,
            email,
            first_name,
            last_name,
            class,
        } => {
            let draft = UserDraft {
                email,
                first_name,
                last_name,
                school_class: class,
                password,
                ..UserDraft::new(username, role)
            };
            let user = submit(&draft, users::create(client, &draft))
                .await
                .context("Failed to create user")?;
            println!("Created user {} [{}]", user.username, user.id);
        }
        UsersCommand::Delete { id } => {
            users::delete(client, id).await.context("Failed to delete user")?;
            println!("Deleted user {id}");
        }
        UsersCommand::Import { path, dry_run } => {
            let (data, check) = csv_io::preflight_user_import_file(&path)
                .with_context(|| format!("Cannot import {}", path.display()))?;

            println!("Rows: {}  Problems: {}", check.rows, check.rows_failed);
            for error in check.errors.iter().take(10) {
                println!("  {error}");
            }
            if dry_run {
                println!("(Dry run - nothing was uploaded)");
                return Ok(());
            }
            if !check.is_clean() {
                bail!("Fix the rows above before importing");
            }

            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "users.csv".to_string());
            let result = users::import(client, &file_name, data)
                .await
                .context("Import failed")?;
            out.value(&result, |r| {
                if let Some(message) = &r.message {
                    println!("{message}");
                }
                println!("Created: {}  Updated: {}", r.created, r.updated);
                for error in &r.errors {
                    println!("  {error}");
                }
            })?;
        }
        UsersCommand::Export { output } => {
            let data = users::export(client).await.context("Export failed")?;
            out.csv_bytes(&data, output)?;
        }
        UsersCommand::Promote {
            target_class,
            target_grade,
            students,
        } => {
            let request = PromotionRequest {
                source_grade_id: None,
                source_class_id: None,
                target_grade_id: target_grade,
                target_class_id: target_class,
                student_ids: students,
            };
            let result = submit(&request, users::promote_or_demote(client, &request))
                .await
                .context("Promotion failed")?;
            out.value(&result, |r| {
                println!("{} ({} students moved)", r.message, r.updated_count);
                for error in &r.errors {
                    println!("  {error}");
                }
            })?;
        }
    }
    Ok(())
}

async fn run_links(client: &ApiClient, out: &Output, cmd: LinksCommand) -> anyhow::Result<()> {
    match cmd {
        LinksCommand::List => {
            let links = relationships::list(client)
                .await
                .context("Failed to fetch relationships")?;
            out.list(&links, &["ID", "Student", "Parent"], |l| {
                vec![
                    l.id.to_string(),
                    l.student_name.clone().unwrap_or_else(|| l.student.to_string()),
                    l.parent_name.clone().unwrap_or_else(|| l.parent.to_string()),
                ]
            })?;
        }
        LinksCommand::Assign { student, parent } => {
            relationships::assign_parent(client, student, parent)
                .await
                .context("Failed to assign parent")?;
            println!("Linked parent {parent} to student {student}");
        }
        LinksCommand::Delete { id } => {
            relationships::delete(client, id)
                .await
                .context("Failed to delete relationship")?;
            println!("Deleted relationship {id}");
        }
    }
    Ok(())
}

async fn run_grades(client: &ApiClient, out: &Output, cmd: GradesCommand) -> anyhow::Result<()> {
    match cmd {
        GradesCommand::List => {
            let grades = grades::list(client).await.context("Failed to fetch grades")?;
            out.list(&grades, &["ID", "Name", "Description"], |g| {
                vec![g.id.to_string(), g.name.clone(), opt(&g.description)]
            })?;
        }
        GradesCommand::Create { name, description } => {
            let draft = GradeDraft { name, description };
            let grade = submit(&draft, grades::create(client, &draft))
                .await
                .context("Failed to create grade")?;
            println!("Created grade {} [{}]", grade.name, grade.id);
        }
        GradesCommand::Delete { id } => {
            grades::delete(client, id).await.context("Failed to delete grade")?;
            println!("Deleted grade {id}");
        }
    }
    Ok(())
}

async fn run_classes(client: &ApiClient, out: &Output, cmd: ClassesCommand) -> anyhow::Result<()> {
    match cmd {
        ClassesCommand::List => {
            let classes = classes::list(client)
                .await
                .context("Failed to fetch classes")?;
            out.list(&classes, &["ID", "Name", "Grade", "Teachers"], |c| {
                let teachers: Vec<&str> = c
                    .class_teachers_details
                    .iter()
                    .map(|t| t.full_name.as_deref().unwrap_or(&t.username))
                    .collect();
                vec![
                    c.id.to_string(),
                    c.name.clone(),
                    c.grade_name.clone().unwrap_or_else(|| opt(&c.grade)),
                    teachers.join(", "),
                ]
            })?;
        }
        ClassesCommand::Create {
            name,
            grade,
            subject,
        } => {
            let mut draft = ClassDraft::new(name, grade);
            if subject {
                draft.class_type = ClassType::SubjectClass;
            }
            let class = submit(&draft, classes::create(client, &draft))
                .await
                .context("Failed to create class")?;
            println!("Created class {} [{}]", class.name, class.id);
        }
        ClassesCommand::Delete { id } => {
            classes::delete(client, id)
                .await
                .context("Failed to delete class")?;
            println!("Deleted class {id}");
        }
    }
    Ok(())
}

async fn run_scores(client: &ApiClient, out: &Output, cmd: ScoresCommand) -> anyhow::Result<()> {
    match cmd {
        ScoresCommand::List(filter) => {
            let records = scores::list(client, &filter.into())
                .await
                .context("Failed to fetch behavior scores")?;
            out.list(
                &records,
                &["ID", "Date", "Student", "Rule", "Points", "Comment"],
                |s| {
                    vec![
                        s.id.to_string(),
                        s.date_of_behavior.to_string(),
                        s.student_name.clone().unwrap_or_else(|| s.student.to_string()),
                        s.rule_name.clone().unwrap_or_else(|| s.rule_sub_item.to_string()),
                        format!("{:+}", s.signed_points()),
                        s.comment.clone(),
                    ]
                },
            )?;
        }
        ScoresCommand::Summary(filter) => {
            let summary = scores::summary(client, &filter.into())
                .await
                .context("Failed to fetch score summary")?;
            out.value(&summary, |s| {
                println!("Positive points: {}", s.total_positive_points);
                println!("Negative points: {}", s.total_negative_points);
                println!("Net score:       {}", s.net_score);
                println!("Records:         {}", s.total_records);
                let bars = charts::dimension_bars(s);
                if !bars.is_empty() {
                    println!();
                    for (name, points) in bars {
                        println!("  {name:<24} {points:>6}");
                    }
                }
            })?;
        }
        ScoresCommand::Export { filter, output } => {
            let data = scores::export(client, &filter.into())
                .await
                .context("Export failed")?;
            out.csv_bytes(&data, output)?;
        }
        ScoresCommand::Record {
            student,
            rule,
            class,
            points,
            negative,
            date,
            comment,
        } => {
            let draft = ScoreDraft {
                student: Some(student),
                rule_sub_item: Some(rule),
                school_class: Some(class),
                score_type: if negative {
                    ScoreType::Negative
                } else {
                    ScoreType::Positive
                },
                points,
                comment,
                date_of_behavior: Some(date.unwrap_or_else(today)),
            };
            let score = submit(&draft, scores::create(client, &draft))
                .await
                .context("Failed to record score")?;
            println!("Recorded score [{}] ({:+})", score.id, score.signed_points());
        }
    }
    Ok(())
}

async fn run_awards(client: &ApiClient, out: &Output, cmd: AwardsCommand) -> anyhow::Result<()> {
    match cmd {
        AwardsCommand::List { student, metrics } => {
            let filter = AwardFilter {
                student,
                ..Default::default()
            };
            let list = awards::list(client, &filter)
                .await
                .context("Failed to fetch awards")?;
            if metrics {
                let metrics = AwardMetrics::from_awards(&list, today());
                out.value(&metrics, |m| {
                    println!("Total awards:       {}", m.total);
                    println!("Students awarded:   {}", m.distinct_students);
                    println!("Last 30 days:       {}", m.last_30_days);
                    println!("Average star level: {:.1}", m.average_star_level);
                    for share in &m.by_type {
                        println!("  {:<12} {:>4} ({:.1}%)", share.label, share.count, share.percent);
                    }
                })?;
            } else {
                out.list(&list, &["ID", "Date", "Student", "Award", "Type", "Level"], |a| {
                    vec![
                        a.id.to_string(),
                        a.award_date.to_string(),
                        a.student_name.clone().unwrap_or_else(|| a.student.to_string()),
                        a.name.clone(),
                        a.award_type.label().to_string(),
                        a.level.to_string(),
                    ]
                })?;
            }
        }
        AwardsCommand::Grant {
            student,
            name,
            kind,
            level,
            date,
            description,
        } => {
            let draft = AwardDraft {
                student: Some(student),
                name,
                description,
                award_type: kind.into(),
                level,
                award_date: Some(date.unwrap_or_else(today)),
            };
            let award = submit(&draft, awards::create(client, &draft))
                .await
                .context("Failed to grant award")?;
            println!("Granted '{}' [{}]", award.name, award.id);
        }
    }
    Ok(())
}

fn status_label(status: ReviewStatus) -> &'static str {
    match status {
        ReviewStatus::Pending => "Pending",
        ReviewStatus::Approved => "Approved",
        ReviewStatus::Rejected => "Rejected",
    }
}

async fn run_observations(
    client: &ApiClient,
    out: &Output,
    cmd: ObservationsCommand,
) -> anyhow::Result<()> {
    match cmd {
        ObservationsCommand::List { student, pending } => {
            let filter = ObservationFilter {
                student,
                status: pending.then_some(ReviewStatus::Pending),
            };
            let list = observations::list(client, &filter)
                .await
                .context("Failed to fetch observations")?;
            out.list(&list, &["ID", "Date", "Student", "Status", "Description"], |o| {
                vec![
                    o.id.to_string(),
                    o.date_of_behavior.to_string(),
                    o.student_name.clone().unwrap_or_else(|| o.student.to_string()),
                    status_label(o.status).to_string(),
                    o.description.clone(),
                ]
            })?;
        }
        ObservationsCommand::Submit {
            student,
            description,
            rule,
            date,
        } => {
            let draft = ObservationDraft {
                student: Some(student),
                rule_sub_item: rule,
                description,
                date_of_behavior: date.unwrap_or_else(today),
            };
            let obs = submit(&draft, observations::create(client, &draft))
                .await
                .context("Failed to submit observation")?;
            println!("Submitted observation [{}], awaiting review", obs.id);
        }
        ObservationsCommand::Review { id, decision } => {
            let obs = observations::review(client, id, decision.into())
                .await
                .context("Review failed")?;
            println!("Observation [{}] is now {}", obs.id, status_label(obs.status));
        }
    }
    Ok(())
}

async fn run_self_reports(
    client: &ApiClient,
    out: &Output,
    cmd: SelfReportsCommand,
) -> anyhow::Result<()> {
    match cmd {
        SelfReportsCommand::List { student } => {
            let filter = SelfReportFilter {
                student,
                ..Default::default()
            };
            let list = self_reports::list(client, &filter)
                .await
                .context("Failed to fetch self-reports")?;
            out.list(&list, &["ID", "Date", "Status", "Description", "Reviewer"], |r| {
                vec![
                    r.id.to_string(),
                    r.date_of_behavior.to_string(),
                    status_label(r.status).to_string(),
                    r.description.clone(),
                    opt(&r.reviewer_name),
                ]
            })?;
        }
        SelfReportsCommand::Submit {
            student,
            description,
            rule,
            date,
        } => {
            let draft = SelfReportDraft {
                student,
                rule_sub_item: rule,
                description,
                date_of_behavior: date.unwrap_or_else(today),
            };
            let report = submit(&draft, self_reports::create(client, &draft))
                .await
                .context("Failed to submit self-report")?;
            println!("Submitted self-report [{}], awaiting review", report.id);
        }
        SelfReportsCommand::Review {
            id,
            decision,
            comment,
        } => {
            let report = self_reports::review(client, id, decision.into(), comment.as_deref())
                .await
                .context("Review failed")?;
            println!("Self-report [{}] is now {}", report.id, status_label(report.status));
        }
    }
    Ok(())
}

async fn run_notifications(
    client: &ApiClient,
    out: &Output,
    cmd: NotificationsCommand,
) -> anyhow::Result<()> {
    match cmd {
        NotificationsCommand::List { unread } => {
            let filter = if unread {
                NotificationFilter::unread()
            } else {
                NotificationFilter::default()
            };
            let list = notifications::list(client, &filter)
                .await
                .context("Failed to fetch notifications")?;
            out.list(&list, &["ID", "Time", "", "Title", "Message"], |n| {
                vec![
                    n.id.to_string(),
                    n.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
                    (if n.is_read { "" } else { "*" }).to_string(),
                    n.title.clone(),
                    n.message.clone(),
                ]
            })?;
        }
        NotificationsCommand::Count => {
            let count = notifications::unread_count(client)
                .await
                .context("Failed to count notifications")?;
            out.value(&count, |c| println!("{c} unread"))?;
        }
        NotificationsCommand::Read { id } => {
            notifications::mark_read(client, id)
                .await
                .context("Failed to mark notification as read")?;
            println!("Marked {id} as read");
        }
        NotificationsCommand::ReadAll => {
            notifications::mark_all_read(client)
                .await
                .context("Failed to mark notifications as read")?;
            println!("All notifications marked as read");
        }
    }
    Ok(())
}
