//! studyflow-cli - command-line client for StudyFlow
//!
//! Talks to the same Supabase project as the web app and goes through the
//! same store, so every rule (validation, cascades, review dates, the
//! history-reset phrase) behaves identically in both.

mod client;
mod config;
mod lookup;

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use shared::progress::ProgressTone;
use shared::report::{format_duration, DateRange, RangePreset};
use shared::review::is_due;
use shared::{ApiClientConfig, Difficulty, TopicStatus, Weekday};
use studyflow_lib::{ClientError, SessionManager, SignUpOutcome, Store, Timer};
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};

use client::{native_api, NativeApi};
use config::SessionFile;
use lookup::{find_card, find_schedule_entry, find_subject, find_topic, short_id};

#[derive(Parser)]
#[command(name = "studyflow-cli")]
#[command(about = "Study subjects, flashcards and time tracking from the terminal", long_about = None)]
struct Cli {
    /// Supabase project URL
    #[arg(long, env = "SUPABASE_URL", default_value = "http://localhost:54321")]
    url: String,

    /// Supabase anon (public) key
    #[arg(long, env = "SUPABASE_ANON_KEY", default_value = "")]
    anon_key: String,

    /// Where the signed-in session is kept
    #[arg(long, env = "STUDYFLOW_SESSION_FILE")]
    session_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Signup {
        email: String,
        #[arg(long, env = "STUDYFLOW_PASSWORD")]
        password: String,
    },
    /// Sign in with e-mail and password
    Signin {
        email: String,
        #[arg(long, env = "STUDYFLOW_PASSWORD")]
        password: String,
    },
    /// Sign out and forget the stored session
    Signout,
    /// Show the signed-in user
    Whoami,

    /// List subjects with their topics and progress
    Subjects,
    /// Create a subject
    AddSubject { name: String },
    /// Delete a subject with all its topics and attachments
    DeleteSubject {
        /// Subject id, id prefix or name
        subject: String,
        #[arg(long)]
        yes: bool,
    },
    /// Add a topic to a subject
    AddTopic {
        /// Subject id, id prefix or name
        subject: String,
        name: String,
    },
    /// Advance a topic to its next status
    CycleTopic {
        /// Topic id, id prefix or name
        topic: String,
    },
    /// Replace a topic's notes (an empty text clears them)
    Note { topic: String, text: String },
    /// Upload a file and attach it to a topic
    Attach { topic: String, file: PathBuf },

    /// List flashcards grouped by label
    Flashcards {
        /// Only cards due today
        #[arg(long)]
        due: bool,
    },
    /// Create a flashcard
    AddCard {
        label: String,
        question: String,
        answer: String,
    },
    /// Record how a review went and reschedule the card
    Review {
        card: String,
        #[arg(value_parser = parse_difficulty)]
        difficulty: Difficulty,
    },
    /// Delete one card, or a whole label with --folder
    DeleteCard {
        #[arg(required_unless_present = "folder", conflicts_with = "folder")]
        card: Option<String>,
        #[arg(long)]
        folder: Option<String>,
        #[arg(long)]
        yes: bool,
    },

    /// Record a study session of the given length
    LogSession {
        /// Duration in seconds
        seconds: i64,
    },
    /// Run a study timer; press Enter (or Ctrl-C) to stop and save it
    Timer,
    /// Study-time totals for a date range
    Report {
        /// all, today, 7d, 30d or custom
        #[arg(long, value_parser = parse_preset, default_value = "all")]
        preset: RangePreset,
        /// First day (YYYY-MM-DD); implies a custom range
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day (YYYY-MM-DD); implies a custom range
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Delete every recorded study session
    ResetHistory {
        /// Must be exactly "DELETE HISTORY"
        #[arg(long)]
        confirm: String,
    },

    /// Show the weekly schedule
    Schedule,
    /// Plan a subject on a weekday
    Plan {
        #[arg(value_parser = parse_weekday)]
        weekday: Weekday,
        subject: String,
    },
    /// Remove a schedule entry
    Unplan {
        entry: String,
        #[arg(long)]
        yes: bool,
    },
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    Difficulty::parse(value).ok_or_else(|| "expected easy, medium or hard".to_string())
}

fn parse_weekday(value: &str) -> Result<Weekday, String> {
    Weekday::parse(value).ok_or_else(|| "expected MON, TUE, WED, THU, FRI, SAT or SUN".to_string())
}

fn parse_preset(value: &str) -> Result<RangePreset, String> {
    RangePreset::from_key(value).ok_or_else(|| {
        let keys: Vec<&str> = RangePreset::ALL.iter().map(|preset| preset.key()).collect();
        format!("expected one of: {}", keys.join(", "))
    })
}

#[derive(Tabled)]
struct SubjectRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Subject")]
    name: String,
    #[tabled(rename = "Topics")]
    topics: usize,
    #[tabled(rename = "Progress")]
    progress: String,
}

#[derive(Tabled)]
struct CardRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Question")]
    question: String,
    #[tabled(rename = "Next review")]
    next_review: String,
}

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Day")]
    date: String,
    #[tabled(rename = "Sessions")]
    sessions: usize,
    #[tabled(rename = "Time")]
    time: String,
}

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Day")]
    weekday: String,
    #[tabled(rename = "Subject")]
    subject: String,
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn status_colored(status: TopicStatus) -> colored::ColoredString {
    match status {
        TopicStatus::Critical => status.label().red(),
        TopicStatus::Reading => status.label().yellow(),
        TopicStatus::Reviewed => status.label().green(),
    }
}

fn progress_colored(percent: u32) -> colored::ColoredString {
    let text = format!("{}%", percent);
    match ProgressTone::for_percent(percent) {
        ProgressTone::Green => text.green(),
        ProgressTone::Yellow => text.yellow(),
        ProgressTone::Red => text.red(),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn done(message: impl std::fmt::Display) {
    println!("{} {}", "✓".green(), message);
}

/// Refuse destructive commands that were not confirmed
fn require_yes(yes: bool, what: &str) -> Result<()> {
    if !yes {
        bail!("Refusing to {} without --yes", what);
    }
    Ok(())
}

/// Signed-in store with everything loaded
async fn open_store(api: &NativeApi, manager: &SessionManager) -> Result<Store<NativeApi>> {
    let session = manager
        .active(api, now_secs())
        .await
        .context("Sign in first with `studyflow-cli signin <email>`")?;
    let mut store = Store::new(api.clone(), session);
    store.reload().await.context("Failed to load your data")?;
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studyflow_cli=info,studyflow_lib=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let api = native_api(ApiClientConfig::new(&cli.url, &cli.anon_key))?;
    let session_file = SessionFile::locate(cli.session_file.clone())?;
    let manager = SessionManager::new();
    manager
        .restore(&api, session_file.load()?, now_secs())
        .await;

    let result = run(&cli, &api, &manager).await;

    // Persist whatever the command left behind, including a sign-out or a
    // refresh that failed
    session_file.save(manager.current().as_ref())?;
    tracing::debug!("Session file: {}", session_file.path().display());

    result
}

async fn run(cli: &Cli, api: &NativeApi, manager: &SessionManager) -> Result<()> {
    let format = cli.format;

    match &cli.command {
        Commands::Signup { email, password } => {
            match manager.sign_up(api, email, password).await? {
                SignUpOutcome::SignedIn(session) => {
                    done(format!("Account created; signed in as {}", session.owner_id()));
                }
                SignUpOutcome::ConfirmationRequired => {
                    done(format!(
                        "Account created. Check {} for a confirmation link, then sign in.",
                        email.trim()
                    ));
                }
            }
        }

        Commands::Signin { email, password } => {
            let session = manager.sign_in(api, email, password).await?;
            done(format!(
                "Signed in as {}",
                session.user.email.as_deref().unwrap_or(email).bold()
            ));
        }

        Commands::Signout => {
            manager.sign_out(api).await;
            done("Signed out");
        }

        Commands::Whoami => match manager.current() {
            Some(session) => match format {
                OutputFormat::Json => print_json(&session.user)?,
                OutputFormat::Pretty | OutputFormat::Table => {
                    println!(
                        "{} {}",
                        "User:".bold(),
                        session.user.email.as_deref().unwrap_or("(no e-mail)")
                    );
                    println!("  ID: {}", session.user.id);
                }
            },
            None => println!("{} Not signed in", "✗".red()),
        },

        Commands::Subjects => {
            let store = open_store(api, manager).await?;
            let subjects = store.subjects();
            match format {
                OutputFormat::Json => print_json(&subjects)?,
                OutputFormat::Table => {
                    let rows: Vec<SubjectRow> = subjects
                        .iter()
                        .map(|s| SubjectRow {
                            id: short_id(s.id),
                            name: s.name.clone(),
                            topics: s.topics.len(),
                            progress: format!("{}%", store.progress(s.id)),
                        })
                        .collect();
                    println!("{}", Table::new(rows));
                }
                OutputFormat::Pretty => {
                    if subjects.is_empty() {
                        println!("No subjects yet");
                    }
                    for subject in subjects {
                        println!(
                            "\n{} {} {}",
                            subject.name.bold(),
                            progress_colored(store.progress(subject.id)),
                            short_id(subject.id).dimmed()
                        );
                        for topic in &subject.topics {
                            println!(
                                "  {} {} {}",
                                status_colored(topic.status),
                                topic.name,
                                short_id(topic.id).dimmed()
                            );
                            if let Some(notes) = topic.notes.as_deref().filter(|n| !n.is_empty()) {
                                println!("      {}", notes.italic());
                            }
                            for attachment in &topic.attachments {
                                println!(
                                    "      📎 {} {}",
                                    attachment.file_name,
                                    attachment.url.cyan()
                                );
                            }
                        }
                    }
                }
            }
        }

        Commands::AddSubject { name } => {
            let mut store = open_store(api, manager).await?;
            store.create_subject(name).await?;
            done(format!("Subject {} created", name.trim().bold()));
        }

        Commands::DeleteSubject { subject, yes } => {
            let mut store = open_store(api, manager).await?;
            let target = find_subject(store.subjects(), subject)?.clone();
            require_yes(*yes, &format!("delete subject '{}'", target.name))?;
            let report = store.delete_subject(target.id).await?;
            done(format!(
                "Deleted {} and {} topic(s)",
                target.name.bold(),
                report.topic_ids.len()
            ));
        }

        Commands::AddTopic { subject, name } => {
            let mut store = open_store(api, manager).await?;
            let target = find_subject(store.subjects(), subject)?.clone();
            store.create_topic(target.id, name).await?;
            done(format!("Topic {} added to {}", name.trim().bold(), target.name));
        }

        Commands::CycleTopic { topic } => {
            let mut store = open_store(api, manager).await?;
            let target = find_topic(store.subjects(), topic)?.clone();
            let next = store
                .cycle_topic_status(target.id, Some(target.status))
                .await?;
            done(format!("{} is now {}", target.name.bold(), status_colored(next)));
        }

        Commands::Note { topic, text } => {
            let mut store = open_store(api, manager).await?;
            let target = find_topic(store.subjects(), topic)?.clone();
            store.save_note(target.id, text).await?;
            done(format!("Notes saved for {}", target.name.bold()));
        }

        Commands::Attach { topic, file } => {
            let mut store = open_store(api, manager).await?;
            let target = find_topic(store.subjects(), topic)?.clone();
            let bytes = std::fs::read(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            let content_type = mime_guess::from_path(file).first_or_octet_stream();
            store
                .upload_attachment(
                    target.id,
                    &file_name,
                    content_type.essence_str(),
                    bytes,
                    chrono::Utc::now().timestamp_millis(),
                )
                .await?;
            done(format!("Attached {} to {}", file_name.bold(), target.name));
        }

        Commands::Flashcards { due } => {
            let store = open_store(api, manager).await?;
            let today = today();
            let cards: Vec<_> = store
                .flashcards()
                .iter()
                .filter(|card| !*due || is_due(card, today))
                .collect();
            match format {
                OutputFormat::Json => print_json(&cards)?,
                OutputFormat::Table => {
                    let rows: Vec<CardRow> = cards
                        .iter()
                        .map(|card| CardRow {
                            id: short_id(card.id),
                            label: card.label.clone(),
                            question: card.question.clone(),
                            next_review: card
                                .next_review
                                .map(|d| d.to_string())
                                .unwrap_or_else(|| "-".to_string()),
                        })
                        .collect();
                    println!("{}", Table::new(rows));
                }
                OutputFormat::Pretty => {
                    println!("{} {} due today", "Flashcards:".bold(), store.due_count(today));
                    for folder in store.folders(today) {
                        let shown: Vec<_> = folder
                            .cards
                            .iter()
                            .filter(|card| !*due || is_due(card, today))
                            .collect();
                        if shown.is_empty() {
                            continue;
                        }
                        let badge = if folder.pending {
                            " pending".yellow().to_string()
                        } else {
                            String::new()
                        };
                        println!("\n{} ({}){}", folder.label.bold(), folder.cards.len(), badge);
                        for card in shown {
                            let when = if is_due(card, today) {
                                "due".red().to_string()
                            } else {
                                card.next_review
                                    .map(|d| d.to_string())
                                    .unwrap_or_default()
                                    .dimmed()
                                    .to_string()
                            };
                            println!(
                                "  {} {} [{}]",
                                short_id(card.id).dimmed(),
                                card.question,
                                when
                            );
                            println!("      {}", card.answer.cyan());
                        }
                    }
                }
            }
        }

        Commands::AddCard {
            label,
            question,
            answer,
        } => {
            let mut store = open_store(api, manager).await?;
            store.create_flashcard(label, question, answer).await?;
            done(format!("Card added to {}", label.trim().bold()));
        }

        Commands::Review { card, difficulty } => {
            let mut store = open_store(api, manager).await?;
            let target = find_card(store.flashcards(), card)?.clone();
            let next = store
                .review_flashcard(target.id, *difficulty, today())
                .await?;
            done(format!("Next review of \"{}\" on {}", target.question, next));
        }

        Commands::DeleteCard { card, folder, yes } => {
            let mut store = open_store(api, manager).await?;
            match (card, folder) {
                (_, Some(label)) => {
                    let count = store
                        .flashcards()
                        .iter()
                        .filter(|c| &c.label == label)
                        .count();
                    require_yes(*yes, &format!("delete {} card(s) labelled '{}'", count, label))?;
                    store.delete_flashcard_folder(label).await?;
                    done(format!("Deleted folder {} ({} card(s))", label.bold(), count));
                }
                (Some(card), None) => {
                    let target = find_card(store.flashcards(), card)?.clone();
                    require_yes(*yes, &format!("delete card \"{}\"", target.question))?;
                    store.delete_flashcard(target.id).await?;
                    done("Card deleted");
                }
                (None, None) => bail!("Give a card or --folder"),
            }
        }

        Commands::LogSession { seconds } => {
            let mut store = open_store(api, manager).await?;
            match store.log_study_session(*seconds).await {
                Ok(()) => done(format!("Logged {}", format_duration(*seconds))),
                Err(ClientError::NothingToSave) => println!("Nothing to log"),
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Timer => {
            let mut store = open_store(api, manager).await?;
            let mut timer = Timer::new();
            timer.start();
            println!("Timer running. Press Enter to stop and save.");

            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            // The first tick completes immediately
            ticker.tick().await;
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        timer.tick();
                        print!("\r  {}", timer.display());
                        std::io::stdout().flush()?;
                    }
                    _ = lines.next_line() => break,
                    _ = tokio::signal::ctrl_c() => break,
                }
            }
            println!();

            let elapsed = timer.elapsed();
            match store.save_timer(&mut timer).await {
                Ok(()) => done(format!("Saved {}", format_duration(elapsed))),
                Err(ClientError::NothingToSave) => println!("Nothing to save"),
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Report { preset, from, to } => {
            let store = open_store(api, manager).await?;
            let preset = if from.is_some() || to.is_some() {
                RangePreset::Custom
            } else {
                *preset
            };
            let range = preset.range(today(), DateRange::between(*from, *to));
            let summary = store.report(range, &Local);
            match format {
                OutputFormat::Json => print_json(&summary)?,
                OutputFormat::Pretty | OutputFormat::Table => {
                    println!(
                        "{} {} over {} session(s) ({})",
                        "Studied".bold(),
                        summary.total_display().green(),
                        summary.session_count,
                        preset.label()
                    );
                    if !summary.days.is_empty() {
                        let rows: Vec<DayRow> = summary
                            .days
                            .iter()
                            .map(|day| DayRow {
                                date: day.date.format("%a %Y-%m-%d").to_string(),
                                sessions: day.session_count,
                                time: format_duration(day.total_seconds),
                            })
                            .collect();
                        println!("{}", Table::new(rows));
                    }
                }
            }
        }

        Commands::ResetHistory { confirm } => {
            let mut store = open_store(api, manager).await?;
            store.reset_study_history(confirm).await?;
            done("Study history deleted");
        }

        Commands::Schedule => {
            let store = open_store(api, manager).await?;
            match format {
                OutputFormat::Json => print_json(&store.schedule())?,
                OutputFormat::Table => {
                    let rows: Vec<ScheduleRow> = Weekday::ALL
                        .into_iter()
                        .flat_map(|day| store.schedule_for(day))
                        .map(|entry| ScheduleRow {
                            id: short_id(entry.id),
                            weekday: entry.weekday.label().to_string(),
                            subject: entry.subject_name.clone(),
                        })
                        .collect();
                    println!("{}", Table::new(rows));
                }
                OutputFormat::Pretty => {
                    for day in Weekday::ALL {
                        let entries = store.schedule_for(day);
                        println!("{}", day.label().bold());
                        if entries.is_empty() {
                            println!("  {}", "-".dimmed());
                        }
                        for entry in entries {
                            println!("  {} {}", short_id(entry.id).dimmed(), entry.subject_name);
                        }
                    }
                }
            }
        }

        Commands::Plan { weekday, subject } => {
            let mut store = open_store(api, manager).await?;
            let target = find_subject(store.subjects(), subject)?.clone();
            store.add_to_schedule(*weekday, Some(target.id)).await?;
            done(format!("{} planned on {}", target.name.bold(), weekday.label()));
        }

        Commands::Unplan { entry, yes } => {
            let mut store = open_store(api, manager).await?;
            let target = find_schedule_entry(store.schedule(), entry)?.clone();
            require_yes(
                *yes,
                &format!("remove {} from {}", target.subject_name, target.weekday.label()),
            )?;
            store.remove_from_schedule(target.id).await?;
            done("Schedule entry removed");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preset_lists_every_key() {
        assert_eq!(parse_preset("custom").unwrap(), RangePreset::Custom);
        let err = parse_preset("week").unwrap_err();
        for preset in RangePreset::ALL {
            assert!(err.contains(preset.key()), "{} missing from {}", preset.key(), err);
        }
    }
}
