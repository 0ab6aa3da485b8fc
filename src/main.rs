mod catalog;
mod date;
mod engine;
mod error;
mod input;
mod meals;
mod model;
mod output;
mod progress;
mod reminder;
mod rollover;
mod status;
mod store;

use crate::date::{parse_date_string, system_today_utc};
use crate::engine::apply_completion;
use crate::error::CliError;
use crate::input::parse_filtered_u32;
use crate::meals::{add_meal, calories_on, meals_on, remove_meal};
use crate::model::{xp_needed, PlayerState, Settings};
use crate::output::{render_meter, render_simple_table, Styler};
use crate::progress::{select_quest_id, tick, TickOutcome};
use crate::reminder::{
    next_trigger, next_trigger_for, parse_reminder_time, system_seconds_of_day_utc,
    BOOT_DEFAULT_HOUR, BOOT_DEFAULT_MINUTE,
};
use crate::rollover::ensure_current;
use crate::status::{build_boss_section, build_quest_rows, build_status};
use crate::store::{resolve_db_path, update_state};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn as_bool(self) -> bool {
        self == Toggle::On
    }
}

#[derive(Parser, Debug)]
#[command(name = "questfit", version, about = "Gamified daily fitness quest tracker")]
struct Cli {
    /// Overrides the state file path for this invocation.
    #[arg(long, global = true)]
    db: Option<String>,

    /// Overrides logical "today" for deterministic output/testing.
    #[arg(long, global = true)]
    today: Option<String>,

    /// Seeds the daily quest draw for deterministic output/testing.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value = "table")]
    format: Format,

    /// Disables ANSI color output.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dashboard: level, XP, streak, today's quests, boss meter, 7-day history.
    Status,
    /// Progress a quest of the day by --by units (default 1).
    Tick(TickArgs),
    /// Weekly boss battle meter.
    Boss,
    /// Reward track and claimed unlocks.
    Rewards,
    /// Daily XP/quest summaries for the last 7 active days.
    History,
    /// Meal log against the daily calorie target.
    Meal(MealArgs),
    /// View or change reminder, notification and calorie settings.
    Settings(SettingsArgs),
    /// Next daily reminder trigger.
    Remind(RemindArgs),
    /// Force a daily quest redraw or a weekly boss reset.
    Reset(ResetArgs),
}

#[derive(Args, Debug)]
struct TickArgs {
    /// Quest selector: exact id (db_curl_10) or unique title prefix.
    quest: String,

    /// Units of progress to add.
    #[arg(long, default_value_t = 1)]
    by: u32,
}

#[derive(Args, Debug)]
struct MealArgs {
    #[command(subcommand)]
    command: MealCommand,
}

#[derive(Subcommand, Debug)]
enum MealCommand {
    /// Log a meal for today.
    Add(MealAddArgs),
    /// List meals and the calorie total for a date (default today).
    List(MealListArgs),
    /// Remove a logged meal by id.
    Remove(MealRemoveArgs),
}

#[derive(Args, Debug)]
struct MealAddArgs {
    name: String,

    /// Calories; non-digit characters are ignored ("1,200 kcal" reads as 1200).
    #[arg(long)]
    calories: String,
}

#[derive(Args, Debug)]
struct MealListArgs {
    #[arg(long)]
    date: Option<String>,
}

#[derive(Args, Debug)]
struct MealRemoveArgs {
    id: String,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    #[command(subcommand)]
    command: SettingsCommand,
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    Show,
    Set(SettingsSetArgs),
}

#[derive(Args, Debug)]
struct SettingsSetArgs {
    /// Daily reminder time as HH:MM.
    #[arg(long)]
    reminder: Option<String>,

    #[arg(long, value_enum)]
    notifications: Option<Toggle>,

    /// Daily calorie target; non-digit characters are ignored.
    #[arg(long)]
    calorie_target: Option<String>,

    #[arg(long, value_enum)]
    dark_theme: Option<Toggle>,
}

#[derive(Args, Debug)]
struct RemindArgs {
    /// Ignore stored settings and report the post-boot default schedule.
    #[arg(long)]
    boot: bool,
}

#[derive(Args, Debug)]
struct ResetArgs {
    /// Redraw today's quests and clear their progress.
    #[arg(long)]
    daily: bool,

    /// Reset the weekly boss counter and re-anchor the week.
    #[arg(long)]
    week: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    let exit = match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{}", e);
            e.exit_code
        }
    };

    std::process::exit(exit);
}

fn print_line(s: &str) {
    println!("{}", s);
}

fn print_json<T: serde::Serialize>(obj: &T) -> Result<(), CliError> {
    let s = serde_json::to_string_pretty(obj).map_err(|_| CliError::io("State IO error"))?;
    println!("{}", s);
    Ok(())
}

fn resolve_today(cli_today: Option<&str>) -> Result<String, CliError> {
    if let Some(t) = cli_today {
        parse_date_string(t, "today")?;
        return Ok(t.to_string());
    }

    if let Ok(t) = std::env::var("QUESTFIT_TODAY") {
        let tt = t.trim();
        if !tt.is_empty() {
            parse_date_string(tt, "today")?;
            return Ok(tt.to_string());
        }
    }

    Ok(system_today_utc())
}

fn resolve_color_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    true
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Loads the aggregate, runs the daily/weekly rollover against `today`,
/// applies `mutator`, and persists the result. Every command goes through
/// here so a stale state file is repaired no matter which view is asked for.
fn with_current_state<R>(
    db_path: &str,
    today: &str,
    seed: Option<u64>,
    mutator: impl FnOnce(&mut PlayerState) -> Result<R, CliError>,
) -> Result<R, CliError> {
    let mut rng = make_rng(seed);
    update_state(db_path, |state| {
        ensure_current(state, today, &mut rng)?;
        mutator(state)
    })
}

fn quest_table(state: &PlayerState, styler: &Styler) -> String {
    let rows: Vec<Vec<String>> = build_quest_rows(state)
        .iter()
        .map(|q| {
            vec![
                q.id.clone(),
                q.title.clone(),
                q.kind.clone(),
                format!("{}/{} {}", q.progress, q.target, q.unit),
                format!("{} xp", q.xp),
                if q.completed {
                    styler.green("done")
                } else {
                    styler.gray("open")
                },
            ]
        })
        .collect();
    render_simple_table(&["id", "quest", "kind", "progress", "reward", "state"], &rows)
}

fn boss_lines(state: &PlayerState, styler: &Styler) -> Vec<String> {
    let boss = build_boss_section(state);
    let mut out = Vec::new();
    out.push(format!(
        "{} — week {} to {}",
        boss.name, boss.week_start, boss.week_end
    ));
    out.push(format!(
        "HP {}  {}/{} quests  stage {}/4",
        render_meter(boss.progress, boss.goal, 20),
        boss.progress,
        boss.goal,
        boss.stage
    ));
    if boss.defeated {
        out.push(styler.gold("Boss defeated! New challenger on Monday."));
    }
    out
}

fn run(cli: Cli) -> Result<(), CliError> {
    let db_path = resolve_db_path(cli.db.as_deref())?;
    let today = resolve_today(cli.today.as_deref())?;

    let styler = Styler::new(resolve_color_enabled(cli.no_color));

    match cli.command {
        Command::Status => {
            let state = with_current_state(&db_path, &today, cli.seed, |s| Ok(s.clone()))?;

            if cli.format == Format::Json {
                print_json(&build_status(&state))?;
            } else {
                print_line(&format!(
                    "{}  level {}  xp {}  {}/{}",
                    today,
                    state.level,
                    render_meter(state.xp, xp_needed(state.level), 10),
                    state.xp,
                    xp_needed(state.level),
                ));
                print_line(&format!(
                    "streak {} day(s)  lifetime quests {}",
                    state.streak_days, state.lifetime_quests
                ));
                print_line("");
                print_line(&quest_table(&state, &styler));
                print_line("");
                for line in boss_lines(&state, &styler) {
                    print_line(&line);
                }
            }

            Ok(())
        }

        Command::Tick(args) => {
            let (outcome, before_level, state) =
                with_current_state(&db_path, &today, cli.seed, |state| {
                    let quest_id = select_quest_id(state, &args.quest)?;
                    let before_level = state.level;
                    let outcome = tick(state, &quest_id, args.by.max(1));
                    if let TickOutcome::Completed { xp } = outcome {
                        apply_completion(state, xp);
                    }
                    Ok((outcome, before_level, state.clone()))
                })?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    status: crate::status::Status,
                }
                print_json(&Out {
                    status: build_status(&state),
                })?;
                return Ok(());
            }

            match outcome {
                TickOutcome::NotFound => {
                    // selector resolution already guarded this; a progress
                    // record can still be missing from a hand-edited file
                    print_line(&styler.gray("Nothing to do."));
                }
                TickOutcome::AlreadyDone => {
                    print_line(&styler.gray("Already completed today."));
                }
                TickOutcome::Advanced { progress, target } => {
                    print_line(&format!("Progress: {}/{}", progress, target));
                }
                TickOutcome::Completed { xp } => {
                    print_line(&styler.green(&format!("Quest complete! +{} xp", xp)));
                    if state.level > before_level {
                        print_line(&styler.gold(&format!("Level up! Now level {}", state.level)));
                        for r in state.rewards.iter().filter(|r| {
                            r.claimed
                                && r.level_required > before_level
                                && r.level_required <= state.level
                        }) {
                            print_line(&styler.gold(&format!(
                                "Reward unlocked: {} — {}",
                                r.name, r.description
                            )));
                        }
                    }
                }
            }

            Ok(())
        }

        Command::Boss => {
            let state = with_current_state(&db_path, &today, cli.seed, |s| Ok(s.clone()))?;

            if cli.format == Format::Json {
                print_json(&build_boss_section(&state))?;
            } else {
                for line in boss_lines(&state, &styler) {
                    print_line(&line);
                }
            }

            Ok(())
        }

        Command::Rewards => {
            let state = with_current_state(&db_path, &today, cli.seed, |s| Ok(s.clone()))?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    level: u32,
                    rewards: Vec<crate::model::Reward>,
                }
                print_json(&Out {
                    level: state.level,
                    rewards: state.rewards,
                })?;
            } else {
                let rows: Vec<Vec<String>> = state
                    .rewards
                    .iter()
                    .map(|r| {
                        vec![
                            format!("{}", r.level_required),
                            r.name.clone(),
                            r.description.clone(),
                            if r.claimed {
                                styler.green("claimed")
                            } else {
                                styler.gray("locked")
                            },
                        ]
                    })
                    .collect();
                print_line(&render_simple_table(
                    &["level", "reward", "description", "state"],
                    &rows,
                ));
            }

            Ok(())
        }

        Command::History => {
            let state = with_current_state(&db_path, &today, cli.seed, |s| Ok(s.clone()))?;

            if cli.format == Format::Json {
                #[derive(serde::Serialize)]
                struct Out {
                    history: Vec<crate::model::DaySummary>,
                }
                print_json(&Out {
                    history: state.history7,
                })?;
            } else {
                let rows: Vec<Vec<String>> = state
                    .history7
                    .iter()
                    .map(|d| {
                        vec![
                            d.date.clone(),
                            format!("{}", d.xp_earned),
                            format!("{}", d.quests_completed),
                        ]
                    })
                    .collect();
                print_line(&render_simple_table(&["date", "xp", "quests"], &rows));
            }

            Ok(())
        }

        Command::Meal(args) => match args.command {
            MealCommand::Add(add) => {
                let calories = parse_filtered_u32(&add.calories, "calories")?;
                let (entry, state) =
                    with_current_state(&db_path, &today, cli.seed, |state| {
                        let entry = add_meal(state, &add.name, calories, &today)?;
                        Ok((entry, state.clone()))
                    })?;

                if cli.format == Format::Json {
                    #[derive(serde::Serialize)]
                    struct Out {
                        meal: crate::model::MealEntry,
                        calories_today: u32,
                        calorie_target: u32,
                    }
                    print_json(&Out {
                        meal: entry,
                        calories_today: calories_on(&state, &today),
                        calorie_target: state.settings.daily_calorie_target,
                    })?;
                } else {
                    print_line(&format!(
                        "{}  {}  {} kcal ({}/{} today)",
                        entry.id,
                        entry.name,
                        entry.calories,
                        calories_on(&state, &today),
                        state.settings.daily_calorie_target
                    ));
                }

                Ok(())
            }

            MealCommand::List(list) => {
                let date = match list.date.as_deref() {
                    Some(d) => {
                        parse_date_string(d, "date")?;
                        d.to_string()
                    }
                    None => today.clone(),
                };
                let state = with_current_state(&db_path, &today, cli.seed, |s| Ok(s.clone()))?;
                let meals = meals_on(&state, &date);
                let total = calories_on(&state, &date);
                let target = state.settings.daily_calorie_target;

                if cli.format == Format::Json {
                    #[derive(serde::Serialize)]
                    struct Out {
                        date: String,
                        meals: Vec<crate::model::MealEntry>,
                        calories_total: u32,
                        calorie_target: u32,
                    }
                    print_json(&Out {
                        date,
                        meals,
                        calories_total: total,
                        calorie_target: target,
                    })?;
                } else {
                    let rows: Vec<Vec<String>> = meals
                        .iter()
                        .map(|m| {
                            vec![m.id.clone(), m.name.clone(), format!("{}", m.calories)]
                        })
                        .collect();
                    print_line(&render_simple_table(&["id", "meal", "kcal"], &rows));
                    let summary = format!("total {}/{} kcal", total, target);
                    if total > target {
                        print_line(&styler.gold(&summary));
                    } else {
                        print_line(&summary);
                    }
                }

                Ok(())
            }

            MealCommand::Remove(rm) => {
                let entry = with_current_state(&db_path, &today, cli.seed, |state| {
                    remove_meal(state, &rm.id)
                })?;

                if cli.format == Format::Json {
                    #[derive(serde::Serialize)]
                    struct Out {
                        removed: crate::model::MealEntry,
                    }
                    print_json(&Out { removed: entry })?;
                } else {
                    print_line(&format!("Removed {} ({} kcal)", entry.name, entry.calories));
                }

                Ok(())
            }
        },

        Command::Settings(args) => match args.command {
            SettingsCommand::Show => {
                let state = with_current_state(&db_path, &today, cli.seed, |s| Ok(s.clone()))?;
                print_settings(&state.settings, cli.format)
            }

            SettingsCommand::Set(set) => {
                let reminder = set
                    .reminder
                    .as_deref()
                    .map(parse_reminder_time)
                    .transpose()?;
                let calorie_target = set
                    .calorie_target
                    .as_deref()
                    .map(|raw| parse_filtered_u32(raw, "calorie target"))
                    .transpose()?;

                let settings = with_current_state(&db_path, &today, cli.seed, |state| {
                    if let Some((h, m)) = reminder {
                        state.settings.reminder_hour = h;
                        state.settings.reminder_minute = m;
                    }
                    if let Some(t) = set.notifications {
                        state.settings.notifications_enabled = t.as_bool();
                    }
                    if let Some(target) = calorie_target {
                        state.settings.daily_calorie_target = target;
                    }
                    if let Some(t) = set.dark_theme {
                        state.settings.dark_theme = t.as_bool();
                    }
                    Ok(state.settings.clone())
                })?;

                print_settings(&settings, cli.format)
            }
        },

        Command::Remind(args) => {
            if args.boot {
                // post-boot re-registration has no state to consult
                let next = next_trigger(
                    &today,
                    system_seconds_of_day_utc(),
                    BOOT_DEFAULT_HOUR,
                    BOOT_DEFAULT_MINUTE,
                )?;
                if cli.format == Format::Json {
                    print_json(&next)?;
                } else {
                    print_line(&format!("Next reminder: {} {}", next.date, next.time));
                }
                return Ok(());
            }

            let state = with_current_state(&db_path, &today, cli.seed, |s| Ok(s.clone()))?;
            match next_trigger_for(&state.settings, &today, system_seconds_of_day_utc())? {
                Some(next) => {
                    if cli.format == Format::Json {
                        print_json(&next)?;
                    } else {
                        print_line(&format!("Next reminder: {} {}", next.date, next.time));
                    }
                }
                None => {
                    if cli.format == Format::Json {
                        #[derive(serde::Serialize)]
                        struct Out {
                            notifications_enabled: bool,
                        }
                        print_json(&Out {
                            notifications_enabled: false,
                        })?;
                    } else {
                        print_line("Notifications are disabled.");
                    }
                }
            }

            Ok(())
        }

        Command::Reset(args) => {
            if !args.daily && !args.week {
                return Err(CliError::usage("Pass --daily and/or --week"));
            }

            let state = with_current_state(&db_path, &today, cli.seed, |state| {
                if args.daily {
                    let mut rng = make_rng(cli.seed);
                    crate::rollover::regenerate_daily(state, &today, &mut rng);
                }
                if args.week {
                    state.week_start = crate::date::week_start_of(&today)?;
                    state.weekly_boss_progress = 0;
                }
                Ok(state.clone())
            })?;

            if cli.format == Format::Json {
                print_json(&build_status(&state))?;
            } else {
                if args.daily {
                    print_line("Daily quests redrawn.");
                    print_line(&quest_table(&state, &styler));
                }
                if args.week {
                    print_line("Weekly boss reset.");
                }
            }

            Ok(())
        }
    }
}

fn print_settings(settings: &Settings, format: Format) -> Result<(), CliError> {
    if format == Format::Json {
        #[derive(serde::Serialize)]
        struct Out<'a> {
            settings: &'a Settings,
        }
        print_json(&Out { settings })?;
    } else {
        print_line(&format!(
            "notifications: {}",
            if settings.notifications_enabled {
                "on"
            } else {
                "off"
            }
        ));
        print_line(&format!(
            "reminder: {:02}:{:02}",
            settings.reminder_hour, settings.reminder_minute
        ));
        print_line(&format!(
            "calorie target: {} kcal/day",
            settings.daily_calorie_target
        ));
        print_line(&format!(
            "theme: {}",
            if settings.dark_theme { "dark" } else { "light" }
        ));
    }
    Ok(())
}
