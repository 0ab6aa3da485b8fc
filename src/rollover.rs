use crate::catalog::generate_daily_quests;
use crate::date::{week_start_of, yesterday_of};
use crate::error::CliError;
use crate::model::{PlayerState, QuestProgress};
use rand::Rng;

fn streak_after_rollover(state: &PlayerState, today: &str) -> Result<u32, CliError> {
    let prev = state.daily_date.as_str();
    if prev.is_empty() {
        return Ok(1);
    }
    if prev == today {
        // same-day redraw (empty quest list repair); the streak stands
        return Ok(state.streak_days);
    }
    if prev == yesterday_of(today)? {
        return Ok(state.streak_days + 1);
    }
    // gap of two or more days, or an out-of-order date: start over
    Ok(1)
}

pub fn regenerate_daily(state: &mut PlayerState, today: &str, rng: &mut impl Rng) {
    let quests = generate_daily_quests(rng);
    state.quest_progress_today = quests
        .iter()
        .map(|q| (q.id.clone(), QuestProgress::fresh(&q.id)))
        .collect();
    state.quests_today = quests;
    state.daily_date = today.to_string();
}

/// Brings a loaded aggregate up to `today`. Both triggers are idempotent:
/// re-running against already-current dates changes nothing.
///
/// The daily trigger fires when the stored date differs from today or no
/// quest set exists (first run); it redraws the quests, clears progress and
/// updates the streak. The weekly trigger fires when the stored Monday anchor
/// differs from this week's; it resets the boss counter.
pub fn ensure_current(
    state: &mut PlayerState,
    today: &str,
    rng: &mut impl Rng,
) -> Result<bool, CliError> {
    let mut changed = false;

    if state.daily_date != today || state.quests_today.is_empty() {
        state.streak_days = streak_after_rollover(state, today)?;
        regenerate_daily(state, today, rng);
        changed = true;
    }

    let anchor = week_start_of(today)?;
    if state.week_start != anchor {
        state.week_start = anchor;
        state.weekly_boss_progress = 0;
        changed = true;
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    fn rolled(state: &mut PlayerState, today: &str) -> bool {
        ensure_current(state, today, &mut rng()).unwrap()
    }

    #[test]
    fn first_run_seeds_quests_and_streak() {
        let mut state = PlayerState::default();
        assert!(rolled(&mut state, "2026-08-25"));

        assert_eq!(state.daily_date, "2026-08-25");
        assert_eq!(state.week_start, "2026-08-24");
        assert_eq!(state.streak_days, 1);
        assert_eq!(state.quests_today.len(), 5);
        assert_eq!(state.quest_progress_today.len(), 5);
        assert!(state
            .quest_progress_today
            .values()
            .all(|qp| qp.progress == 0 && !qp.completed));
    }

    #[test]
    fn rerun_on_current_dates_is_a_noop() {
        let mut state = PlayerState::default();
        rolled(&mut state, "2026-08-25");
        let before = serde_json::to_string(&state).unwrap();

        assert!(!rolled(&mut state, "2026-08-25"));
        assert_eq!(serde_json::to_string(&state).unwrap(), before);
    }

    #[test]
    fn consecutive_day_increments_streak() {
        let mut state = PlayerState::default();
        rolled(&mut state, "2026-08-25");
        state.streak_days = 4;

        rolled(&mut state, "2026-08-26");
        assert_eq!(state.streak_days, 5);
    }

    #[test]
    fn gap_resets_streak() {
        let mut state = PlayerState::default();
        rolled(&mut state, "2026-08-25");
        state.streak_days = 9;

        rolled(&mut state, "2026-08-28"); // three days later
        assert_eq!(state.streak_days, 1);
    }

    #[test]
    fn daily_rollover_clears_progress_but_keeps_progression() {
        let mut state = PlayerState::default();
        rolled(&mut state, "2026-08-25");
        state.level = 3;
        state.xp = 120;
        state.lifetime_quests = 12;
        if let Some(qp) = state.quest_progress_today.values_mut().next() {
            qp.progress = 2;
            qp.completed = true;
        }

        rolled(&mut state, "2026-08-26");

        assert_eq!(state.level, 3);
        assert_eq!(state.xp, 120);
        assert_eq!(state.lifetime_quests, 12);
        assert!(state
            .quest_progress_today
            .values()
            .all(|qp| qp.progress == 0 && !qp.completed));
    }

    #[test]
    fn week_rollover_resets_boss_counter_only_across_weeks() {
        let mut state = PlayerState::default();
        rolled(&mut state, "2026-08-25"); // Tuesday, week of 08-24
        state.weekly_boss_progress = 11;

        // Sunday of the same week: counter survives the daily rollover
        rolled(&mut state, "2026-08-30");
        assert_eq!(state.weekly_boss_progress, 11);
        assert_eq!(state.week_start, "2026-08-24");

        // Monday of the next week: counter resets, anchor moves
        rolled(&mut state, "2026-08-31");
        assert_eq!(state.weekly_boss_progress, 0);
        assert_eq!(state.week_start, "2026-08-31");
    }
}
