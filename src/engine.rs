use crate::model::{xp_needed, DaySummary, PlayerState, HISTORY_CAP};

/// Folds `gained` XP into (level, xp). The threshold to the next level grows
/// with the level, so one large gain can cross several thresholds.
pub fn add_xp(level: u32, xp: u32, gained: u32) -> (u32, u32) {
    let mut lvl = level.max(1);
    let mut x = xp.saturating_add(gained);
    while x >= xp_needed(lvl) {
        x -= xp_needed(lvl);
        lvl += 1;
    }
    (lvl, x)
}

/// Discrete boss presentation stage, 0..=4 (4 = defeated), from the weekly
/// completion ratio. Thresholds at 25/50/75/100 percent.
pub fn boss_stage(progress: u32, goal: u32) -> u32 {
    if goal == 0 {
        return 0;
    }
    let ratio = progress as f64 / goal as f64;
    if ratio >= 1.0 {
        4
    } else if ratio >= 0.75 {
        3
    } else if ratio >= 0.5 {
        2
    } else if ratio >= 0.25 {
        1
    } else {
        0
    }
}

fn unlock_rewards(state: &mut PlayerState) {
    for r in state.rewards.iter_mut() {
        if !r.claimed && state.level >= r.level_required {
            r.claimed = true;
        }
    }
}

fn record_in_history(state: &mut PlayerState, xp_earned: u32, quests_completed: u32) {
    let today = state.daily_date.clone();
    match state.history7.iter_mut().find(|d| d.date == today) {
        Some(entry) => {
            entry.xp_earned += xp_earned;
            entry.quests_completed += quests_completed;
        }
        None => {
            state.history7.push(DaySummary {
                date: today,
                xp_earned,
                quests_completed,
            });
            // entries are appended in chronological order; drop the oldest
            if state.history7.len() > HISTORY_CAP {
                state.history7.remove(0);
            }
        }
    }
}

/// Applies one quest completion worth `xp_gained` to the aggregate: XP and
/// level, reward unlocks, weekly boss counter, lifetime total, and today's
/// history entry.
pub fn apply_completion(state: &mut PlayerState, xp_gained: u32) {
    let (level, xp) = add_xp(state.level, state.xp, xp_gained);
    state.level = level;
    state.xp = xp;
    unlock_rewards(state);

    // boss HP tracks completions, not XP
    state.weekly_boss_progress += 1;
    state.lifetime_quests += 1;

    record_in_history(state, xp_gained, 1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leveling_crosses_one_threshold() {
        // 195 + 10 = 205; level 1 needs 200, leaving 5 at level 2
        assert_eq!(add_xp(1, 195, 10), (2, 5));
    }

    #[test]
    fn leveling_crosses_many_thresholds_in_one_gain() {
        // level 1 -> 2 costs 200, 2 -> 3 costs 400; 650 total leaves 50
        assert_eq!(add_xp(1, 0, 650), (3, 50));
    }

    #[test]
    fn leveling_conserves_total_xp() {
        let mut total = 0u32;
        let (mut level, mut xp) = (1u32, 0u32);
        for gain in [10, 250, 0, 999, 40] {
            total += gain;
            let (l, x) = add_xp(level, xp, gain);
            level = l;
            xp = x;
            assert!(xp < xp_needed(level));
            let spent: u32 = (1..level).map(xp_needed).sum();
            assert_eq!(spent + xp, total);
        }
    }

    #[test]
    fn boss_stage_buckets() {
        assert_eq!(boss_stage(0, 20), 0);
        assert_eq!(boss_stage(4, 20), 0);
        assert_eq!(boss_stage(5, 20), 1);
        assert_eq!(boss_stage(10, 20), 2);
        assert_eq!(boss_stage(15, 20), 3);
        assert_eq!(boss_stage(20, 20), 4);
        assert_eq!(boss_stage(25, 20), 4);
    }

    #[test]
    fn boss_stage_zero_goal_guard() {
        assert_eq!(boss_stage(7, 0), 0);
    }

    #[test]
    fn first_completion_updates_every_counter() {
        let mut state = PlayerState::default();
        state.daily_date = "2026-08-25".to_string();

        apply_completion(&mut state, 10);

        assert_eq!(state.level, 1);
        assert_eq!(state.xp, 10);
        assert_eq!(state.weekly_boss_progress, 1);
        assert_eq!(state.lifetime_quests, 1);
        assert_eq!(state.history7.len(), 1);
        assert_eq!(state.history7[0].xp_earned, 10);
        assert_eq!(state.history7[0].quests_completed, 1);
    }

    #[test]
    fn same_day_completions_accumulate_in_one_history_entry() {
        let mut state = PlayerState::default();
        state.daily_date = "2026-08-25".to_string();

        apply_completion(&mut state, 10);
        apply_completion(&mut state, 10);

        assert_eq!(state.history7.len(), 1);
        assert_eq!(state.history7[0].xp_earned, 20);
        assert_eq!(state.history7[0].quests_completed, 2);
        assert_eq!(state.lifetime_quests, 2);
    }

    #[test]
    fn history_evicts_oldest_past_seven_days() {
        let mut state = PlayerState::default();
        for day in 1..=8u32 {
            state.daily_date = format!("2026-08-{:02}", day);
            apply_completion(&mut state, 10);
        }
        assert_eq!(state.history7.len(), 7);
        assert_eq!(state.history7[0].date, "2026-08-02");
        assert_eq!(state.history7.last().unwrap().date, "2026-08-08");
    }

    #[test]
    fn rewards_unlock_once_and_stay_claimed() {
        let mut state = PlayerState::default();
        state.daily_date = "2026-08-25".to_string();
        state.level = 1;
        state.xp = 195;

        apply_completion(&mut state, 10); // -> level 2

        assert_eq!(state.level, 2);
        assert!(state.rewards[0].claimed); // Snack Ticket @2
        assert!(!state.rewards[1].claimed); // VR Loot @3

        // further mutations never revert a claim
        apply_completion(&mut state, 0);
        assert!(state.rewards[0].claimed);
    }

    #[test]
    fn big_gain_unlocks_every_reward_passed() {
        let mut state = PlayerState::default();
        state.daily_date = "2026-08-25".to_string();

        // enough to reach level 3: 200 + 400
        apply_completion(&mut state, 600);
        assert_eq!(state.level, 3);
        assert!(state.rewards[0].claimed);
        assert!(state.rewards[1].claimed);
        assert!(!state.rewards[2].claimed); // Gear Upgrade @5
    }
}
