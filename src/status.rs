use crate::date::week_end_of;
use crate::engine::boss_stage;
use crate::model::{xp_needed, DaySummary, PlayerState, BOSS_NAME};

#[derive(Debug, Clone, serde::Serialize)]
pub struct Status {
    pub player: PlayerSection,
    pub quests: Vec<QuestRow>,
    pub boss: BossSection,
    pub history: Vec<DaySummary>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct PlayerSection {
    pub date: String,
    pub level: u32,
    pub xp: u32,
    pub xp_needed: u32,
    pub streak_days: u32,
    pub lifetime_quests: u32,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct QuestRow {
    pub id: String,
    pub title: String,
    pub kind: String,
    pub progress: u32,
    pub target: u32,
    pub unit: String,
    pub xp: u32,
    pub completed: bool,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct BossSection {
    pub name: String,
    pub week_start: String,
    pub week_end: String,
    pub progress: u32,
    pub goal: u32,
    pub stage: u32,
    pub defeated: bool,
}

pub fn build_quest_rows(state: &PlayerState) -> Vec<QuestRow> {
    state
        .quests_today
        .iter()
        .map(|q| {
            let (progress, completed) = state
                .quest_progress_today
                .get(&q.id)
                .map(|qp| (qp.progress, qp.completed))
                .unwrap_or((0, false));
            QuestRow {
                id: q.id.clone(),
                title: q.title.clone(),
                kind: q.kind.as_str().to_string(),
                progress,
                target: q.target_count,
                unit: q.unit_label.clone(),
                xp: q.xp,
                completed,
            }
        })
        .collect()
}

pub fn build_boss_section(state: &PlayerState) -> BossSection {
    let stage = boss_stage(state.weekly_boss_progress, state.weekly_boss_goal);
    BossSection {
        name: BOSS_NAME.to_string(),
        week_start: state.week_start.clone(),
        week_end: week_end_of(&state.week_start).unwrap_or_default(),
        progress: state.weekly_boss_progress,
        goal: state.weekly_boss_goal,
        stage,
        defeated: stage == 4,
    }
}

pub fn build_status(state: &PlayerState) -> Status {
    Status {
        player: PlayerSection {
            date: state.daily_date.clone(),
            level: state.level,
            xp: state.xp,
            xp_needed: xp_needed(state.level),
            streak_days: state.streak_days,
            lifetime_quests: state.lifetime_quests,
        },
        quests: build_quest_rows(state),
        boss: build_boss_section(state),
        history: state.history7.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollover::ensure_current;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn status_reflects_fresh_state() {
        let mut state = PlayerState::default();
        ensure_current(&mut state, "2026-08-25", &mut StdRng::seed_from_u64(3)).unwrap();

        let status = build_status(&state);
        assert_eq!(status.player.level, 1);
        assert_eq!(status.player.xp_needed, 200);
        assert_eq!(status.quests.len(), 5);
        assert!(status.quests.iter().all(|q| !q.completed && q.progress == 0));
        assert_eq!(status.boss.stage, 0);
        assert!(!status.boss.defeated);
        assert_eq!(status.boss.name, BOSS_NAME);
    }

    #[test]
    fn boss_section_derives_stage_from_counter() {
        let mut state = PlayerState::default();
        state.weekly_boss_progress = 15;
        let boss = build_boss_section(&state);
        assert_eq!(boss.stage, 3);
        assert!(!boss.defeated);

        state.weekly_boss_progress = 20;
        assert!(build_boss_section(&state).defeated);
    }
}
