use std::collections::BTreeMap;

/// XP needed to go from `level` to `level + 1` grows linearly.
pub fn xp_needed(level: u32) -> u32 {
    level * 200
}

/// `history7` keeps at most this many daily summaries.
pub const HISTORY_CAP: usize = 7;

pub const DEFAULT_WEEKLY_BOSS_GOAL: u32 = 20;
pub const BOSS_NAME: &str = "Karen the Calorie Queen";

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    Pool,
    Vr,
    Dumbbell,
    Stretch,
    Breath,
}

impl QuestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestKind::Pool => "pool",
            QuestKind::Vr => "vr",
            QuestKind::Dumbbell => "dumbbell",
            QuestKind::Stretch => "stretch",
            QuestKind::Breath => "breath",
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub xp: u32,
    pub kind: QuestKind,
    pub target_count: u32,
    pub unit_label: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QuestProgress {
    pub quest_id: String,
    pub progress: u32,
    pub completed: bool,
}

impl Default for QuestProgress {
    fn default() -> Self {
        Self {
            quest_id: String::new(),
            progress: 0,
            completed: false,
        }
    }
}

impl QuestProgress {
    pub fn fresh(quest_id: &str) -> Self {
        Self {
            quest_id: quest_id.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Reward {
    pub level_required: u32,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub claimed: bool,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MealEntry {
    pub id: String,
    pub date: String,
    pub name: String,
    pub calories: u32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DaySummary {
    pub date: String,
    pub xp_earned: u32,
    pub quests_completed: u32,
}

impl Default for DaySummary {
    fn default() -> Self {
        Self {
            date: String::new(),
            xp_earned: 0,
            quests_completed: 0,
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    pub notifications_enabled: bool,
    pub reminder_hour: u32,
    pub reminder_minute: u32,
    pub daily_calorie_target: u32,
    pub dark_theme: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            reminder_hour: 10,
            reminder_minute: 0,
            daily_calorie_target: 2500,
            dark_theme: true,
        }
    }
}

/// The whole persisted aggregate. Loaded, repaired (rollover) and written back
/// as one JSON document.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub level: u32,
    pub xp: u32,
    pub daily_date: String,
    pub quests_today: Vec<Quest>,
    pub quest_progress_today: BTreeMap<String, QuestProgress>,
    pub week_start: String,
    pub weekly_boss_goal: u32,
    pub weekly_boss_progress: u32,
    pub rewards: Vec<Reward>,
    pub streak_days: u32,
    pub lifetime_quests: u32,
    pub history7: Vec<DaySummary>,
    pub meals: Vec<MealEntry>,
    pub next_meal_number: u32,
    pub settings: Settings,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            level: 1,
            xp: 0,
            daily_date: String::new(),
            quests_today: Vec::new(),
            quest_progress_today: BTreeMap::new(),
            week_start: String::new(),
            weekly_boss_goal: DEFAULT_WEEKLY_BOSS_GOAL,
            weekly_boss_progress: 0,
            rewards: default_rewards(),
            streak_days: 0,
            lifetime_quests: 0,
            history7: Vec::new(),
            meals: Vec::new(),
            next_meal_number: 1,
            settings: Settings::default(),
        }
    }
}

pub fn default_rewards() -> Vec<Reward> {
    let defs: [(u32, &str, &str); 5] = [
        (2, "Snack Ticket", "Pick a favorite low-cal treat tonight"),
        (3, "VR Loot", "Buy a new VR song pack or skin"),
        (5, "Gear Upgrade", "New swim cap, water shoes, or dumbbell"),
        (7, "Game Night", "Buy or start a new PC game"),
        (10, "Epic Loot", "Bigger reward of your choice"),
    ];
    defs.iter()
        .map(|(lvl, name, desc)| Reward {
            level_required: *lvl,
            name: name.to_string(),
            description: desc.to_string(),
            claimed: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_satisfy_aggregate_invariants() {
        let s = PlayerState::default();
        assert_eq!(s.level, 1);
        assert!(s.xp < xp_needed(s.level));
        assert_eq!(s.weekly_boss_goal, 20);
        assert_eq!(s.rewards.len(), 5);
        assert!(s.rewards.iter().all(|r| !r.claimed));
        assert_eq!(s.settings.reminder_hour, 10);
        assert_eq!(s.settings.daily_calorie_target, 2500);
    }

    #[test]
    fn older_documents_fill_missing_fields_with_defaults() {
        let s: PlayerState = serde_json::from_str(r#"{"level": 3, "xp": 40}"#).unwrap();
        assert_eq!(s.level, 3);
        assert_eq!(s.xp, 40);
        assert_eq!(s.streak_days, 0);
        assert_eq!(s.rewards.len(), 5);
        assert!(s.settings.notifications_enabled);
    }

    #[test]
    fn unknown_fields_are_ignored_on_read() {
        let s: PlayerState =
            serde_json::from_str(r#"{"level": 2, "future_field": {"a": 1}}"#).unwrap();
        assert_eq!(s.level, 2);
    }
}
