use crate::model::{Quest, QuestKind};
use rand::seq::IndexedRandom;
use rand::Rng;

struct QuestDef {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    xp: u32,
    kind: QuestKind,
    target_count: u32,
    unit_label: &'static str,
}

impl QuestDef {
    fn build(&self) -> Quest {
        Quest {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            xp: self.xp,
            kind: self.kind,
            target_count: self.target_count,
            unit_label: self.unit_label.to_string(),
        }
    }
}

const fn def(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    kind: QuestKind,
    target_count: u32,
    unit_label: &'static str,
) -> QuestDef {
    QuestDef {
        id,
        title,
        description,
        xp: 10,
        kind,
        target_count,
        unit_label,
    }
}

const POOL: [QuestDef; 2] = [
    def(
        "pool_walk_5",
        "Pool Walk",
        "Walk laps in pool — 5 min",
        QuestKind::Pool,
        5,
        "min",
    ),
    def(
        "pool_kicks_3",
        "Wall Kicks",
        "Hold wall & flutter — 3 min",
        QuestKind::Pool,
        3,
        "min",
    ),
];

const VR: [QuestDef; 2] = [
    def(
        "vr_box_3",
        "VR Boxing",
        "Light shadow boxing — 3 min",
        QuestKind::Vr,
        3,
        "min",
    ),
    def(
        "vr_rhythm_4",
        "VR Rhythm",
        "Rhythm game warmup — 4 min",
        QuestKind::Vr,
        4,
        "min",
    ),
];

const DUMBBELL: [QuestDef; 2] = [
    def(
        "db_curl_10",
        "Dumbbell Curls",
        "8 lb curls — 10/side",
        QuestKind::Dumbbell,
        10,
        "reps",
    ),
    def(
        "db_press_10",
        "Dumbbell Press",
        "Seated press — 10 reps",
        QuestKind::Dumbbell,
        10,
        "reps",
    ),
];

const STRETCH: [QuestDef; 2] = [
    def(
        "st_torso_2",
        "Torso Twists",
        "2 x 10/side",
        QuestKind::Stretch,
        2,
        "sets",
    ),
    def(
        "st_calf_2",
        "Calf Stretch",
        "2 x 30s",
        QuestKind::Stretch,
        2,
        "sets",
    ),
];

const BREATH: [QuestDef; 1] = [def(
    "breath_box_2",
    "Box Breathing",
    "4-4-4-4 — 2 min",
    QuestKind::Breath,
    2,
    "min",
)];

/// Draws the quest-of-the-day set: one uniform pick per category pool, in a
/// fixed category order. Always yields exactly 5 quests.
pub fn generate_daily_quests(rng: &mut impl Rng) -> Vec<Quest> {
    let pools: [&[QuestDef]; 5] = [&POOL, &VR, &DUMBBELL, &STRETCH, &BREATH];
    pools
        .iter()
        .map(|pool| {
            pool.choose(rng)
                .unwrap_or(&pool[0]) // pools are non-empty by construction
                .build()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draws_one_quest_per_category() {
        let mut rng = StdRng::seed_from_u64(7);
        let quests = generate_daily_quests(&mut rng);
        assert_eq!(quests.len(), 5);
        let kinds: Vec<QuestKind> = quests.iter().map(|q| q.kind).collect();
        assert_eq!(
            kinds,
            vec![
                QuestKind::Pool,
                QuestKind::Vr,
                QuestKind::Dumbbell,
                QuestKind::Stretch,
                QuestKind::Breath
            ]
        );
    }

    #[test]
    fn same_seed_draws_same_set() {
        let a = generate_daily_quests(&mut StdRng::seed_from_u64(42));
        let b = generate_daily_quests(&mut StdRng::seed_from_u64(42));
        let ids_a: Vec<&str> = a.iter().map(|q| q.id.as_str()).collect();
        let ids_b: Vec<&str> = b.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn single_variant_pool_always_draws_breathing() {
        for seed in 0..16 {
            let quests = generate_daily_quests(&mut StdRng::seed_from_u64(seed));
            assert_eq!(quests[4].id, "breath_box_2");
            assert!(quests.iter().all(|q| q.xp == 10 && q.target_count >= 1));
        }
    }
}
