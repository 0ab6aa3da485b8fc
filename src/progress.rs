use crate::error::CliError;
use crate::model::PlayerState;

/// What a single tick did to the quest it targeted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Quest id not in today's set, or no progress record for it. Silently
    /// ignored rather than raised: the aggregate is never left half-updated
    /// by a stale id.
    NotFound,
    /// Quest was already completed; re-ticks are idempotent.
    AlreadyDone,
    /// Progress advanced but the target is not reached yet.
    Advanced { progress: u32, target: u32 },
    /// This tick reached the target. Carries the XP the quest awards so the
    /// caller can feed the progression engine.
    Completed { xp: u32 },
}

/// Advances today's progress for `quest_id` by `by`, clamped to the quest's
/// target count. Completion is monotone: once set it never clears, and
/// further ticks are no-ops.
pub fn tick(state: &mut PlayerState, quest_id: &str, by: u32) -> TickOutcome {
    let Some(quest) = state.quests_today.iter().find(|q| q.id == quest_id) else {
        return TickOutcome::NotFound;
    };
    let target = quest.target_count;
    let xp = quest.xp;

    let Some(qp) = state.quest_progress_today.get_mut(quest_id) else {
        return TickOutcome::NotFound;
    };
    if qp.completed {
        return TickOutcome::AlreadyDone;
    }

    qp.progress = qp.progress.saturating_add(by).min(target);
    if qp.progress >= target {
        qp.completed = true;
        TickOutcome::Completed { xp }
    } else {
        TickOutcome::Advanced {
            progress: qp.progress,
            target,
        }
    }
}

/// Resolves a CLI selector against today's quest set: an exact quest id, or a
/// unique case-insensitive title prefix.
pub fn select_quest_id(state: &PlayerState, selector: &str) -> Result<String, CliError> {
    let s = selector.trim();
    if s.is_empty() {
        return Err(CliError::usage("Quest selector is required"));
    }

    if let Some(q) = state.quests_today.iter().find(|q| q.id == s) {
        return Ok(q.id.clone());
    }

    let prefix = s.to_lowercase();
    let matches: Vec<&crate::model::Quest> = state
        .quests_today
        .iter()
        .filter(|q| q.title.to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Err(CliError::not_found(format!("Quest not found: {}", selector))),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let candidates = matches
                .iter()
                .map(|q| format!("{} {}", q.id, q.title))
                .collect::<Vec<String>>()
                .join(", ");
            Err(CliError::ambiguous(format!(
                "Ambiguous selector '{}'. Candidates: {}",
                selector, candidates
            )))
        }
    }
}
