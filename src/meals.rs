use crate::date::parse_date_string;
use crate::error::CliError;
use crate::model::{MealEntry, PlayerState};

pub fn next_meal_id(state: &mut PlayerState) -> String {
    let n = state.next_meal_number;
    state.next_meal_number = n + 1;
    format!("m{:04}", n)
}

pub fn add_meal(
    state: &mut PlayerState,
    name: &str,
    calories: u32,
    date: &str,
) -> Result<MealEntry, CliError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::usage("Meal name is required"));
    }
    if calories == 0 {
        return Err(CliError::usage("Invalid calories"));
    }
    parse_date_string(date, "date")?;

    let entry = MealEntry {
        id: next_meal_id(state),
        date: date.to_string(),
        name: name.to_string(),
        calories,
    };
    state.meals.push(entry.clone());
    Ok(entry)
}

pub fn remove_meal(state: &mut PlayerState, id: &str) -> Result<MealEntry, CliError> {
    match state.meals.iter().position(|m| m.id == id) {
        Some(i) => Ok(state.meals.remove(i)),
        None => Err(CliError::not_found(format!("Meal not found: {}", id))),
    }
}

pub fn meals_on(state: &PlayerState, date: &str) -> Vec<MealEntry> {
    state
        .meals
        .iter()
        .filter(|m| m.date == date)
        .cloned()
        .collect()
}

pub fn calories_on(state: &PlayerState, date: &str) -> u32 {
    meals_on(state, date)
        .iter()
        .fold(0u32, |acc, m| acc.saturating_add(m.calories))
}
