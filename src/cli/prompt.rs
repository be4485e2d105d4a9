use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Select};

/// Suggestions beyond this are not offered in the menu.
const MAX_MENU_SUGGESTIONS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Change(usize),
    Ignore,
    Learn,
    Quit,
}

/// Ask what to do with `word`. Escape counts as quit.
pub fn ask(word: &str, suggestions: &[String]) -> Result<Decision> {
    let offered = suggestions.len().min(MAX_MENU_SUGGESTIONS);
    let mut items: Vec<String> = suggestions[..offered]
        .iter()
        .map(|s| format!("Change to \"{}\"", s))
        .collect();
    items.push("Ignore".to_string());
    items.push("Learn (add to personal dictionary)".to_string());
    items.push("Quit".to_string());

    let choice = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("What should happen to \"{}\"?", word))
        .items(&items)
        .default(0)
        .interact_opt()?;

    Ok(decision_for(choice, offered))
}

fn decision_for(choice: Option<usize>, offered: usize) -> Decision {
    match choice {
        Some(i) if i < offered => Decision::Change(i),
        Some(i) if i == offered => Decision::Ignore,
        Some(i) if i == offered + 1 => Decision::Learn,
        _ => Decision::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choices_map_to_decisions() {
        assert_eq!(decision_for(Some(0), 2), Decision::Change(0));
        assert_eq!(decision_for(Some(1), 2), Decision::Change(1));
        assert_eq!(decision_for(Some(2), 2), Decision::Ignore);
        assert_eq!(decision_for(Some(3), 2), Decision::Learn);
        assert_eq!(decision_for(Some(4), 2), Decision::Quit);
        assert_eq!(decision_for(None, 2), Decision::Quit);
    }

    #[test]
    fn test_no_suggestions_starts_with_ignore() {
        assert_eq!(decision_for(Some(0), 0), Decision::Ignore);
        assert_eq!(decision_for(Some(1), 0), Decision::Learn);
    }
}
