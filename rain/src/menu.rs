use crate::effect::Effect;

/// One entry of the effect menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub effect: Effect,
    pub label: String,
    pub checked: bool,
}

/// The effect menu, one entry per catalog item with the selection checked.
pub fn effect_menu(selected: Effect) -> Vec<MenuItem> {
    Effect::ALL
        .into_iter()
        .map(|effect| MenuItem {
            effect,
            label: label(effect),
            checked: effect == selected,
        })
        .collect()
}

fn label(effect: Effect) -> String {
    match effect {
        Effect::ThreeD => "3D".to_string(),
        other => {
            let name = other.name();
            let mut chars = name.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Window title for a windowed session.
pub fn window_title(selected: Effect) -> String {
    let current = effect_menu(selected)
        .into_iter()
        .find(|item| item.checked)
        .map(|item| item.label)
        .unwrap_or_default();
    format!("Digital Rain - {}", current)
}
