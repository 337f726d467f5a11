use serde::{Deserialize, Serialize};

/// A named visual variant of the rain animation.
///
/// The catalog is closed: the renderer only understands these identifiers,
/// and the first entry is the default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    #[default]
    Classic,
    Megacity,
    Neomatrixology,
    Operator,
    Nightmare,
    Paradise,
    Resurrections,
    Trinity,
    Morpheus,
    Bugs,
    Palimpsest,
    Twilight,
    Holoplay,
    #[serde(rename = "3d")]
    #[value(name = "3d")]
    ThreeD,
}

impl Effect {
    /// Every effect, in catalog order.
    pub const ALL: [Effect; 14] = [
        Effect::Classic,
        Effect::Megacity,
        Effect::Neomatrixology,
        Effect::Operator,
        Effect::Nightmare,
        Effect::Paradise,
        Effect::Resurrections,
        Effect::Trinity,
        Effect::Morpheus,
        Effect::Bugs,
        Effect::Palimpsest,
        Effect::Twilight,
        Effect::Holoplay,
        Effect::ThreeD,
    ];

    /// Catalog identifier, as passed to the renderer.
    pub fn name(self) -> &'static str {
        match self {
            Effect::Classic => "classic",
            Effect::Megacity => "megacity",
            Effect::Neomatrixology => "neomatrixology",
            Effect::Operator => "operator",
            Effect::Nightmare => "nightmare",
            Effect::Paradise => "paradise",
            Effect::Resurrections => "resurrections",
            Effect::Trinity => "trinity",
            Effect::Morpheus => "morpheus",
            Effect::Bugs => "bugs",
            Effect::Palimpsest => "palimpsest",
            Effect::Twilight => "twilight",
            Effect::Holoplay => "holoplay",
            Effect::ThreeD => "3d",
        }
    }

    /// Case-insensitive catalog lookup.
    pub fn from_name(name: &str) -> Option<Effect> {
        Effect::ALL
            .into_iter()
            .find(|effect| effect.name().eq_ignore_ascii_case(name))
    }

    fn position(self) -> usize {
        Effect::ALL
            .iter()
            .position(|&effect| effect == self)
            .unwrap_or(0)
    }

    /// Next entry in the catalog, wrapping around.
    pub fn next(self) -> Effect {
        Effect::ALL[(self.position() + 1) % Effect::ALL.len()]
    }

    /// Previous entry in the catalog, wrapping around.
    pub fn previous(self) -> Effect {
        let len = Effect::ALL.len();
        Effect::ALL[(self.position() + len - 1) % len]
    }

    /// Comma separated list of every identifier, for diagnostics.
    pub fn catalog() -> String {
        Effect::ALL
            .iter()
            .map(|effect| effect.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn test_default_is_first_entry() {
        assert_eq!(Effect::default(), Effect::ALL[0]);
        assert_eq!(Effect::default(), Effect::Classic);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Effect::from_name("nightmare"), Some(Effect::Nightmare));
        assert_eq!(Effect::from_name("TRINITY"), Some(Effect::Trinity));
        assert_eq!(Effect::from_name("3D"), Some(Effect::ThreeD));
        assert_eq!(Effect::from_name("not-a-real-effect"), None);
        assert_eq!(Effect::from_name(""), None);
    }

    #[test]
    fn test_clap_names_match_catalog() {
        for effect in Effect::ALL {
            let value = effect.to_possible_value().unwrap();
            assert_eq!(value.get_name(), effect.name());
        }
        assert_eq!(Effect::value_variants().len(), Effect::ALL.len());
    }

    #[test]
    fn test_serde_uses_catalog_names() {
        assert_eq!(serde_json::to_string(&Effect::ThreeD).unwrap(), "\"3d\"");
        let parsed: Effect = serde_json::from_str("\"holoplay\"").unwrap();
        assert_eq!(parsed, Effect::Holoplay);
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(Effect::Classic.next(), Effect::Megacity);
        assert_eq!(Effect::ThreeD.next(), Effect::Classic);
        assert_eq!(Effect::Classic.previous(), Effect::ThreeD);
    }

    #[test]
    fn test_catalog_lists_every_name() {
        let catalog = Effect::catalog();
        for effect in Effect::ALL {
            assert!(catalog.contains(effect.name()));
        }
    }
}
