//! Launch argument resolution.
//!
//! Screensaver hosts pass Windows-style switches (`/s`, `/c:1234`, `/p 1234`)
//! alongside the long `--fullscreen` / `--effect` flags, so the resolver scans
//! tokens by hand. Unknown tokens are skipped rather than rejected.

use crate::effect::Effect;

/// Window topology requested at launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchMode {
    /// Arguments were given but none selected a mode.
    Windowed,
    /// One borderless window per display, exits on user activity.
    Fullscreen,
    /// Settings window.
    Config,
    /// Small stand-in for embedding into a host-supplied window.
    Preview,
    /// Launched with no arguments at all.
    #[default]
    Standalone,
}

impl LaunchMode {
    pub fn is_screensaver(self) -> bool {
        self == LaunchMode::Fullscreen
    }
}

/// The outcome of resolving a launch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Launch {
    pub mode: LaunchMode,
    pub effect: Effect,
    pub show_help: bool,
    /// Window handle passed with the preview switch. Embedding is not
    /// supported, so this is only reported.
    pub preview_handle: Option<String>,
}

/// Problems found while resolving that did not stop resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgWarning {
    #[error("unknown effect '{requested}', keeping '{kept}'. Valid effects: {valid}")]
    UnknownEffect {
        requested: String,
        kept: Effect,
        valid: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Resolution {
    pub launch: Launch,
    pub warnings: Vec<ArgWarning>,
    /// Number of tokens examined before resolution finished.
    pub consumed: usize,
}

const HELP_FLAGS: [&str; 5] = ["/?", "-?", "/h", "-h", "--help"];
const FULLSCREEN_FLAGS: [&str; 5] = ["/s", "-s", "/f", "-f", "--fullscreen"];
const CONFIG_FLAGS: [&str; 2] = ["/c", "-c"];
const EFFECT_FLAG: &str = "--effect";

/// Resolve the post-executable argument list.
pub fn resolve<I, S>(args: I) -> Resolution
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let tokens: Vec<String> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_lowercase())
        .collect();

    let mut resolution = Resolution {
        launch: Launch {
            mode: if tokens.is_empty() {
                LaunchMode::Standalone
            } else {
                LaunchMode::Windowed
            },
            ..Launch::default()
        },
        ..Resolution::default()
    };

    let mut index = 0;
    while index < tokens.len() {
        let token = tokens[index].as_str();
        index += 1;

        if HELP_FLAGS.contains(&token) {
            // Help wins over everything else on the line.
            resolution.launch = Launch {
                show_help: true,
                ..Launch::default()
            };
            resolution.warnings.clear();
            resolution.consumed = index;
            return resolution;
        }

        if FULLSCREEN_FLAGS.contains(&token) {
            resolution.launch.mode = LaunchMode::Fullscreen;
        } else if is_config_flag(token) {
            resolution.launch.mode = LaunchMode::Config;
        } else if let Some(handle) = preview_handle(token) {
            resolution.launch.mode = LaunchMode::Preview;
            resolution.launch.preview_handle = match handle {
                "" => tokens
                    .get(index)
                    .filter(|next| is_handle(next))
                    .map(|next| {
                        index += 1;
                        next.clone()
                    }),
                handle => Some(handle.to_string()),
            };
        } else if token == EFFECT_FLAG {
            let Some(name) = tokens.get(index) else {
                break;
            };
            // Leave a help flag for the next pass so it still short-circuits.
            if HELP_FLAGS.contains(&name.as_str()) {
                continue;
            }
            index += 1;
            match Effect::from_name(name) {
                Some(effect) => resolution.launch.effect = effect,
                None => resolution.warnings.push(ArgWarning::UnknownEffect {
                    requested: name.clone(),
                    kept: resolution.launch.effect,
                    valid: Effect::catalog(),
                }),
            }
        }
    }

    resolution.consumed = index;
    resolution
}

fn is_config_flag(token: &str) -> bool {
    CONFIG_FLAGS.iter().any(|flag| {
        token == *flag
            || token
                .strip_prefix(flag)
                .is_some_and(|rest| rest.starts_with(':'))
    })
}

/// `/p1234`, `-p1234` and `/p:1234` carry the handle inline; a bare `/p`
/// returns an empty handle and the caller looks at the next token.
fn preview_handle(token: &str) -> Option<&str> {
    let rest = token
        .strip_prefix("/p")
        .or_else(|| token.strip_prefix("-p"))?;
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    (rest.is_empty() || is_handle(rest)).then_some(rest)
}

fn is_handle(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch(args: &[&str]) -> Launch {
        resolve(args).launch
    }

    #[test]
    fn test_no_arguments() {
        let resolution = resolve(Vec::<String>::new());
        assert_eq!(resolution.launch.mode, LaunchMode::Standalone);
        assert_eq!(resolution.launch.effect, Effect::Classic);
        assert!(!resolution.launch.show_help);
        assert!(resolution.warnings.is_empty());
        assert_eq!(resolution.consumed, 0);
    }

    #[test]
    fn test_effect_selection() {
        assert_eq!(launch(&["--effect", "nightmare"]).effect, Effect::Nightmare);
        assert_eq!(launch(&["--EFFECT", "Paradise"]).effect, Effect::Paradise);
        assert_eq!(launch(&["--effect", "3d"]).effect, Effect::ThreeD);
    }

    #[test]
    fn test_unknown_effect_keeps_default_and_warns() {
        let resolution = resolve(["--effect", "not-a-real-effect"]);
        assert_eq!(resolution.launch.effect, Effect::Classic);
        assert_eq!(resolution.warnings.len(), 1);

        let message = resolution.warnings[0].to_string();
        assert!(message.contains("not-a-real-effect"));
        for effect in Effect::ALL {
            assert!(message.contains(effect.name()));
        }
    }

    #[test]
    fn test_unknown_effect_keeps_previous_selection() {
        let resolution = resolve(["--effect", "trinity", "--effect", "bogus"]);
        assert_eq!(resolution.launch.effect, Effect::Trinity);
        assert_eq!(
            resolution.warnings,
            vec![ArgWarning::UnknownEffect {
                requested: "bogus".to_string(),
                kept: Effect::Trinity,
                valid: Effect::catalog(),
            }]
        );
    }

    #[test]
    fn test_fullscreen_with_effect() {
        let launch = launch(&["--fullscreen", "--effect", "trinity"]);
        assert_eq!(launch.mode, LaunchMode::Fullscreen);
        assert_eq!(launch.effect, Effect::Trinity);
        assert!(!launch.show_help);
    }

    #[test]
    fn test_effect_before_mode_flag() {
        let launch = launch(&["--effect", "morpheus", "/S"]);
        assert_eq!(launch.mode, LaunchMode::Fullscreen);
        assert_eq!(launch.effect, Effect::Morpheus);
    }

    #[test]
    fn test_trailing_effect_flag() {
        let resolution = resolve(["--effect"]);
        assert_eq!(resolution.launch.effect, Effect::Classic);
        assert_eq!(resolution.launch.mode, LaunchMode::Windowed);
        assert!(resolution.warnings.is_empty());
        assert_eq!(resolution.consumed, 1);
    }

    #[test]
    fn test_screensaver_switches() {
        for flag in ["/s", "-s", "/S", "/f", "-F", "--fullscreen", "--FullScreen"] {
            assert_eq!(launch(&[flag]).mode, LaunchMode::Fullscreen, "{flag}");
        }
    }

    #[test]
    fn test_config_switches() {
        for flag in ["/c", "-c", "/C", "/c:132456"] {
            assert_eq!(launch(&[flag]).mode, LaunchMode::Config, "{flag}");
        }
        assert_eq!(launch(&["/cx"]).mode, LaunchMode::Windowed);
    }

    #[test]
    fn test_preview_switches() {
        let inline = launch(&["/p1234"]);
        assert_eq!(inline.mode, LaunchMode::Preview);
        assert_eq!(inline.preview_handle.as_deref(), Some("1234"));

        let separate = resolve(["/P", "5678"]);
        assert_eq!(separate.launch.mode, LaunchMode::Preview);
        assert_eq!(separate.launch.preview_handle.as_deref(), Some("5678"));
        assert_eq!(separate.consumed, 2);

        let bare = launch(&["-p"]);
        assert_eq!(bare.mode, LaunchMode::Preview);
        assert_eq!(bare.preview_handle, None);
    }

    #[test]
    fn test_help_short_circuits() {
        for flag in ["/?", "/h", "--help", "-h", "--HELP"] {
            let resolution = resolve(["--fullscreen", "--effect", "bugs", flag, "/c"]);
            assert!(resolution.launch.show_help, "{flag}");
            assert_eq!(resolution.launch.mode, LaunchMode::Standalone);
            assert_eq!(resolution.launch.effect, Effect::Classic);
            assert_eq!(resolution.consumed, 4);
        }
    }

    #[test]
    fn test_help_after_effect_flag() {
        for flag in ["--help", "/?", "/h", "-H"] {
            let resolution = resolve(["--effect", flag]);
            assert!(resolution.launch.show_help, "{flag}");
            assert!(resolution.warnings.is_empty(), "{flag}");
            assert_eq!(resolution.consumed, 2);
        }
    }

    #[test]
    fn test_is_screensaver() {
        assert!(LaunchMode::Fullscreen.is_screensaver());
        for mode in [
            LaunchMode::Windowed,
            LaunchMode::Config,
            LaunchMode::Preview,
            LaunchMode::Standalone,
        ] {
            assert!(!mode.is_screensaver());
        }
    }

    #[test]
    fn test_help_discards_earlier_warnings() {
        let resolution = resolve(["--effect", "bogus", "/?"]);
        assert!(resolution.launch.show_help);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_unknown_tokens_ignored() {
        let launch = launch(&["--turbo", "--effect", "twilight", "whatever"]);
        assert_eq!(launch.mode, LaunchMode::Windowed);
        assert_eq!(launch.effect, Effect::Twilight);
    }

    #[test]
    fn test_effect_value_is_not_reinterpreted_as_flag() {
        // The value slot is consumed even if it looks like a mode switch.
        let resolution = resolve(["--effect", "/s"]);
        assert_eq!(resolution.launch.mode, LaunchMode::Windowed);
        assert_eq!(resolution.launch.effect, Effect::Classic);
        assert_eq!(resolution.warnings.len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let args = ["/s", "--effect", "operator"];
        assert_eq!(resolve(args), resolve(args));
    }
}
