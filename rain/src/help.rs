use clap::{Arg, ArgAction, Command};

use crate::effect::Effect;

const EXAMPLES: &str = "\
Examples:
  digital-rain                          Open a window with the classic effect
  digital-rain --effect nightmare       Open a window with the nightmare effect
  digital-rain --fullscreen             Run as a screensaver on every display
  digital-rain /s --effect resurrections
  digital-rain /c                       Open the settings window";

/// Describes every accepted flag. Only used for rendering usage text; the
/// launch itself is resolved by [`crate::args::resolve`].
pub fn command() -> Command {
    Command::new("digital-rain")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Digital rain screensaver")
        .override_usage("digital-rain [--fullscreen | /s | /c | /p<HANDLE>] [--effect <NAME>]")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(
            Arg::new("fullscreen")
                .long("fullscreen")
                .short('f')
                .action(ArgAction::SetTrue)
                .help("Run as a screensaver on every display (also /f, /s, -s)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .action(ArgAction::SetTrue)
                .help("Open the screensaver settings (also /c)"),
        )
        .arg(
            Arg::new("preview")
                .short('p')
                .value_name("HANDLE")
                .help("Preview in a small window (also /p<HANDLE>); the handle is ignored"),
        )
        .arg(
            Arg::new("effect")
                .long("effect")
                .value_name("NAME")
                .value_parser(clap::value_parser!(Effect))
                .help("Visual effect to display"),
        )
        .arg(
            Arg::new("help")
                .long("help")
                .short('h')
                .action(ArgAction::Help)
                .help("Print help (also /?, /h)"),
        )
        .after_help(format!("Effects:\n  {}\n\n{}", Effect::catalog(), EXAMPLES))
}

/// Usage text: flags, the effect catalog and examples.
pub fn usage() -> String {
    command().render_help().to_string()
}
