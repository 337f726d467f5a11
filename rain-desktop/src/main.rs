// Disable the console window that pops up when you launch the .exe
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use rain::AssetRoots;

mod dialog;
mod host;
mod monitors;
mod session;

use session::SessionController;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let resolution = rain::resolve(std::env::args().skip(1));
    for warning in &resolution.warnings {
        log::warn!("{}", warning);
    }

    let launch = resolution.launch;
    if launch.show_help {
        let usage = rain::help::usage();
        if console_attached() {
            println!("{}", usage);
        } else {
            dialog::show_help(&usage);
        }
        return Ok(());
    }

    log::info!("Starting {:?} session with effect {}", launch.mode, launch.effect);
    log::debug!(
        "Effect menu: {:?}",
        rain::menu::effect_menu(launch.effect)
            .iter()
            .map(|item| format!("{}{}", if item.checked { "*" } else { "" }, item.label))
            .collect::<Vec<_>>()
    );

    let assets = AssetRoots::from_environment()?;
    log::debug!(
        "Surface documents: {} then {}",
        assets.primary.display(),
        assets.alternate.display()
    );

    SessionController::new(launch, assets).start()
}

/// Release builds on Windows use the GUI subsystem and have no console to
/// print to. Everywhere else stdout is usable, even when piped.
fn console_attached() -> bool {
    !cfg!(all(target_os = "windows", not(debug_assertions)))
}
