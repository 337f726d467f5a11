use rain::DisplaySurface;
use winit::event_loop::EventLoopWindowTarget;
use winit::monitor::MonitorHandle;

use crate::session::ShellEvent;

/// Every connected monitor, paired with its bounds.
pub fn get_all_displays(target: &EventLoopWindowTarget<ShellEvent>) -> Vec<(MonitorHandle, DisplaySurface)> {
    target
        .available_monitors()
        .enumerate()
        .map(|(i, monitor)| {
            let position = monitor.position();
            let size = monitor.size();
            let display = DisplaySurface::new(position.x, position.y, size.width, size.height);

            log::info!(
                "Display {} ({}): origin=({}, {}), size={}x{}, scale={}",
                i,
                monitor.name().unwrap_or_else(|| "unnamed".to_string()),
                display.x,
                display.y,
                display.width,
                display.height,
                monitor.scale_factor()
            );

            (monitor, display)
        })
        .collect()
}
