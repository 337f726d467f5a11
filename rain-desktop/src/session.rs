use std::sync::Arc;
use std::time::Instant;

use rain::menu::window_title;
use rain::settings::SavedSettings;
use rain::watch::POLL_INTERVAL;
use rain::{
    plan_screensaver_windows, AssetRoots, Effect, ExitTrigger, ExitWatch, FocusTracker, Launch,
    LaunchMode, PointerPosition, SurfaceParams, WindowPlan,
};
use winit::{
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{ElementState, Event, KeyEvent, StartCause, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopBuilder, EventLoopProxy, EventLoopWindowTarget},
    keyboard::{KeyCode, ModifiersState, PhysicalKey},
    window::{Fullscreen, Window, WindowBuilder, WindowId, WindowLevel},
};

use crate::dialog;
use crate::host::GpuHost;
use crate::monitors::get_all_displays;

type SessionResult = Result<(), Box<dyn std::error::Error>>;

const WINDOWED_SIZE: LogicalSize<f64> = LogicalSize::new(1200.0, 800.0);
const PREVIEW_SIZE: LogicalSize<f64> = LogicalSize::new(400.0, 300.0);
const CONFIG_SIZE: LogicalSize<f64> = LogicalSize::new(600.0, 500.0);

/// Messages posted to the event loop from outside winit.
#[derive(Debug, Clone)]
pub enum ShellEvent {
    /// A window's surface has content and the window may be shown.
    SurfaceReady(WindowId),
    /// The settings page asked for its JSON payload to be saved.
    SaveRequested(String),
}

/// Opens the windows for a resolved launch and runs the event loop until the
/// session ends.
pub struct SessionController {
    launch: Launch,
    assets: AssetRoots,
}

impl SessionController {
    pub fn new(launch: Launch, assets: AssetRoots) -> Self {
        Self { launch, assets }
    }

    pub fn start(self) -> SessionResult {
        let event_loop = EventLoopBuilder::<ShellEvent>::with_user_event().build()?;

        match self.launch.mode {
            LaunchMode::Fullscreen => self.run_screensaver(event_loop),
            LaunchMode::Config => self.run_config(event_loop),
            LaunchMode::Preview => {
                // Drawing into the host's preview pane would need its window
                // handle as a parent; show a small window instead.
                log::warn!(
                    "Embedding into preview window {} is not supported, opening a standalone preview",
                    self.launch.preview_handle.as_deref().unwrap_or("(none)")
                );
                self.run_windowed(event_loop, PREVIEW_SIZE)
            }
            LaunchMode::Windowed | LaunchMode::Standalone => {
                self.run_windowed(event_loop, WINDOWED_SIZE)
            }
        }
    }

    fn run_screensaver(self, event_loop: EventLoop<ShellEvent>) -> SessionResult {
        let displays = get_all_displays(&event_loop);
        if displays.is_empty() {
            return Err(rain::Error::NoDisplays.into());
        }

        let locator = self
            .assets
            .rain_surface(&SurfaceParams::for_mode(self.launch.mode, self.launch.effect))?;
        let bounds: Vec<_> = displays.iter().map(|(_, display)| *display).collect();
        let plans = plan_screensaver_windows(&bounds);

        log::info!(
            "Creating {} screensaver windows (one per display) for {}",
            plans.len(),
            locator
        );

        let mut host = GpuHost::new(event_loop.create_proxy(), wgpu::PowerPreference::LowPower);
        let mut windows = Vec::with_capacity(plans.len());

        for ((monitor, _), plan) in displays.into_iter().zip(plans) {
            let builder = WindowBuilder::new()
                .with_title(plan.title.clone())
                .with_decorations(false)
                .with_resizable(false)
                .with_visible(false)
                .with_position(PhysicalPosition::new(plan.bounds.x, plan.bounds.y))
                .with_inner_size(PhysicalSize::new(plan.bounds.width, plan.bounds.height))
                .with_window_level(WindowLevel::AlwaysOnTop)
                .with_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));

            #[cfg(target_os = "windows")]
            let builder = {
                use winit::platform::windows::WindowBuilderExtWindows;
                builder.with_skip_taskbar(true)
            };

            let window = Arc::new(builder.build(&event_loop)?);
            host.load(Arc::clone(&window), &locator)?;
            windows.push(SessionWindow {
                window,
                plan,
                ready: false,
            });
        }

        let mut session = ScreensaverSession::new(windows);
        event_loop.run(move |event, elwt| session.handle(event, elwt, &mut host))?;
        Ok(())
    }

    fn run_windowed(self, event_loop: EventLoop<ShellEvent>, size: LogicalSize<f64>) -> SessionResult {
        let effect = self.launch.effect;
        let locator = self
            .assets
            .rain_surface(&SurfaceParams::for_mode(self.launch.mode, effect))?;

        let window = Arc::new(
            WindowBuilder::new()
                .with_title(window_title(effect))
                .with_decorations(true)
                .with_resizable(true)
                .with_visible(false)
                .with_inner_size(size)
                .build(&event_loop)?,
        );

        let mut host = GpuHost::new(event_loop.create_proxy(), wgpu::PowerPreference::HighPerformance);
        host.load(Arc::clone(&window), &locator)?;

        let mut session = WindowedSession {
            window,
            effect,
            assets: self.assets,
        };
        event_loop.run(move |event, elwt| session.handle(event, elwt, &mut host))?;
        Ok(())
    }

    fn run_config(self, event_loop: EventLoop<ShellEvent>) -> SessionResult {
        let locator = self.assets.config_surface()?;

        let window = Arc::new(
            WindowBuilder::new()
                .with_title("Digital Rain Settings")
                .with_resizable(false)
                .with_visible(false)
                .with_inner_size(CONFIG_SIZE)
                .build(&event_loop)?,
        );

        let mut host = GpuHost::new(event_loop.create_proxy(), wgpu::PowerPreference::LowPower);
        host.load(Arc::clone(&window), &locator)?;

        let mut session = ConfigSession {
            window,
            proxy: event_loop.create_proxy(),
            effect: self.launch.effect,
            modifiers: ModifiersState::empty(),
        };
        event_loop.run(move |event, elwt| session.handle(event, elwt, &mut host))?;
        Ok(())
    }
}

struct SessionWindow {
    window: Arc<Window>,
    plan: WindowPlan,
    ready: bool,
}

/// Every window of a screensaver run plus the shared exit watch. Any exit
/// trigger on any window ends the whole session.
struct ScreensaverSession {
    windows: Vec<SessionWindow>,
    watch: ExitWatch,
    focus: FocusTracker,
    pointer: Option<PointerPosition>,
    next_poll: Instant,
}

impl ScreensaverSession {
    fn new(windows: Vec<SessionWindow>) -> Self {
        let focus = FocusTracker::new(windows.len());
        Self {
            windows,
            watch: ExitWatch::default(),
            focus,
            pointer: None,
            next_poll: Instant::now() + POLL_INTERVAL,
        }
    }

    fn index_of(&self, window_id: WindowId) -> Option<usize> {
        self.windows
            .iter()
            .position(|session_window| session_window.window.id() == window_id)
    }

    fn handle(
        &mut self,
        event: Event<ShellEvent>,
        elwt: &EventLoopWindowTarget<ShellEvent>,
        host: &mut GpuHost,
    ) {
        if !self.watch.is_active() {
            return;
        }

        let trigger = match event {
            Event::NewEvents(StartCause::Init) => {
                self.next_poll = Instant::now() + POLL_INTERVAL;
                None
            }
            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                self.next_poll = Instant::now() + POLL_INTERVAL;
                self.poll_pointer()
            }
            Event::UserEvent(ShellEvent::SurfaceReady(window_id)) => {
                self.reveal(window_id);
                None
            }
            Event::WindowEvent { window_id, event } => match self.index_of(window_id) {
                Some(index) => self.window_event(index, event, host),
                None => None,
            },
            Event::AboutToWait => {
                if self.focus.settle() {
                    self.watch.focus_lost()
                } else {
                    None
                }
            }
            _ => None,
        };

        match trigger {
            Some(trigger) => {
                log::info!("Ending screensaver: {}", trigger);
                // Drop the poll deadline before tearing down.
                elwt.set_control_flow(ControlFlow::Wait);
                elwt.exit();
            }
            None => elwt.set_control_flow(ControlFlow::WaitUntil(self.next_poll)),
        }
    }

    fn poll_pointer(&mut self) -> Option<ExitTrigger> {
        let position = self.pointer?;
        self.watch.sample_pointer(position)
    }

    fn window_event(
        &mut self,
        index: usize,
        event: WindowEvent,
        host: &mut GpuHost,
    ) -> Option<ExitTrigger> {
        let window_id = self.windows[index].window.id();
        match event {
            WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    ..
                },
                is_synthetic: false,
                ..
            } => self.watch.key_pressed(),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => self.watch.pointer_pressed(),
            WindowEvent::CursorMoved { position, .. } => {
                let session_window = &self.windows[index];
                let scale_factor = session_window.window.scale_factor();
                self.pointer = Some(session_window.plan.to_global(position.x, position.y, scale_factor));
                None
            }
            WindowEvent::Focused(focused) => {
                self.focus.set_focused(index, focused);
                None
            }
            WindowEvent::CloseRequested | WindowEvent::Destroyed => self.watch.window_closed(),
            WindowEvent::Resized(size) => {
                host.resize(window_id, size);
                None
            }
            WindowEvent::RedrawRequested => {
                host.redraw(window_id);
                None
            }
            _ => None,
        }
    }

    fn reveal(&mut self, window_id: WindowId) {
        let Some(index) = self.index_of(window_id) else {
            return;
        };

        let session_window = &mut self.windows[index];
        session_window.window.set_visible(true);
        session_window.window.set_cursor_visible(false);
        session_window.ready = true;
        log::info!(
            "Screensaver window {} shown at ({}, {}) {}x{}",
            session_window.plan.index,
            session_window.plan.bounds.x,
            session_window.plan.bounds.y,
            session_window.plan.bounds.width,
            session_window.plan.bounds.height
        );

        if !self.focus.is_armed() && self.windows.iter().all(|w| w.ready) {
            if let Some(first) = self.windows.first() {
                first.window.focus_window();
            }
            self.focus.arm();
        }
    }
}

/// A single interactive rain window: standalone, windowed or preview.
struct WindowedSession {
    window: Arc<Window>,
    effect: Effect,
    assets: AssetRoots,
}

impl WindowedSession {
    fn handle(
        &mut self,
        event: Event<ShellEvent>,
        elwt: &EventLoopWindowTarget<ShellEvent>,
        host: &mut GpuHost,
    ) {
        elwt.set_control_flow(ControlFlow::Wait);

        match event {
            Event::UserEvent(ShellEvent::SurfaceReady(window_id)) if window_id == self.window.id() => {
                self.window.set_visible(true);
            }
            Event::WindowEvent { event, window_id } if window_id == self.window.id() => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(KeyCode::Escape),
                            state: ElementState::Released,
                            ..
                        },
                    ..
                } => elwt.exit(),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(code @ (KeyCode::KeyN | KeyCode::KeyP)),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } => {
                    let effect = match code {
                        KeyCode::KeyN => self.effect.next(),
                        _ => self.effect.previous(),
                    };
                    self.switch_effect(effect, host);
                }
                WindowEvent::Resized(size) => host.resize(window_id, size),
                WindowEvent::RedrawRequested => host.redraw(window_id),
                _ => (),
            },
            _ => (),
        }
    }

    fn switch_effect(&mut self, effect: Effect, host: &mut GpuHost) {
        let locator = match self.assets.rain_surface(&SurfaceParams::windowed(effect)) {
            Ok(locator) => locator,
            Err(err) => {
                log::error!("Cannot switch to {}: {}", effect, err);
                return;
            }
        };

        if let Err(err) = host.load(Arc::clone(&self.window), &locator) {
            log::error!("Failed to load {}: {}", locator, err);
            return;
        }

        log::info!("Switched effect {} -> {}", self.effect, effect);
        self.effect = effect;
        self.window.set_title(&window_title(effect));
    }
}

/// The fixed-size settings window.
struct ConfigSession {
    window: Arc<Window>,
    proxy: EventLoopProxy<ShellEvent>,
    effect: Effect,
    modifiers: ModifiersState,
}

impl ConfigSession {
    fn handle(
        &mut self,
        event: Event<ShellEvent>,
        elwt: &EventLoopWindowTarget<ShellEvent>,
        host: &mut GpuHost,
    ) {
        elwt.set_control_flow(ControlFlow::Wait);

        match event {
            Event::UserEvent(ShellEvent::SurfaceReady(window_id)) if window_id == self.window.id() => {
                self.window.set_visible(true);
            }
            Event::UserEvent(ShellEvent::SaveRequested(payload)) => self.save(&payload),
            Event::WindowEvent { event, window_id } if window_id == self.window.id() => match event {
                WindowEvent::CloseRequested => elwt.exit(),
                WindowEvent::ModifiersChanged(modifiers) => self.modifiers = modifiers.state(),
                WindowEvent::KeyboardInput {
                    event:
                        KeyEvent {
                            physical_key: PhysicalKey::Code(KeyCode::KeyS),
                            state: ElementState::Pressed,
                            repeat: false,
                            ..
                        },
                    ..
                } if self.modifiers.control_key() || self.modifiers.super_key() => {
                    self.request_save();
                }
                WindowEvent::Resized(size) => host.resize(window_id, size),
                WindowEvent::RedrawRequested => host.redraw(window_id),
                _ => (),
            },
            _ => (),
        }
    }

    fn request_save(&self) {
        let payload = match SavedSettings::new(self.effect).to_json() {
            Ok(payload) => payload,
            Err(err) => {
                log::error!("Failed to encode settings: {}", err);
                return;
            }
        };
        if self.proxy.send_event(ShellEvent::SaveRequested(payload)).is_err() {
            log::error!("Event loop closed before settings could be saved");
        }
    }

    fn save(&mut self, payload: &str) {
        match SavedSettings::from_json(payload) {
            Ok(settings) => {
                log::info!("Settings save requested: {:?}", settings);
                self.effect = settings.effect;
                dialog::acknowledge_saved(&self.window);
            }
            Err(err) => log::error!("Ignoring save request: {}", err),
        }
    }
}
