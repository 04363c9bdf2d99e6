//! Windowed host for the engine: a winit window with a softbuffer
//! surface standing in for the wallpaper surface, translating window
//! events into the lifecycle events a real host would deliver.
//!
//! The worker renders into a shared frame and requests redraws; the
//! event loop only ever copies the latest published frame out.

use softbuffer::{Context, Surface};

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{self, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{Key, NamedKey},
    platform::{
        modifier_supplement::KeyEventExtModifierSupplement, wayland::WindowAttributesExtWayland,
    },
    window::{Theme, Window, WindowId},
};

use std::{
    num::NonZeroU32,
    sync::{
        atomic::{AtomicBool, AtomicU32, Ordering::Relaxed},
        Arc, Mutex,
    },
};

use anyhow::Context as _;

use crate::config::Config;
use crate::engine::{Engine, ThemeSource};
use crate::events::Event;
use crate::graphics::Argb;
use crate::palette::Palette;
use crate::surface::FrameSink;
use crate::worker::WallWorker;

type WindowSurface = Surface<Arc<Window>, Arc<Window>>;

/// Accents the `a` key cycles through.
const ACCENTS: &[Argb] = &[
    0xFF_33_B5_E5, // holo blue
    0xFF_E8_71_0A, // orange
    0xFF_7C_B3_42, // green
    0xFF_AB_47_BC, // purple
];

const ZOOM_KEY_STEP: f32 = 0.1;

/// Theme state shared between the event loop (writer) and the engine
/// (reader, via `ThemeSource`).
pub struct SharedTheme {
    night: AtomicBool,
    accent: AtomicU32,
}

impl SharedTheme {
    fn new(night: bool, accent: Argb) -> Arc<Self> {
        Arc::new(Self {
            night: AtomicBool::new(night),
            accent: AtomicU32::new(accent),
        })
    }

    fn set_night(&self, night: bool) {
        self.night.store(night, Relaxed);
    }

    fn set_accent(&self, accent: Argb) {
        self.accent.store(accent, Relaxed);
    }
}

impl ThemeSource for Arc<SharedTheme> {
    fn is_night_mode(&self) -> bool {
        self.night.load(Relaxed)
    }

    fn accent_color(&self) -> Argb {
        self.accent.load(Relaxed)
    }
}

#[derive(Default)]
struct SharedFrame {
    pixels: Vec<Argb>,
    width: usize,
    height: usize,
}

/// `FrameSink` backed by the shared frame. The worker draws into a
/// staging buffer; submission publishes it and pokes the event loop.
struct WindowSink {
    staging: Vec<Argb>,
    width: usize,
    height: usize,
    shared: Arc<Mutex<SharedFrame>>,
    window: Arc<Window>,
}

impl FrameSink for WindowSink {
    fn acquire(&mut self, width: usize, height: usize) -> &mut [Argb] {
        self.width = width;
        self.height = height;
        self.staging.resize(width * height, 0);
        &mut self.staging
    }

    fn submit(&mut self) -> anyhow::Result<()> {
        {
            let mut shared = self
                .shared
                .lock()
                .map_err(|_| anyhow::anyhow!("shared frame poisoned"))?;
            shared.width = self.width;
            shared.height = self.height;
            shared.pixels.clone_from(&self.staging);
        }

        self.window.request_redraw();
        Ok(())
    }
}

struct WindowState {
    cfg: Config,
    window: Option<Arc<Window>>,
    surface: Option<WindowSurface>,
    worker: Option<WallWorker>,
    shared: Arc<Mutex<SharedFrame>>,
    theme: Arc<SharedTheme>,
    final_buffer_size: PhysicalSize<u32>,
    cursor: (i32, i32),
    zoom: f32,
    accent_index: usize,
}

impl WindowState {
    fn new(cfg: Config) -> Self {
        let theme = SharedTheme::new(cfg.night_mode, cfg.accent);
        Self {
            cfg,
            window: None,
            surface: None,
            worker: None,
            shared: Arc::new(Mutex::new(SharedFrame::default())),
            theme,
            final_buffer_size: PhysicalSize::new(0, 0),
            cursor: (0, 0),
            zoom: 0.0,
            accent_index: 0,
        }
    }

    fn post(&self, event: Event) {
        if let Some(worker) = self.worker.as_ref() {
            worker.post(event);
        }
    }

    fn resize_surface(surface: &mut WindowSurface, w: u32, h: u32) {
        surface
            .resize(
                NonZeroU32::new(w).expect("Surface width is zero"),
                NonZeroU32::new(h).expect("Surface height is zero"),
            )
            .expect("Failed to resize surface buffer");
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(worker) = self.worker.take() {
            worker.shutdown();
        }
        event_loop.exit();
    }
}

impl ApplicationHandler for WindowState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let win_size = PhysicalSize::<u32>::new(self.cfg.width, self.cfg.height);

        let window_attributes = Window::default_attributes()
            .with_title("bubblewall")
            .with_inner_size(win_size)
            .with_resizable(true)
            .with_name("bubblewall", "bubblewall");

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("Unable to create window"),
        );

        if let Some(theme) = window.theme() {
            self.theme.set_night(theme == Theme::Dark);
        }

        let size = window.inner_size();
        self.final_buffer_size = size;

        self.surface = {
            let context = Context::new(window.clone()).unwrap();
            let mut surface = Surface::new(&context, window.clone()).unwrap();
            Self::resize_surface(&mut surface, size.width.max(1), size.height.max(1));
            Some(surface)
        };

        let sink = WindowSink {
            staging: Vec::new(),
            width: 0,
            height: 0,
            shared: Arc::clone(&self.shared),
            window: window.clone(),
        };

        // The palette was validated before the event loop started.
        let engine = Engine::new(
            self.cfg.clone(),
            Box::new(sink),
            Box::new(Arc::clone(&self.theme)),
        )
        .expect("engine construction failed");

        let worker = WallWorker::spawn(engine);
        worker.post(Event::SurfaceChanged(size.width, size.height));

        self.worker = Some(worker);
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.exit(event_loop),

            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if width == 0 || height == 0 {
                    return;
                }

                let Some(surface) = self.surface.as_mut() else {
                    return;
                };

                self.final_buffer_size = PhysicalSize::new(width, height);
                Self::resize_surface(surface, width, height);

                self.post(Event::SurfaceChanged(width, height));
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as i32, position.y as i32);
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if button == event::MouseButton::Left {
                    match state {
                        ElementState::Pressed => {
                            self.post(Event::TouchDown(self.cursor.0, self.cursor.1))
                        }
                        ElementState::Released => self.post(Event::TouchUp),
                    }
                }
            }

            WindowEvent::ThemeChanged(theme) => {
                self.theme.set_night(theme == Theme::Dark);
                self.post(Event::ThemeChanged);
            }

            WindowEvent::Occluded(hidden) => {
                self.post(Event::VisibilityChanged(!hidden));
            }

            WindowEvent::Focused(true) => {
                // Regaining focus doubles as the unlock signal.
                self.post(Event::Unlocked);
            }

            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                match event.key_without_modifiers().as_ref() {
                    Key::Named(NamedKey::Escape) => self.exit(event_loop),

                    Key::Character("u") => self.post(Event::Unlocked),

                    Key::Character("l") => self.post(Event::ScreenOff),

                    Key::Character("n") => {
                        self.theme.set_night(!self.theme.is_night_mode());
                        self.post(Event::ThemeChanged);
                    }

                    Key::Character("a") => {
                        self.accent_index = (self.accent_index + 1) % ACCENTS.len();
                        self.theme.set_accent(ACCENTS[self.accent_index]);
                        self.post(Event::AccentColorChanged);
                    }

                    Key::Character("=") => {
                        self.zoom = (self.zoom + ZOOM_KEY_STEP).clamp(0.0, 1.0);
                        self.post(Event::ZoomChanged(self.zoom));
                    }

                    Key::Character("-") => {
                        self.zoom = (self.zoom - ZOOM_KEY_STEP).clamp(0.0, 1.0);
                        self.post(Event::ZoomChanged(self.zoom));
                    }

                    _ => {}
                }
            }

            WindowEvent::RedrawRequested => {
                let Some(window) = self.window.as_ref() else {
                    return;
                };

                let Some(Ok(mut buffer)) = self.surface.as_mut().map(|s| s.buffer_mut()) else {
                    return;
                };

                {
                    let Ok(shared) = self.shared.lock() else {
                        return;
                    };

                    // A stale frame from before a resize is skipped; the
                    // worker's next submission requests another redraw.
                    if shared.width != self.final_buffer_size.width as usize
                        || shared.height != self.final_buffer_size.height as usize
                        || shared.pixels.len() != buffer.len()
                    {
                        return;
                    }

                    buffer.copy_from_slice(&shared.pixels);
                }

                window.pre_present_notify();
                if let Err(e) = buffer.present() {
                    log::warn!("failed to present frame: {e}");
                }
            }

            _ => {}
        }
    }
}

pub fn winit_main(cfg: Config) -> anyhow::Result<()> {
    Palette::from_hex(&cfg.palette).context("invalid palette")?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut state = WindowState::new(cfg);
    event_loop.run_app(&mut state)?;

    if let Some(worker) = state.worker.take() {
        worker.shutdown();
    }

    Ok(())
}
