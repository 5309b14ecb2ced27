//! Preview window: winit event loop presenting through softbuffer (made by FontLab https://www.fontlab.com/)

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use log::debug;
use softbuffer::{Context, Surface};
use tiny_skia::PixmapMut;
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowId};

use glyphfind_core::events::{QuitAction, QuitButton, RepaintGate};
use glyphfind_core::preview::{PreviewModel, PreviewPainter};

/// Open the window and block until the user quits.
pub fn run(model: PreviewModel, width: u32, height: u32) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = PreviewApp::new(model, PhysicalSize::new(width, height));
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct ActiveWindow {
    // The surface must be dropped before the window.
    surface: Surface<Arc<Window>, Arc<Window>>,
    window: Arc<Window>,
}

struct PreviewApp {
    painter: PreviewPainter,
    initial_size: PhysicalSize<u32>,
    state: Option<ActiveWindow>,
    gate: RepaintGate,
    quit: QuitButton,
    cursor: PhysicalPosition<f64>,
    error: Option<anyhow::Error>,
}

impl PreviewApp {
    fn new(model: PreviewModel, initial_size: PhysicalSize<u32>) -> Self {
        Self {
            painter: PreviewPainter::new(model),
            initial_size,
            state: None,
            gate: RepaintGate::default(),
            quit: QuitButton::default(),
            cursor: PhysicalPosition::new(0.0, 0.0),
            error: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        self.error = Some(err);
        event_loop.exit();
    }

    fn open_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attr = Window::default_attributes()
            .with_inner_size(self.initial_size)
            .with_resizable(true)
            .with_title(self.painter.model().window_title());
        let window = Arc::new(event_loop.create_window(attr)?);

        let context = Context::new(Arc::clone(&window)).map_err(|err| anyhow!("{err}"))?;
        let surface = Surface::new(&context, Arc::clone(&window)).map_err(|err| anyhow!("{err}"))?;

        debug!("exposing window");
        self.state = Some(ActiveWindow { surface, window });
        self.resize_surface(self.initial_size)?;
        Ok(())
    }

    fn resize_surface(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        let width = NonZeroU32::new(size.width);
        let height = NonZeroU32::new(size.height);
        if let (Some(width), Some(height)) = (width, height) {
            state
                .surface
                .resize(width, height)
                .map_err(|err| anyhow!("{err}"))?;
        }
        self.gate.mark_dirty();
        Ok(())
    }

    /// Paint when dirty and the last paint is old enough.
    fn maybe_paint(&mut self) -> Result<()> {
        let now = Instant::now();
        debug!("maybe paint: dirty {}", self.gate.is_dirty());
        if !self.gate.should_paint(now) {
            return Ok(());
        }
        self.paint()?;
        self.gate.painted(now);
        Ok(())
    }

    fn paint(&mut self) -> Result<()> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        let size = state.window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }

        let mut buffer = state.surface.buffer_mut().map_err(|err| anyhow!("{err}"))?;
        let pixmap = PixmapMut::from_bytes(
            bytemuck::cast_slice_mut(&mut buffer),
            size.width,
            size.height,
        )
        .ok_or_else(|| anyhow!("surface does not match window size"))?;

        let chrome = self.painter.paint(pixmap)?;
        self.quit.set_bounds(chrome.quit_button);

        // tiny-skia writes RGBA bytes, softbuffer expects 0RGB words.
        for pixel in buffer.iter_mut() {
            *pixel = *pixel & 0xFF00_FF00
                | ((0x0000_00FF & *pixel) << 16)
                | ((0x00FF_0000 & *pixel) >> 16);
        }
        buffer.present().map_err(|err| anyhow!("{err}"))?;
        Ok(())
    }

    fn schedule_wake(&self, event_loop: &ActiveEventLoop) {
        let deadline = self.gate.next_wake(Instant::now());
        event_loop.set_control_flow(ControlFlow::WaitUntil(deadline));
    }

    fn handle_click(&mut self, event_loop: &ActiveEventLoop, state: ElementState) {
        let (x, y) = (self.cursor.x as i32, self.cursor.y as i32);
        let action = match state {
            ElementState::Pressed => self.quit.press(x, y),
            ElementState::Released => self.quit.release(x, y),
        };
        if action == QuitAction::Quit {
            event_loop.exit();
        }
    }
}

impl ApplicationHandler for PreviewApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        if let Err(err) = self.open_window(event_loop) {
            self.fail(event_loop, err);
            return;
        }
        self.schedule_wake(event_loop);
    }

    fn new_events(&mut self, event_loop: &ActiveEventLoop, cause: StartCause) {
        if let StartCause::ResumeTimeReached { .. } = cause {
            debug!("timeout");
            if let Err(err) = self.maybe_paint() {
                self.fail(event_loop, err);
                return;
            }
            self.schedule_wake(event_loop);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        match &self.state {
            Some(state) if state.window.id() == window_id => {}
            _ => return,
        }

        let result = match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
                Ok(())
            }
            WindowEvent::Resized(size) => self.resize_surface(size),
            WindowEvent::RedrawRequested => {
                debug!("expose");
                self.gate.mark_dirty();
                self.maybe_paint()
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = position;
                Ok(())
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.handle_click(event_loop, state);
                Ok(())
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                let quits = match &logical_key {
                    Key::Named(NamedKey::Escape) => true,
                    Key::Character(c) => c.as_str() == "q",
                    _ => false,
                };
                if quits {
                    event_loop.exit();
                }
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(err) = result {
            self.fail(event_loop, err);
        }
    }
}
