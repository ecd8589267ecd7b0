//! Window + event loop runtime
//!
//! One window, one GPU context, one `App`. The app is built once the window
//! exists (winit only hands out windows from `resumed`), and any failure while
//! building it ends the loop and is handed back to `main`.

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use super::clock::{FrameClock, FrameTime};
use crate::input::KeyboardState;
use crate::renderer::gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};

/// Returned from `App::update`
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// A runnable lesson
pub trait App {
    /// Per-frame update, before rendering
    fn update(&mut self, input: &KeyboardState, time: FrameTime) -> AppControl;

    /// Called after the surface was resized
    fn resize(&mut self, gpu: &Gpu) {
        let _ = gpu;
    }

    /// Record this frame's draw commands
    fn render(&mut self, gpu: &Gpu, frame: &mut GpuFrame);
}

/// Window configuration
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub size: PhysicalSize<u32>,
    pub vsync: bool,
}

impl RuntimeConfig {
    pub fn new(title: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            title: title.into(),
            size: PhysicalSize::new(width, height),
            vsync: true,
        }
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }
}

/// Open the window, build the app with `build`, and run until closed
pub fn run<A, F>(config: RuntimeConfig, build: F) -> Result<()>
where
    A: App,
    F: FnOnce(&Gpu) -> Result<A>,
{
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut runner = Runner {
        config,
        build: Some(build),
        active: None,
        error: None,
    };
    event_loop
        .run_app(&mut runner)
        .context("event loop terminated with error")?;

    match runner.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct Active<A> {
    gpu: Gpu,
    app: A,
    keyboard: KeyboardState,
    clock: FrameClock,
}

struct Runner<A, F> {
    config: RuntimeConfig,
    build: Option<F>,
    active: Option<Active<A>>,
    /// First fatal error; returned from `run`
    error: Option<anyhow::Error>,
}

impl<A, F> Runner<A, F>
where
    A: App,
    F: FnOnce(&Gpu) -> Result<A>,
{
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<Active<A>> {
        let build = self
            .build
            .take()
            .ok_or_else(|| anyhow!("application was already built"))?;

        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.size)
            .with_resizable(true);
        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let gpu = pollster::block_on(Gpu::new(window, &GpuInit::with_vsync(self.config.vsync)))?;
        let app = build(&gpu)?;
        log::info!("{} started", self.config.title);

        Ok(Active {
            gpu,
            app,
            keyboard: KeyboardState::new(),
            clock: FrameClock::new(),
        })
    }
}

impl<A, F> ApplicationHandler for Runner<A, F>
where
    A: App,
    F: FnOnce(&Gpu) -> Result<A>,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let Some(active) = &mut self.active {
            active.clock.reset();
            return;
        }

        match self.init(event_loop) {
            Ok(active) => {
                active.gpu.window().request_redraw();
                self.active = Some(active);
            }
            Err(e) => {
                log::error!("Initialization failed: {e:#}");
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window closed");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                active.gpu.resize(size);
                active.app.resize(&active.gpu);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                let size = active.gpu.window().inner_size();
                active.gpu.resize(size);
                active.app.resize(&active.gpu);
            }
            WindowEvent::Focused(false) => active.keyboard.clear(),
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    if code == KeyCode::Escape && event.state == ElementState::Pressed {
                        event_loop.exit();
                        return;
                    }
                    active.keyboard.handle_key(code, event.state);
                }
            }
            WindowEvent::RedrawRequested => {
                let time = active.clock.tick();
                let control = active.app.update(&active.keyboard, time);
                active.keyboard.end_frame();
                if control == AppControl::Exit {
                    event_loop.exit();
                    return;
                }

                if active.gpu.is_minimized() {
                    return;
                }

                match active.gpu.begin_frame() {
                    Ok(mut frame) => {
                        active.app.render(&active.gpu, &mut frame);
                        active.gpu.submit(frame);
                    }
                    Err(err) => {
                        let reason = err.to_string();
                        match active.gpu.handle_surface_error(err) {
                            SurfaceErrorAction::Fatal => {
                                self.error = Some(anyhow!("surface error: {reason}"));
                                event_loop.exit();
                            }
                            action => log::debug!("Surface error {reason}: {action:?}"),
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(active) = &self.active {
            active.gpu.window().request_redraw();
        }
    }
}
