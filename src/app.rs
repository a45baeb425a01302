use anyhow::Context;
use std::{sync::Arc, time::Instant};
use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes},
};

use crate::{
    config::SceneConfig,
    gfx::{
        camera::{CameraController, CameraManager, Camera},
        rendering::RenderEngine,
    },
};

pub struct TidewaterApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    camera_manager: Option<CameraManager>,
    started: Instant,
    last_frame: Instant,
    /// Set when window or GPU setup fails; returned from [`TidewaterApp::run`]
    startup_error: Option<anyhow::Error>,
}

impl TidewaterApp {
    pub fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let event_loop = EventLoop::new().context("failed to create event loop")?;
        let now = Instant::now();

        Ok(Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                config,
                window: None,
                render_engine: None,
                camera_manager: None,
                started: now,
                last_frame: now,
                startup_error: None,
            },
        })
    }

    /// Run the application (consumes self and starts the event loop)
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = self
            .event_loop
            .take()
            .context("event loop already consumed")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .context("event loop terminated with an error")?;

        match self.app_state.startup_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(self.config.window_title.clone())
                    .with_inner_size(LogicalSize::new(self.config.width, self.config.height)),
            )
            .context("failed to create window")?;
        let window_handle = Arc::new(window);
        self.window = Some(window_handle.clone());

        let (width, height): (u32, u32) = window_handle.inner_size().into();

        let window_clone = window_handle.clone();
        let config = &self.config;
        let renderer = pollster::block_on(async move {
            RenderEngine::new(window_clone, width, height, config).await
        })?;

        let camera = Camera::looking_at(
            width as f32,
            height as f32,
            self.config.camera_position,
            self.config.camera_target,
        )
        .with_projection(self.config.fov_degrees, self.config.near, self.config.far);
        self.camera_manager = Some(CameraManager::new(camera, CameraController::new()));
        self.render_engine = Some(renderer);

        let now = Instant::now();
        self.started = now;
        self.last_frame = now;
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(render_engine), Some(camera_manager), Some(window)) = (
            self.render_engine.as_mut(),
            self.camera_manager.as_mut(),
            self.window.as_ref(),
        ) else {
            return;
        };

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        camera_manager.update(&**window, dt);
        render_engine.update(
            camera_manager.view_matrix(),
            camera_manager.projection_matrix(),
            now.duration_since(self.started).as_secs_f32(),
        );

        match render_engine.render_frame() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                render_engine.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => log::warn!("Skipping frame: {}", e),
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.startup_error.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("{:#}", e);
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let Some(camera_manager) = self.camera_manager.as_mut() {
            camera_manager.process_event(&event);
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                if let Some(camera_manager) = self.camera_manager.as_mut() {
                    camera_manager.resize(width, height);
                }
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => (),
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
