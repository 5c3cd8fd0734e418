//! The demo application shell: a window, an orbit camera and one particle
//! system. Thin glue around the library - everything interesting happens in
//! [`crate::system`].

use std::sync::Arc;

use glam::Vec3;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::camera::OrbitCamera;
use crate::error::Error;
use crate::gpu::{self, GpuContext};
use crate::profile::ProfileKind;
use crate::random::RandomTable;
use crate::settings::Settings;
use crate::system::{ParticleSystem, SystemDesc};
use crate::textures::SpriteConfig;
use crate::time::Time;

/// Where the emitter sits in the demo scene.
const EMIT_POSITION: Vec3 = Vec3::new(0.0, 1.0, 120.0);

struct Scene {
    gpu: GpuContext,
    system: ParticleSystem,
    camera: OrbitCamera,
    time: Time,
    // Shared read-only resources the scene owns on behalf of the system.
    _sprite_texture: wgpu::Texture,
    _random_texture: wgpu::Texture,
}

impl Scene {
    async fn new(window: Arc<Window>, settings: &Settings) -> Result<Self, Error> {
        let gpu = GpuContext::new(window).await?;

        let sprite = match settings.mode {
            ProfileKind::Smoke => SpriteConfig::radial_puff(128),
            ProfileKind::Rain => SpriteConfig::rain_streak(16, 128),
        };
        let sprite_texture = sprite.create_texture(&gpu.device, &gpu.queue);
        let sprite_view = sprite_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sprite_sampler = sprite.create_sampler(&gpu.device);

        let random_table = RandomTable::new(RandomTable::DEFAULT_LEN, 0x5EED);
        let random_texture = random_table.create_texture(&gpu.device, &gpu.queue);
        let random_view = random_texture.create_view(&wgpu::TextureViewDescriptor::default());

        let system = ParticleSystem::new(
            &gpu.device,
            &SystemDesc {
                max_particles: settings.max_particles,
                emit_position: EMIT_POSITION,
                profile: settings.mode.profile(),
                color_format: gpu.config.format,
                depth_format: gpu::DEPTH_FORMAT,
            },
            &random_view,
            &sprite_view,
            &sprite_sampler,
        )?;

        Ok(Self {
            gpu,
            system,
            camera: OrbitCamera::looking_at(EMIT_POSITION),
            time: Time::new(),
            _sprite_texture: sprite_texture,
            _random_texture: random_texture,
        })
    }

    fn frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        let (_, dt) = self.time.update();

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame encoder"),
            });

        self.system.update(&self.gpu.queue, &mut encoder, dt);

        let output = self.gpu.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("particle render"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let frame = self.camera.frame(self.gpu.aspect());
            self.system.draw(&self.gpu.queue, &mut rpass, &frame);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// The winit application driving one [`Scene`].
pub struct App {
    settings: Settings,
    window: Option<Arc<Window>>,
    scene: Option<Scene>,
    mouse_pressed: bool,
    last_mouse_pos: Option<(f64, f64)>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            window: None,
            scene: None,
            mouse_pressed: false,
            last_mouse_pos: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("embers")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("could not create window: {err}");
                event_loop.exit();
                return;
            }
        };
        self.window = Some(window.clone());

        match pollster::block_on(Scene::new(window, &self.settings)) {
            Ok(scene) => self.scene = Some(scene),
            Err(err) => {
                // Without a particle system there is nothing to show;
                // leave the decision to keep running to whoever embeds
                // the library instead.
                log::error!("initialization failed: {err}");
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let Some(scene) = &mut self.scene {
                    scene.gpu.resize(size);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::KeyR)
                {
                    if let Some(scene) = &mut self.scene {
                        log::info!("reset requested");
                        scene.system.reset();
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if button == MouseButton::Left {
                    self.mouse_pressed = state == ElementState::Pressed;
                    if !self.mouse_pressed {
                        self.last_mouse_pos = None;
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.mouse_pressed {
                    if let (Some((last_x, last_y)), Some(scene)) =
                        (self.last_mouse_pos, self.scene.as_mut())
                    {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        scene.camera.orbit(dx, dy);
                    }
                    self.last_mouse_pos = Some((position.x, position.y));
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                if let Some(scene) = &mut self.scene {
                    scene.camera.zoom(lines);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Some(scene) = &mut self.scene {
                    match scene.frame() {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = winit::dpi::PhysicalSize {
                                width: scene.gpu.config.width,
                                height: scene.gpu.config.height,
                            };
                            scene.gpu.resize(size);
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("surface out of memory");
                            event_loop.exit();
                        }
                        Err(err) => log::warn!("frame skipped: {err:?}"),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}
