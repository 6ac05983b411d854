//! Interactive viewer binary for the voxen rendering toolkit.

use std::{path::Path, sync::Arc};

use glam::Vec3;
use voxen::{
    assets,
    error::VoxenError,
    gpu::{
        face_buffer::{FaceMesh, FaceVertex, IndexedFaceBatch},
        render_context::RenderContext,
        shader_composer::ShaderComposer,
        texture::{AtlasTexture, DepthTexture},
    },
    options::Options,
    renderer::{
        camera::Camera,
        chunk::ChunkRenderer,
        visibility::{self, VisibilityCuller},
    },
    text,
    util::frame_timing::{FpsCounter, FrameTiming},
};
use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

const OPTIONS_FILE: &str = "voxen.toml";

// Ground patch half-extent in blocks.
const GROUND_EXTENT: i32 = 24;
const ORBIT_RADIUS: f32 = 36.0;
const ORBIT_HEIGHT: f32 = 20.0;
// Radians per second.
const ORBIT_SPEED: f32 = 0.25;

// HUD width the startup notes wrap to, in font pixels.
const HELP_WIDTH: u32 = 360;
const HELP_TEXT: &str = "The camera orbits the ground patch on its own; \
there are no controls besides closing the window. Settings are read from \
voxen.toml in the working directory and missing fields fall back to \
engine defaults. Set VOXEN_ASSETS to load shaders and textures from \
somewhere else.";

const GRASS_TILE: u32 = 0;
const DIRT_TILE: u32 = 1;

struct ViewerState {
    context: RenderContext,
    depth: DepthTexture,
    atlas: AtlasTexture,
    chunk_renderer: ChunkRenderer,
    culler: VisibilityCuller,
    ground: FaceMesh,
    camera: Camera,
    origins: Vec<[i32; 4]>,
    chunk_radius: i32,
    chunk_size: u32,
    culling_in_flight: bool,
    orbit_angle: f32,
    last_frame: Instant,
    fps: FpsCounter,
    timing: FrameTiming,
    title_fps: u32,
}

impl ViewerState {
    async fn new(
        window: Arc<Window>,
        size: (u32, u32),
        options: &Options,
    ) -> Result<Self, VoxenError> {
        let mut context = RenderContext::new(window, size).await?;
        if !options.display.vsync {
            context.set_vsync(false);
        }
        let depth = DepthTexture::new(&context.device, size.0, size.1);

        let mut composer = ShaderComposer::new()?;
        let atlas = load_atlas(&context, options)?;
        let chunk_renderer = ChunkRenderer::new(&context, &mut composer)?;

        let chunk_radius = options.world.chunk_radius as i32;
        let origins = visibility::grid_origins(0, 0, chunk_radius);
        let culler =
            VisibilityCuller::new(&context, &mut composer, origins.len() as u32)?;

        let ground = ground_mesh(&context.device, &atlas, GROUND_EXTENT);
        let mut camera = Camera::new(Vec3::new(ORBIT_RADIUS, ORBIT_HEIGHT, 0.0));
        camera.pitch = -(ORBIT_HEIGHT / ORBIT_RADIUS).atan();

        // vsync paces the loop by itself; the limiter covers uncapped mode.
        let target_fps = if options.display.vsync {
            0
        } else {
            options.display.fps_limit
        };

        Ok(Self {
            context,
            depth,
            atlas,
            chunk_renderer,
            culler,
            ground,
            camera,
            origins,
            chunk_radius,
            chunk_size: options.world.chunk_size,
            culling_in_flight: false,
            orbit_angle: 0.0,
            last_frame: Instant::now(),
            fps: FpsCounter::new(),
            timing: FrameTiming::new(target_fps),
            title_fps: 0,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.depth.resize(&self.context.device, width, height);
    }

    fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.orbit_angle += dt * ORBIT_SPEED;
        let (sin, cos) = self.orbit_angle.sin_cos();
        self.camera.eye =
            Vec3::new(cos * ORBIT_RADIUS, ORBIT_HEIGHT, sin * ORBIT_RADIUS);
        self.camera.yaw = self.orbit_angle + std::f32::consts::PI;

        self.chunk_renderer.update_camera(
            &self.context.queue,
            &self.camera,
            self.context.aspect_ratio(),
        );

        let frame = self.context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self.context.create_encoder();

        // The culling staging buffer cannot be written while a map is
        // pending, so new dispatches wait for the previous readback.
        let encoded_culling = if self.culling_in_flight {
            false
        } else {
            let eye = self.camera.eye;
            let eye_chunk = [
                visibility::chunk_coord(eye.x, self.chunk_size),
                visibility::chunk_coord(eye.y, self.chunk_size),
                visibility::chunk_coord(eye.z, self.chunk_size),
            ];
            self.culler.encode(
                &mut encoder,
                &self.context.queue,
                eye_chunk,
                self.chunk_radius,
                &self.origins,
            );
            true
        };

        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Viewer Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 0.53,
                                g: 0.81,
                                b: 0.92,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: Some(
                        wgpu::RenderPassDepthStencilAttachment {
                            view: &self.depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(1.0),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        },
                    ),
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            self.chunk_renderer.record(&mut pass, &self.atlas, &self.ground);
        }

        self.context.submit(encoder);
        frame.present();

        if encoded_culling {
            self.culler.begin_readback();
            self.culling_in_flight = true;
        } else {
            match self.culler.try_flags(&self.context.device) {
                Ok(Some(flags)) => {
                    self.culling_in_flight = false;
                    let visible: u32 = flags.iter().sum();
                    log::debug!("{visible} of {} chunks visible", flags.len());
                }
                Ok(None) => {}
                Err(e) => {
                    self.culling_in_flight = false;
                    log::warn!("visibility readback failed: {e}");
                }
            }
        }

        self.fps.tick();
        let fps = self.fps.fps();
        if fps != self.title_fps {
            window.set_title(&format!("voxen | {fps} fps"));
            self.title_fps = fps;
        }

        Ok(())
    }
}

struct ViewerApp {
    options: Options,
    window: Option<Arc<Window>>,
    state: Option<ViewerState>,
    fatal: Option<VoxenError>,
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title("voxen")
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.options.display.width,
                self.options.display.height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fatal =
                    Some(VoxenError::Viewer(format!("window creation: {e}")));
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let state = pollster::block_on(ViewerState::new(
            window.clone(),
            (size.width, size.height),
            &self.options,
        ));
        match state {
            Ok(state) => {
                window.request_redraw();
                self.window = Some(window);
                self.state = Some(state);
            }
            Err(e) => {
                self.fatal = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(state) = &mut self.state {
                    state.resize(size.width, size.height);
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(window), Some(state)) =
                    (&self.window, &mut self.state)
                {
                    if state.timing.should_render() {
                        match state.render(window) {
                            Ok(()) => {}
                            Err(
                                wgpu::SurfaceError::Outdated
                                | wgpu::SurfaceError::Lost,
                            ) => {
                                let inner = window.inner_size();
                                state.resize(inner.width, inner.height);
                            }
                            Err(e) => {
                                log::error!("render error: {e:?}");
                            }
                        }
                        state.timing.end_frame();
                    }
                    window.request_redraw();
                }
            }

            _ => (),
        }
    }
}

fn load_options() -> Options {
    let path = Path::new(OPTIONS_FILE);
    if !path.exists() {
        return Options::default();
    }
    match Options::load(path) {
        Ok(options) => options,
        Err(e) => {
            log::warn!("ignoring {OPTIONS_FILE}: {e}");
            Options::default()
        }
    }
}

fn load_atlas(
    context: &RenderContext,
    options: &Options,
) -> Result<AtlasTexture, VoxenError> {
    let path = assets::texture_path(&options.atlas.path);
    if path.exists() {
        AtlasTexture::from_png(
            &context.device,
            &context.queue,
            &path,
            options.atlas.tile_size,
        )
    } else {
        log::info!(
            "no atlas at {}, using a generated checkerboard",
            path.display()
        );
        Ok(checkerboard_atlas(&context.device, &context.queue))
    }
}

fn checkerboard_atlas(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> AtlasTexture {
    const TILE: u32 = 16;
    const COLORS: [[u8; 3]; 4] = [
        [106, 170, 64],  // grass
        [134, 96, 67],   // dirt
        [125, 125, 125], // stone
        [218, 210, 158], // sand
    ];
    let size = TILE * 2;
    let mut img = image::RgbaImage::new(size, size);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let tile = (y / TILE) * 2 + x / TILE;
        let [r, g, b] = COLORS[tile as usize];
        let shade = if (x + y) % 2 == 0 { 0 } else { 12 };
        *pixel = image::Rgba([
            r.saturating_sub(shade),
            g.saturating_sub(shade),
            b.saturating_sub(shade),
            255,
        ]);
    }
    AtlasTexture::from_image(device, queue, &img, TILE)
}

fn ground_mesh(
    device: &wgpu::Device,
    atlas: &AtlasTexture,
    extent: i32,
) -> FaceMesh {
    let side = (extent * 2 + 1) as usize;
    let mut batch = IndexedFaceBatch::with_faces(side * side);
    for x in -extent..=extent {
        for z in -extent..=extent {
            let tile = if (x + z).rem_euclid(2) == 0 {
                GRASS_TILE
            } else {
                DIRT_TILE
            };
            push_top_face(&mut batch, atlas, x as f32, z as f32, tile);
        }
    }
    batch.upload(device, "Ground Mesh")
}

fn push_top_face(
    batch: &mut IndexedFaceBatch<FaceVertex>,
    atlas: &AtlasTexture,
    x: f32,
    z: f32,
    tile: u32,
) {
    // Counter-clockwise when viewed from above (+Y).
    let corners = [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]];
    let face = corners.map(|[cx, cz]| FaceVertex {
        position: [x + cx, 0.0, z + cz],
        normal: [0.0, 1.0, 0.0],
        uv: atlas.tile_uv(tile, [cx, cz]),
        ao: 1.0,
        light: 1.0,
    });
    batch.push_face(face);
}

fn main() {
    env_logger::init();

    let options = load_options();

    let (help, lines) = text::wrap(HELP_TEXT, HELP_WIDTH);
    log::info!("viewer notes ({lines} lines):");
    for line in help.lines() {
        log::info!("  {line}");
    }

    let mut app = ViewerApp {
        options,
        window: None,
        state: None,
        fatal: None,
    };
    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);
    event_loop.run_app(&mut app).expect("Event loop error");

    if let Some(e) = app.fatal {
        log::error!("{e}");
        std::process::exit(1);
    }
}
