//! Castle Renderer - Main Entry Point
//!
//! Runs the castle through the frame-resource pipeline without a window. A
//! background thread plays the GPU, retiring one submitted frame every
//! `gpu_latency_ms`, and a short input script orbits and zooms the camera and
//! holds the wireframe key for a while.
//!
//! Usage: `castle [config.toml]`

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use castle_core::{GameTimer, GpuTimeline, ManualTimeline, RenderConfig};
use castle_platform::{InputState, KeyCode, MouseButton, OrbitDrag};
use castle_renderer::{
    CbvHeap, FrameRing, FrameUpdater, PipelineMode, SceneContext, Viewport, build_draw_list,
};
use castle_scene::build_castle;

/// Background thread retiring submitted fences in order.
struct GpuSimulator {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl GpuSimulator {
    fn spawn(timeline: Arc<ManualTimeline>, latency: Duration) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = stop.clone();

        let handle = thread::spawn(move || {
            while !stop_flag.load(Ordering::Acquire) {
                thread::sleep(latency);
                let Ok(completed) = timeline.completed_value() else {
                    warn!("GPU simulator stopping: device lost");
                    break;
                };
                if completed < timeline.signaled_value() {
                    timeline.complete(completed + 1);
                }
            }
        });

        info!(latency_ms = latency.as_millis() as u64, "GPU simulator started");
        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for GpuSimulator {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("GPU simulator thread panicked");
        }
    }
}

struct App {
    scene: SceneContext,
    ring: FrameRing<Arc<ManualTimeline>>,
    heap: CbvHeap,
    updater: FrameUpdater,
    input: InputState,
    timer: GameTimer,
    viewport: Viewport,
    wireframe_frames: u64,
}

impl App {
    fn new(config: &RenderConfig, timeline: Arc<ManualTimeline>) -> Result<Self> {
        let castle = build_castle()?;
        let mut scene = SceneContext::from_castle(castle, config.frame_resources);
        scene.camera.set_aspect(config.aspect_ratio());

        let ring = FrameRing::new(config.frame_resources, scene.object_count(), timeline)?;
        let heap = CbvHeap::build(&ring);
        info!(
            descriptors = heap.len(),
            vertices = scene.catalog.vertices().len(),
            indices = scene.catalog.indices().len(),
            "Initialization complete, entering main loop"
        );

        Ok(Self {
            scene,
            ring,
            heap,
            updater: FrameUpdater::new(),
            input: InputState::new(),
            timer: GameTimer::new(),
            viewport: Viewport::new(config.width, config.height),
            wireframe_frames: 0,
        })
    }

    fn apply_input(&mut self) {
        match self.input.take_drag() {
            Some(OrbitDrag::Rotate { dx, dy }) => self.scene.camera.rotate(dx, dy),
            Some(OrbitDrag::Zoom { dx, dy }) => self.scene.camera.zoom(dx, dy),
            None => {}
        }
    }

    fn render_frame(&mut self) -> Result<()> {
        self.timer.tick();
        self.apply_input();

        let prepared = self.updater.update(
            &mut self.ring,
            &mut self.scene,
            &self.timer,
            self.viewport,
        )?;

        let pipeline = PipelineMode::from_wireframe(self.input.wireframe());
        if pipeline == PipelineMode::Wireframe {
            self.wireframe_frames += 1;
        }
        let draw_list = build_draw_list(&self.ring, &self.heap.layout(), &self.scene, pipeline)?;

        // Recording and queue submission belong to the backend; here the draw
        // list is handed off by signaling the slot's fence.
        let fence = self.ring.signal_submission()?;
        debug!(
            slot = prepared.slot,
            fence,
            draws = draw_list.draws.len(),
            objects_written = prepared.objects_written,
            ?pipeline,
            "Frame submitted"
        );
        Ok(())
    }
}

/// Drives the camera and wireframe key the way a user at the mouse would.
fn scripted_input(frame: u64, input: &mut InputState) {
    match frame {
        30 => {
            input.on_mouse_moved(640.0, 360.0);
            input.on_mouse_pressed(MouseButton::Left);
        }
        31..=60 => {
            let (x, y) = input.mouse_position().unwrap_or((640.0, 360.0));
            input.on_mouse_moved(x + 4.0, y + 1.0);
        }
        61 => input.on_mouse_released(MouseButton::Left),
        90 => input.on_mouse_pressed(MouseButton::Right),
        91..=110 => {
            let (x, y) = input.mouse_position().unwrap_or((640.0, 360.0));
            input.on_mouse_moved(x, y - 2.0);
        }
        111 => input.on_mouse_released(MouseButton::Right),
        150 => input.on_key_pressed(KeyCode::Digit1),
        181 => input.on_key_released(KeyCode::Digit1),
        _ => {}
    }
}

fn load_config() -> Result<RenderConfig> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            let path = Path::new(&path);
            RenderConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => Ok(RenderConfig::default()),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    castle_core::init_logging();
    info!("Starting Castle Renderer");

    let config = load_config()?;
    config.validate()?;
    info!(?config, "Configuration");

    let timeline = Arc::new(ManualTimeline::new());
    let simulator = GpuSimulator::spawn(
        timeline.clone(),
        Duration::from_millis(config.gpu_latency_ms),
    );
    let mut app = App::new(&config, timeline.clone())?;

    for frame in 0..config.frames {
        scripted_input(frame, &mut app.input);
        app.render_frame()
            .with_context(|| format!("Frame {frame} failed"))?;
    }

    app.ring.flush()?;
    drop(simulator);

    info!(
        frames = app.updater.frames_prepared(),
        last_fence = app.ring.current_fence(),
        cpu_waits = timeline.blocking_waits(),
        wireframe_frames = app.wireframe_frames,
        camera_radius = app.scene.camera.radius,
        total_time = app.timer.total_time(),
        "Shutting down"
    );
    Ok(())
}
