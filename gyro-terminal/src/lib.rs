/// Terminal front end for the animated gyroscope
use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{self, Event},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use gyro_core::{
    animation, render, Camera, Config, Jitter, KeyMap, Mesh, Outcome, Part, Scene, Scheduler,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashMap;
use std::io::{stdout, Write};
use std::time::Instant;

pub mod keys;
pub mod renderer;

pub use renderer::{AsciiRenderer, PolygonMode};

/// Subdivision level for the ring and sphere meshes
const MESH_DETAIL: usize = 3;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    scene: Scene,
    keymap: KeyMap,
    meshes: HashMap<Part, Mesh>,
    camera: Camera,
    renderer: AsciiRenderer,
    scheduler: Scheduler,
    jitter: Jitter,
    rng: StdRng,
    running: bool,
    last_update: Instant,
    last_fps: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &Config, keymap: KeyMap) -> Result<Self> {
        let (columns, rows) = terminal::size().context("cannot query terminal size")?;
        Self::with_size(config, keymap, columns, rows)
    }

    /// Build the app for a terminal of `columns` x `rows` without touching the terminal
    pub fn with_size(config: &Config, keymap: KeyMap, columns: u16, rows: u16) -> Result<Self> {
        config.validate().context("invalid configuration")?;
        let (width, height) = viewport(columns, rows);

        let meshes = Part::ALL
            .into_iter()
            .map(|part| (part, part.primitive().tessellate(MESH_DETAIL)))
            .collect();

        let scene = Scene::from_config(config);
        let mut scheduler = Scheduler::new(config.tick_period());
        if scene.is_animating() {
            scheduler.arm();
        }

        let jitter = Jitter::new(config.jitter);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        log::info!(
            "viewport {}x{}, {} bindings, tick every {:?}, jitter {}",
            width,
            height,
            keymap.len(),
            scheduler.period(),
            jitter.amplitude()
        );

        Ok(Self {
            scene,
            keymap,
            meshes,
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width, height),
            scheduler,
            jitter,
            rng,
            running: true,
            last_update: Instant::now(),
            last_fps: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("cannot enable raw mode")?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        let restored = terminal::disable_raw_mode()
            .and_then(|_| execute!(stdout(), ResetColor, terminal::LeaveAlternateScreen, cursor::Show));

        result?;
        restored.context("cannot restore terminal")?;
        Ok(())
    }

    fn main_loop(&mut self) -> Result<()> {
        let frame_time = self.scheduler.period();
        self.last_update = Instant::now();

        while self.running {
            let deadline = Instant::now() + frame_time;

            // Handle input until the frame is due
            loop {
                let now = Instant::now();
                if now >= deadline || !self.running {
                    break;
                }
                if event::poll(deadline - now)? {
                    let event = event::read()?;
                    self.handle_event(event);
                }
            }

            self.update();
            self.render()?;

            // Update FPS counter
            self.frame_count += 1;
            let now = Instant::now();
            if (now - self.last_fps).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps).as_secs_f32();
                self.frame_count = 0;
                self.last_fps = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => {
                let Some(chord) = keys::chord_from_event(&key) else {
                    return;
                };
                let Some(command) = self.keymap.lookup(&chord).copied() else {
                    log::trace!("{} is not bound", chord);
                    return;
                };
                match self.scene.apply(&command) {
                    Outcome::Quit => self.running = false,
                    Outcome::Armed => {
                        if !self.scheduler.arm() {
                            log::debug!("tick already pending, not arming again");
                        }
                    }
                    Outcome::Redraw | Outcome::Ignored => {}
                }
            }
            Event::Resize(width, height) => {
                let (width, height) = viewport(width, height);
                log::debug!("resize to {}x{}", width, height);
                self.renderer.resize(width, height);
                self.camera.resize(width as u32, height as u32);
            }
            _ => {}
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now - self.last_update;
        self.last_update = now;
        animation::fire(
            &mut self.scene,
            &mut self.scheduler,
            elapsed,
            &self.jitter,
            &mut self.rng,
        );
    }

    fn render(&mut self) -> Result<()> {
        let view = self.camera.view_matrix();
        let lights = render::lights(&self.scene, &view);
        let mode = if self.scene.is_wireframe() {
            PolygonMode::Line
        } else {
            PolygonMode::Fill
        };

        // Clear renderer
        self.renderer.clear();

        for item in render::compose(&self.scene, &view) {
            if let Some(mesh) = self.meshes.get(&item.part) {
                self.renderer.render_mesh(mesh, &item, &lights, &self.camera, mode);
            }
        }

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;

        // Status line below the scene
        queue!(
            stdout,
            cursor::MoveTo(0, self.renderer.height() as u16),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(status_line(&self.scene, self.fps, self.renderer.width())),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Scene area for a terminal of the given size; the last row holds the status line
fn viewport(columns: u16, rows: u16) -> (usize, usize) {
    (usize::from(columns.max(1)), usize::from(rows.saturating_sub(1).max(1)))
}

fn status_line(scene: &Scene, fps: f32, width: usize) -> String {
    let on_off = |on: bool| if on { "on" } else { "off" };
    let mut line = format!(
        "GYRO | FPS: {:.1} | {} | speed {} | light0 {} light1 {} | {} | SPACE=animate L/l=lights T=wire </>=speed ESC=quit",
        fps,
        scene.animation(),
        scene.speed().get(),
        on_off(scene.light_enabled(0)),
        on_off(scene.light_enabled(1)),
        if scene.is_wireframe() { "wireframe" } else { "filled" },
    );
    line.truncate(width);
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use gyro_core::Command;

    fn app() -> TerminalApp {
        let config = Config {
            seed: Some(1),
            ..Config::default()
        };
        TerminalApp::with_size(&config, KeyMap::standard(), 40, 16).unwrap()
    }

    fn press(app: &mut TerminalApp, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    #[test]
    fn test_space_arms_the_scheduler_once() {
        let mut app = app();
        assert!(!app.scheduler.is_armed());

        press(&mut app, KeyCode::Char(' '));
        assert!(app.scene.is_animating());
        assert!(app.scheduler.is_armed());
        assert!(status_line(&app.scene, 0.0, 200).contains("running"));

        // Stop then restart before the pending tick: still one timer
        press(&mut app, KeyCode::Char(' '));
        assert!(status_line(&app.scene, 0.0, 200).contains("stopped"));
        press(&mut app, KeyCode::Char(' '));
        assert!(app.scheduler.is_armed());
        assert!(!app.scheduler.clone().arm());
    }

    #[test]
    fn test_keys_reach_the_scene() {
        let mut app = app();
        press(&mut app, KeyCode::Char('t'));
        assert!(app.scene.is_wireframe());
        press(&mut app, KeyCode::Char('>'));
        assert_eq!(app.scene.speed().get(), 90);
        press(&mut app, KeyCode::Insert);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);

        press(&mut app, KeyCode::Esc);
        assert!(!app.running);
    }

    #[test]
    fn test_resize_event_resizes_renderer() {
        let mut app = app();
        assert_eq!((app.renderer.width(), app.renderer.height()), (40, 15));
        app.handle_event(Event::Resize(100, 30));
        assert_eq!((app.renderer.width(), app.renderer.height()), (100, 29));
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            fps: 0,
            ..Config::default()
        };
        assert!(TerminalApp::with_size(&config, KeyMap::standard(), 40, 16).is_err());
    }

    #[test]
    fn test_viewport_reserves_status_row() {
        assert_eq!(viewport(80, 24), (80, 23));
        assert_eq!(viewport(0, 0), (1, 1));
    }

    #[test]
    fn test_status_line_reflects_toggles() {
        let mut scene = Scene::new();
        let line = status_line(&scene, 30.0, 200);
        assert!(line.contains("stopped"));
        assert!(line.contains("light0 on"));

        scene.apply(&Command::ToggleLight { index: 0 });
        scene.apply(&Command::ToggleWireframe);
        let line = status_line(&scene, 30.0, 200);
        assert!(line.contains("light0 off"));
        assert!(line.contains("wireframe"));

        assert_eq!(status_line(&scene, 30.0, 10).len(), 10);
    }
}
