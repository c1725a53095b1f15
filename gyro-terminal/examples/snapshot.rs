/// Example: print a single frame of the gyroscope without taking over the terminal
///
/// Usage: cargo run --example snapshot -- [ticks]

use std::env;
use std::io::{self, Write};
use std::time::Duration;

use gyro_core::{animation, render, Camera, Command, Jitter, Scene, Scheduler};
use gyro_terminal::{AsciiRenderer, PolygonMode};
use rand::rngs::StdRng;
use rand::SeedableRng;

const WIDTH: usize = 100;
const HEIGHT: usize = 40;

fn main() -> io::Result<()> {
    let ticks: u32 = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(12);

    // Spin the rings for a while with a fixed seed
    let mut scene = Scene::new();
    let mut scheduler = Scheduler::new(Duration::from_millis(33));
    let mut rng = StdRng::seed_from_u64(0);
    scene.apply(&Command::ToggleAnimation);
    scheduler.arm();
    let period = scheduler.period();
    let jitter = Jitter::new(0.05);
    for _ in 0..ticks {
        animation::fire(&mut scene, &mut scheduler, period, &jitter, &mut rng);
    }

    let camera = Camera::new(WIDTH as u32, HEIGHT as u32);
    let view = camera.view_matrix();
    let lights = render::lights(&scene, &view);
    let mut renderer = AsciiRenderer::new(WIDTH, HEIGHT);
    for item in render::compose(&scene, &view) {
        let mesh = item.part.primitive().tessellate(3);
        renderer.render_mesh(&mesh, &item, &lights, &camera, PolygonMode::Fill);
    }

    // Plain characters only, so the output can be redirected to a file
    let mut stdout = io::stdout().lock();
    for line in renderer.lines() {
        writeln!(stdout, "{}", line)?;
    }
    writeln!(stdout, "{} ticks, {} cells drawn", ticks, renderer.covered())?;
    Ok(())
}
