/// Terminal-based ASCII viewer for OFF meshes with an explode effect
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use offview_core::{
    model_matrix, render_buffers, triangulate, AxisPreset, ExplodeAnimation, ExplodeCommand,
    Mesh, Spin, ViewerConfig,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod camera;
pub mod renderer;

pub use camera::Camera;
pub use renderer::{AsciiRenderer, Shading};

/// Explode factor change per key press.
const FACTOR_STEP: f32 = 0.1;
/// Manual rotation per key press, in degrees.
const ANGLE_STEP: f32 = 5.0;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Load(#[from] offview_core::LoadError),
    #[error(transparent)]
    Config(#[from] offview_core::ConfigError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    mesh: Mesh,
    spin: Spin,
    axis: AxisPreset,
    animation: ExplodeAnimation,
    shading: Shading,
    camera: Camera,
    renderer: AsciiRenderer,
    frame_time: Duration,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(mesh: Mesh, config: &ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        // Leave the top row for the status line.
        Ok(Self::with_size(
            mesh,
            config,
            width as usize,
            height.saturating_sub(1) as usize,
        ))
    }

    pub fn with_size(mut mesh: Mesh, config: &ViewerConfig, width: usize, height: usize) -> Self {
        mesh.apply(ExplodeCommand::Initialize);
        let mut animation = config.explode_animation();
        animation.set_factor(mesh.explosion().factor());

        Self {
            mesh,
            spin: config.spin(),
            axis: AxisPreset::X,
            animation,
            shading: if config.depth_coloring {
                Shading::Depth
            } else {
                Shading::Lit
            },
            camera: Camera::new(width as u32, height as u32),
            renderer: AsciiRenderer::new(width, height),
            frame_time: Duration::from_secs(1) / config.target_fps.max(1),
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn spin(&self) -> &Spin {
        &self.spin
    }

    pub fn shading(&self) -> Shading {
        self.shading
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Run until the user quits, then reset and release the explosion state.
    pub fn run(mut self) -> io::Result<Mesh> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        self.mesh.apply(ExplodeCommand::Reset);
        self.mesh.apply(ExplodeCommand::Release);
        result.map(|()| self.mesh)
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let mut previous = Instant::now();

        while self.running {
            let frame_start = Instant::now();

            if event::poll(Duration::ZERO)? {
                if let Event::Key(KeyEvent {
                    code,
                    kind: KeyEventKind::Press,
                    ..
                }) = event::read()?
                {
                    self.handle_key(code);
                }
            }

            self.update(frame_start.duration_since(previous).as_secs_f32());
            previous = frame_start;

            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('b') => {
                self.animation.trigger();
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => {
                self.set_factor(self.animation.factor() + FACTOR_STEP);
            }
            KeyCode::Char('-') | KeyCode::Down => {
                self.set_factor(self.animation.factor() - FACTOR_STEP);
            }
            KeyCode::Char('x') => {
                self.animation.set_factor(0.0);
                self.mesh.apply(ExplodeCommand::Reset);
            }
            KeyCode::Char('r') => {
                self.spin.enabled = !self.spin.enabled;
            }
            KeyCode::Char(' ') => {
                self.axis = self.axis.next();
                self.spin.set_preset(self.axis);
                tracing::debug!("rotation axis now {:?}", self.axis);
            }
            KeyCode::Char('c') => {
                self.shading = match self.shading {
                    Shading::Lit => Shading::Depth,
                    Shading::Depth => Shading::Lit,
                };
            }
            KeyCode::Left => {
                self.spin.angle = (self.spin.angle - ANGLE_STEP).rem_euclid(360.0);
            }
            KeyCode::Right => {
                self.spin.angle = (self.spin.angle + ANGLE_STEP).rem_euclid(360.0);
            }
            _ => {}
        }
    }

    fn set_factor(&mut self, factor: f32) {
        self.animation.set_factor(factor);
        self.mesh
            .apply(ExplodeCommand::SetFactor(self.animation.factor()));
    }

    /// Advance rotation and the explode animation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        self.spin.update(dt);
        if let Some(factor) = self.animation.update(dt) {
            self.mesh.apply(ExplodeCommand::SetFactor(factor));
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let model = model_matrix(self.mesh.bounds(), self.spin.angle, &self.spin.axis());
        let buffers = render_buffers(&self.mesh);

        self.renderer.clear();
        self.renderer
            .render(&buffers, &model, &self.camera, self.shading);

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 1))?;
        self.renderer.draw(&mut stdout)?;

        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(terminal::ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "offview | FPS {:.1} | explode {:.2} | B=animate +/-=explode X=reset R=spin Space=axis C=shading Q=quit",
                self.fps,
                self.animation.factor()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Non-interactive report: statistics, optional polygon validation, and an
/// explode/reset round trip check.
pub fn summarize(mesh: &mut Mesh, validate: bool, explode: Option<f32>) -> String {
    let mut report = format!("{}\n", mesh.stats());

    if validate {
        let issues = triangulate::validate_polygons(mesh.model(), 1e-4);
        if issues.is_empty() {
            report.push_str("validation: all polygons planar and convex\n");
        } else {
            report.push_str(&format!("validation: {} issue(s)\n", issues.len()));
            for issue in issues {
                report.push_str(&format!("  polygon {}: {:?}\n", issue.polygon, issue.kind));
            }
        }
    }

    if let Some(factor) = explode {
        let original: Vec<_> = mesh.model().positions().collect();
        mesh.apply(ExplodeCommand::Initialize);
        mesh.apply(ExplodeCommand::SetFactor(factor));
        let displaced = mesh
            .model()
            .positions()
            .zip(&original)
            .map(|(p, q)| (p - q).norm())
            .fold(0.0f32, f32::max);
        mesh.apply(ExplodeCommand::Reset);
        let drift = mesh
            .model()
            .positions()
            .zip(&original)
            .map(|(p, q)| (p - q).norm())
            .fold(0.0f32, f32::max);
        mesh.apply(ExplodeCommand::Release);
        report.push_str(&format!(
            "explode {:.2}: max displacement {:.4}, drift after reset {:.2e}\n",
            factor.clamp(0.0, 1.0),
            displaced,
            drift
        ));
    }

    report
}
