//! Terminal host for the softrace pipeline
//!
//! Owns the event loop: samples keys, advances the camera, runs one render
//! pass into an [`AsciiRenderer`] and prints it.
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use softrace_core::{FrameStats, Input, Mesh, Renderer, RendererConfig};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Main application struct for terminal 3D rendering
pub struct TerminalApp {
    renderer: Renderer,
    canvas: AsciiRenderer,
    /// Model yaw added per second, in radians.
    spin: f64,
    running: bool,
    last_frame: Instant,
    fps_window_start: Instant,
    frame_count: u32,
    fps: f64,
    stats: FrameStats,
}

impl TerminalApp {
    /// Build the app for the current terminal size. The width and height of
    /// `config` are replaced by the terminal dimensions.
    pub fn new(mesh: Mesh, config: RendererConfig, spin: f64) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        let config = RendererConfig {
            screen_width: width as u32,
            screen_height: height as u32,
            ..config
        };
        let renderer = Renderer::new(mesh, &config)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
        let now = Instant::now();

        Ok(Self {
            renderer,
            canvas: AsciiRenderer::new(width as usize, height as usize),
            spin,
            running: true,
            last_frame: now,
            fps_window_start: now,
            frame_count: 0,
            fps: 0.0,
            stats: FrameStats::default(),
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();
            let dt = (frame_start - self.last_frame).as_secs_f64();
            self.last_frame = frame_start;

            let input = self.poll_input()?;
            if !self.running {
                break;
            }

            self.renderer.model_mut().rotation.rotate(0.0, self.spin * dt, 0.0);
            self.canvas.clear();
            self.stats = self.renderer.tick(dt, &input, &mut self.canvas);
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            let window = now - self.fps_window_start;
            if window.as_secs() >= 1 {
                self.fps = self.frame_count as f64 / window.as_secs_f64();
                self.frame_count = 0;
                self.fps_window_start = now;
            }
        }

        Ok(())
    }

    /// Drain pending key events into this frame's input snapshot.
    fn poll_input(&mut self) -> io::Result<Input> {
        let mut input = Input::default();
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if !apply_key(&mut input, &key) {
                    self.running = false;
                }
            }
        }
        Ok(input)
    }

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.canvas.draw(&mut stdout)?;

        // Draw UI overlay
        let camera = self.renderer.camera();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "softrace | FPS: {:.1} | tris {}/{} | pos ({:.1}, {:.1}, {:.1}) yaw {:.2} | WASD move, Space/C up/down, Left/Right turn, Q quit",
                self.fps,
                self.stats.dispatched,
                self.stats.considered,
                camera.position.x,
                camera.position.y,
                camera.position.z,
                camera.yaw()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

/// Fold one key event into `input`. Returns `false` when the key asks to
/// quit.
pub fn apply_key(input: &mut Input, key: &KeyEvent) -> bool {
    if key.kind == KeyEventKind::Release {
        return true;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char('w') | KeyCode::Up => input.forward = true,
        KeyCode::Char('s') | KeyCode::Down => input.backward = true,
        KeyCode::Char('a') => input.strafe_left = true,
        KeyCode::Char('d') => input.strafe_right = true,
        KeyCode::Char(' ') => input.up = true,
        KeyCode::Char('c') => input.down = true,
        KeyCode::Left => input.turn_left = true,
        KeyCode::Right => input.turn_right = true,
        _ => {}
    }
    true
}
