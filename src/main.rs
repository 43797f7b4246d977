use std::io;
use std::io::Write;
use std::time::Instant;

use anyhow::Context;
use crossterm::cursor;
use crossterm::event;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use sparselife::Cell;
use sparselife::Coord;
use sparselife::Population;
use sparselife::ScreenSize;
use sparselife::camera::Camera;
use sparselife::pattern;
use sparselife::rle;

use config::Config;
use events::AppEvent;
use events::CameraEvent;
use events::EngineEvent;
use events::Event;

mod config;
mod events;
mod input;

/// Two gliders, the pattern shown when no file is given.
const SEED: &str = concat!(
    "            ",
    "            ",
    "  *         ",
    "* *         ",
    " **         ",
    "           *",
    "         ** ",
    "          **",
    "            ",
    "            ",
);
const SEED_WIDTH: usize = 12;
const SEED_OFFSET: (Coord, Coord) = (30, 5);

fn load_seed(config: &Config) -> anyhow::Result<Vec<Cell>> {
    let Some(path) = &config.pattern else {
        return Ok(pattern::parse_grid(SEED, SEED_WIDTH, SEED_OFFSET)?);
    };

    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to open {}", path.display()))?;

    let is_rle = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("rle"));

    let cells = if is_rle {
        let (file, cells) = rle::read_rle_cells(&bytes)
            .with_context(|| format!("Failed to read RLE file {}", path.display()))?;

        if let Some(name) = file.name {
            info!(name = %String::from_utf8_lossy(name), "loaded pattern");
        }

        cells
    } else {
        let text = std::str::from_utf8(&bytes)
            .with_context(|| format!("{} is not valid UTF-8", path.display()))?;

        pattern::parse_plaintext(text, (0, 0))
            .with_context(|| format!("Failed to read plaintext file {}", path.display()))?
    };

    Ok(cells)
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

struct App {
    seed: Vec<Cell>,
    population: Population,
    camera: Camera,
    paused: bool,
}

impl App {
    fn new(seed: Vec<Cell>, cols: ScreenSize, rows: ScreenSize, paused: bool) -> Self {
        let population = Population::new(seed.iter().copied());

        // the last row is the status line
        let camera = Camera::for_terminal(cols, rows.saturating_sub(1));

        let mut app = Self {
            seed,
            population,
            camera,
            paused,
        };
        app.recenter();

        app
    }

    fn recenter(&mut self) {
        if let Some(bounds) = self.population.bounds() {
            self.camera.look_at(bounds.center());
        }
    }

    /// Called once per tick
    fn tick(&mut self) {
        if !self.paused {
            self.population.step();
        }
    }

    fn handle(&mut self, event: Event) -> Flow {
        match event {
            Event::AppEvent(AppEvent::Exit) => return Flow::Exit,
            Event::AppEvent(AppEvent::Resize { cols, rows }) => {
                self.camera
                    .resize(cols as usize * 2, rows.saturating_sub(1) as usize * 4);
            }
            Event::AppEvent(AppEvent::CameraEvent(CameraEvent::Move { dx, dy })) => {
                self.camera.offset_x(dx);
                self.camera.offset_y(dy);
            }
            Event::AppEvent(AppEvent::CameraEvent(CameraEvent::Recenter)) => self.recenter(),
            Event::EngineEvent(EngineEvent::Advance(n)) => self.population.advance(n),
            Event::EngineEvent(EngineEvent::TogglePause) => self.paused = !self.paused,
            Event::EngineEvent(EngineEvent::Reset) => {
                self.population = Population::new(self.seed.iter().copied());
            }
        }

        Flow::Continue
    }

    fn status(&self) -> String {
        let state = if self.paused { "paused" } else { "running" };

        let view = self.camera.viewport();

        format!(
            "gen {} | pop {} | {} | at {} | {}x{} | space pause, n step, r reset, hjkl pan, 0 center, q quit",
            self.population.generation(),
            self.population.len(),
            state,
            self.camera.origin(),
            view.width(),
            view.height(),
        )
    }

    fn draw(&mut self, out: &mut impl Write) -> io::Result<()> {
        let status = self.status();

        self.camera.reset();
        self.camera.draw(&self.population);
        let frame = self.camera.render();

        queue!(
            out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;

        for line in frame.lines() {
            queue!(out, style::Print(line), cursor::MoveToNextLine(1))?;
        }

        queue!(out, style::Print(status))?;

        out.flush()
    }
}

/// Puts the terminal back into cooked mode on the main screen when dropped, including while
/// unwinding from a panic.
struct TerminalGuard<W: Write> {
    out: W,
}

impl<W: Write> TerminalGuard<W> {
    fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen) {
            warn!(error = %e, "failed to leave the alternate screen");
        }

        if let Err(e) = terminal::disable_raw_mode() {
            warn!(error = %e, "failed to disable raw mode");
        }
    }
}

fn run(config: &Config, seed: Vec<Cell>) -> anyhow::Result<()> {
    let mut stdout = io::stdout();

    let (cols, rows) = terminal::size()?;
    let mut app = App::new(seed, cols, rows, config.paused);

    let mut last_tick = Instant::now();

    loop {
        app.draw(&mut stdout)?;

        // Poll events for whatever is left of the tick
        let timeout = config.tick.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            if let Some(event) = input::convert_event(event::read()?) {
                if app.handle(event) == Flow::Exit {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= config.tick {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    // stdout belongs to the frame, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let config = Config::from_args(std::env::args().skip(1))?;
    let seed = load_seed(&config)?;

    info!(cells = seed.len(), tick = ?config.tick, "starting");

    terminal::enable_raw_mode()?;
    let _guard = TerminalGuard::new(io::stdout());

    execute!(io::stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;

    run(&config, seed)
}
