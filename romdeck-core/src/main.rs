//! src/main.rs
//! Terminal host for the ROM library browser

use std::{
    io::{self, Stdout},
    panic::PanicHookInfo,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::{
    event::{Event as TerminalEvent, EventStream},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::Alignment,
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
};
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, error, info, warn};

use romdeck_core::{
    Config, LibraryView, Logger,
    controller::Button,
    fs::WalkDirLister,
    host::{GameLauncher, InputSource},
    tui::{BuiltinAssets, KeyOutcome, KeyboardInput, TerminalSurface},
    view::DrawList,
};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    setup_panic_handler();

    // Logging depends on the config, so a load failure is reported once the
    // subscriber exists.
    let (config, config_error) = match Config::load().await {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let _log_guard =
        Logger::init_tracing(&config.logging).context("Failed to initialize logging")?;
    info!("Starting romdeck");

    if let Some(e) = config_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    let app = App::new(config).context("Failed to initialize application")?;
    app.run().await.context("Application runtime error")?;

    info!("Application exited cleanly");
    Ok(())
}

/// Hands confirmed ROM paths to the host loop.
struct ChannelLauncher(mpsc::UnboundedSender<String>);

impl GameLauncher for ChannelLauncher {
    fn activate(&mut self, path: &str) {
        if self.0.send(path.to_owned()).is_err() {
            warn!("Launch of {} dropped, host loop is gone", path);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Library,
    Game { path: String },
}

struct App {
    terminal: AppTerminal,
    view: LibraryView<ChannelLauncher>,
    lister: WalkDirLister,
    input: KeyboardInput,
    launches: mpsc::UnboundedReceiver<String>,
    screen: Screen,
    frame_interval: Duration,
    slow_frames: u32,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let (launch_tx, launches) = mpsc::unbounded_channel::<String>();

        let mut view = LibraryView::new(ChannelLauncher(launch_tx), &mut BuiltinAssets, &config);
        let lister = WalkDirLister;
        let found = view.show(&lister);
        info!("Library ready with {} ROMs", found);

        let terminal = setup_terminal().context("Failed to initialize terminal")?;

        Ok(Self {
            terminal,
            view,
            lister,
            input: KeyboardInput::new(config.keymap),
            launches,
            screen: Screen::Library,
            frame_interval: config.frame_interval,
            slow_frames: 0,
        })
    }

    async fn run(mut self) -> Result<()> {
        info!("Starting event loop");

        let mut event_stream: EventStream = EventStream::new();
        let mut ticker = time::interval(self.frame_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C");
                    break;
                }

                _ = ticker.tick() => self.tick()?,

                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(TerminalEvent::Key(key))) => {
                        if self.input.handle_key(key) == KeyOutcome::Quit {
                            info!("Quit requested");
                            break;
                        }
                    }
                    Some(Ok(TerminalEvent::Resize(width, height))) => {
                        debug!(width, height, "Terminal resized");
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(e).context("Failed to read terminal event"),
                    None => {
                        info!("Terminal event stream closed");
                        break;
                    }
                },

                Some(path) = self.launches.recv() => {
                    info!(marker = "GAME_LAUNCHED", "Switching to game screen for {}", path);
                    self.screen = Screen::Game { path };
                }
            }
        }

        info!("Event loop terminated, {} slow frames", self.slow_frames);
        Ok(())
    }

    fn tick(&mut self) -> Result<()> {
        let buttons = self.input.poll();
        let start = Instant::now();

        if matches!(self.screen, Screen::Game { .. }) && buttons.contains(Button::B) {
            info!("Returning to library");
            self.screen = Screen::Library;
            self.view.show(&self.lister);
        }

        match &self.screen {
            Screen::Library => {
                let frame = self.view.update(buttons);
                let layout = self.view.layout();
                draw_library(
                    &mut self.terminal,
                    &frame,
                    (layout.viewport_width, layout.viewport_height),
                )?;
            }
            Screen::Game { path } => draw_game(&mut self.terminal, path)?,
        }

        let duration = start.elapsed();
        if duration > self.frame_interval {
            self.slow_frames += 1;
            warn!(
                "Slow frame: {}ms (target: <{}ms)",
                duration.as_millis(),
                self.frame_interval.as_millis()
            );
        }

        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        if let Err(e) = cleanup_terminal(&mut self.terminal) {
            warn!("Failed to cleanup terminal: {}", e);
        }
    }
}

fn draw_library(terminal: &mut AppTerminal, list: &DrawList, viewport: (i32, i32)) -> Result<()> {
    terminal
        .draw(|frame: &mut Frame<'_>| {
            let area = frame.area();
            let mut surface = TerminalSurface::new(frame.buffer_mut(), area, viewport);
            list.present(&mut surface);
        })
        .context("Failed to draw terminal")?;

    Ok(())
}

fn draw_game(terminal: &mut AppTerminal, path: &str) -> Result<()> {
    terminal
        .draw(|frame: &mut Frame<'_>| {
            let text = format!(
                "Loaded {path}\n\nThe emulator takes over from here.\nPress Esc or Z to return to the library."
            );
            let widget = Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Black).bg(Color::White))
                .block(Block::default().borders(Borders::ALL).title(" romdeck "));
            frame.render_widget(widget, frame.area());
        })
        .context("Failed to draw terminal")?;

    Ok(())
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
    terminal.hide_cursor().context("Failed to hide cursor")?;

    info!("Terminal setup complete");
    Ok(terminal)
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    info!("Terminal cleanup complete");
    Ok(())
}

fn setup_panic_handler() {
    let original_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info: &PanicHookInfo<'_>| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        original_hook(panic_info);
    }));
}
