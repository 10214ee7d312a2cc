use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use crossterm::event::{DisableFocusChange, EnableFocusChange};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

mod app;
mod buffers;
mod config;
mod events;
mod logging;
mod switcher;
mod text_layout;
mod theme;
mod ui;

use app::App;
use buffers::BufferId;
use config::SwitcherConfig;
use events::AppEvent;
use switcher::{Disposition, Switcher};

/// Cycle through open buffers in most-recently-used order.
#[derive(Debug, Parser)]
#[command(name = "bufswitch", version)]
struct LaunchOptions {
    /// Trigger keys, idle timeout and colors.
    #[arg(long, value_name = "PATH", default_value = "bufswitch.toml")]
    config: PathBuf,
    /// Append logs to this file instead of discarding them.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Open an extra buffer with this name; repeatable.
    #[arg(long = "buffer", value_name = "NAME")]
    buffers: Vec<String>,
}

fn main() -> io::Result<()> {
    let options = LaunchOptions::parse();
    logging::init_logging(options.log_file.as_deref())?;

    let config = SwitcherConfig::load_or_default(&options.config);
    let mut app = App::with_buffers(&options.buffers);
    app.set_key_hint(config.key_hint());
    tracing::info!(
        idle_timeout_ms = config.idle_timeout.as_millis() as u64,
        forward = config.forward_keys.len(),
        backward = config.backward_keys.len(),
        "bufswitch starting"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    let result = run_app(&mut terminal, app, &config);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    config: &SwitcherConfig,
) -> io::Result<()> {
    let mut switcher: Switcher<BufferId> = Switcher::new(config.idle_timeout);

    while app.running {
        sync_status_width(terminal, &mut app)?;
        terminal.draw(|frame| ui::render(frame, &app, &config.theme))?;

        // While a session is active the only suspension point is this bounded wait.
        let event = match switcher.remaining(Instant::now()) {
            Some(remaining) => match events::wait_for_event(config, remaining)? {
                Some(event) => event,
                None => {
                    switcher.handle_timeout(&mut app, Instant::now());
                    continue;
                }
            },
            None => events::next_event(config)?,
        };
        // A resize may have arrived; the switcher redraws its line at the new width.
        sync_status_width(terminal, &mut app)?;
        dispatch_event(&mut app, &mut switcher, event, Instant::now());
    }

    Ok(())
}

fn sync_status_width(
    terminal: &Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> io::Result<()> {
    let size = terminal.size()?;
    app.set_status_width(ui::status_text_width(Rect::new(
        0,
        0,
        size.width,
        size.height,
    )));
    Ok(())
}

/// Offers `event` to the switcher first; whatever it does not swallow reaches the app.
fn dispatch_event(
    app: &mut App,
    switcher: &mut Switcher<BufferId>,
    event: AppEvent,
    now: Instant,
) {
    match switcher.handle_input(app, event.switch_input(), now) {
        Disposition::Consumed | Disposition::Finished { replay: false } => {}
        Disposition::Ignored | Disposition::Finished { replay: true } => app.apply_event(event),
    }
}
