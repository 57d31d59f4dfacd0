use std::path::PathBuf;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use crate::app::App;
use crate::audio::RodioPrimitive;
use crate::library::LocatorRegistry;
use crate::logging;
use crate::player::PlaybackController;
use crate::playlist::PlaylistStore;

mod event_loop;
mod settings;
mod startup;

pub use settings::load_settings;

/// Run the player with the given files and folders as initial intake.
pub fn run(paths: Vec<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    if let Err(e) = logging::init(&settings.log) {
        eprintln!("cadence: logging disabled: {e}");
    }
    info!(version = env!("CARGO_PKG_VERSION"), "starting");

    let registry = LocatorRegistry::new();
    let primitive = RodioPrimitive::new(registry.clone(), &settings.audio)?;
    let playlist = PlaylistStore::new(registry);
    let mut controller = PlaybackController::new(
        primitive,
        playlist,
        &settings.playback,
        settings.audio.default_volume,
    );
    let subscription = controller.subscribe();

    startup::add_initial_paths(&mut controller, &paths, &settings);
    // Drain what intake queued so the first frame shows the selected track.
    controller.tick();

    let mut app = App::new(controller.status().clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut controller,
        &subscription,
        &mut event_loop::EventLoopState::default(),
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.unsubscribe(subscription.id());
    info!("exiting");
    run_result
}
