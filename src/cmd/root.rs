use crate::data::{persistence::get_data_dir, AppSettings, JsonFileStore};
use crate::ui::controller::{SystemClock, WidgetController};
use crate::ui::countdown_view::{run_app, App};
use crate::ui::{restore_terminal, setup_terminal};
use anyhow::Result;

pub fn run() -> Result<()> {
    let settings = AppSettings::load()?;
    let data_dir = get_data_dir()?;
    let store = JsonFileStore::open(&data_dir);
    tracing::info!(
        language = ?settings.language,
        data_dir = %data_dir.display(),
        "starting pension countdown"
    );

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(
            std::io::stdout(),
            crossterm::terminal::LeaveAlternateScreen
        );
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;

    let controller = WidgetController::new(store, SystemClock);
    let mut app = App::new(controller, settings);

    let result = run_app(&mut terminal, &mut app);

    // Release the ticker before the terminal goes away, whether or not the loop failed.
    app.shutdown();
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "event loop failed");
    }
    tracing::info!("pension countdown closed");
    result
}
