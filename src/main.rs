use std::backtrace::Backtrace;
use std::error::Error;
use std::panic;
use std::process::ExitCode;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::SeedableRng;

use snake::config::{GameConfig, LogConfig};
use snake::error::SnakeError;
use snake::game::SnakeGame;
use snake::logging;
use snake::render::Glyphs;
use snake::term::CrosstermScreen;

const FAREWELL: &str = "Thanks for playing Snake!";

// Filled by the panic hook, printed once the terminal has been restored.
static PANIC_REPORT: Mutex<Option<String>> = Mutex::new(None);

fn main() -> ExitCode {
    if let Err(err) = logging::init(&LogConfig::from_env()) {
        eprintln!("Warning: {}", err);
    }

    panic::set_hook(Box::new(|info| {
        let report = format!("{}\n{}", info, Backtrace::force_capture());
        log::error!("{}", report);
        if let Ok(mut slot) = PANIC_REPORT.lock() {
            *slot = Some(report);
        }
    }));

    // The screen restores the terminal when dropped, so by the time either
    // arm below runs the shell is usable again.
    let code = match panic::catch_unwind(run) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(err)) => {
            report_error(&err);
            ExitCode::FAILURE
        }
        Err(_) => {
            let report = PANIC_REPORT
                .lock()
                .ok()
                .and_then(|mut slot| slot.take())
                .unwrap_or_else(|| "unknown panic".to_string());
            eprintln!("Unexpected error: {}", report);
            ExitCode::FAILURE
        }
    };

    println!("{}", FAREWELL);
    code
}

fn run() -> Result<(), SnakeError> {
    let screen = CrosstermScreen::new()?;
    let mut game =
        SnakeGame::new(screen, StdRng::from_entropy(), GameConfig::default(), Glyphs::detect())?;
    game.run()
}

fn report_error(err: &SnakeError) {
    log::error!("{}", err);
    eprintln!("Error: {}", err);

    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {}", cause);
        source = cause.source();
    }
    if let SnakeError::Terminal(_) = err {
        eprintln!("This might be due to the terminal size or capabilities.");
    }
}
