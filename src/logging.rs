use std::io::IsTerminal;
use tracing::Level;

/// Install the global tracing subscriber. WARN by default, DEBUG when
/// verbose. Output goes through the stderr buffer so the TUI can hold log
/// lines until the terminal is restored.
pub fn init(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(crate::stderr_buffer::writer)
        .try_init();
}
