use std::fs::File;
use std::io;
use std::io::Stdout;
use std::path::Path;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Context;
use anyhow::anyhow;
use clap::Parser;
use crossterm::cursor;
use crossterm::event;
use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;
use crossterm::execute;
use crossterm::terminal;
use tracing::error;
use tracing::info;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use gridlife::CancelToken;
use gridlife::config::Config;
use gridlife::render::Renderer;

mod cli;

/// How long the input thread blocks before checking whether the simulation is over
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Restores the terminal when dropped, whether the simulation ended normally or not
struct Screen {
    stdout: Stdout,
}

impl Screen {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        let mut screen = Self {
            stdout: io::stdout(),
        };
        execute!(screen.stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

        Ok(screen)
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let res = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen)
            .and_then(|_| terminal::disable_raw_mode());

        if let Err(e) = res {
            warn!("Failed to restore terminal: {e}");
        }
    }
}

/// Whether `event` asks to quit
fn is_exit(event: &Event) -> bool {
    match event {
        Event::Key(KeyEvent {
            kind: KeyEventKind::Release,
            ..
        }) => false,
        Event::Key(KeyEvent {
            code: KeyCode::Char('q') | KeyCode::Esc,
            ..
        }) => true,
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            ..
        }) => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Wait at most `timeout` for the next terminal event
fn poll_event(timeout: Duration) -> io::Result<Option<Event>> {
    if event::poll(timeout)? {
        event::read().map(Some)
    } else {
        Ok(None)
    }
}

/// Cancel `cancel` as soon as the user asks to quit, or as soon as events can't be read
/// anymore. Raw mode swallows Ctrl-C, so without this thread there is no way out. Returns
/// once `cancel` is cancelled, by the user or by anyone else.
fn watch<P>(cancel: &CancelToken, mut next_event: P) -> io::Result<()>
where
    P: FnMut(Duration) -> io::Result<Option<Event>>,
{
    while !cancel.is_cancelled() {
        match next_event(INPUT_POLL) {
            Ok(Some(event)) if is_exit(&event) => {
                info!("Exit requested");
                cancel.cancel();
            }
            Ok(_) => {}
            Err(e) => {
                error!("Failed to read terminal events: {e}");
                cancel.cancel();
                return Err(e);
            }
        }
    }

    Ok(())
}

fn watch_input(cancel: CancelToken) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || watch(&cancel, poll_event))
}

fn init_logging(path: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;

            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = Config::from(&args);
    let seed = config
        .seed()
        .context("Failed to create the first generation")?;

    let cancel = CancelToken::new();
    let outcome = {
        let screen = Screen::enter().context("Failed to set up the terminal")?;
        let input = watch_input(cancel.clone());

        let mut renderer = Renderer::new(io::stdout(), config.style, config.palette);
        let outcome = config.simulation().run(seed, &mut renderer, &cancel);

        // also stops the input thread when the generation limit was reached
        cancel.cancel();
        input
            .join()
            .map_err(|_| anyhow!("Input thread panicked"))?
            .context("Failed to read terminal events")?;

        drop(screen);
        outcome.context("Failed to draw generation")?
    };

    println!(
        "Stopped after {} generations ({:?}), population {}",
        outcome.generations,
        outcome.reason,
        outcome.last.population()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;

    use crossterm::event::Event;
    use crossterm::event::KeyCode;
    use crossterm::event::KeyEvent;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyEventState;
    use crossterm::event::KeyModifiers;

    use gridlife::CancelToken;

    use super::is_exit;
    use super::watch;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn exit_keys() {
        assert!(is_exit(&key(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_exit(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(is_exit(&key(KeyCode::Char('c'), KeyModifiers::CONTROL)));

        assert!(!is_exit(&key(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!is_exit(&key(KeyCode::Char('j'), KeyModifiers::NONE)));
        assert!(!is_exit(&Event::Resize(80, 24)));
    }

    #[test]
    fn ignores_release() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });

        assert!(!is_exit(&release));
    }

    #[test]
    fn watch_stops_on_exit_key() {
        let cancel = CancelToken::new();
        let mut events = VecDeque::from([
            None,
            Some(key(KeyCode::Char('j'), KeyModifiers::NONE)),
            Some(key(KeyCode::Char('q'), KeyModifiers::NONE)),
        ]);

        let res = watch(&cancel, |_| {
            Ok(events.pop_front().expect("polled after the exit key"))
        });

        assert!(res.is_ok());
        assert!(cancel.is_cancelled());
        assert!(events.is_empty());
    }

    #[test]
    fn watch_cancels_on_read_error() {
        let cancel = CancelToken::new();
        let mut events = VecDeque::from([
            Ok(Some(key(KeyCode::Char('j'), KeyModifiers::NONE))),
            Err(io::Error::other("terminal gone")),
        ]);

        let res = watch(&cancel, |_| {
            events.pop_front().expect("polled after the read error")
        });

        assert_eq!(res.unwrap_err().to_string(), "terminal gone");
        assert!(cancel.is_cancelled());
    }

    #[test]
    fn watch_returns_when_cancelled_elsewhere() {
        let cancel = CancelToken::new();
        cancel.cancel();

        let res = watch(&cancel, |_| panic!("polled a cancelled token"));

        assert!(res.is_ok());
    }
}
