//! Terminal runtime and entry point.
//!
//! This module is the thin integration layer between the ejiview library and
//! the terminal. It parses flags, owns the crossterm session, translates key
//! presses into library events, and executes the actions the handler returns.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │        UI Thread             │
//! │  ┌────────────────────────┐  │
//! │  │ AppState + handler     │  │  ← key events, rendering
//! │  └────────────────────────┘  │
//! │        │ dispatch  ▲ channel │
//! │        ▼           │         │
//! │  ┌────────────────────────┐  │
//! │  │ Loader threads         │  │  ← one per request, HTTP fetches
//! │  └────────────────────────┘  │
//! └──────────────────────────────┘
//! ```
//!
//! # Lifecycle
//!
//! 1. **Configure**: Parse flags, load the config file, apply overrides
//! 2. **Initialize**: Start tracing, build `AppState`
//! 3. **Load**: Handle `Event::Reload` to issue the four dataset loads
//! 4. **Loop**: Poll keys every 100ms, drain load responses, redraw on change
//! 5. **Restore**: Leave the alternate screen and raw mode, even on error
//!
//! # Keybindings
//!
//! Global (all modes):
//! - `Ctrl+c`: Quit
//! - `Ctrl+n`/`Ctrl+p`: Move down/up
//!
//! In normal mode:
//! - `j`/`k`, `Down`/`Up`: Move cursor
//! - `h`/`l`, `Left`/`Right`: Previous/next page
//! - `Home`/`End`: First/last page
//! - `1`-`6`: Sort by column
//! - `m`: Cycle map mode
//! - `e`/`E`: EJI threshold +5/-5
//! - `a`/`A`: AQI threshold +5/-5
//! - `/`: Search
//! - `Tab`: Counties/hotspots
//! - `x`: Export map figure
//! - `R`: Reload
//! - `q`: Quit
//!
//! While typing a search:
//! - Characters edit the query
//! - `Enter`: Keep the query and navigate results
//! - `Esc`: Leave search and clear the query
//!
//! While navigating search results the normal keys apply, except `/` returns
//! to the query and `Esc` leaves search.

#![allow(clippy::multiple_crate_versions)]

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use ejiview::api::{HttpSource, LoadResponse, Loader};
use ejiview::data::Thresholds;
use ejiview::{handle_event, Action, AppState, Config, DashboardError, Event, InputMode, MapMode, SearchFocus};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Terminal dashboard for county EJI and air quality data.
#[derive(Debug, Parser)]
#[command(name = "ejiview", version, about)]
struct Args {
    /// Config file (default: <config dir>/ejiview/config.toml when present).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL.
    #[arg(long)]
    api_url: Option<String>,

    /// County boundary GeoJSON URL.
    #[arg(long)]
    boundaries_url: Option<String>,

    /// County table rows per page.
    #[arg(long)]
    page_size: Option<usize>,

    /// Rows in the hotspot table.
    #[arg(long)]
    hotspot_limit: Option<usize>,

    /// Initial map mode: eji, aqi or combined.
    #[arg(long)]
    map_mode: Option<MapMode>,

    /// Initial EJI slider position (0-100).
    #[arg(long)]
    eji_threshold: Option<u8>,

    /// Initial minimum median AQI.
    #[arg(long)]
    aqi_threshold: Option<u32>,

    /// Built-in theme name.
    #[arg(long)]
    theme: Option<String>,

    /// Custom TOML theme file.
    #[arg(long)]
    theme_file: Option<String>,

    /// Tracing filter, e.g. `debug`. RUST_LOG takes precedence.
    #[arg(long)]
    trace_level: Option<String>,

    /// Directory for exported map figures.
    #[arg(long)]
    export_dir: Option<String>,
}

impl Args {
    /// Overrides file values with the flags that were given.
    fn apply(self, config: &mut Config) {
        if let Some(url) = self.api_url {
            config.api_base_url = url;
        }
        if let Some(url) = self.boundaries_url {
            config.boundaries_url = url;
        }
        if let Some(size) = self.page_size {
            config.page_size = size;
        }
        if let Some(limit) = self.hotspot_limit {
            config.hotspot_limit = limit;
        }
        if let Some(mode) = self.map_mode {
            config.map_mode = mode;
        }
        if let Some(threshold) = self.eji_threshold {
            config.eji_threshold = threshold;
        }
        if let Some(threshold) = self.aqi_threshold {
            config.aqi_threshold = threshold;
        }
        if self.theme.is_some() {
            config.theme_name = self.theme;
        }
        if self.theme_file.is_some() {
            config.theme_file = self.theme_file;
        }
        if self.trace_level.is_some() {
            config.trace_level = self.trace_level;
        }
        if self.export_dir.is_some() {
            config.export_dir = self.export_dir;
        }
    }
}

/// Alternate screen and raw mode, restored on drop.
struct TerminalSession;

impl TerminalSession {
    fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Outcome of feeding a key to [`PageJump`].
#[derive(Debug, PartialEq, Eq)]
enum JumpKey {
    /// Not part of a jump; map it as usual.
    Pass,
    /// Consumed by the jump prompt.
    Held,
    /// Jump to this 1-indexed page.
    Go(usize),
}

/// `g`, page digits, `Enter`. Any other key cancels.
#[derive(Debug, Default)]
struct PageJump {
    digits: Option<String>,
}

impl PageJump {
    const MAX_DIGITS: usize = 6;

    fn feed(&mut self, key: &KeyEvent, mode: InputMode) -> JumpKey {
        if mode == InputMode::Search(SearchFocus::Typing) || key.modifiers.contains(KeyModifiers::CONTROL) {
            self.digits = None;
            return JumpKey::Pass;
        }

        let Some(digits) = self.digits.as_mut() else {
            if key.code == KeyCode::Char('g') {
                self.digits = Some(String::new());
                return JumpKey::Held;
            }
            return JumpKey::Pass;
        };

        match key.code {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                if digits.len() < Self::MAX_DIGITS {
                    digits.push(c);
                }
                JumpKey::Held
            }
            KeyCode::Backspace => {
                digits.pop();
                JumpKey::Held
            }
            KeyCode::Enter => {
                let page = digits.parse::<usize>().ok().filter(|&page| page > 0);
                self.digits = None;
                page.map_or(JumpKey::Held, JumpKey::Go)
            }
            _ => {
                self.digits = None;
                JumpKey::Held
            }
        }
    }

    fn prompt(&self) -> Option<String> {
        self.digits.as_ref().map(|digits| format!("Go to page: {digits}"))
    }
}

/// Library state plus the runtime pieces actions need.
struct Dashboard {
    state: AppState,
    loader: Loader,
    export_dir: PathBuf,
    page_jump: PageJump,
    should_quit: bool,
}

impl Dashboard {
    /// Routes a key press through the page-jump prompt, then the key map.
    fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match self.page_jump.feed(key, self.state.input_mode) {
            JumpKey::Pass => map_key_event(key, self.state.input_mode).is_some_and(|event| self.dispatch(&event)),
            JumpKey::Held => {
                match self.page_jump.prompt() {
                    Some(prompt) => self.state.set_status(prompt, false),
                    None => self.state.status = None,
                }
                true
            }
            JumpKey::Go(page) => {
                self.state.status = None;
                self.dispatch(&Event::GoToPage(page));
                true
            }
        }
    }

    /// Handles `event` and executes its actions.
    ///
    /// # Returns
    ///
    /// Whether the screen needs a redraw.
    fn dispatch(&mut self, event: &Event) -> bool {
        match handle_event(&mut self.state, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(action_count = actions.len(), should_render, "event handled");
                let mut render = should_render;
                for action in actions {
                    render |= self.execute_action(action);
                }
                render
            }
            Err(e) => {
                tracing::warn!(error = %e, "error handling event");
                false
            }
        }
    }

    fn execute_action(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                false
            }
            Action::Load(request) => {
                let name = request.name();
                match self.loader.dispatch(request.clone()) {
                    Ok(()) => false,
                    Err(e) => {
                        tracing::error!(request = name, error = %e, "failed to start load");
                        let response = LoadResponse::failure(&request, format!("could not start {name} load: {e}"));
                        self.dispatch(&Event::Loaded(response))
                    }
                }
            }
            Action::ExportFigure { figure, mode } => {
                let result = ejiview::export::export_figure(&figure, mode, &self.export_dir).map_err(|e| e.to_string());
                self.dispatch(&Event::ExportFinished(result))
            }
        }
    }

    fn drain_responses(&mut self, responses: &Receiver<LoadResponse>) -> bool {
        let mut render = false;
        while let Ok(response) = responses.try_recv() {
            render |= self.dispatch(&Event::Loaded(response));
        }
        render
    }
}

/// Translates a key press into a library event for the current input mode.
fn map_key_event(key: &KeyEvent, mode: InputMode) -> Option<Event> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Event::Quit),
            KeyCode::Char('n') => Some(Event::KeyDown),
            KeyCode::Char('p') => Some(Event::KeyUp),
            _ => None,
        };
    }

    match mode {
        InputMode::Search(SearchFocus::Typing) => map_typing_key(key.code),
        InputMode::Search(SearchFocus::Navigating) => match key.code {
            KeyCode::Esc => Some(Event::ExitSearch),
            KeyCode::Char('/') => Some(Event::FocusSearchBar),
            code => map_normal_key(code),
        },
        InputMode::Normal => map_normal_key(key.code),
    }
}

fn map_typing_key(code: KeyCode) -> Option<Event> {
    Some(match code {
        KeyCode::Esc => Event::ExitSearch,
        KeyCode::Enter => Event::FocusResults,
        KeyCode::Backspace => Event::Backspace,
        KeyCode::Down => Event::KeyDown,
        KeyCode::Up => Event::KeyUp,
        KeyCode::Char(c) => Event::Char(c),
        _ => return None,
    })
}

fn map_normal_key(code: KeyCode) -> Option<Event> {
    Some(match code {
        KeyCode::Down | KeyCode::Char('j') => Event::KeyDown,
        KeyCode::Up | KeyCode::Char('k') => Event::KeyUp,
        KeyCode::Right | KeyCode::Char('l') => Event::NextPage,
        KeyCode::Left | KeyCode::Char('h') => Event::PreviousPage,
        KeyCode::Home => Event::FirstPage,
        KeyCode::End => Event::LastPage,
        KeyCode::Char(c @ '1'..='6') => Event::SortColumn(c as usize - '1' as usize),
        KeyCode::Char('m') => Event::CycleMapMode,
        KeyCode::Char('e') => Event::AdjustEji(Thresholds::EJI_STEP),
        KeyCode::Char('E') => Event::AdjustEji(-Thresholds::EJI_STEP),
        KeyCode::Char('a') => Event::AdjustAqi(Thresholds::AQI_STEP),
        KeyCode::Char('A') => Event::AdjustAqi(-Thresholds::AQI_STEP),
        KeyCode::Char('/') => Event::SearchMode,
        KeyCode::Tab => Event::ToggleTableView,
        KeyCode::Char('x') => Event::ExportMap,
        KeyCode::Char('R') => Event::Reload,
        KeyCode::Char('q') => Event::Quit,
        _ => return None,
    })
}

fn draw(state: &AppState) -> io::Result<()> {
    let (cols, rows) = terminal::size()?;
    let mut stdout = io::stdout();
    queue!(stdout, Clear(ClearType::All))?;
    ejiview::ui::render(state, usize::from(rows), usize::from(cols));
    stdout.flush()
}

fn run(mut dashboard: Dashboard, responses: &Receiver<LoadResponse>) -> ejiview::Result<()> {
    let _session = TerminalSession::enter()?;

    let mut dirty = dashboard.dispatch(&Event::Reload);
    draw(&dashboard.state)?;

    while !dashboard.should_quit {
        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                TermEvent::Key(key) if key.kind == KeyEventKind::Press => dirty |= dashboard.handle_key(&key),
                TermEvent::Resize(..) => dirty = true,
                _ => {}
            }
        }

        dirty |= dashboard.drain_responses(responses);

        if dirty && !dashboard.should_quit {
            draw(&dashboard.state)?;
            dirty = false;
        }
    }

    Ok(())
}

fn main() -> Result<(), DashboardError> {
    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    ejiview::observability::init_tracing(&config);
    let span = tracing::info_span!("dashboard", api_base_url = %config.api_base_url);
    let _guard = span.enter();

    let state = ejiview::initialize(&config)?;
    let (sender, responses) = mpsc::channel();
    let loader = Loader::new(Arc::new(HttpSource::new(&config.api_base_url)), sender);

    let dashboard = Dashboard {
        state,
        loader,
        export_dir: config.export_dir(),
        page_jump: PageJump::default(),
        should_quit: false,
    };

    let result = run(dashboard, &responses);
    match &result {
        Ok(()) => tracing::info!("dashboard closed"),
        Err(e) => tracing::error!(error = %e, "dashboard exited with error"),
    }
    result
}
