mod app;
mod event;
mod ui;

use std::fs::{self, OpenOptions};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use tabledrill::client;
use tabledrill::config::Config;
use tabledrill::session::question::ExerciseType;
use tabledrill::store::identity::{FileIdentityStore, IdentityStore};

use app::{App, AppScreen, LoginField, SetupFocus, SetupForm};
use event::{AppEvent, EventHandler};
use ui::components::countdown_bar::CountdownBar;
use ui::components::login_form::LoginForm;
use ui::components::menu::ModeMenu;
use ui::components::quiz_card::QuizCard;
use ui::components::results::Results;
use ui::components::table_picker::TablePicker;
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};

const TICK_RATE: Duration = Duration::from_millis(100);
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);
const TABLE_COLUMNS: usize = 4;

#[derive(Parser)]
#[command(name = "tabledrill", version, about = "Timed arithmetic flashcards for the terminal")]
struct Cli {
    #[arg(short, long, help = "Player name (skips the login screen)")]
    name: Option<String>,

    #[arg(long, help = "Base URL of the score server")]
    server: Option<String>,

    #[arg(long, help = "Do not contact the score server")]
    offline: bool,

    #[arg(short, long, help = "Exercise mode: mul, add, sub, factor or megamix")]
    mode: Option<ExerciseType>,

    #[arg(short, long, value_delimiter = ',', help = "Tables to practise, e.g. 2,3,7")]
    tables: Option<Vec<u32>>,

    #[arg(long, help = "Join the group with this secret key")]
    group_key: Option<String>,

    #[arg(long, value_name = "NAME", help = "Create a group, print its key and exit")]
    create_group: Option<String>,

    #[arg(long, help = "Theme name")]
    theme: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Ignoring unreadable config: {e:#}");
        Config::default()
    });
    init_logging()?;

    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    let offline = cli.offline || !config.network_enabled;
    let backend = client::connect(&config.server_url, config.request_timeout(), offline);
    let mut identity = FileIdentityStore::open().context("opening identity store")?;

    if let Some(group_name) = cli.create_group {
        let group = backend
            .create_group(&group_name)
            .context("creating group")?;
        println!("Created group \"{}\"", group.name);
        println!("Share this key with your class: {}", group.secret_key);
        identity.set_group(Some(group))?;
        return Ok(());
    }

    if let Some(name) = cli.name {
        identity.set_player(&name)?;
    }

    let mut app = App::new(config, backend, Box::new(identity));
    if let Some(key) = cli.group_key {
        app.join_group(&key);
    }
    if let Some(mode) = cli.mode {
        if let Some(pos) = ExerciseType::ALL.iter().position(|m| *m == mode) {
            app.setup.mode_selected = pos;
        }
    }
    if let Some(tables) = &cli.tables {
        app.setup.tables = [false; 12];
        for &t in tables {
            if let Some(slot) = t.checked_sub(1).and_then(|i| app.setup.tables.get_mut(i as usize)) {
                *slot = true;
            }
        }
    }
    if cli.mode.is_some() && app.screen == AppScreen::Setup {
        app.start_session(Instant::now());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_RATE);
    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.shutdown(Instant::now(), SHUTDOWN_GRACE);

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

/// The terminal belongs to the UI, so logs go to a file.
fn init_logging() -> Result<()> {
    let dir = dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabledrill");
    fs::create_dir_all(&dir)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("tabledrill.log"))?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        .init();
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(Instant::now()),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Login => handle_login_key(app, key),
        AppScreen::Setup => handle_setup_key(app, key),
        AppScreen::Quiz => handle_quiz_key(app, key),
        AppScreen::BonusOffer => handle_bonus_key(app, key),
        AppScreen::Results => handle_results_key(app, key),
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => app.login(),
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login_field = match app.login_field {
                LoginField::Name => LoginField::GroupKey,
                LoginField::GroupKey => LoginField::Name,
            };
        }
        code => {
            let field = match app.login_field {
                LoginField::Name => &mut app.login_name,
                LoginField::GroupKey => &mut app.login_group_key,
            };
            match code {
                KeyCode::Backspace => {
                    field.pop();
                }
                KeyCode::Char(ch) if !ch.is_control() && field.chars().count() < 32 => {
                    field.push(ch)
                }
                _ => {}
            }
        }
    }
}

fn handle_setup_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('l') => app.logout(),
        KeyCode::Enter => app.start_session(Instant::now()),
        _ => handle_setup_form_key(&mut app.setup, key),
    }
}

fn handle_setup_form_key(form: &mut SetupForm, key: KeyEvent) {
    match key.code {
        KeyCode::Tab | KeyCode::BackTab => {
            form.focus = match form.focus {
                SetupFocus::Modes => SetupFocus::Tables,
                SetupFocus::Tables => SetupFocus::Modes,
            };
        }
        KeyCode::Char(ch @ '1'..='5') => {
            form.mode_selected = (ch as usize) - ('1' as usize);
        }
        KeyCode::Char('a') => form.toggle_all(),
        _ => match form.focus {
            SetupFocus::Modes => match key.code {
                KeyCode::Up | KeyCode::Char('k') => {
                    let n = ExerciseType::ALL.len();
                    form.mode_selected = (form.mode_selected + n - 1) % n;
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    form.mode_selected = (form.mode_selected + 1) % ExerciseType::ALL.len();
                }
                _ => {}
            },
            SetupFocus::Tables => match key.code {
                KeyCode::Left | KeyCode::Char('h') => {
                    form.table_cursor = form.table_cursor.saturating_sub(1);
                }
                KeyCode::Right => form.table_cursor = (form.table_cursor + 1).min(11),
                KeyCode::Up | KeyCode::Char('k') => {
                    form.table_cursor = form.table_cursor.saturating_sub(TABLE_COLUMNS);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if form.table_cursor + TABLE_COLUMNS < 12 {
                        form.table_cursor += TABLE_COLUMNS;
                    }
                }
                KeyCode::Char(' ') => form.toggle_current(),
                _ => {}
            },
        },
    }
}

fn handle_quiz_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.end_session(Instant::now()),
        KeyCode::Enter => app.submit_answer(Instant::now()),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) if !ch.is_control() => app.type_char(ch),
        _ => {}
    }
}

fn handle_bonus_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => app.accept_bonus(Instant::now()),
        KeyCode::Char('n') | KeyCode::Esc => app.decline_bonus(),
        _ => {}
    }
}

fn handle_results_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Enter => app.start_session(Instant::now()),
        KeyCode::Char('m') | KeyCode::Esc => {
            app.quiz = None;
            app.screen = AppScreen::Setup;
        }
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    let hints: &[&str] = match app.screen {
        AppScreen::Login => {
            let form = LoginForm {
                name: &app.login_name,
                group_key: &app.login_group_key,
                field: app.login_field,
                theme: app.theme,
            };
            frame.render_widget(form, centered_rect(56, 12, layout.main));
            &["[Enter] Continue", "[Tab] Next field", "[Esc] Quit"]
        }
        AppScreen::Setup => {
            render_setup(frame, app, layout.main);
            &[
                "[Tab] Switch panel",
                "[1-5] Mode",
                "[Space] Toggle table",
                "[a] All tables",
                "[Enter] Start",
                "[l] Log out",
                "[q] Quit",
            ]
        }
        AppScreen::Quiz => {
            render_quiz(frame, app, layout.main);
            &["[Enter] Submit", "[Esc] End session"]
        }
        AppScreen::BonusOffer => {
            render_bonus_offer(frame, app, layout.main);
            &["[y] Take the challenge", "[n] Finish here"]
        }
        AppScreen::Results => {
            if let Some((summary, outcome)) = &app.last_result {
                let results = Results {
                    summary,
                    outcome,
                    theme: app.theme,
                };
                frame.render_widget(results, centered_rect(64, 18, layout.main));
            }
            &["[r] Play again", "[m] Change mode", "[q] Quit"]
        }
    };

    let mut footer_lines: Vec<Line> = pack_hint_lines(hints, layout.footer.width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
        .collect();
    if let Some(status) = &app.status {
        footer_lines.insert(
            0,
            Line::from(Span::styled(
                format!("  {status}"),
                Style::default().fg(colors.warning()),
            )),
        );
    }
    frame.render_widget(Paragraph::new(footer_lines), layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let mut info = match app.player() {
        Some(player) => format!(" {player}"),
        None => " not logged in".to_string(),
    };
    if let Some(group) = app.group_name() {
        info.push_str(&format!(" | {group}"));
    }
    if let Some(quiz) = &app.quiz {
        info.push_str(&format!(" | {}", quiz.setup().mode().label()));
    }
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " tabledrill ",
            Style::default()
                .fg(colors.bg())
                .bg(colors.accent())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(info, Style::default().fg(colors.muted())),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())));
    frame.render_widget(header, area);
}

fn render_setup(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let form = &app.setup;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let menu = ModeMenu::new(form.mode_selected, form.focus == SetupFocus::Modes, app.theme);
    frame.render_widget(menu, columns[0]);

    let picker = TablePicker {
        tables: &form.tables,
        cursor: form.table_cursor,
        focused: form.focus == SetupFocus::Tables,
        disabled: form.mode().is_megamix(),
        theme: app.theme,
    };
    frame.render_widget(picker, columns[1]);
}

fn render_quiz(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(3)])
        .split(area);

    let score = app.quiz.as_ref().map_or(0, |q| q.state().totals().0);
    let card = QuizCard {
        view: &app.view,
        score,
        theme: app.theme,
    };
    frame.render_widget(card, rows[0]);

    if let Some((ratio, remaining)) = app.countdown_fraction(Instant::now()) {
        frame.render_widget(CountdownBar::new(ratio, remaining, app.theme), rows[1]);
    }
}

fn render_bonus_offer(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "100 out of 100!",
            Style::default()
                .fg(colors.success())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Take the Diamond Challenge: 100 more questions.",
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            "Get all 200 right for the ultimate celebration.",
            Style::default().fg(colors.muted()),
        )),
    ];
    let popup = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(
            Block::bordered()
                .title(" Bonus round ")
                .border_style(Style::default().fg(colors.warning())),
        );
    frame.render_widget(popup, centered_rect(56, 9, area));
}
