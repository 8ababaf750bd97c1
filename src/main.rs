pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

use mathima::{
    app_dirs::AppDirs,
    celebration::Celebration,
    content::{Catalog, ItemDifficulty, ItemSelector, PoolFilters, RandomSelector, Tense,
              WeakestFirstSelector},
    matching::{build_deck, Difficulty, GameStatus, MatchSession, MatchTheme},
    numbers::generate_number_questions,
    quiz::{generate_verb_questions, generate_vocab_questions, QuizSession},
    runtime::{AppEvent, Runner, TerminalEvents},
    stats::{append_session_log, GameKind, ItemSummary, SessionSummary, StatsDb},
    util::calculate_accuracy,
    writing::WritingSession,
};
use std::collections::HashMap;

const TICK_RATE_MS: u64 = 100;
pub const GRID_COLUMNS: usize = 4;

/// terminal games for learning modern greek
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A collection of terminal games for learning Modern Greek: memory matching, \
vocabulary and verb conjugation quizzes, number drills, and typed writing practice. Item \
selection adapts to the words you keep getting wrong."
)]
pub struct Cli {
    /// game to open at startup (defaults to the menu)
    #[clap(short, long, value_enum)]
    game: Option<GameArg>,

    /// board size and number ranges
    #[clap(short, long, value_enum, default_value_t = DifficultyArg::Easy)]
    difficulty: DifficultyArg,

    /// what the memory pairs show
    #[clap(long, value_enum, default_value_t = ThemeArg::Letters)]
    theme: ThemeArg,

    /// questions per quiz round
    #[clap(short = 'n', long, default_value_t = 10)]
    questions: usize,

    /// restrict vocabulary items to one category
    #[clap(short, long)]
    category: Option<String>,

    /// only include items up to this level (1-3)
    #[clap(short, long)]
    level: Option<u8>,

    /// verb tense to drill (random when omitted)
    #[clap(short, long, value_enum)]
    tense: Option<TenseArg>,

    /// pick items uniformly instead of weighting toward past mistakes
    #[clap(long)]
    random_items: bool,
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum GameArg {
    Memory,
    Vocabulary,
    Verbs,
    Numbers,
    Writing,
}

impl GameArg {
    fn as_game_kind(self) -> GameKind {
        match self {
            GameArg::Memory => GameKind::Memory,
            GameArg::Vocabulary => GameKind::Vocabulary,
            GameArg::Verbs => GameKind::Verbs,
            GameArg::Numbers => GameKind::Numbers,
            GameArg::Writing => GameKind::Writing,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum, strum_macros::Display)]
pub enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl DifficultyArg {
    fn as_difficulty(self) -> Difficulty {
        match self {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Medium => Difficulty::Medium,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum ThemeArg {
    Letters,
    Words,
}

impl ThemeArg {
    fn as_theme(self) -> MatchTheme {
        match self {
            ThemeArg::Letters => MatchTheme::Letters,
            ThemeArg::Words => MatchTheme::Words,
        }
    }
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum TenseArg {
    Present,
    Past,
    Future,
}

impl TenseArg {
    fn as_tense(self) -> Tense {
        match self {
            TenseArg::Present => Tense::Present,
            TenseArg::Past => Tense::Past,
            TenseArg::Future => Tense::Future,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Menu,
    Match,
    Quiz,
    Writing,
    Results,
    ItemStats,
}

/// Short colored line shown after an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub headline: String,
    pub was_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub cli: Cli,
    pub catalog: Catalog,
    pub screen: Screen,
    pub menu_index: usize,
    pub match_session: MatchSession,
    pub match_cursor: usize,
    pub quiz: Option<QuizSession>,
    pub writing: Option<WritingSession>,
    pub input: String,
    pub feedback: Option<Feedback>,
    pub summary: Option<SessionSummary>,
    pub celebration: Celebration,
    pub stats_rows: Vec<ItemSummary>,
    pub last_practiced_secs: Option<i64>,
    last_game: Option<GameKind>,
}

impl App {
    pub fn new(cli: Cli) -> Self {
        let mut app = Self {
            catalog: Catalog::load(),
            screen: Screen::Menu,
            menu_index: 0,
            match_session: MatchSession::new(),
            match_cursor: 0,
            quiz: None,
            writing: None,
            input: String::new(),
            feedback: None,
            summary: None,
            celebration: Celebration::default(),
            stats_rows: Vec::new(),
            last_practiced_secs: None,
            last_game: None,
            cli,
        };
        if let Some(game) = app.cli.game {
            app.start_game(game.as_game_kind());
        }
        app
    }

    fn filters(&self) -> PoolFilters {
        PoolFilters {
            category: self.cli.category.clone(),
            level: self.cli.level,
        }
    }

    fn selector(&self) -> Box<dyn ItemSelector> {
        if self.cli.random_items {
            Box::new(RandomSelector)
        } else {
            Box::new(WeakestFirstSelector)
        }
    }

    fn item_stats(&self) -> HashMap<String, ItemDifficulty> {
        match StatsDb::new() {
            Ok(db) => db.item_difficulties().unwrap_or_default(),
            Err(_) => HashMap::new(),
        }
    }

    pub fn start_game(&mut self, kind: GameKind) {
        self.feedback = None;
        self.summary = None;
        self.input.clear();
        self.celebration.stop();
        self.last_game = Some(kind);
        let difficulty = self.cli.difficulty.as_difficulty();

        match kind {
            GameKind::Memory => {
                let deck = build_deck(
                    &self.catalog,
                    self.cli.theme.as_theme(),
                    difficulty,
                    &mut rand::thread_rng(),
                );
                self.match_session.start_game(deck);
                self.match_cursor = 0;
                self.screen = Screen::Match;
            }
            GameKind::Vocabulary => {
                let questions = generate_vocab_questions(
                    &self.catalog.words,
                    &self.filters(),
                    self.cli.questions,
                    self.selector().as_ref(),
                    &self.item_stats(),
                    &mut rand::thread_rng(),
                );
                self.quiz = Some(
                    QuizSession::new(questions, GameKind::Vocabulary)
                        .with_stats_db(StatsDb::new().ok()),
                );
                self.screen = Screen::Quiz;
            }
            GameKind::Verbs => {
                let questions = generate_verb_questions(
                    &self.catalog.verbs,
                    &self.filters(),
                    self.cli.questions,
                    self.cli.tense.map(TenseArg::as_tense),
                    self.selector().as_ref(),
                    &self.item_stats(),
                    &mut rand::thread_rng(),
                );
                self.quiz = Some(
                    QuizSession::new(questions, GameKind::Verbs)
                        .with_stats_db(StatsDb::new().ok()),
                );
                self.screen = Screen::Quiz;
            }
            GameKind::Numbers => {
                let questions = generate_number_questions(
                    difficulty,
                    self.cli.questions,
                    &mut rand::thread_rng(),
                );
                self.quiz = Some(
                    QuizSession::new(questions, GameKind::Numbers)
                        .with_stats_db(StatsDb::new().ok()),
                );
                self.screen = Screen::Quiz;
            }
            GameKind::Writing => {
                let words: Vec<_> = {
                    let pool = self.filters().filter_words(&self.catalog.words);
                    let ids: Vec<&str> = pool.iter().map(|w| w.id.as_str()).collect();
                    self.selector()
                        .pick_indices(&ids, self.cli.questions, &self.item_stats())
                        .into_iter()
                        .map(|idx| pool[idx].clone())
                        .collect()
                };
                self.writing = Some(
                    WritingSession::new(words).with_stats_db(StatsDb::new().ok()),
                );
                self.screen = Screen::Writing;
            }
        }
    }

    fn round_detail(&self, kind: GameKind) -> String {
        match kind {
            GameKind::Memory | GameKind::Numbers => self.cli.difficulty.to_string().to_lowercase(),
            GameKind::Vocabulary | GameKind::Writing => self
                .cli
                .category
                .clone()
                .unwrap_or_else(|| "all".to_string()),
            GameKind::Verbs => self
                .cli
                .tense
                .map(|t| t.as_tense().to_string())
                .unwrap_or_else(|| "mixed".to_string()),
        }
    }

    fn back_to_menu(&mut self) {
        self.match_session.reset_game();
        self.quiz = None;
        self.writing = None;
        self.input.clear();
        self.feedback = None;
        self.celebration.stop();
        self.screen = Screen::Menu;
    }

    fn open_stats(&mut self) {
        let (rows, last) = match StatsDb::new() {
            Ok(db) => (
                db.summary(20).unwrap_or_default(),
                db.last_practiced().ok().flatten(),
            ),
            Err(_) => (Vec::new(), None),
        };
        self.stats_rows = rows;
        self.last_practiced_secs = last.map(|t| {
            (chrono::Local::now() - t).num_seconds()
        });
        self.screen = Screen::ItemStats;
    }

    /// Advance timed state: the card reveal countdown and the celebration.
    pub fn on_tick(&mut self, width: u16, height: u16) {
        self.celebration.update();

        if self.screen == Screen::Match {
            self.match_session.on_tick();
            if self.match_session.status == GameStatus::Won {
                self.finish_match(width, height);
            }
        }
    }

    fn finish_match(&mut self, width: u16, height: u16) {
        let stats = self.match_session.stats;
        let summary = SessionSummary {
            game: GameKind::Memory,
            detail: self.round_detail(GameKind::Memory),
            total: self.match_session.total_pairs() as usize,
            correct: stats.matches as usize,
            // Perfect recall answers every pair in two moves
            accuracy: calculate_accuracy(2 * stats.matches as usize, stats.moves as usize),
            score: Some(stats.score),
            moves: Some(stats.moves),
            elapsed_secs: self.match_session.elapsed_secs(),
        };
        if let Some(path) = AppDirs::log_path() {
            let _ = append_session_log(&path, &summary);
        }
        self.summary = Some(summary);
        self.celebration.start(width, height);
        self.screen = Screen::Results;
    }

    fn finish_quiz(&mut self) {
        if let Some(quiz) = &self.quiz {
            let summary = SessionSummary {
                game: quiz.game(),
                detail: self.round_detail(quiz.game()),
                total: quiz.total(),
                correct: quiz.correct,
                accuracy: quiz.accuracy(),
                score: None,
                moves: None,
                elapsed_secs: quiz.elapsed_secs(),
            };
            if let Some(path) = AppDirs::log_path() {
                let _ = append_session_log(&path, &summary);
            }
            self.summary = Some(summary);
        }
        self.screen = Screen::Results;
    }

    fn finish_writing(&mut self) {
        if let Some(writing) = &self.writing {
            let summary = SessionSummary {
                game: GameKind::Writing,
                detail: self.round_detail(GameKind::Writing),
                total: writing.total(),
                correct: writing.correct(),
                accuracy: writing.accuracy(),
                score: None,
                moves: None,
                elapsed_secs: writing.elapsed_secs(),
            };
            if let Some(path) = AppDirs::log_path() {
                let _ = append_session_log(&path, &summary);
            }
            self.summary = Some(summary);
        }
        self.screen = Screen::Results;
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Action::Quit;
        }

        match self.screen {
            Screen::Menu => self.on_menu_key(key),
            Screen::Match => self.on_match_key(key),
            Screen::Quiz => self.on_quiz_key(key),
            Screen::Writing => self.on_writing_key(key),
            Screen::Results => self.on_results_key(key),
            Screen::ItemStats => self.on_stats_key(key),
        }
    }

    fn on_menu_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_index = self.menu_index.checked_sub(1).unwrap_or(GameKind::ALL.len() - 1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_index = (self.menu_index + 1) % GameKind::ALL.len();
            }
            KeyCode::Enter => self.start_game(GameKind::ALL[self.menu_index]),
            KeyCode::Char('s') => self.open_stats(),
            _ => {}
        }
        Action::Continue
    }

    fn on_match_key(&mut self, key: KeyEvent) -> Action {
        let card_count = self.match_session.cards.len();
        match key.code {
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Char('p') => match self.match_session.status {
                GameStatus::Playing => self.match_session.pause_game(),
                GameStatus::Paused => self.match_session.resume_game(),
                _ => {}
            },
            KeyCode::Char('r') => self.start_game(GameKind::Memory),
            KeyCode::Left | KeyCode::Char('h') => {
                self.match_cursor = self.match_cursor.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if card_count > 0 && self.match_cursor < card_count - 1 {
                    self.match_cursor += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.match_cursor = self.match_cursor.saturating_sub(GRID_COLUMNS);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if card_count > 0 && self.match_cursor + GRID_COLUMNS < card_count {
                    self.match_cursor += GRID_COLUMNS;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let card_id = self
                    .match_session
                    .cards
                    .iter()
                    .find(|c| c.position == self.match_cursor)
                    .map(|c| c.id.clone());
                if let Some(card_id) = card_id {
                    self.match_session.flip_card(&card_id);
                }
            }
            _ => {}
        }
        Action::Continue
    }

    fn on_quiz_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Char(c @ '1'..='4') => {
                let option_index = (c as u8 - b'1') as usize;
                let outcome = self
                    .quiz
                    .as_mut()
                    .and_then(|quiz| quiz.select_option(option_index));
                if let Some(outcome) = outcome {
                    self.feedback = Some(if outcome.was_correct {
                        Feedback {
                            headline: "Σωστά!".to_string(),
                            was_correct: true,
                        }
                    } else {
                        Feedback {
                            headline: format!("Λάθος — ήταν «{}»", outcome.correct_answer),
                            was_correct: false,
                        }
                    });
                    if outcome.finished {
                        self.finish_quiz();
                    }
                }
            }
            _ => {}
        }
        Action::Continue
    }

    fn on_writing_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => self.back_to_menu(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => {
                let typed = self.input.clone();
                let outcome = self
                    .writing
                    .as_mut()
                    .and_then(|writing| writing.submit(&typed));
                if let Some(outcome) = outcome {
                    self.input.clear();
                    self.feedback = Some(match outcome.verdict {
                        mathima::answer::AnswerVerdict::Exact => Feedback {
                            headline: "Σωστά!".to_string(),
                            was_correct: true,
                        },
                        mathima::answer::AnswerVerdict::Close => Feedback {
                            headline: format!("Σχεδόν — γράφεται «{}»", outcome.expected),
                            was_correct: true,
                        },
                        mathima::answer::AnswerVerdict::Wrong => Feedback {
                            headline: format!("Λάθος — ήταν «{}»", outcome.expected),
                            was_correct: false,
                        },
                    });
                    if outcome.finished {
                        self.finish_writing();
                    }
                }
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
        Action::Continue
    }

    fn on_results_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Action::Quit,
            KeyCode::Char('m') => self.back_to_menu(),
            KeyCode::Char('r') => {
                if let Some(kind) = self.last_game {
                    self.start_game(kind);
                }
            }
            KeyCode::Char('s') => self.open_stats(),
            KeyCode::Char('t') => {
                if let Some(summary) = &self.summary {
                    let _ = webbrowser::open(&format!(
                        "https://twitter.com/intent/tweet?text=mathima%3A%20{}%20{}%2F{}%20({}%25%20acc)",
                        summary.game, summary.correct, summary.total, summary.accuracy
                    ));
                }
            }
            _ => {}
        }
        Action::Continue
    }

    fn on_stats_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => self.back_to_menu(),
            KeyCode::Char('e') => {
                if let (Ok(db), Some(db_path)) = (StatsDb::new(), AppDirs::db_path()) {
                    let export_path = db_path.with_file_name("export.csv");
                    if let Ok(file) = std::fs::File::create(export_path) {
                        let _ = db.export_csv(file);
                    }
                }
            }
            _ => {}
        }
        Action::Continue
    }
}

fn ui(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(cli);
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        TerminalEvents::new(),
        Duration::from_millis(TICK_RATE_MS),
    );

    loop {
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => {
                let size = terminal.size().unwrap_or_default();
                app.on_tick(size.width, size.height);
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Action::Quit {
                    return Ok(());
                }
            }
        }
    }
}
