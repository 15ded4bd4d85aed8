use crossterm::event::{Event, KeyCode, KeyEventKind};
use orbtris_engine::{GameSession, Leaderboard, SessionState};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
    widgets::Block as BlockWidget,
};

use crate::{
    tui::{App, RenderMode, Runtime},
    ui::widgets::{
        BoardDisplay, InitialsPrompt, LeaderboardDisplay, MAX_INITIALS, StatsDisplay, StatusBar,
        style,
    },
};

#[derive(Debug)]
pub struct PlayApp {
    session: GameSession,
    leaderboard: Leaderboard,
    initials: String,
    last_position: Option<usize>,
    leaderboard_changed: bool,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(session: GameSession, leaderboard: Leaderboard) -> Self {
        Self {
            session,
            leaderboard,
            initials: String::new(),
            last_position: None,
            leaderboard_changed: false,
            is_exiting: false,
        }
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn is_leaderboard_changed(&self) -> bool {
        self.leaderboard_changed
    }

    fn handle_key(&mut self, code: KeyCode) {
        match self.session.session_state() {
            SessionState::Playing => match code {
                KeyCode::Left => _ = self.session.try_move_left(),
                KeyCode::Right => _ = self.session.try_move_right(),
                KeyCode::Up => _ = self.session.try_rotate(),
                KeyCode::Down => _ = self.session.hard_drop(),
                KeyCode::Char('r') => self.restart(),
                KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
                _ => {}
            },
            SessionState::GameOver => match code {
                KeyCode::Char('q') | KeyCode::Esc => self.is_exiting = true,
                _ => self.restart(),
            },
            SessionState::EnteringInitials => match code {
                KeyCode::Char(c) if c.is_ascii_alphanumeric() => {
                    if self.initials.len() < MAX_INITIALS {
                        self.initials.push(c.to_ascii_uppercase());
                    }
                }
                KeyCode::Backspace => _ = self.initials.pop(),
                KeyCode::Enter => self.submit_initials(),
                KeyCode::Esc => self.is_exiting = true,
                _ => {}
            },
        }
        self.check_leaderboard();
    }

    fn restart(&mut self) {
        self.session.reset();
        self.last_position = None;
    }

    fn submit_initials(&mut self) {
        let score = self.session.stats().score();
        self.last_position = self
            .session
            .submit_initials(&mut self.leaderboard, &self.initials);
        if let Some(position) = self.last_position {
            log::info!("{} scored {score}, rank {}", self.initials, position + 1);
            self.leaderboard_changed = true;
        }
        self.initials.clear();
    }

    fn tick(&mut self) {
        self.session.increment_frame();
        self.check_leaderboard();
    }

    /// Asks for initials as soon as the game ends with a qualifying score.
    fn check_leaderboard(&mut self) {
        if self.session.session_state().is_game_over()
            && self.session.check_leaderboard(&self.leaderboard)
        {
            log::info!("score {} made the leaderboard", self.session.stats().score());
        }
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = area.layout(&Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center));
    let [area] = area.layout(&Layout::vertical([Constraint::Length(height)]).flex(Flex::Center));
    area
}

impl App for PlayApp {
    fn init(&mut self, runtime: &mut Runtime) {
        let fps = f64::from(self.session.config().fps);
        runtime.set_tick_rate(Some(fps));
        runtime.set_render_mode(RenderMode::throttled_from_rate(fps));
    }

    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, _runtime: &mut Runtime, event: &Event) {
        if let Some(key) = event.as_key_event()
            && key.kind == KeyEventKind::Press
        {
            self.handle_key(key.code);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let view = self.session.frame();
        let title = match &view.state {
            SessionState::Playing => " ORBTRIS ",
            SessionState::GameOver | SessionState::EnteringInitials => " GAME OVER ",
        };
        let board = BoardDisplay::new(&view)
            .block(BlockWidget::bordered().title_top(Line::styled(title, style::TITLE).centered()));
        let stats = StatsDisplay::new(&self.session)
            .block(BlockWidget::bordered().title_top(Line::styled(" STATS ", style::TITLE)));
        let leaderboard = LeaderboardDisplay::new(&self.leaderboard)
            .highlight(self.last_position)
            .block(BlockWidget::bordered().title_top(Line::styled(" HIGH SCORES ", style::TITLE)));

        let side_width = stats.width().max(leaderboard.width());
        let height = board.height().max(stats.height() + leaderboard.height());
        let [main_area, help_area] =
            Layout::vertical([Constraint::Length(height), Constraint::Length(1)])
                .flex(Flex::Center)
                .areas(frame.area());
        let [board_area, side_area] = Layout::horizontal([
            Constraint::Length(board.width()),
            Constraint::Length(side_width),
        ])
        .flex(Flex::Center)
        .areas(main_area);
        let [stats_area, leaderboard_area] = Layout::vertical([
            Constraint::Length(stats.height()),
            Constraint::Length(leaderboard.height()),
        ])
        .areas(side_area);
        let [board_area] =
            Layout::vertical([Constraint::Length(board.height())]).areas(board_area);

        frame.render_widget(&board, board_area);
        frame.render_widget(stats, stats_area);
        frame.render_widget(leaderboard, leaderboard_area);
        frame.render_widget(StatusBar::new(&self.session), help_area);

        if view.state.is_entering_initials() {
            let prompt_area = centered(
                board_area,
                InitialsPrompt::width(),
                InitialsPrompt::height(),
            );
            frame.render_widget(InitialsPrompt::new(view.score, &self.initials), prompt_area);
        }
    }

    fn update(&mut self, _runtime: &mut Runtime) {
        self.tick();
    }
}
