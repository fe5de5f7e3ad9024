use crate::client::{self, Classifier, ClientEvent};
use crate::state::AppState;
use crate::ui;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// Interactive terminal application. Owns the state and the receiving
/// end of the channel that background requests report into.
pub struct App {
    state: AppState,
    classifier: Arc<dyn Classifier>,
    events_tx: flume::Sender<ClientEvent>,
    events_rx: flume::Receiver<ClientEvent>,
    tick: Duration,
}

impl App {
    pub fn new(classifier: Arc<dyn Classifier>, base_url: String, tick: Duration) -> Self {
        let (events_tx, events_rx) = flume::unbounded();
        Self {
            state: AppState::new(base_url),
            classifier,
            events_tx,
            events_rx,
            tick,
        }
    }

    pub async fn run(mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal).await;

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        loop {
            terminal.draw(|f| ui::render(f, &self.state))?;
            self.state.tick();

            if event::poll(self.tick)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            while let Ok(event) = self.events_rx.try_recv() {
                self.state.handle_event(event);
            }

            if self.state.should_quit {
                return Ok(());
            }
        }
    }

    fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        match code {
            KeyCode::Esc => self.state.quit(),
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => self.state.quit(),

            KeyCode::Char('t') if modifiers.contains(KeyModifiers::CONTROL) => {
                if self.state.begin_health_check() {
                    client::spawn_health_check(self.classifier.clone(), self.events_tx.clone());
                }
            }
            KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.clear_input()
            }

            KeyCode::Enter => {
                if let Some(comment) = self.state.submit() {
                    client::spawn_classify(
                        self.classifier.clone(),
                        comment,
                        self.events_tx.clone(),
                    );
                }
            }

            KeyCode::Backspace => self.state.backspace(),
            KeyCode::Delete => self.state.delete(),
            KeyCode::Left => self.state.move_left(),
            KeyCode::Right => self.state.move_right(),
            KeyCode::Home => self.state.move_home(),
            KeyCode::End => self.state.move_end(),

            KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                self.state.insert_char(c)
            }

            _ => {}
        }
    }
}
