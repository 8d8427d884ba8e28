//! Keyboard input handling for the application.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::App;
use crate::action::{AppAction, DeleteTarget};
use crate::components::{ActiveTab, PanelOutcome};

impl App {
    /// Route a key press.
    ///
    /// Priority: help overlay, then a page capturing input (search, modal),
    /// then global keys, then the active page.
    pub(crate) fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        if self.show_help {
            if matches!(code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        if !self.active_page_mut().is_capturing_input() && self.handle_global_key(code) {
            return;
        }

        let outcome = self.active_page_mut().handle_key(KeyEvent::new(code, modifiers));
        self.apply_outcome(outcome);

        if self.active_tab == ActiveTab::Orders {
            self.poll_order_query();
        }
    }

    /// Returns `true` when the key was consumed.
    fn handle_global_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.show_help = true;
            }
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                self.switch_to_tab(ActiveTab::from_index(index));
            }
            KeyCode::Tab => self.switch_to_tab(self.active_tab.next()),
            KeyCode::BackTab => self.switch_to_tab(self.active_tab.previous()),
            KeyCode::Char('r') => self.refresh_active_tab(),
            KeyCode::Char('t') => self.toggle_theme(),
            _ => return false,
        }
        true
    }

    fn apply_outcome(&mut self, outcome: PanelOutcome) {
        match outcome {
            PanelOutcome::Status(message) => self.status_bar.set_message(message),
            PanelOutcome::Delete { id, label } => {
                let target = match self.active_tab {
                    ActiveTab::Foods => DeleteTarget::Food(id),
                    ActiveTab::Categories => DeleteTarget::Category(id),
                    ActiveTab::Orders | ActiveTab::Customers => return,
                };
                log::debug!("Delete of '{}' confirmed", label);
                let _ = self.action_tx.send(AppAction::Delete(target));
            }
            PanelOutcome::Handled | PanelOutcome::Ignored => {}
        }
    }
}
