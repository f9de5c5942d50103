use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::action::{Action, ViewType};
use crate::app::{InputMode, Overlay, View};
use crate::kinds::{operation_for_key, KindId};

/// Terminal key events plus a steady tick, read on a background task.
pub struct RawEventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
}

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
}

impl RawEventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = EventStream::new();
            let mut tick = tokio::time::interval(tick_rate);

            loop {
                tokio::select! {
                    _ = tick.tick() => {
                        if tx.send(AppEvent::Tick).is_err() {
                            break;
                        }
                    }
                    event = reader.next() => {
                        match event {
                            Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                                if tx.send(AppEvent::Key(key)).is_err() {
                                    break;
                                }
                            }
                            Some(Ok(_)) => {}
                            Some(Err(err)) => {
                                tracing::error!("terminal event stream failed: {}", err);
                                break;
                            }
                            None => break,
                        }
                    }
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

/// Map a key event to an action based on current app state
pub fn key_to_action(
    key: KeyEvent,
    view: &View,
    input_mode: &InputMode,
    overlay: &Overlay,
    input_buffer: &str,
) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    // Overlays swallow every other key
    match overlay {
        Overlay::Help => {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    Some(Action::ToggleHelp)
                }
                _ => None,
            };
        }
        Overlay::Confirm(_) => {
            return match key.code {
                KeyCode::Char('y') | KeyCode::Enter => Some(Action::ConfirmAnswer(true)),
                KeyCode::Char('n') | KeyCode::Esc => Some(Action::ConfirmAnswer(false)),
                _ => None,
            };
        }
        Overlay::Filters { .. } => {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('f') | KeyCode::Enter => Some(Action::CloseOverlay),
                KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => Some(Action::FilterFocusNext),
                KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => {
                    Some(Action::FilterFocusPrev)
                }
                KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => {
                    Some(Action::FilterCycle(true))
                }
                KeyCode::Char('h') | KeyCode::Left => Some(Action::FilterCycle(false)),
                _ => None,
            };
        }
        Overlay::Form(_) => {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseOverlay),
                KeyCode::Enter => Some(Action::FormSubmit),
                KeyCode::Tab | KeyCode::Down => Some(Action::FormNextField),
                KeyCode::BackTab | KeyCode::Up => Some(Action::FormPrevField),
                KeyCode::Backspace => Some(Action::FormBackspace),
                KeyCode::Char(c) => Some(Action::FormInput(c)),
                _ => None,
            };
        }
        Overlay::None => {}
    }

    match input_mode {
        InputMode::Command => {
            return match key.code {
                KeyCode::Esc => Some(Action::CloseOverlay),
                KeyCode::Enter => Some(Action::SubmitCommandInput(input_buffer.to_string())),
                KeyCode::Tab => {
                    let input_cmd = input_buffer.split_whitespace().next().unwrap_or("");
                    let matches = crate::input::commands::matching_commands(input_cmd);
                    matches
                        .first()
                        .map(|cmd| Action::UpdateInputBuffer(cmd.name.to_string()))
                }
                KeyCode::Backspace => Some(Action::UpdateInputBuffer(edit(input_buffer, None))),
                KeyCode::Char(c) => Some(Action::UpdateInputBuffer(edit(input_buffer, Some(c)))),
                _ => None,
            };
        }
        InputMode::Search => {
            // The query is live; leaving search mode keeps it.
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => Some(Action::CloseOverlay),
                KeyCode::Backspace => Some(Action::UpdateInputBuffer(edit(input_buffer, None))),
                KeyCode::Char(c) => Some(Action::UpdateInputBuffer(edit(input_buffer, Some(c)))),
                _ => None,
            };
        }
        InputMode::PendingG => {
            return match key.code {
                KeyCode::Char('g') => Some(Action::NavigateTop),
                _ => Some(Action::CloseOverlay), // Cancel the pending chord
            };
        }
        InputMode::Normal => {}
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('d') => Some(Action::PageDown),
            KeyCode::Char('u') => Some(Action::PageUp),
            _ => None,
        };
    }

    let in_list = matches!(view, View::Collection(_));
    match key.code {
        // Global
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char(':') => Some(Action::OpenCommandInput),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            ViewType::ALL.get(index).copied().map(Action::SwitchView)
        }
        KeyCode::Char('j') | KeyCode::Down => Some(Action::NavigateDown),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::NavigateUp),
        KeyCode::Char('g') => Some(Action::EnterPendingG),
        KeyCode::Char('G') => Some(Action::NavigateBottom),
        KeyCode::Enter => Some(Action::Select),
        KeyCode::Esc => Some(Action::Back),

        // Lists
        KeyCode::Char('/') if in_list => Some(Action::OpenSearch),
        KeyCode::Char('f') if in_list => Some(Action::OpenFilters),
        KeyCode::Char(']') | KeyCode::Right if in_list => Some(Action::NextPage),
        KeyCode::Char('[') | KeyCode::Left if in_list => Some(Action::PrevPage),
        KeyCode::Char('t') if matches!(view, View::Collection(KindId::Registration)) => {
            Some(Action::ToggleRegType)
        }
        KeyCode::Char('e') if matches!(view, View::Profile) => {
            Some(Action::EditProfile)
        }
        KeyCode::Char(c) => match view {
            View::Collection(kind) => operation_for_key(*kind, c).map(Action::RunOperation),
            _ => None,
        },

        _ => None,
    }
}

fn edit(buffer: &str, push: Option<char>) -> String {
    let mut buf = buffer.to_string();
    match push {
        Some(c) => buf.push(c),
        None => {
            buf.pop();
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::FormState;
    use crate::kinds::OperationId;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn normal(view: View, code: KeyCode) -> Option<Action> {
        key_to_action(press(code), &view, &InputMode::Normal, &Overlay::None, "")
    }

    #[test]
    fn operation_keys_follow_the_list() {
        let action = normal(View::Collection(KindId::Parent), KeyCode::Char('o'));
        assert!(matches!(action, Some(Action::RunOperation(OperationId::Open))));

        let action = normal(View::Collection(KindId::TestService), KeyCode::Char('o'));
        assert!(action.is_none());

        let action = normal(View::Dashboard, KeyCode::Char('d'));
        assert!(action.is_none());
    }

    #[test]
    fn search_typing_rewrites_buffer() {
        let action = key_to_action(
            press(KeyCode::Char('b')),
            &View::Collection(KindId::Registration),
            &InputMode::Search,
            &Overlay::None,
            "la",
        );
        assert!(matches!(action, Some(Action::UpdateInputBuffer(ref b)) if b == "lab"));

        let action = key_to_action(
            press(KeyCode::Enter),
            &View::Collection(KindId::Registration),
            &InputMode::Search,
            &Overlay::None,
            "lab",
        );
        assert!(matches!(action, Some(Action::CloseOverlay)));
    }

    #[test]
    fn confirm_modal_answers() {
        let overlay = Overlay::Confirm("Delete?".to_string());
        let view = View::Collection(KindId::Parent);
        let yes = key_to_action(press(KeyCode::Char('y')), &view, &InputMode::Normal, &overlay, "");
        let no = key_to_action(press(KeyCode::Esc), &view, &InputMode::Normal, &overlay, "");
        let other = key_to_action(press(KeyCode::Char('d')), &view, &InputMode::Normal, &overlay, "");
        assert!(matches!(yes, Some(Action::ConfirmAnswer(true))));
        assert!(matches!(no, Some(Action::ConfirmAnswer(false))));
        assert!(other.is_none());
    }

    #[test]
    fn forms_capture_letters() {
        let overlay = Overlay::Form(FormState::parent(None));
        let view = View::Collection(KindId::Parent);
        let action = key_to_action(press(KeyCode::Char('q')), &view, &InputMode::Normal, &overlay, "");
        assert!(matches!(action, Some(Action::FormInput('q'))));
    }

    #[test]
    fn paging_and_tabs() {
        let view = View::Collection(KindId::TestService);
        assert!(matches!(normal(view.clone(), KeyCode::Char(']')), Some(Action::NextPage)));
        assert!(matches!(normal(view, KeyCode::Left), Some(Action::PrevPage)));
        assert!(matches!(
            normal(View::Dashboard, KeyCode::Char('4')),
            Some(Action::SwitchView(ViewType::Parents))
        ));
        assert!(matches!(
            normal(View::Collection(KindId::Registration), KeyCode::Char('t')),
            Some(Action::ToggleRegType)
        ));
    }
}
