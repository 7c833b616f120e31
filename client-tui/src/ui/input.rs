use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
    NextMove,
    PrevMove,
    Start,
    End,
    NextReview,
    PrevReview,
    Refresh,
    RequestFullReview,
    PlaySuggestion,
    BackToTrunk,
    ToggleTheme,
}

pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }
    let command = match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        KeyCode::Right | KeyCode::Char('l') => Command::NextMove,
        KeyCode::Left | KeyCode::Char('h') => Command::PrevMove,
        KeyCode::Home | KeyCode::Char('g') => Command::Start,
        KeyCode::End | KeyCode::Char('G') => Command::End,
        KeyCode::Down | KeyCode::Char('j') => Command::NextReview,
        KeyCode::Up | KeyCode::Char('k') => Command::PrevReview,
        KeyCode::Char('r') => Command::Refresh,
        KeyCode::Char('f') => Command::RequestFullReview,
        KeyCode::Char('s') => Command::PlaySuggestion,
        KeyCode::Backspace | KeyCode::Char('t') => Command::BackToTrunk,
        KeyCode::Char('T') => Command::ToggleTheme,
        _ => return None,
    };
    Some(command)
}

pub const HELP: &str = "\u{2190}/\u{2192} move  g/G start/end  j/k review  s suggestion  t trunk  r refresh  f full review  T theme  q quit";
