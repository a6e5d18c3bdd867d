use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use toneshift_core::Tone;
use toneshift_core::ToneCatalog;

use crate::app_event::AppEvent;
use crate::editor::TextBuffer;

/// Tone cards per grid row; keyboard navigation and rendering agree on this.
pub(crate) const GRID_COLS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Focus {
    Tones,
    Editor,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum DraftField {
    #[default]
    Name,
    Description,
}

/// In-progress custom tone from the create modal.
#[derive(Debug, Default)]
pub(crate) struct ToneDraft {
    pub(crate) name: TextBuffer,
    pub(crate) description: TextBuffer,
    pub(crate) field: DraftField,
    pub(crate) error: Option<String>,
}

/// Side effects the event loop carries out after a transition. Keeping them
/// out of the reducer keeps every transition testable without a terminal,
/// a runtime, or a clipboard.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Effect {
    StartGeneration { input: String, tone: Tone },
    CopyToClipboard { text: String, seq: u64 },
}

/// The whole UI state. Mutated only by `handle_key`/`handle_paste`/`apply`.
pub(crate) struct AppState {
    pub(crate) catalog: ToneCatalog,
    pub(crate) selected: Option<String>,
    pub(crate) cursor: usize,
    pub(crate) focus: Focus,
    pub(crate) input: TextBuffer,
    pub(crate) output: Option<String>,
    pub(crate) error: Option<String>,
    pub(crate) busy: bool,
    pub(crate) copied: bool,
    copy_seq: u64,
    pub(crate) draft: Option<ToneDraft>,
    pub(crate) confirm_delete: Option<String>,
    pub(crate) should_exit: bool,
}

impl AppState {
    pub(crate) fn new(catalog: ToneCatalog) -> Self {
        Self {
            catalog,
            selected: None,
            cursor: 0,
            focus: Focus::Tones,
            input: TextBuffer::new(),
            output: None,
            error: None,
            busy: false,
            copied: false,
            copy_seq: 0,
            draft: None,
            confirm_delete: None,
            should_exit: false,
        }
    }

    pub(crate) fn can_generate(&self) -> bool {
        !self.busy && self.selected.is_some() && !self.input.text().trim().is_empty()
    }

    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Vec<Effect> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_exit = true;
            return Vec::new();
        }
        if self.confirm_delete.is_some() {
            self.handle_confirm_key(key);
            return Vec::new();
        }
        if self.draft.is_some() {
            self.handle_draft_key(key);
            return Vec::new();
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('g') => self.start_generation(),
                KeyCode::Char('y') => self.copy_output(),
                _ => Vec::new(),
            };
        }

        match key.code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::Tones => Focus::Editor,
                    Focus::Editor => Focus::Tones,
                };
                Vec::new()
            }
            _ => {
                match self.focus {
                    Focus::Tones => self.handle_tones_key(key),
                    Focus::Editor => self.handle_editor_key(key),
                }
                Vec::new()
            }
        }
    }

    pub(crate) fn handle_paste(&mut self, pasted: String) {
        if let Some(draft) = self.draft.as_mut() {
            match draft.field {
                DraftField::Name => draft.name.insert_str(&pasted),
                DraftField::Description => draft.description.insert_str(&pasted),
            }
        } else if self.focus == Focus::Editor {
            self.input.insert_str(&pasted);
        }
    }

    pub(crate) fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::GenerationComplete(result) => {
                self.busy = false;
                match result {
                    Ok(text) => self.output = Some(text),
                    Err(err) => self.error = Some(err.to_string()),
                }
            }
            AppEvent::CopyAckExpired { seq } => {
                if seq == self.copy_seq {
                    self.copied = false;
                }
            }
        }
    }

    pub(crate) fn copy_failed(&mut self, message: String) {
        self.copied = false;
        self.error = Some(message);
    }

    fn handle_tones_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-(GRID_COLS as isize)),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(GRID_COLS as isize),
            KeyCode::Enter | KeyCode::Char(' ') => self.select_highlighted(),
            KeyCode::Char('n') => {
                self.draft = Some(ToneDraft::default());
            }
            KeyCode::Char('d') | KeyCode::Delete => self.request_delete(),
            KeyCode::Char('q') => self.should_exit = true,
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(ch) => self.input.insert_char(ch),
            KeyCode::Enter => self.input.insert_char('\n'),
            KeyCode::Backspace => self.input.backspace(),
            KeyCode::Delete => self.input.delete_forward(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Up => self.input.move_up(),
            KeyCode::Down => self.input.move_down(),
            KeyCode::Home => self.input.move_line_start(),
            KeyCode::End => self.input.move_line_end(),
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Some(name) = self.confirm_delete.take() {
                    self.delete_tone(&name);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete = None;
            }
            _ => {}
        }
    }

    fn handle_draft_key(&mut self, key: KeyEvent) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc => {
                self.draft = None;
            }
            KeyCode::Tab | KeyCode::BackTab => {
                draft.field = match draft.field {
                    DraftField::Name => DraftField::Description,
                    DraftField::Description => DraftField::Name,
                };
            }
            KeyCode::Enter => self.submit_draft(),
            _ => {
                let field = match draft.field {
                    DraftField::Name => &mut draft.name,
                    DraftField::Description => &mut draft.description,
                };
                match key.code {
                    KeyCode::Char(ch) => field.insert_char(ch),
                    KeyCode::Backspace => field.backspace(),
                    KeyCode::Delete => field.delete_forward(),
                    KeyCode::Left => field.move_left(),
                    KeyCode::Right => field.move_right(),
                    KeyCode::Home => field.move_line_start(),
                    KeyCode::End => field.move_line_end(),
                    _ => {}
                }
            }
        }
    }

    fn submit_draft(&mut self) {
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        match self
            .catalog
            .create(draft.name.text(), draft.description.text())
        {
            Ok(()) => {
                self.draft = None;
            }
            Err(err) => {
                draft.error = Some(err.to_string());
            }
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.catalog.is_empty() {
            return;
        }
        let last = self.catalog.len() - 1;
        let next = self.cursor.saturating_add_signed(delta).min(last);
        self.cursor = next;
    }

    fn select_highlighted(&mut self) {
        if let Some(tone) = self.catalog.get(self.cursor) {
            self.selected = Some(tone.name.clone());
            self.error = None;
        }
    }

    /// Destructive delete goes through a confirmation overlay; built-ins are
    /// not deletable so the request is ignored for them.
    fn request_delete(&mut self) {
        if let Some(tone) = self.catalog.get(self.cursor)
            && !self.catalog.is_built_in(&tone.name)
        {
            self.confirm_delete = Some(tone.name.clone());
        }
    }

    fn delete_tone(&mut self, name: &str) {
        if !self.catalog.delete(name) {
            return;
        }
        if self.selected.as_deref() == Some(name) {
            self.selected = None;
        }
        if !self.catalog.is_empty() {
            self.cursor = self.cursor.min(self.catalog.len() - 1);
        }
    }

    /// At most one generation in flight: the busy flag swallows re-triggers
    /// until `GenerationComplete` lands.
    fn start_generation(&mut self) -> Vec<Effect> {
        if self.busy {
            return Vec::new();
        }
        let tone = self
            .selected
            .as_deref()
            .and_then(|name| self.catalog.find(name));
        let input = self.input.text().trim();
        let (Some(tone), false) = (tone, input.is_empty()) else {
            self.error = Some("Please select a tone and enter some text.".to_string());
            return Vec::new();
        };
        let tone = tone.clone();
        self.busy = true;
        self.error = None;
        self.output = None;
        self.copied = false;
        vec![Effect::StartGeneration {
            input: self.input.text().to_string(),
            tone,
        }]
    }

    fn copy_output(&mut self) -> Vec<Effect> {
        let Some(text) = self.output.clone().filter(|text| !text.is_empty()) else {
            return Vec::new();
        };
        self.copy_seq += 1;
        self.copied = true;
        vec![Effect::CopyToClipboard {
            text,
            seq: self.copy_seq,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use toneshift_core::GenerationError;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn state() -> (tempfile::TempDir, AppState) {
        let home = tempfile::tempdir().unwrap();
        let state = AppState::new(ToneCatalog::load(home.path()));
        (home, state)
    }

    fn select_tone(state: &mut AppState, name: &str) {
        let index = state
            .catalog
            .all()
            .position(|tone| tone.name == name)
            .unwrap();
        state.cursor = index;
        state.handle_key(key(KeyCode::Enter));
    }

    fn type_text(state: &mut AppState, text: &str) {
        state.focus = Focus::Editor;
        for ch in text.chars() {
            state.handle_key(key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn generate_emits_one_effect_and_sets_busy() {
        let (_home, mut state) = state();
        select_tone(&mut state, "Witty Comedian");
        type_text(&mut state, "I lost my keys again");

        let effects = state.handle_key(ctrl('g'));
        assert_eq!(effects.len(), 1);
        let Effect::StartGeneration { input, tone } = &effects[0] else {
            panic!("expected StartGeneration, got {:?}", effects[0]);
        };
        assert_eq!(input, "I lost my keys again");
        assert_eq!(tone.name, "Witty Comedian");
        assert!(state.busy);
        assert!(!state.can_generate());
    }

    #[test]
    fn generate_without_tone_or_text_fails_locally() {
        let (_home, mut state) = state();
        // No tone, no text.
        assert_eq!(state.handle_key(ctrl('g')), Vec::new());
        assert!(state.error.is_some());
        assert!(!state.busy);

        // Tone but whitespace-only text is still rejected.
        state.error = None;
        select_tone(&mut state, "Witty Comedian");
        type_text(&mut state, "   ");
        assert_eq!(state.handle_key(ctrl('g')), Vec::new());
        assert!(state.error.is_some());
    }

    #[test]
    fn generate_while_busy_is_swallowed() {
        let (_home, mut state) = state();
        select_tone(&mut state, "Witty Comedian");
        type_text(&mut state, "hello");
        assert_eq!(state.handle_key(ctrl('g')).len(), 1);
        assert_eq!(state.handle_key(ctrl('g')), Vec::new());
    }

    #[test]
    fn successful_generation_lands_in_the_output_panel() {
        let (_home, mut state) = state();
        select_tone(&mut state, "Witty Comedian");
        type_text(&mut state, "I lost my keys again");
        state.handle_key(ctrl('g'));

        state.apply(AppEvent::GenerationComplete(Ok(
            "Ah yes, the keys: gone again.".to_string(),
        )));
        assert!(!state.busy);
        assert_eq!(state.output.as_deref(), Some("Ah yes, the keys: gone again."));
        assert_eq!(state.error, None);
        assert!(state.can_generate());
    }

    #[test]
    fn failed_generation_shows_an_error_and_reenables_generate() {
        let (_home, mut state) = state();
        select_tone(&mut state, "Witty Comedian");
        type_text(&mut state, "hello");
        state.handle_key(ctrl('g'));

        state.apply(AppEvent::GenerationComplete(Err(
            GenerationError::Transport("connection refused".to_string()),
        )));
        assert!(!state.busy);
        assert_eq!(state.output, None);
        let error = state.error.clone().unwrap();
        assert!(!error.is_empty());
        assert!(error.contains("connection refused"));
        assert!(state.can_generate());
    }

    #[test]
    fn creating_a_custom_tone_through_the_modal() {
        let (_home, mut state) = state();
        let before = state.catalog.len();

        state.handle_key(key(KeyCode::Char('n')));
        assert!(state.draft.is_some());
        for ch in "Pirate".chars() {
            state.handle_key(key(KeyCode::Char(ch)));
        }
        state.handle_key(key(KeyCode::Tab));
        for ch in "Arrr, speak like a pirate".chars() {
            state.handle_key(key(KeyCode::Char(ch)));
        }
        state.handle_key(key(KeyCode::Enter));

        assert!(state.draft.is_none());
        assert_eq!(state.catalog.len(), before + 1);
        // New tone lands after every built-in and is selectable.
        assert_eq!(
            state.catalog.all().last().map(|tone| tone.name.as_str()),
            Some("Pirate")
        );
        assert!(!state.catalog.is_built_in("Pirate"));
        select_tone(&mut state, "Pirate");
        assert_eq!(state.selected.as_deref(), Some("Pirate"));
    }

    #[test]
    fn duplicate_name_keeps_the_modal_open_with_an_inline_error() {
        let (_home, mut state) = state();
        state.catalog.create("Pirate", "Arrr").unwrap();
        let before = state.catalog.len();

        state.handle_key(key(KeyCode::Char('n')));
        for ch in "pirate".chars() {
            state.handle_key(key(KeyCode::Char(ch)));
        }
        state.handle_key(key(KeyCode::Tab));
        for ch in "different".chars() {
            state.handle_key(key(KeyCode::Char(ch)));
        }
        state.handle_key(key(KeyCode::Enter));

        let draft = state.draft.as_ref().unwrap();
        assert!(draft.error.as_deref().unwrap().contains("pirate"));
        assert_eq!(state.catalog.len(), before);
    }

    #[test]
    fn empty_draft_fields_are_rejected_inline() {
        let (_home, mut state) = state();
        let before = state.catalog.len();
        state.handle_key(key(KeyCode::Char('n')));
        state.handle_key(key(KeyCode::Enter));
        assert!(state.draft.as_ref().unwrap().error.is_some());
        assert_eq!(state.catalog.len(), before);
    }

    #[test]
    fn deleting_the_selected_tone_clears_the_selection() {
        let (_home, mut state) = state();
        state.catalog.create("Pirate", "Arrr").unwrap();
        select_tone(&mut state, "Pirate");
        assert_eq!(state.selected.as_deref(), Some("Pirate"));

        state.handle_key(key(KeyCode::Char('d')));
        assert_eq!(state.confirm_delete.as_deref(), Some("Pirate"));
        state.handle_key(key(KeyCode::Char('y')));

        assert_eq!(state.selected, None);
        assert!(state.catalog.find("Pirate").is_none());
    }

    #[test]
    fn deleting_a_non_selected_tone_leaves_the_selection_alone() {
        let (_home, mut state) = state();
        state.catalog.create("Pirate", "Arrr").unwrap();
        select_tone(&mut state, "Witty Comedian");

        state.cursor = state.catalog.len() - 1;
        state.handle_key(key(KeyCode::Char('d')));
        state.handle_key(key(KeyCode::Char('y')));

        assert_eq!(state.selected.as_deref(), Some("Witty Comedian"));
    }

    #[test]
    fn declining_the_confirmation_deletes_nothing() {
        let (_home, mut state) = state();
        state.catalog.create("Pirate", "Arrr").unwrap();
        state.cursor = state.catalog.len() - 1;
        state.handle_key(key(KeyCode::Char('d')));
        state.handle_key(key(KeyCode::Char('n')));
        assert_eq!(state.confirm_delete, None);
        assert!(state.catalog.find("Pirate").is_some());
    }

    #[test]
    fn built_in_tones_get_no_delete_confirmation() {
        let (_home, mut state) = state();
        state.cursor = 0;
        state.handle_key(key(KeyCode::Char('d')));
        assert_eq!(state.confirm_delete, None);
    }

    #[test]
    fn copy_acknowledgment_expires_only_for_the_matching_copy() {
        let (_home, mut state) = state();
        state.output = Some("rewritten".to_string());

        let effects = state.handle_key(ctrl('y'));
        let Effect::CopyToClipboard { seq: first, .. } = effects[0] else {
            panic!("expected CopyToClipboard");
        };
        assert!(state.copied);

        // A second copy supersedes the first; the stale expiry is ignored.
        let effects = state.handle_key(ctrl('y'));
        let Effect::CopyToClipboard { seq: second, .. } = effects[0] else {
            panic!("expected CopyToClipboard");
        };
        state.apply(AppEvent::CopyAckExpired { seq: first });
        assert!(state.copied);
        state.apply(AppEvent::CopyAckExpired { seq: second });
        assert!(!state.copied);
    }

    #[test]
    fn copy_with_no_output_does_nothing() {
        let (_home, mut state) = state();
        assert_eq!(state.handle_key(ctrl('y')), Vec::new());
        assert!(!state.copied);
    }
}
