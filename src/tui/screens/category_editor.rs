//! Category create/edit modal state

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::models::CategoryDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Name,
    Image,
    Subcategories,
}

impl EditorField {
    fn next(self) -> Self {
        match self {
            EditorField::Name => EditorField::Image,
            EditorField::Image => EditorField::Subcategories,
            EditorField::Subcategories => EditorField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            EditorField::Name => EditorField::Subcategories,
            EditorField::Image => EditorField::Name,
            EditorField::Subcategories => EditorField::Image,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Cancel,
    Save,
}

#[derive(Debug, Clone)]
pub struct CategoryEditor {
    pub draft: CategoryDraft,
    pub field: EditorField,
    /// Subcategory being typed
    pub subcategory_input: String,
    /// Validation error from the last save attempt
    pub error: Option<String>,
}

impl CategoryEditor {
    pub fn new(draft: CategoryDraft) -> Self {
        Self {
            draft,
            field: EditorField::Name,
            subcategory_input: String::new(),
            error: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.draft.editing.is_some() {
            "Edit Category"
        } else {
            "Add Category"
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return EditorAction::Save;
        }

        match key.code {
            KeyCode::Esc => return EditorAction::Cancel,
            KeyCode::Tab | KeyCode::Down => self.field = self.field.next(),
            KeyCode::BackTab | KeyCode::Up => self.field = self.field.previous(),
            KeyCode::Enter => match self.field {
                EditorField::Subcategories if !self.subcategory_input.trim().is_empty() => {
                    self.draft.add_subcategory(&self.subcategory_input);
                    self.subcategory_input.clear();
                }
                EditorField::Subcategories => return EditorAction::Save,
                _ => self.field = self.field.next(),
            },
            KeyCode::Backspace => match self.field {
                EditorField::Name => {
                    self.draft.name.pop();
                }
                EditorField::Image => {
                    self.draft.image.pop();
                }
                EditorField::Subcategories => {
                    // Backspace on an empty input drops the last subcategory
                    if self.subcategory_input.pop().is_none() {
                        if let Some(last) = self.draft.subcategories.last().cloned() {
                            self.draft.remove_subcategory(&last);
                        }
                    }
                }
            },
            KeyCode::Char(c) => match self.field {
                EditorField::Name => self.draft.name.push(c),
                EditorField::Image => self.draft.image.push(c),
                EditorField::Subcategories => self.subcategory_input.push(c),
            },
            _ => {}
        }
        EditorAction::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(editor: &mut CategoryEditor, text: &str) {
        for c in text.chars() {
            editor.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_fill_and_save() {
        let mut editor = CategoryEditor::new(CategoryDraft::default());
        assert_eq!(editor.title(), "Add Category");
        type_text(&mut editor, "Fashion");
        editor.handle_key(key(KeyCode::Tab));
        type_text(&mut editor, "fashion.png");
        editor.handle_key(key(KeyCode::Tab));
        type_text(&mut editor, "  Shoes ");
        editor.handle_key(key(KeyCode::Enter));
        type_text(&mut editor, "Shoes");
        editor.handle_key(key(KeyCode::Enter));
        assert_eq!(editor.draft.subcategories, vec!["Shoes"]);

        // Enter on an empty subcategory input saves
        assert_eq!(editor.handle_key(key(KeyCode::Enter)), EditorAction::Save);
        assert_eq!(editor.draft.name, "Fashion");
        assert_eq!(editor.draft.image, "fashion.png");
    }

    #[test]
    fn test_backspace_removes_last_subcategory() {
        let mut draft = CategoryDraft::default();
        draft.add_subcategory("Phones");
        draft.add_subcategory("Audio");
        let mut editor = CategoryEditor::new(draft);
        editor.field = EditorField::Subcategories;
        editor.handle_key(key(KeyCode::Backspace));
        assert_eq!(editor.draft.subcategories, vec!["Phones"]);
    }

    #[test]
    fn test_ctrl_s_and_escape() {
        let mut editor = CategoryEditor::new(CategoryDraft::default());
        let save = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(editor.handle_key(save), EditorAction::Save);
        assert_eq!(editor.handle_key(key(KeyCode::Esc)), EditorAction::Cancel);
        assert!(editor.draft.name.is_empty());
    }
}
