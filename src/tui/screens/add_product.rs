//! Add-product form state

use crossterm::event::{KeyCode, KeyEvent};

use crate::core::submission::MAX_IMAGES;
use crate::core::ProductForm;
use crate::models::{Category, PromotionPlan};

/// Form fields in tab order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Description,
    Condition,
    Category,
    Subcategory,
    Price,
    Images,
    Promotion,
    Submit,
}

impl FormField {
    pub const ALL: &'static [FormField] = &[
        FormField::Name,
        FormField::Description,
        FormField::Condition,
        FormField::Category,
        FormField::Subcategory,
        FormField::Price,
        FormField::Images,
        FormField::Promotion,
        FormField::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Description => "Description",
            FormField::Condition => "Condition",
            FormField::Category => "Category",
            FormField::Subcategory => "Subcategory",
            FormField::Price => "Price",
            FormField::Images => "Images",
            FormField::Promotion => "Promotion",
            FormField::Submit => "Submit",
        }
    }

    /// Fields that take typed characters
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Name | FormField::Description | FormField::Price | FormField::Images
        )
    }

    fn offset(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ALL[(index + delta).rem_euclid(len) as usize]
    }
}

/// What the app should do after the form handled a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Back,
    /// Start typing a payment return URL
    Reconcile,
}

#[derive(Debug, Default)]
pub struct AddProductScreen {
    pub form: ProductForm,
    pub field: FormField,
    /// Image path being typed
    pub image_input: String,
    pub categories: Vec<Category>,
    pub plans: Vec<PromotionPlan>,
    pub loading: bool,
    pub loaded: bool,
    pub error: Option<String>,
    /// Payment return URL being typed, when open
    pub return_input: Option<String>,
    /// Gateway URL of the last paid submission
    pub authorization_url: Option<String>,
}

impl AddProductScreen {
    /// Install the lists fetched from the backend
    pub fn set_choices(&mut self, categories: Vec<Category>, plans: Vec<PromotionPlan>) {
        self.categories = categories;
        self.plans = plans.into_iter().filter(|p| p.is_active).collect();
        self.loading = false;
        self.loaded = true;
        self.error = None;
        if self.selected_category().is_none() {
            self.form.category_id.clear();
            self.form.subcategory.clear();
        }
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.id == self.form.category_id)
    }

    pub fn selected_plan(&self) -> Option<&PromotionPlan> {
        let kind = self.form.promotion.as_deref()?;
        self.plans.iter().find(|p| p.kind == kind)
    }

    /// Display value of a field
    pub fn value(&self, field: FormField) -> String {
        match field {
            FormField::Name => self.form.name.clone(),
            FormField::Description => self.form.description.clone(),
            FormField::Condition => self.form.condition.as_str().to_string(),
            FormField::Category => self
                .selected_category()
                .map_or_else(|| "(none)".to_string(), |c| c.name.clone()),
            FormField::Subcategory => {
                if self.form.subcategory.is_empty() {
                    "(none)".to_string()
                } else {
                    self.form.subcategory.clone()
                }
            }
            FormField::Price => self.form.price.clone(),
            FormField::Images => self.image_input.clone(),
            FormField::Promotion => self
                .selected_plan()
                .map_or_else(|| "Free listing".to_string(), |p| p.summary()),
            FormField::Submit => String::new(),
        }
    }

    /// Reset after a free listing succeeds; fetched lists stay
    pub fn reset(&mut self) {
        self.form.reset();
        self.image_input.clear();
        self.field = FormField::Name;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if self.return_input.is_some() {
            return self.handle_return_key(key);
        }

        match key.code {
            KeyCode::Esc => return FormAction::Back,
            KeyCode::Tab | KeyCode::Down => self.field = self.field.offset(1),
            KeyCode::BackTab | KeyCode::Up => self.field = self.field.offset(-1),
            KeyCode::Enter => match self.field {
                FormField::Submit => return FormAction::Submit,
                FormField::Images => self.add_image(),
                _ => self.field = self.field.offset(1),
            },
            KeyCode::Left => self.cycle(false),
            KeyCode::Right => self.cycle(true),
            KeyCode::Backspace => match self.field {
                FormField::Name => {
                    self.form.name.pop();
                }
                FormField::Description => {
                    self.form.description.pop();
                }
                FormField::Price => {
                    self.form.price.pop();
                }
                FormField::Images => {
                    // Backspace on an empty input drops the last image
                    if self.image_input.pop().is_none() && !self.form.images.is_empty() {
                        self.form.remove_image(self.form.images.len() - 1);
                    }
                }
                _ => {}
            },
            KeyCode::Char(c) if self.field.is_text() => match self.field {
                FormField::Name => self.form.name.push(c),
                FormField::Description => self.form.description.push(c),
                FormField::Price => self.form.price.push(c),
                FormField::Images => self.image_input.push(c),
                _ => {}
            },
            KeyCode::Char(' ') => self.cycle(true),
            KeyCode::Char('p') => {
                self.return_input = Some(String::new());
                return FormAction::None;
            }
            _ => {}
        }
        FormAction::None
    }

    fn handle_return_key(&mut self, key: KeyEvent) -> FormAction {
        let Some(input) = self.return_input.as_mut() else {
            return FormAction::None;
        };
        match key.code {
            KeyCode::Esc => self.return_input = None,
            KeyCode::Enter => return FormAction::Reconcile,
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Char(c) => input.push(c),
            _ => {}
        }
        FormAction::None
    }

    fn add_image(&mut self) {
        let path = self.image_input.trim().to_string();
        if path.is_empty() {
            return;
        }
        match self.form.add_image(path) {
            Ok(()) => {
                self.image_input.clear();
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Step an enumerated field through its options
    fn cycle(&mut self, forward: bool) {
        match self.field {
            FormField::Condition => {
                self.form.condition = if forward {
                    self.form.condition.next()
                } else {
                    self.form.condition.next().next()
                };
            }
            FormField::Category => {
                let ids: Vec<&str> = self.categories.iter().map(|c| c.id.as_str()).collect();
                if let Some(id) = step(&ids, &self.form.category_id, forward) {
                    self.form.category_id = id;
                    self.form.subcategory.clear();
                }
            }
            FormField::Subcategory => {
                let Some(category) = self.selected_category() else {
                    return;
                };
                let names: Vec<&str> = category.subcategories.iter().map(String::as_str).collect();
                if let Some(name) = step(&names, &self.form.subcategory, forward) {
                    self.form.subcategory = name;
                }
            }
            FormField::Promotion => {
                // `None` is the free listing, ahead of every plan
                let mut kinds: Vec<&str> = vec![""];
                kinds.extend(self.plans.iter().map(|p| p.kind.as_str()));
                let current = self.form.promotion.as_deref().unwrap_or("");
                if let Some(kind) = step(&kinds, current, forward) {
                    self.form.promotion = (!kind.is_empty()).then_some(kind);
                }
            }
            _ => {}
        }
    }

    pub fn image_count_label(&self) -> String {
        format!("{}/{}", self.form.images.len(), MAX_IMAGES)
    }
}

/// Neighbour of `current` in `options`, wrapping; the first option when absent
fn step(options: &[&str], current: &str, forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }
    let len = options.len();
    let next = match options.iter().position(|o| *o == current) {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    Some(options[next].to_string())
}
