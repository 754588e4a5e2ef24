// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use tracing::debug;

use crate::{Activity, ActivityCategory, ActivityId, ActivityState, Category, catalog};

const MAX_CALORIE_DIGITS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Category,
    Name,
    Calories,
    Details,
}

impl FormField {
    pub const ALL: [Self; 4] = [Self::Category, Self::Name, Self::Calories, Self::Details];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Name => "name",
            Self::Calories => "calories",
            Self::Details => "details",
        }
    }

    pub const fn has_choices(self) -> bool {
        matches!(self, Self::Category | Self::Name)
    }

    fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|field| *field == self)
            .unwrap_or(0)
    }
}

/// Editable mirror of one activity. Seeds itself from the active record and
/// hands a validated copy back on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityForm {
    draft: Activity,
    calories_input: String,
    field: FormField,
    seeded_from: Option<ActivityId>,
}

impl Default for ActivityForm {
    fn default() -> Self {
        Self::blank()
    }
}

impl ActivityForm {
    pub fn blank() -> Self {
        Self {
            draft: Activity::blank(),
            calories_input: String::new(),
            field: FormField::Category,
            seeded_from: None,
        }
    }

    pub fn draft(&self) -> &Activity {
        &self.draft
    }

    pub fn field(&self) -> FormField {
        self.field
    }

    pub fn calories_input(&self) -> &str {
        &self.calories_input
    }

    /// Id of the stored record this draft was loaded from, if any.
    pub fn editing(&self) -> Option<ActivityId> {
        self.seeded_from
    }

    pub fn name_options(&self) -> &'static [Category] {
        catalog::options_for(self.draft.category)
    }

    /// Reloads the draft when the active id names a different existing
    /// record, and drops it when the record it was loaded from is gone.
    /// Returns true when the draft changed.
    pub fn sync(&mut self, state: &ActivityState) -> bool {
        if let Some(active) = state.active() {
            if self.seeded_from == Some(active.id) {
                return false;
            }
            self.load(active);
            return true;
        }

        if let Some(seeded) = self.seeded_from
            && state.find(seeded).is_none()
        {
            debug!(activity = %seeded, "edited activity removed; form reset");
            self.reset();
            return true;
        }
        false
    }

    fn load(&mut self, activity: &Activity) {
        debug!(activity = %activity.id, "form seeded from activity");
        self.draft = activity.clone();
        self.calories_input = if activity.calories == 0 {
            String::new()
        } else {
            activity.calories.to_string()
        };
        self.field = FormField::Category;
        self.seeded_from = Some(activity.id);
    }

    pub fn reset(&mut self) {
        *self = Self::blank();
    }

    pub fn move_field(&mut self, delta: isize) -> FormField {
        let len = FormField::ALL.len() as isize;
        let next = (self.field.index() as isize + delta).rem_euclid(len) as usize;
        self.field = FormField::ALL[next];
        self.field
    }

    pub fn focus(&mut self, field: FormField) {
        self.field = field;
    }

    /// Switches the discriminator. A name that belongs to the other
    /// reference list is cleared.
    pub fn set_category(&mut self, category: ActivityCategory) {
        self.draft.category = category;
        if !catalog::is_known_name(category, &self.draft.name) {
            self.draft.name.clear();
        }
    }

    /// Applies the `index`-th choice of the focused field. Returns the label
    /// that was chosen, or `None` when the field has no such choice.
    pub fn choose(&mut self, index: usize) -> Option<&'static str> {
        match self.field {
            FormField::Category => {
                let category = ActivityCategory::CHOICES.get(index).copied()?;
                self.set_category(category);
                Some(category.label())
            }
            FormField::Name => {
                let option = self.name_options().get(index)?;
                self.draft.name = option.name.to_owned();
                Some(option.name)
            }
            FormField::Calories | FormField::Details => None,
        }
    }

    /// Steps through the focused field's choices, wrapping at either end.
    pub fn cycle(&mut self, delta: isize) -> Option<&'static str> {
        let (len, current) = match self.field {
            FormField::Category => (
                ActivityCategory::CHOICES.len(),
                ActivityCategory::CHOICES
                    .iter()
                    .position(|choice| choice.is_food() == self.draft.category.is_food()),
            ),
            FormField::Name => {
                let options = self.name_options();
                (
                    options.len(),
                    options
                        .iter()
                        .position(|option| option.name == self.draft.name),
                )
            }
            FormField::Calories | FormField::Details => return None,
        };
        if len == 0 {
            return None;
        }

        let next = match current {
            Some(index) => (index as isize + delta).rem_euclid(len as isize) as usize,
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.choose(next)
    }

    /// Types one character into the focused text field. Calories accept
    /// digits only.
    pub fn push_char(&mut self, ch: char) -> bool {
        match self.field {
            FormField::Calories => {
                if !ch.is_ascii_digit() || self.calories_input.len() >= MAX_CALORIE_DIGITS {
                    return false;
                }
                if self.calories_input == "0" {
                    self.calories_input.clear();
                }
                self.calories_input.push(ch);
                self.sync_calories();
                true
            }
            FormField::Details => {
                if ch.is_control() {
                    return false;
                }
                self.draft.details.push(ch);
                true
            }
            FormField::Category | FormField::Name => false,
        }
    }

    pub fn backspace(&mut self) -> bool {
        match self.field {
            FormField::Calories => {
                let removed = self.calories_input.pop().is_some();
                self.sync_calories();
                removed
            }
            FormField::Details => self.draft.details.pop().is_some(),
            FormField::Category | FormField::Name => false,
        }
    }

    fn sync_calories(&mut self) {
        self.draft.calories = self.calories_input.parse().unwrap_or(0);
    }

    pub fn validate(&self) -> Result<()> {
        if self.draft.name.trim().is_empty() {
            bail!("activity name is required -- choose a name and retry");
        }
        if self.draft.calories <= 0 {
            bail!("calories must be positive -- enter a value such as 300 or 500");
        }
        Ok(())
    }

    pub fn is_savable(&self) -> bool {
        self.validate().is_ok()
    }

    /// Hands back the draft for saving and starts over with a fresh blank
    /// one. Invalid drafts are kept as-is.
    pub fn submit(&mut self) -> Result<Activity> {
        self.validate()?;
        let saved = std::mem::replace(self, Self::blank()).draft;
        Ok(saved)
    }

    pub fn save_label(&self) -> String {
        format!("save {}", self.draft.category.label())
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivityForm, FormField};
    use crate::{Activity, ActivityAction, ActivityCategory, ActivityId, ActivityState};

    fn stored(category: ActivityCategory, name: &str, calories: i64) -> Activity {
        Activity {
            id: ActivityId::generate(),
            category,
            name: name.to_owned(),
            calories,
            details: "con hielo".to_owned(),
        }
    }

    fn type_text(form: &mut ActivityForm, text: &str) {
        for ch in text.chars() {
            form.push_char(ch);
        }
    }

    #[test]
    fn blank_form_starts_as_unsavable_food_draft() {
        let form = ActivityForm::blank();
        assert_eq!(form.draft().category, ActivityCategory::FOOD);
        assert_eq!(form.field(), FormField::Category);
        assert!(!form.is_savable());
        assert_eq!(form.save_label(), "save food");
    }

    #[test]
    fn zero_calories_rejected() {
        let mut form = ActivityForm::blank();
        form.focus(FormField::Name);
        form.choose(0);
        form.focus(FormField::Calories);
        type_text(&mut form, "0");

        let error = form.submit().expect_err("zero calories should fail");
        assert!(error.to_string().contains("calories must be positive"));
        assert_eq!(form.draft().name, "Jugo");
    }

    #[test]
    fn whitespace_name_rejected() {
        let mut form = ActivityForm::blank();
        form.focus(FormField::Calories);
        type_text(&mut form, "120");

        let error = form.validate().expect_err("empty name should fail");
        assert!(error.to_string().contains("name is required"));
    }

    #[test]
    fn calories_accept_digits_only() {
        let mut form = ActivityForm::blank();
        form.focus(FormField::Calories);
        type_text(&mut form, "3a0-0");
        assert_eq!(form.calories_input(), "300");
        assert_eq!(form.draft().calories, 300);

        assert!(form.backspace());
        assert_eq!(form.draft().calories, 30);
    }

    #[test]
    fn category_change_clears_name_from_other_list() {
        let mut form = ActivityForm::blank();
        form.focus(FormField::Name);
        assert_eq!(form.choose(2), Some("Tacos"));

        form.set_category(ActivityCategory::EXERCISE);
        assert_eq!(form.draft().name, "");
        assert_eq!(form.name_options()[0].name, "Pesas");
        assert_eq!(form.save_label(), "save exercise");
    }

    #[test]
    fn cycle_wraps_through_name_options() {
        let mut form = ActivityForm::blank();
        form.focus(FormField::Name);
        assert_eq!(form.cycle(-1), Some("Arroz"));
        assert_eq!(form.cycle(1), Some("Jugo"));
        assert_eq!(form.cycle(1), Some("Ensalada"));
    }

    #[test]
    fn field_cursor_wraps() {
        let mut form = ActivityForm::blank();
        assert_eq!(form.move_field(-1), FormField::Details);
        assert_eq!(form.move_field(1), FormField::Category);
    }

    #[test]
    fn submit_returns_draft_and_starts_fresh() {
        let mut form = ActivityForm::blank();
        form.focus(FormField::Name);
        form.choose(0);
        form.focus(FormField::Calories);
        type_text(&mut form, "300");
        let draft_id = form.draft().id;

        let saved = form.submit().expect("valid draft");
        assert_eq!(saved.id, draft_id);
        assert_eq!(saved.name, "Jugo");
        assert_eq!(saved.calories, 300);
        assert_ne!(form.draft().id, draft_id);
        assert_eq!(form.draft().name, "");
        assert_eq!(form.editing(), None);
    }

    #[test]
    fn sync_seeds_from_active_record_once() {
        let juice = stored(ActivityCategory::FOOD, "Jugo", 300);
        let mut state = ActivityState::with_activities(vec![juice.clone()]);
        let mut form = ActivityForm::blank();

        assert!(!form.sync(&state));
        state.dispatch(ActivityAction::SelectForEdit(juice.id));
        assert!(form.sync(&state));
        assert_eq!(form.draft(), &juice);
        assert_eq!(form.calories_input(), "300");
        assert_eq!(form.editing(), Some(juice.id));

        form.focus(FormField::Details);
        form.push_char('!');
        assert!(!form.sync(&state));
        assert_eq!(form.draft().details, "con hielo!");
    }

    #[test]
    fn sync_ignores_unknown_active_id() {
        let mut state = ActivityState::default();
        let mut form = ActivityForm::blank();
        form.focus(FormField::Details);
        form.push_char('x');

        state.dispatch(ActivityAction::SelectForEdit(ActivityId::generate()));
        assert!(!form.sync(&state));
        assert_eq!(form.draft().details, "x");
    }

    #[test]
    fn sync_drops_draft_when_edited_record_is_deleted() {
        let juice = stored(ActivityCategory::FOOD, "Jugo", 300);
        let mut state = ActivityState::with_activities(vec![juice.clone()]);
        let mut form = ActivityForm::blank();
        state.dispatch(ActivityAction::SelectForEdit(juice.id));
        form.sync(&state);

        state.dispatch(ActivityAction::Delete(juice.id));
        assert!(form.sync(&state));
        assert_eq!(form.editing(), None);
        assert_ne!(form.draft().id, juice.id);
    }
}
