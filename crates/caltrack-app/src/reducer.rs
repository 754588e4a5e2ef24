// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, warn};

use crate::{Activity, ActivityId, CalorieSummary, ListMode};

/// Logged activities in display order plus the record loaded into the form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ActivityState {
    pub activities: Vec<Activity>,
    pub active_id: Option<ActivityId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityAction {
    SelectForEdit(ActivityId),
    Delete(ActivityId),
    Save(Activity),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    ActiveChanged(Option<ActivityId>),
    Created(ActivityId),
    Updated(ActivityId),
    Deleted(ActivityId),
    NotFound(ActivityId),
    Reset { removed: usize },
}

impl ActivityState {
    pub fn with_activities(activities: Vec<Activity>) -> Self {
        Self {
            activities,
            active_id: None,
        }
    }

    /// Applies one transition. Never fails: ids that match nothing leave the
    /// sequence untouched and report `NotFound`.
    pub fn dispatch(&mut self, action: ActivityAction) -> Vec<ActivityEvent> {
        match action {
            ActivityAction::SelectForEdit(id) => {
                debug!(activity = %id, "select activity for edit");
                self.active_id = Some(id);
                vec![ActivityEvent::ActiveChanged(self.active_id)]
            }
            ActivityAction::Delete(id) => self.delete(id),
            ActivityAction::Save(activity) => self.save(activity),
            ActivityAction::Reset => {
                let removed = self.activities.len();
                debug!(removed, "reset activities");
                self.activities.clear();
                self.active_id = None;
                vec![
                    ActivityEvent::Reset { removed },
                    ActivityEvent::ActiveChanged(None),
                ]
            }
        }
    }

    fn delete(&mut self, id: ActivityId) -> Vec<ActivityEvent> {
        let Some(index) = self.position(id) else {
            warn!(activity = %id, "delete ignored; activity not found");
            return vec![ActivityEvent::NotFound(id)];
        };

        self.activities.remove(index);
        debug!(activity = %id, remaining = self.activities.len(), "activity deleted");

        let mut events = vec![ActivityEvent::Deleted(id)];
        if self.active_id == Some(id) {
            self.active_id = None;
            events.push(ActivityEvent::ActiveChanged(None));
        }
        events
    }

    fn save(&mut self, activity: Activity) -> Vec<ActivityEvent> {
        let id = activity.id;
        let saved = match self.position(id) {
            Some(index) => {
                self.activities[index] = activity;
                debug!(activity = %id, index, "activity updated");
                ActivityEvent::Updated(id)
            }
            None => {
                self.activities.push(activity);
                debug!(activity = %id, count = self.activities.len(), "activity created");
                ActivityEvent::Created(id)
            }
        };
        self.active_id = None;
        vec![saved, ActivityEvent::ActiveChanged(None)]
    }

    fn position(&self, id: ActivityId) -> Option<usize> {
        self.activities.iter().position(|activity| activity.id == id)
    }

    pub fn find(&self, id: ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|activity| activity.id == id)
    }

    /// The record the form should edit, if the active id still resolves.
    pub fn active(&self) -> Option<&Activity> {
        self.active_id.and_then(|id| self.find(id))
    }

    pub fn filtered(&self, mode: ListMode) -> Vec<&Activity> {
        filter_activities(&self.activities, mode)
    }

    pub fn summary(&self) -> CalorieSummary {
        CalorieSummary::from_activities(&self.activities)
    }
}

/// Activities belonging to `mode`, in their original order.
pub fn filter_activities(activities: &[Activity], mode: ListMode) -> Vec<&Activity> {
    activities
        .iter()
        .filter(|activity| mode.matches(activity.category))
        .collect()
}
