//! Draft ownership and validated mutation.

use super::descriptor::{FieldKind, FormDescriptor};
use super::value::{Draft, FieldValue};
use crate::store::{DraftStore, DraftStoreExt};
use std::sync::Arc;
use tracing::debug;

/// One live form: the current draft plus the step cursor, persisted through
/// the injected store after every mutation.
///
/// Input is assumed pre-validated by the view (selectors only offer legal
/// options), so non-conforming values are dropped silently rather than
/// reported.
pub struct FormSession {
    descriptor: &'static FormDescriptor,
    store: Arc<dyn DraftStore>,
    draft: Draft,
    cursor: u32,
}

impl FormSession {
    /// Mounts the form: restores the persisted draft, or starts from the
    /// defaults when nothing usable is stored.
    pub fn new(descriptor: &'static FormDescriptor, store: Arc<dyn DraftStore>) -> Self {
        let draft = store
            .load_json::<Draft>(descriptor.storage_key)
            .map(|saved| restore(descriptor, saved))
            .unwrap_or_else(|| descriptor.default_draft());
        Self {
            descriptor,
            store,
            draft,
            cursor: 1,
        }
    }

    pub fn descriptor(&self) -> &'static FormDescriptor {
        self.descriptor
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn get(&self, id: &str) -> &FieldValue {
        self.draft.get(id).unwrap_or(&FieldValue::Unset)
    }

    /// Replaces one field's value and persists the draft. Unknown ids and
    /// values that do not fit the field's kind are ignored.
    pub fn set_field(&mut self, id: &str, value: FieldValue) {
        let Some(field) = self.descriptor.field(id) else {
            debug!(form = self.descriptor.name, id, "ignoring unknown field");
            return;
        };
        let Some(value) = conform(field.kind, value) else {
            debug!(form = self.descriptor.name, id, "ignoring non-conforming value");
            return;
        };
        self.draft.insert(id.to_string(), value);
        self.store.save_json(self.descriptor.storage_key, &self.draft);
    }

    pub fn step(&self) -> u32 {
        self.cursor
    }

    /// Moves to the next step, clamped to the form's last step.
    pub fn advance_step(&mut self) {
        self.cursor = (self.cursor + 1).min(self.descriptor.steps);
    }

    /// Moves to the previous step, clamped to 1.
    pub fn retreat_step(&mut self) {
        self.cursor = self.cursor.saturating_sub(1).max(1);
    }

    /// Missing required field ids, in descriptor order. Pure check.
    pub fn validate_required(&self) -> Vec<&'static str> {
        self.descriptor
            .fields
            .iter()
            .filter(|f| f.required && self.get(f.id).is_blank())
            .map(|f| f.id)
            .collect()
    }

    /// Back to the default draft and step 1; the persisted draft entry is
    /// removed. The cached response entry is left alone — it is cleared at
    /// the start of the next submission instead.
    pub fn reset(&mut self) {
        self.draft = self.descriptor.default_draft();
        self.cursor = 1;
        self.store.remove(self.descriptor.storage_key);
    }

    /// Serializes the draft into the outbound text block, stamped now.
    pub fn build_payload(&self) -> String {
        (self.descriptor.format)(&self.draft, &super::payload::now_stamp())
    }
}

/// Keeps only known ids from a persisted draft and fills gaps with defaults,
/// so a draft saved by an older build can never introduce stray fields.
fn restore(descriptor: &FormDescriptor, saved: Draft) -> Draft {
    let mut draft = descriptor.default_draft();
    for (id, value) in saved {
        if let Some(field) = descriptor.field(&id) {
            if let Some(value) = conform(field.kind, value) {
                draft.insert(id, value);
            }
        }
    }
    draft
}

/// Coerces a value to a field kind, or rejects it.
fn conform(kind: FieldKind, value: FieldValue) -> Option<FieldValue> {
    match (kind, value) {
        (FieldKind::Text, FieldValue::Text(s)) => Some(FieldValue::Text(s)),
        (FieldKind::Number { min, max }, FieldValue::Number(n)) if n >= min && n <= max => {
            Some(FieldValue::Number(n))
        }
        (FieldKind::Number { .. }, FieldValue::Unset) => Some(FieldValue::Unset),
        // an empty selection clears a choice field
        (FieldKind::Choice(_), FieldValue::Text(s)) if s.is_empty() => {
            Some(FieldValue::Text(s))
        }
        (FieldKind::Choice(options), FieldValue::Text(s)) if options.contains(&s.as_str()) => {
            Some(FieldValue::Text(s))
        }
        (FieldKind::Score { max }, FieldValue::Number(n))
            if n.fract() == 0.0 && n >= 0.0 && n <= max as f64 =>
        {
            Some(FieldValue::Number(n))
        }
        _ => None,
    }
}
