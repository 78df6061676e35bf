//! Per-field ordering for in-flight updates.
//!
//! Each setter takes a ticket before its request goes out. A confirmation
//! is applied only when its ticket is newer than the last one applied for
//! the same field, so a slow confirmation can never overwrite a newer one.

use std::collections::HashMap;

use parking_lot::Mutex;
use plume_model::LabelGroup;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceField {
    AdultContent,
    ContentLabel(LabelGroup),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct FieldTickets {
    issued: u64,
    applied: u64,
    in_flight: usize,
}

#[derive(Debug, Default)]
pub struct TicketBook {
    fields: Mutex<HashMap<PreferenceField, FieldTickets>>,
}

impl TicketBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&self, field: PreferenceField) -> Ticket {
        let mut fields = self.fields.lock();
        let entry = fields.entry(field).or_default();
        entry.issued += 1;
        entry.in_flight += 1;
        Ticket(entry.issued)
    }

    /// Settle a confirmed ticket. `apply` runs under the book's lock, and
    /// only when the ticket is newer than every ticket applied before it.
    pub fn try_apply<F>(&self, field: PreferenceField, ticket: Ticket, apply: F) -> bool
    where
        F: FnOnce(),
    {
        let mut fields = self.fields.lock();
        let entry = fields.entry(field).or_default();
        entry.in_flight = entry.in_flight.saturating_sub(1);
        if ticket.0 <= entry.applied {
            return false;
        }
        entry.applied = ticket.0;
        apply();
        true
    }

    /// Settle a ticket whose request failed.
    pub fn settle(&self, field: PreferenceField) {
        if let Some(entry) = self.fields.lock().get_mut(&field) {
            entry.in_flight = entry.in_flight.saturating_sub(1);
        }
    }

    pub fn is_in_flight(&self, field: PreferenceField) -> bool {
        self.fields
            .lock()
            .get(&field)
            .is_some_and(|entry| entry.in_flight > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_confirmation_is_discarded() {
        let book = TicketBook::new();
        let field = PreferenceField::AdultContent;
        let first = book.issue(field);
        let second = book.issue(field);
        assert!(book.is_in_flight(field));

        let mut applied = Vec::new();
        assert!(book.try_apply(field, second, || applied.push(second)));
        assert!(!book.try_apply(field, first, || applied.push(first)));
        assert_eq!(applied, vec![second]);
        assert!(!book.is_in_flight(field));
    }

    #[test]
    fn fields_are_independent() {
        let book = TicketBook::new();
        let gore = PreferenceField::ContentLabel(LabelGroup::Gore);
        let hate = PreferenceField::ContentLabel(LabelGroup::Hate);

        let gore_ticket = book.issue(gore);
        book.issue(gore);
        let hate_ticket = book.issue(hate);

        assert!(book.try_apply(hate, hate_ticket, || {}));
        assert!(book.try_apply(gore, gore_ticket, || {}));
    }

    #[test]
    fn failed_requests_leave_no_ticket_in_flight() {
        let book = TicketBook::new();
        let field = PreferenceField::ContentLabel(LabelGroup::Spam);
        book.issue(field);
        book.settle(field);
        assert!(!book.is_in_flight(field));
    }
}
