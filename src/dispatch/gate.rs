//! Per-form submission gate.
//!
//! Admits one in-flight request per form. The ticket handed out by
//! [`SubmissionGate::try_acquire`] releases the form when dropped, so every
//! exit path of a submission frees it.
//!
//! A stuck request can be given up on with [`SubmissionGate::release`]. Each
//! claim carries a generation, and a ticket only frees the slot it claimed,
//! so a stale ticket dropped later never frees a newer submission's slot.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::forms::FormId;

#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    /// Generation of the claim currently holding each form
    busy: Rc<RefCell<HashMap<FormId, u64>>>,
    next_generation: Rc<Cell<u64>>,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `form`. `None` if a submission for it is still running.
    pub fn try_acquire(&self, form: FormId) -> Option<GateTicket> {
        let mut busy = self.busy.borrow_mut();
        if busy.contains_key(&form) {
            return None;
        }
        let generation = self.next_generation.get();
        self.next_generation.set(generation.wrapping_add(1));
        busy.insert(form, generation);

        Some(GateTicket {
            form,
            generation,
            busy: Rc::clone(&self.busy),
        })
    }

    /// Free `form` regardless of who holds it. Returns whether it was held.
    pub fn release(&self, form: FormId) -> bool {
        self.busy.borrow_mut().remove(&form).is_some()
    }

    pub fn is_busy(&self, form: FormId) -> bool {
        self.busy.borrow().contains_key(&form)
    }
}

/// Proof that a form is claimed
#[derive(Debug)]
pub struct GateTicket {
    form: FormId,
    generation: u64,
    busy: Rc<RefCell<HashMap<FormId, u64>>>,
}

impl GateTicket {
    pub fn form(&self) -> FormId {
        self.form
    }
}

impl Drop for GateTicket {
    fn drop(&mut self) {
        let mut busy = self.busy.borrow_mut();
        if busy.get(&self.form) == Some(&self.generation) {
            busy.remove(&self.form);
        }
    }
}
