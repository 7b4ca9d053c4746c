//! Change notifications for settings nodes.
//!
//! Each node owns a [`Signal`] with an ordered listener list. Dispatch is
//! sequential on the owning thread; the list is snapshotted before dispatch so
//! listeners may connect or disconnect while an event is being delivered.

use crate::property::Property;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// What changed about a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// The stored value was assigned
    Value,
    /// The is-set flag flipped
    Presence,
}

/// A change to one of the shared properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PropertyChanged {
    pub property: Property,
    pub kind: ChangeKind,
}

impl PropertyChanged {
    pub fn value(property: Property) -> Self {
        Self {
            property,
            kind: ChangeKind::Value,
        }
    }

    pub fn presence(property: Property) -> Self {
        Self {
            property,
            kind: ChangeKind::Presence,
        }
    }

    /// `tab-width` for value changes, `tab-width-set` for presence changes
    pub fn notification_name(&self) -> String {
        match self.kind {
            ChangeKind::Value => self.property.name().to_string(),
            ChangeKind::Presence => format!("{}-set", self.property.name()),
        }
    }
}

impl fmt::Display for PropertyChanged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notification_name())
    }
}

/// Event delivered to node listeners
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
    /// A shared property changed on this node or anywhere below it
    Property(PropertyChanged),
    /// Provider-private state changed; never forwarded to the parent
    Private(String),
}

impl SettingsEvent {
    pub fn property_change(&self) -> Option<&PropertyChanged> {
        match self {
            SettingsEvent::Property(change) => Some(change),
            SettingsEvent::Private(_) => None,
        }
    }
}

/// Handle returned by `subscribe`, used to disconnect a listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Rc<dyn Fn(&SettingsEvent)>;

#[derive(Default)]
pub(crate) struct Signal {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(SubscriptionId, Listener)>>,
}

impl Signal {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn connect(&self, listener: impl Fn(&SettingsEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    pub(crate) fn disconnect(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(existing, _)| *existing != id);
        listeners.len() != before
    }

    pub(crate) fn emit(&self, event: &SettingsEvent) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("listeners", &self.listener_count())
            .finish()
    }
}
