//! Settings Nodes
//!
//! A `SettingsNode` holds a value and an is-set flag for every property, plus an
//! ordered list of child nodes. Reads cascade: the first child (front to back)
//! that has a property set supplies it, otherwise the node's own stored value
//! is returned. Writes are always local to the node they are made on.
//!
//! Children are attached at the front, so the most recently attached child has
//! the highest priority. Property change events raised anywhere in a subtree are
//! re-emitted by every ancestor; provider-private events stay where they are.

mod events;

pub use events::{ChangeKind, PropertyChanged, SettingsEvent, SubscriptionId};

use crate::error::SettingsError;
use crate::file::{FileRef, SourceFile};
use crate::property::{IndentStyle, NewlineType, Property, PropertyValue, PROPERTY_COUNT};
use events::Signal;
use serde::Serialize;
use std::ops::Deref;
use std::rc::{Rc, Weak};
use tracing::warn;

/// Origin label of nodes created by the registry itself
pub const ROOT_ORIGIN: &str = "root";

/// A node in a per-file settings tree
#[derive(Debug)]
pub struct SettingsNode {
    // Declared first so children are released before this node's own state.
    children: Vec<SettingsNode>,
    file: FileRef,
    origin: String,
    values: [PropertyValue; PROPERTY_COUNT],
    set_flags: [bool; PROPERTY_COUNT],
    signal: Rc<Signal>,
}

impl SettingsNode {
    /// Create a root node bound to `file`, holding schema defaults
    pub fn new(file: &Rc<SourceFile>) -> Self {
        Self::with_origin(file, ROOT_ORIGIN)
    }

    /// Create a node labelled with the provider that owns it
    pub fn with_origin(file: &Rc<SourceFile>, origin: impl Into<String>) -> Self {
        Self {
            children: Vec::new(),
            file: FileRef::new(file),
            origin: origin.into(),
            values: Property::ALL.map(Property::default_value),
            set_flags: [false; PROPERTY_COUNT],
            signal: Signal::new(),
        }
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// The file this node describes
    pub fn file(&self) -> Result<Rc<SourceFile>, SettingsError> {
        self.file.upgrade().ok_or(SettingsError::UnboundFile)
    }

    pub fn is_bound(&self) -> bool {
        self.file.upgrade().is_some()
    }

    pub(crate) fn is_bound_to(&self, file: &Rc<SourceFile>) -> bool {
        self.file.points_to(file)
    }

    /// Resolve a property through the children, falling back to this node's value.
    ///
    /// An unbound node answers with schema defaults.
    pub fn get(&self, property: Property) -> PropertyValue {
        if !self.is_bound() {
            return property.default_value();
        }
        self.resolve_value(property).clone()
    }

    /// Resolve a property by name
    pub fn get_named(&self, name: &str) -> Result<PropertyValue, SettingsError> {
        let property: Property = name.parse()?;
        Ok(self.get(property))
    }

    fn resolve_value(&self, property: Property) -> &PropertyValue {
        self.children
            .iter()
            .find(|child| child.has_value(property))
            .map(|child| child.resolve_value(property))
            .unwrap_or(&self.values[property.index()])
    }

    /// True when this node or anything below it supplies `property`
    pub fn is_set(&self, property: Property) -> bool {
        if !self.is_bound() {
            return false;
        }
        self.has_value(property)
    }

    fn has_value(&self, property: Property) -> bool {
        self.set_flags[property.index()]
            || self.children.iter().any(|child| child.has_value(property))
    }

    /// The local is-set flag, ignoring children
    pub fn is_set_locally(&self, property: Property) -> bool {
        self.is_bound() && self.set_flags[property.index()]
    }

    /// Presence by property name
    pub fn is_set_named(&self, name: &str) -> Result<bool, SettingsError> {
        let property: Property = name.parse()?;
        Ok(self.is_set(property))
    }

    /// Assign a value on this node and mark it set. Children are untouched.
    ///
    /// A repeated identical assignment is silent; otherwise a value change is
    /// emitted, followed by a presence change if the flag was previously clear.
    pub fn set(
        &mut self,
        property: Property,
        value: impl Into<PropertyValue>,
    ) -> Result<(), SettingsError> {
        let value = value.into();
        self.ensure_bound(property)?;

        let expected = property.value_type();
        if value.value_type() != expected {
            return Err(SettingsError::TypeMismatch {
                property,
                expected,
                actual: value.value_type(),
            });
        }

        let slot = property.index();
        let was_set = self.set_flags[slot];
        let value_changed = self.values[slot] != value;

        self.values[slot] = value;
        self.set_flags[slot] = true;

        if value_changed || !was_set {
            self.emit_change(PropertyChanged::value(property));
        }
        if !was_set {
            self.emit_change(PropertyChanged::presence(property));
        }
        Ok(())
    }

    /// Assign a value by property name
    pub fn set_named(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), SettingsError> {
        let property: Property = name.parse()?;
        self.set(property, value)
    }

    /// Toggle the local is-set flag without touching the stored value
    pub fn set_is_set(&mut self, property: Property, is_set: bool) -> Result<(), SettingsError> {
        self.ensure_bound(property)?;

        let slot = property.index();
        if self.set_flags[slot] != is_set {
            self.set_flags[slot] = is_set;
            self.emit_change(PropertyChanged::presence(property));
        }
        Ok(())
    }

    fn ensure_bound(&self, property: Property) -> Result<(), SettingsError> {
        if self.is_bound() {
            Ok(())
        } else {
            warn!(
                origin = %self.origin,
                property = %property,
                "Ignoring write to settings node whose file is gone"
            );
            Err(SettingsError::UnboundFile)
        }
    }

    /// Attach a child at the highest-priority position.
    ///
    /// The parent re-emits the child's property events from now on.
    pub fn add_child(&mut self, child: SettingsNode) {
        let parent: Weak<Signal> = Rc::downgrade(&self.signal);
        child.signal.connect(move |event| {
            if let SettingsEvent::Property(_) = event {
                if let Some(parent) = parent.upgrade() {
                    parent.emit(event);
                }
            }
        });
        self.children.insert(0, child);
    }

    /// Children in priority order, highest first
    pub fn children(&self) -> &[SettingsNode] {
        &self.children
    }

    /// Write access to the child at `index`, in priority order
    pub fn child_mut(&mut self, index: usize) -> Option<ChildHandle<'_>> {
        self.children.get_mut(index).map(ChildHandle::new)
    }

    /// First child (in priority order) produced by `origin`
    pub fn child_by_origin_mut(&mut self, origin: &str) -> Option<ChildHandle<'_>> {
        self.children
            .iter_mut()
            .find(|child| child.origin == origin)
            .map(ChildHandle::new)
    }

    /// Listen for changes on this node and everything below it
    pub fn subscribe(&self, listener: impl Fn(&SettingsEvent) + 'static) -> SubscriptionId {
        self.signal.connect(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.signal.disconnect(id)
    }

    /// Announce a change to provider-private state. Only local listeners see it.
    pub fn notify_private(&self, key: impl Into<String>) {
        self.signal.emit(&SettingsEvent::Private(key.into()));
    }

    fn emit_change(&self, change: PropertyChanged) {
        self.signal.emit(&SettingsEvent::Property(change));
    }

    /// Origin of the node supplying the resolved value of `property`.
    ///
    /// `None` means this node's own stored value is used.
    pub fn explain(&self, property: Property) -> Option<&str> {
        if !self.is_bound() {
            return None;
        }
        self.supplier(property)
    }

    fn supplier(&self, property: Property) -> Option<&str> {
        let child = self
            .children
            .iter()
            .find(|child| child.has_value(property))?;
        Some(child.supplier(property).unwrap_or(child.origin()))
    }

    /// Typed snapshot of every resolved property
    pub fn resolve(&self) -> ResolvedSettings {
        ResolvedSettings::from_lookup(|property| self.get(property))
    }

    fn update_from(&mut self, fresh: &SettingsNode) -> Result<(), SettingsError> {
        for property in Property::ALL {
            let slot = property.index();
            if fresh.set_flags[slot] {
                self.set(property, fresh.values[slot].clone())?;
            } else {
                self.set_is_set(property, false)?;
            }
        }
        Ok(())
    }
}

/// Write access to a child that is already attached to a parent.
///
/// The child keeps its position and its event forwarding. Reads go through
/// `Deref`; the node itself is never handed out mutably, so it cannot be
/// swapped or moved out of the tree.
#[derive(Debug)]
pub struct ChildHandle<'a> {
    node: &'a mut SettingsNode,
}

impl<'a> ChildHandle<'a> {
    fn new(node: &'a mut SettingsNode) -> Self {
        Self { node }
    }

    pub fn set(
        &mut self,
        property: Property,
        value: impl Into<PropertyValue>,
    ) -> Result<(), SettingsError> {
        self.node.set(property, value)
    }

    pub fn set_named(
        &mut self,
        name: &str,
        value: impl Into<PropertyValue>,
    ) -> Result<(), SettingsError> {
        self.node.set_named(name, value)
    }

    pub fn set_is_set(&mut self, property: Property, is_set: bool) -> Result<(), SettingsError> {
        self.node.set_is_set(property, is_set)
    }

    pub fn add_child(&mut self, child: SettingsNode) {
        self.node.add_child(child);
    }

    pub fn child_mut(&mut self, index: usize) -> Option<ChildHandle<'_>> {
        self.node.child_mut(index)
    }

    pub fn child_by_origin_mut(&mut self, origin: &str) -> Option<ChildHandle<'_>> {
        self.node.child_by_origin_mut(origin)
    }

    /// Make the local values match those set on `fresh`.
    ///
    /// Values `fresh` sets are assigned (silently when unchanged); properties
    /// it leaves unset are retracted. Children of either node are ignored.
    pub fn update_from(&mut self, fresh: &SettingsNode) -> Result<(), SettingsError> {
        self.node.update_from(fresh)
    }
}

impl Deref for ChildHandle<'_> {
    type Target = SettingsNode;

    fn deref(&self) -> &SettingsNode {
        &*self.node
    }
}

/// Resolved value of every property, typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ResolvedSettings {
    pub indent_width: i32,
    pub indent_style: IndentStyle,
    pub right_margin_position: u32,
    pub show_right_margin: bool,
    pub tab_width: u32,
    pub trim_trailing_whitespace: bool,
    pub insert_trailing_newline: bool,
    pub newline_type: NewlineType,
    pub encoding: Option<String>,
}

impl ResolvedSettings {
    fn from_lookup(lookup: impl Fn(Property) -> PropertyValue) -> Self {
        Self {
            indent_width: typed(&lookup, Property::IndentWidth, PropertyValue::as_int),
            indent_style: typed(&lookup, Property::IndentStyle, PropertyValue::as_indent_style),
            right_margin_position: typed(
                &lookup,
                Property::RightMarginPosition,
                PropertyValue::as_uint,
            ),
            show_right_margin: typed(&lookup, Property::ShowRightMargin, PropertyValue::as_bool),
            tab_width: typed(&lookup, Property::TabWidth, PropertyValue::as_uint),
            trim_trailing_whitespace: typed(
                &lookup,
                Property::TrimTrailingWhitespace,
                PropertyValue::as_bool,
            ),
            insert_trailing_newline: typed(
                &lookup,
                Property::InsertTrailingNewline,
                PropertyValue::as_bool,
            ),
            newline_type: typed(&lookup, Property::NewlineType, PropertyValue::as_newline_type),
            encoding: lookup(Property::Encoding).as_text().map(str::to_string),
        }
    }

    /// Columns per indentation level; a negative indent width follows the tab width
    pub fn effective_indent_width(&self) -> u32 {
        u32::try_from(self.indent_width).unwrap_or(self.tab_width)
    }
}

/// Typed value of `property`, falling back to the descriptor default
fn typed<T: Default>(
    lookup: &impl Fn(Property) -> PropertyValue,
    property: Property,
    extract: fn(&PropertyValue) -> Option<T>,
) -> T {
    extract(&lookup(property))
        .or_else(|| extract(&property.default_value()))
        .unwrap_or_default()
}

impl Default for ResolvedSettings {
    fn default() -> Self {
        Self::from_lookup(Property::default_value)
    }
}
