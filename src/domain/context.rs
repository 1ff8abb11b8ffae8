//! Field context built per scalar during traversal

use super::node::ScalarType;

/// Ephemeral description of the scalar field currently being visited.
///
/// Constructed by the traversal engine for each leaf and handed to the rule
/// matcher and value generators; never persisted.
///
/// `name` is the field's simple name: the nearest enclosing object key, with
/// array indices never altering it. For XML `#text` leaves the enclosing
/// element's tag is used, so a rule written against `email` masks the text
/// of `<email id="1">...</email>` as well as a plain `<email>` element.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Simple field name (terminal path segment without indices).
    pub name: &'a str,
    /// Full dotted path from the document root, e.g. `user.contacts[0].email`.
    pub path: &'a str,
    /// Inferred type of the scalar at this field.
    pub scalar_type: ScalarType,
}
