use std::any::TypeId;

use crate::component::Component;

/// Composable entity predicate: required and excluded component types plus
/// required and excluded tags. Evaluated by `World::entities_matching`
/// against every alive entity, one clause at a time.
///
/// ```ignore
/// let armed = EntityQuery::new()
///     .with::<Weapon>()
///     .without::<Stunned>()
///     .tagged("hostile");
/// for entity in world.entities_matching(&armed) { /* ... */ }
/// ```
#[derive(Default)]
pub struct EntityQuery {
    pub(crate) required: Vec<TypeId>,
    pub(crate) excluded: Vec<TypeId>,
    pub(crate) required_tags: Vec<String>,
    pub(crate) excluded_tags: Vec<String>,
}

impl EntityQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a component type to be present.
    pub fn with<T: Component>(mut self) -> Self {
        self.required.push(TypeId::of::<T>());
        self
    }

    /// Reject entities carrying this component type.
    pub fn without<T: Component>(mut self) -> Self {
        self.excluded.push(TypeId::of::<T>());
        self
    }

    /// Require some component on the entity to carry this tag.
    pub fn tagged(mut self, tag: impl Into<String>) -> Self {
        self.required_tags.push(tag.into());
        self
    }

    /// Reject entities where any component carries this tag.
    pub fn not_tagged(mut self, tag: impl Into<String>) -> Self {
        self.excluded_tags.push(tag.into());
        self
    }
}
