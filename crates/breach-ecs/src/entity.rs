use std::fmt;

/// Generational entity handle. A compact u32 slot index plus a generation
/// bumped on every slot reuse, so a stale handle never resolves to the
/// entity that inherited its slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Entity {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Entity {
    /// Build an entity from raw parts (mainly for tests).
    pub fn from_raw(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Slot index of this entity.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of this entity.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}/{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.index, self.generation)
    }
}

/// Allocates and recycles entity slots with generational tracking. Each
/// slot also carries an enabled flag: disabled entities stay alive and keep
/// their components but are skipped by systems that honor the flag.
pub struct EntityAllocator {
    generations: Vec<u32>,
    alive: Vec<bool>,
    enabled: Vec<bool>,
    free: Vec<u32>,
    live_count: usize,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            generations: Vec::new(),
            alive: Vec::new(),
            enabled: Vec::new(),
            free: Vec::new(),
            live_count: 0,
        }
    }

    /// Allocate a new entity, reusing a freed slot if available. Fresh
    /// entities start enabled.
    pub fn allocate(&mut self) -> Entity {
        self.live_count += 1;
        if let Some(index) = self.free.pop() {
            let idx = index as usize;
            self.alive[idx] = true;
            self.enabled[idx] = true;
            Entity {
                index,
                generation: self.generations[idx],
            }
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            self.enabled.push(true);
            Entity {
                index,
                generation: 0,
            }
        }
    }

    /// Free an entity slot, bumping its generation. Returns `true` if the
    /// entity was alive.
    pub fn deallocate(&mut self, entity: Entity) -> bool {
        let idx = entity.index as usize;
        if !self.is_alive(entity) {
            return false;
        }
        self.alive[idx] = false;
        self.generations[idx] += 1;
        self.free.push(entity.index);
        self.live_count -= 1;
        true
    }

    /// Whether the handle refers to a live slot of the same generation.
    pub fn is_alive(&self, entity: Entity) -> bool {
        let idx = entity.index as usize;
        idx < self.alive.len() && self.alive[idx] && self.generations[idx] == entity.generation
    }

    /// Whether the entity is alive and not disabled.
    pub fn is_enabled(&self, entity: Entity) -> bool {
        self.is_alive(entity) && self.enabled[entity.index as usize]
    }

    /// Flip the enabled flag. Returns `false` for dead handles.
    pub fn set_enabled(&mut self, entity: Entity, enabled: bool) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.enabled[entity.index as usize] = enabled;
        true
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live_count
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Resolve a slot index back to a live handle.
    pub fn entity_at(&self, index: u32) -> Option<Entity> {
        let idx = index as usize;
        if idx < self.alive.len() && self.alive[idx] {
            Some(Entity {
                index,
                generation: self.generations[idx],
            })
        } else {
            None
        }
    }

    /// Iterate every live entity.
    pub fn iter_alive(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter().enumerate().filter_map(|(idx, &alive)| {
            alive.then(|| Entity {
                index: idx as u32,
                generation: self.generations[idx],
            })
        })
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}
