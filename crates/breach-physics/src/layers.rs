use bitflags::bitflags;

bitflags! {
    /// Collision category bitset. A collider belongs to the categories in
    /// its `layer` and reacts to colliders whose layer intersects its
    /// `mask`; the pair gate is symmetric, either direction suffices.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        const PLAYER      = 1 << 0;
        const ENEMY       = 1 << 1;
        const ENVIRONMENT = 1 << 2;
        const BULLET      = 1 << 3;
        const PICKUP      = 1 << 4;
        const TRIGGER     = 1 << 5;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_disjoint() {
        let all = [
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENVIRONMENT,
            CollisionLayers::BULLET,
            CollisionLayers::PICKUP,
            CollisionLayers::TRIGGER,
        ];
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                assert_eq!(a.intersects(*b), i == j);
            }
        }
    }

    #[test]
    fn mask_intersection() {
        let mask = CollisionLayers::ENEMY | CollisionLayers::BULLET;
        assert!(mask.intersects(CollisionLayers::BULLET));
        assert!(!mask.intersects(CollisionLayers::PICKUP));
        assert!(CollisionLayers::all().intersects(CollisionLayers::TRIGGER));
    }
}
