use bitflags::bitflags;

bitflags! {
    /// Tracks which parts of a character a [`PendingUpdate`](super::PendingUpdate) writes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct UpdateFields: u8 {
        const SLOTS       = 1 << 0;
        const HP          = 1 << 1;
        const RESOURCES   = 1 << 2;
        const DEATH_SAVES = 1 << 3;
        const FLAGS       = 1 << 4;
    }
}
