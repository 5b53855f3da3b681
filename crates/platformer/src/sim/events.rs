use super::world::{Collector, PetOwner};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    WorldReset,
    BoxHit {
        box_index: usize,
        hits_left: u32,
    },
    LootSpawned {
        box_index: usize,
    },
    LootCollected {
        collector: Collector,
        loot_total: u32,
    },
    CompanionSpawned {
        x: f32,
    },
    PetSpawned {
        owner: PetOwner,
    },
    CompanionRescued {
        x: f32,
        y: f32,
    },
    DialogueStarted,
    DialogueEnded,
    ScrollDropped,
    ScrollPicked,
    ScrollPanelClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEventKind {
    WorldReset,
    BoxHit,
    LootSpawned,
    LootCollected,
    CompanionSpawned,
    PetSpawned,
    CompanionRescued,
    DialogueStarted,
    DialogueEnded,
    ScrollDropped,
    ScrollPicked,
    ScrollPanelClosed,
}

impl SimEvent {
    pub fn kind(self) -> SimEventKind {
        match self {
            Self::WorldReset => SimEventKind::WorldReset,
            Self::BoxHit { .. } => SimEventKind::BoxHit,
            Self::LootSpawned { .. } => SimEventKind::LootSpawned,
            Self::LootCollected { .. } => SimEventKind::LootCollected,
            Self::CompanionSpawned { .. } => SimEventKind::CompanionSpawned,
            Self::PetSpawned { .. } => SimEventKind::PetSpawned,
            Self::CompanionRescued { .. } => SimEventKind::CompanionRescued,
            Self::DialogueStarted => SimEventKind::DialogueStarted,
            Self::DialogueEnded => SimEventKind::DialogueEnded,
            Self::ScrollDropped => SimEventKind::ScrollDropped,
            Self::ScrollPicked => SimEventKind::ScrollPicked,
            Self::ScrollPanelClosed => SimEventKind::ScrollPanelClosed,
        }
    }
}

/// Running totals per event kind since the bus was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimEventCounts {
    pub total: u32,
    pub world_reset: u32,
    pub box_hit: u32,
    pub loot_spawned: u32,
    pub loot_collected: u32,
    pub companion_spawned: u32,
    pub pet_spawned: u32,
    pub companion_rescued: u32,
    pub dialogue_started: u32,
    pub dialogue_ended: u32,
    pub scroll_dropped: u32,
    pub scroll_picked: u32,
    pub scroll_panel_closed: u32,
}

impl SimEventCounts {
    fn record(&mut self, kind: SimEventKind) {
        self.total = self.total.saturating_add(1);
        let slot = match kind {
            SimEventKind::WorldReset => &mut self.world_reset,
            SimEventKind::BoxHit => &mut self.box_hit,
            SimEventKind::LootSpawned => &mut self.loot_spawned,
            SimEventKind::LootCollected => &mut self.loot_collected,
            SimEventKind::CompanionSpawned => &mut self.companion_spawned,
            SimEventKind::PetSpawned => &mut self.pet_spawned,
            SimEventKind::CompanionRescued => &mut self.companion_rescued,
            SimEventKind::DialogueStarted => &mut self.dialogue_started,
            SimEventKind::DialogueEnded => &mut self.dialogue_ended,
            SimEventKind::ScrollDropped => &mut self.scroll_dropped,
            SimEventKind::ScrollPicked => &mut self.scroll_picked,
            SimEventKind::ScrollPanelClosed => &mut self.scroll_panel_closed,
        };
        *slot = slot.saturating_add(1);
    }
}

/// Events emitted by the kernel, held until the driver drains them.
#[derive(Debug, Clone, Default)]
pub struct SimEventBus {
    pending: Vec<SimEvent>,
    totals: SimEventCounts,
}

impl SimEventBus {
    pub(crate) fn emit(&mut self, event: SimEvent) {
        self.totals.record(event.kind());
        self.pending.push(event);
    }

    pub fn pending(&self) -> &[SimEvent] {
        &self.pending
    }

    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn totals(&self) -> SimEventCounts {
        self.totals
    }
}
