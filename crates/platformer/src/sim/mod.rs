//! Headless simulation kernel: physics, actor AI and narrative triggers.
//!
//! Everything lives in one [`World`]; [`World::step`] advances it through the
//! stages in [`SIM_STAGE_ORDER`] and [`World::snapshot`] exposes a read-only
//! view for rendering.

pub mod body;
mod companion;
pub mod events;
pub mod geometry;
pub mod narrative;
mod pets;
pub mod snapshot;
mod softening;
pub mod step;
pub mod world;

pub use body::{Body, Facing, JumpLatch};
pub use events::{SimEvent, SimEventBus, SimEventCounts, SimEventKind};
pub use geometry::{overlaps, resolve, ContactSide, Rect};
pub use snapshot::{
    ActorKind, ActorView, BoxView, FrameSnapshot, HudView, LootView, PanelView, ScrollView,
};
pub use step::{clamp_step, SimStage, StepIntents, SIM_STAGE_ORDER};
pub use world::{
    Collector, Companion, Loot, LootBox, Narrative, Pet, PetMode, PetOwner, Player, ScrollItem,
    ViewportSize, World,
};
