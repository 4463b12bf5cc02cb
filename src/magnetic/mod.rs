mod config;
mod field;
mod node;
mod physics;
mod scene;
mod selection;
mod timeline;
mod viewport;

pub use config::{EngineConfig, PhysicsConfig};
pub use field::Field;
pub use node::{Node, NodeId};
pub use scene::{Quadrant, Scene};
pub use selection::{SelectionDelegate, SelectionEvent};
pub use timeline::{
    Completion, Easing, Motion, ScheduledAction, ThrowTarget, Timeline, TimelineEffect,
};
pub use viewport::Viewport;
