pub mod attrs;
pub mod element;
pub mod fallback;
pub mod lifecycle;

pub use attrs::{AttributeMap, DEFAULT_MIN_HEIGHT};
pub use element::{HostEnv, InitOutcome, WaveElement};
pub use fallback::{fallback_style, FallbackRenderer, FallbackStyle, FallbackTarget, StyleTarget};
pub use lifecycle::{ContextLifecycle, LifecycleState, RetryPolicy};
