//! Live-editable render settings.
//!
//! Every setter bumps a generation counter when the stored value changes; the renderer restarts
//! accumulation whenever the generation it last saw is stale.

/// Versioned settings struct and its enums.
pub mod render_settings;

pub use render_settings::{
    ColorFormat, DofMode, KernelConfig, LightSettings, OutputChannel, RenderSettings,
    SamplingMode, ShadowMapFormat, SsaoSettings,
};
