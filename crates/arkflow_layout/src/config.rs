//! Interaction configuration
//!
//! Every value has a default matching platform behavior, so an empty
//! document is a valid configuration:
//!
//! ```toml
//! [scroll_bar]
//! disappear_delay_ms = 2000
//! display_mode = "auto"
//!
//! [fling]
//! friction = 0.6
//!
//! [select_overlay]
//! hidden_handle_delay_ms = 3000
//! ```

use arkflow_animation::SpringConfig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::scroll_bar::DisplayMode;

/// Top-level interaction configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InteractionConfig {
    #[serde(default)]
    pub scroll_bar: ScrollBarConfig,
    #[serde(default)]
    pub fling: FlingConfig,
    #[serde(default)]
    pub select_overlay: SelectOverlayConfig,
}

impl InteractionConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: InteractionConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.scroll_bar.validate()?;
        self.fling.validate()?;
        self.select_overlay.validate()
    }
}

/// Scroll bar behavior
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrollBarConfig {
    /// Idle time before the bar starts fading out
    pub disappear_delay_ms: u64,
    /// Length of the fade-out
    pub disappear_duration_ms: u32,
    /// Friction coefficient for flings started from the bar
    pub friction: f32,
    pub display_mode: DisplayMode,
}

impl Default for ScrollBarConfig {
    fn default() -> Self {
        Self {
            disappear_delay_ms: 2000,
            disappear_duration_ms: 400,
            friction: arkflow_animation::friction::DEFAULT_FRICTION,
            display_mode: DisplayMode::Auto,
        }
    }
}

impl ScrollBarConfig {
    /// Bar that never fades
    pub fn always_on() -> Self {
        Self {
            display_mode: DisplayMode::On,
            ..Default::default()
        }
    }

    /// Bar that is never shown
    pub fn hidden() -> Self {
        Self {
            display_mode: DisplayMode::Off,
            ..Default::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if !(self.friction > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "scroll_bar.friction must be positive, got {}",
                self.friction
            )));
        }
        Ok(())
    }
}

/// Fling and spring-back physics for scrollables
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FlingConfig {
    pub friction: f32,
    /// Release speed (px/s) a drag needs to start a fling; flings also stop once slower
    pub velocity_threshold: f32,
    pub spring_stiffness: f32,
    pub spring_damping: f32,
    pub spring_mass: f32,
}

impl Default for FlingConfig {
    fn default() -> Self {
        let spring = SpringConfig::default();
        Self {
            friction: arkflow_animation::friction::DEFAULT_FRICTION,
            velocity_threshold: arkflow_animation::friction::DEFAULT_VELOCITY_THRESHOLD,
            spring_stiffness: spring.stiffness,
            spring_damping: spring.damping,
            spring_mass: spring.mass,
        }
    }
}

impl FlingConfig {
    pub fn spring_config(&self) -> SpringConfig {
        SpringConfig::new(self.spring_stiffness, self.spring_damping, self.spring_mass)
    }

    fn validate(&self) -> Result<()> {
        if !(self.friction > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "fling.friction must be positive, got {}",
                self.friction
            )));
        }
        if self.velocity_threshold < 0.0 {
            return Err(Error::InvalidConfig(
                "fling.velocity_threshold must not be negative".into(),
            ));
        }
        if !(self.spring_stiffness > 0.0 && self.spring_mass > 0.0) {
            return Err(Error::InvalidConfig(
                "fling spring stiffness and mass must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Selection overlay behavior
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectOverlayConfig {
    /// Inactivity before a single handle hides itself
    pub hidden_handle_delay_ms: u64,
    /// Side of the square touch target around each handle
    pub handle_hot_zone: f32,
    /// Duration of menu show/hide and extension-menu transitions
    pub menu_animation_ms: u32,
}

impl Default for SelectOverlayConfig {
    fn default() -> Self {
        Self {
            hidden_handle_delay_ms: 3000,
            handle_hot_zone: 48.0,
            menu_animation_ms: 250,
        }
    }
}

impl SelectOverlayConfig {
    fn validate(&self) -> Result<()> {
        if !(self.handle_hot_zone > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "select_overlay.handle_hot_zone must be positive, got {}",
                self.handle_hot_zone
            )));
        }
        Ok(())
    }
}
