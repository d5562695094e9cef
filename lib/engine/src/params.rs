//! Immutable per-session engine configuration.

use crate::hit_window::HitWindow;

/// Parameters fixed for the life of a play session. Host applications may
/// load these from their own configuration layer (e.g. `serde`-deserialized
/// from a settings file); this crate stays pure logic and does no file I/O
/// itself.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineParameters {
    pub hit_window: HitWindow,
    pub strum_leniency_seconds: f64,
    pub strum_leniency_small_seconds: f64,
    pub anti_ghosting: bool,
    pub infinite_front_end: bool,
    pub hopo_leniency_seconds: f64,
}

impl EngineParameters {
    pub fn builder() -> EngineParametersBuilder {
        EngineParametersBuilder::default()
    }
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            hit_window: HitWindow::default_for(0.3),
            strum_leniency_seconds: 0.07,
            strum_leniency_small_seconds: 0.025,
            anti_ghosting: true,
            infinite_front_end: false,
            hopo_leniency_seconds: 0.08,
        }
    }
}

/// Ergonomic construction for tests and hosts that only want to override a
/// handful of fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineParametersBuilder {
    params: OptionalParams,
}

#[derive(Debug, Clone, Copy, Default)]
struct OptionalParams {
    hit_window: Option<HitWindow>,
    strum_leniency_seconds: Option<f64>,
    strum_leniency_small_seconds: Option<f64>,
    anti_ghosting: Option<bool>,
    infinite_front_end: Option<bool>,
    hopo_leniency_seconds: Option<f64>,
}

impl EngineParametersBuilder {
    pub fn hit_window(mut self, hit_window: HitWindow) -> Self {
        self.params.hit_window = Some(hit_window);
        self
    }

    pub fn strum_leniency_seconds(mut self, value: f64) -> Self {
        self.params.strum_leniency_seconds = Some(value);
        self
    }

    pub fn strum_leniency_small_seconds(mut self, value: f64) -> Self {
        self.params.strum_leniency_small_seconds = Some(value);
        self
    }

    pub fn anti_ghosting(mut self, value: bool) -> Self {
        self.params.anti_ghosting = Some(value);
        self
    }

    pub fn infinite_front_end(mut self, value: bool) -> Self {
        self.params.infinite_front_end = Some(value);
        self
    }

    pub fn hopo_leniency_seconds(mut self, value: f64) -> Self {
        self.params.hopo_leniency_seconds = Some(value);
        self
    }

    pub fn build(self) -> EngineParameters {
        let defaults = EngineParameters::default();
        EngineParameters {
            hit_window: self.params.hit_window.unwrap_or(defaults.hit_window),
            strum_leniency_seconds: self
                .params
                .strum_leniency_seconds
                .unwrap_or(defaults.strum_leniency_seconds),
            strum_leniency_small_seconds: self
                .params
                .strum_leniency_small_seconds
                .unwrap_or(defaults.strum_leniency_small_seconds),
            anti_ghosting: self.params.anti_ghosting.unwrap_or(defaults.anti_ghosting),
            infinite_front_end: self
                .params
                .infinite_front_end
                .unwrap_or(defaults.infinite_front_end),
            hopo_leniency_seconds: self
                .params
                .hopo_leniency_seconds
                .unwrap_or(defaults.hopo_leniency_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_only_specified_fields() {
        let params = EngineParameters::builder()
            .anti_ghosting(false)
            .strum_leniency_seconds(0.1)
            .build();
        assert!(!params.anti_ghosting);
        assert_eq!(params.strum_leniency_seconds, 0.1);
        assert_eq!(
            params.strum_leniency_small_seconds,
            EngineParameters::default().strum_leniency_small_seconds
        );
    }
}
