//! Generation parameters passed to every backend

use serde::{Deserialize, Serialize};

/// Fixed sampling parameters for one generation call
///
/// Values are backend tuning, not protocol. Each backend maps the fields
/// onto its own request shape and ignores the ones it has no use for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    /// Maximum number of tokens to generate
    pub max_new_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Sample instead of greedy decoding
    pub do_sample: bool,

    /// Nucleus sampling cutoff
    pub top_p: Option<f32>,

    /// Whether the backend should echo the prompt in its output
    pub return_full_text: bool,
}

impl GenerationParams {
    /// Preset for hosted inference backends
    pub fn remote() -> Self {
        Self {
            max_new_tokens: 1000,
            temperature: 0.7,
            do_sample: true,
            top_p: None,
            return_full_text: false,
        }
    }

    /// Preset for the locally loaded pipeline: shorter answers, nucleus sampling
    pub fn local() -> Self {
        Self {
            max_new_tokens: 300,
            temperature: 0.7,
            do_sample: true,
            top_p: Some(0.9),
            return_full_text: false,
        }
    }

    /// Validate ranges
    pub fn validate(&self) -> Result<(), String> {
        if self.max_new_tokens == 0 {
            return Err("max_new_tokens must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be within 0.0..=2.0".to_string());
        }
        if let Some(top_p) = self.top_p {
            if !(0.0..=1.0).contains(&top_p) || top_p == 0.0 {
                return Err("top_p must be within (0.0, 1.0]".to_string());
            }
        }
        Ok(())
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::remote()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        assert!(GenerationParams::remote().validate().is_ok());
        assert!(GenerationParams::local().validate().is_ok());
    }

    #[test]
    fn test_local_preset_uses_nucleus_sampling() {
        let params = GenerationParams::local();
        assert_eq!(params.max_new_tokens, 300);
        assert_eq!(params.top_p, Some(0.9));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut params = GenerationParams::default();
        params.max_new_tokens = 0;
        assert!(params.validate().is_err());

        let mut params = GenerationParams::default();
        params.temperature = 3.0;
        assert!(params.validate().is_err());

        let mut params = GenerationParams::default();
        params.top_p = Some(0.0);
        assert!(params.validate().is_err());
    }
}
