//! Generation sampling parameters.

/// Default maximum number of tokens to generate.
pub const DEFAULT_MAX_TOKENS: u32 = 512;

/// Default sampling temperature. Low by default; standup summaries should
/// stay close to the input commits.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default nucleus sampling cutoff.
pub const DEFAULT_TOP_P: f32 = 0.9;

/// Sampling parameters for a single generation call.
///
/// A value object: created per call, never mutated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GenerationConfig {
    /// Maximum number of tokens the backend may generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus sampling cutoff.
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
        }
    }
}
