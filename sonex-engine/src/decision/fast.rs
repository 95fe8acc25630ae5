//! Fast tier: cheap, side-effect-free heuristics
//!
//! An ordered set of substring rules over the lower-cased prompt and the
//! explicit kind. The first matching rule returns immediately; no rule
//! consults the catalog or memory. Returning `None` escalates to the deep
//! tier.

use super::{Decision, DecisionTier};
use sonex_common::types::{providers, JobKind};

/// Keywords marking short interface sounds that the local bridge turns
/// around fastest
const UI_SOUND_KEYWORDS: &[&str] = &["click", "beep", "blip", "chime", "notification"];

/// Prompts shorter than this (in chars) count as short-form speech
const SHORT_SPEECH_CHARS: usize = 50;

pub struct FastClassifier;

impl FastClassifier {
    /// Evaluate the fast rules; `None` means no rule was confident
    pub fn evaluate(prompt: &str, explicit_kind: Option<JobKind>) -> Option<Decision> {
        let prompt_lower = prompt.to_lowercase();

        // Rule 1: simple UI sound effects go straight to the local bridge
        if explicit_kind == Some(JobKind::SoundEffect)
            && UI_SOUND_KEYWORDS.iter().any(|k| prompt_lower.contains(k))
        {
            return Some(Decision {
                provider: providers::LOCAL_BRIDGE.to_string(),
                kind: JobKind::SoundEffect,
                reasoning: "fast: high-frequency simple sound effect, routing to local bridge"
                    .to_string(),
                suggested_layers: None,
                detected_style_id: Some("ui_sfx".to_string()),
                tier: DecisionTier::Fast,
            });
        }

        // Rule 2: short command speech dispatches immediately to the
        // high-quality cloud speech model
        if explicit_kind == Some(JobKind::Speech)
            && prompt.chars().count() < SHORT_SPEECH_CHARS
        {
            return Some(Decision {
                provider: providers::CLOUD_VOICE.to_string(),
                kind: JobKind::Speech,
                reasoning: "fast: short command speech, immediate dispatch to cloud voice"
                    .to_string(),
                suggested_layers: None,
                detected_style_id: Some("fast_speech".to_string()),
                tier: DecisionTier::Fast,
            });
        }

        None
    }
}
