//! Deep tier: catalog scan plus weighted-memory scoring
//!
//! Runs whenever no fast rule matched. Scans the style catalog for keyword
//! intersections, picks the best match by memory gravity (declaration order
//! breaks ties), then applies kind policy: an explicit caller kind always
//! wins; otherwise kind is inferred from prompt vocabulary, defaulting to
//! music.

use super::{Decision, DecisionTier};
use crate::catalog::{self, StyleNode};
use crate::memory::MemoryStore;
use sonex_common::types::{providers, JobKind};

/// Vocabulary signalling speech intent
const SPEECH_WORDS: &[&str] = &["say ", "speak", "voice", "narrat", "read aloud", "announce"];

/// Vocabulary signalling sound-effect intent
const SOUND_WORDS: &[&str] = &["sound effect", "sfx", "foley", "noise of", "the sound of"];

pub struct DeepClassifier;

impl DeepClassifier {
    pub fn evaluate(
        prompt: &str,
        explicit_kind: Option<JobKind>,
        memory: &MemoryStore,
    ) -> Decision {
        let prompt_lower = prompt.to_lowercase();

        // Style analysis: highest gravity wins, strict comparison keeps the
        // earliest declared node on ties.
        let best_style: Option<&StyleNode> = catalog::matching_styles(&prompt_lower)
            .into_iter()
            .fold(None, |best, candidate| match best {
                None => Some(candidate),
                Some(current) => {
                    if memory.gravity(candidate.id) > memory.gravity(current.id) {
                        Some(candidate)
                    } else {
                        Some(current)
                    }
                }
            });

        let mut reasoning = String::from("deep: analyzing semantic intent");
        if let Some(style) = best_style {
            reasoning.push_str(&format!(
                "; matched style '{}' (gravity {:.2})",
                style.id,
                memory.gravity(style.id)
            ));
        }

        let kind = explicit_kind.unwrap_or_else(|| infer_kind(&prompt_lower));

        match kind {
            JobKind::Music => {
                reasoning.push_str("; complex composition, engaging general cloud model");
                Decision {
                    provider: providers::CLOUD_AUDIO.to_string(),
                    kind: JobKind::Music,
                    reasoning,
                    suggested_layers: best_style
                        .map(|s| s.layers.iter().map(|l| l.to_string()).collect()),
                    detected_style_id: best_style.map(|s| s.id.to_string()),
                    tier: DecisionTier::Deep,
                }
            }
            JobKind::Speech => {
                reasoning.push_str("; long-form narrative, engaging contextual speech engine");
                Decision {
                    provider: providers::CLOUD_VOICE.to_string(),
                    kind: JobKind::Speech,
                    reasoning,
                    suggested_layers: None,
                    detected_style_id: Some("narrative".to_string()),
                    tier: DecisionTier::Deep,
                }
            }
            JobKind::SoundEffect => {
                reasoning.push_str("; no high-level pattern, defaulting to local compute");
                Decision {
                    provider: providers::LOCAL_BRIDGE.to_string(),
                    kind: JobKind::SoundEffect,
                    reasoning,
                    suggested_layers: None,
                    detected_style_id: best_style
                        .map(|s| s.id.to_string())
                        .or_else(|| Some("standard".to_string())),
                    tier: DecisionTier::Deep,
                }
            }
        }
    }
}

/// Infer kind from prompt vocabulary: speech intent beats sound intent,
/// everything else defaults to music
fn infer_kind(prompt_lower: &str) -> JobKind {
    if SPEECH_WORDS.iter().any(|w| prompt_lower.contains(w)) {
        JobKind::Speech
    } else if SOUND_WORDS.iter().any(|w| prompt_lower.contains(w)) {
        JobKind::SoundEffect
    } else {
        JobKind::Music
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn memory_in(dir: &TempDir) -> Arc<MemoryStore> {
        Arc::new(MemoryStore::open(dir.path().join("weights.json")))
    }

    #[test]
    fn music_without_style_match_suggests_no_layers() {
        let dir = TempDir::new().unwrap();
        let memory = memory_in(&dir);

        let decision = DeepClassifier::evaluate("a pleasant tune", Some(JobKind::Music), &memory);
        assert!(decision.suggested_layers.is_none());
        assert!(decision.detected_style_id.is_none());
        assert_eq!(decision.provider, providers::CLOUD_AUDIO);
    }

    #[test]
    fn sound_effect_defaults_to_local_bridge() {
        let dir = TempDir::new().unwrap();
        let memory = memory_in(&dir);

        let decision =
            DeepClassifier::evaluate("rain on a tin roof", Some(JobKind::SoundEffect), &memory);
        assert_eq!(decision.provider, providers::LOCAL_BRIDGE);
        assert_eq!(decision.detected_style_id.as_deref(), Some("standard"));
    }

    #[test]
    fn kind_inference_priorities() {
        assert_eq!(infer_kind("narrate the intro"), JobKind::Speech);
        assert_eq!(infer_kind("the sound of thunder"), JobKind::SoundEffect);
        assert_eq!(infer_kind("a moody cyberpunk drive"), JobKind::Music);
        assert_eq!(infer_kind(""), JobKind::Music);
    }

    #[test]
    fn reasoning_names_the_matched_style() {
        let dir = TempDir::new().unwrap();
        let memory = memory_in(&dir);

        let decision =
            DeepClassifier::evaluate("a lofi study session", Some(JobKind::Music), &memory);
        assert!(decision.reasoning.contains("lofi"));
    }
}
