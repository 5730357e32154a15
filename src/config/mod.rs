//! Analysis configuration: preset defaults plus a builder for overrides,
//! validated before use. A `Preset` picks sane defaults, `.build()` runs a
//! `Validatable` pass and hands back an immutable config the pipeline can
//! share across threads.

use crate::errors::{CalorError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Base preset a config is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Lenient: unknown calls warn, strict-effects off, no decision-procedure assist.
    Fast,
    /// Default posture: unknown calls warn, strict-effects off.
    Balanced,
    /// CI gate posture: unknown calls are hard errors, strict-effects on.
    Strict,
}

impl Preset {
    pub fn as_str(self) -> &'static str {
        match self {
            Preset::Fast => "fast",
            Preset::Balanced => "balanced",
            Preset::Strict => "strict",
        }
    }
}

/// Tri-state unknown-call policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownCallPolicy {
    Strict,
    Warn,
    StubRequired,
}

/// Filesystem roots for the four manifest discovery tiers. `None`
/// falls back to the platform default the embedder can override.
#[derive(Debug, Clone, Default)]
pub struct ManifestRoots {
    pub user: Option<PathBuf>,
    pub solution: Option<PathBuf>,
    pub project_file: Option<PathBuf>,
}

/// K-induction driver inputs that don't vary per loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KInductionBudget {
    pub depth: u32,
    pub timeout_ms: u64,
}

/// Independent on/off switches for taint source and sink categories
///: disabling both halves of a category silences it.
#[derive(Debug, Clone)]
pub struct TaintToggles {
    pub user_input: bool,
    pub environment: bool,
    pub file_read: bool,
    pub network_input: bool,
    pub database_result: bool,
    pub sql_sink: bool,
    pub command_sink: bool,
    pub path_sink: bool,
    pub html_sink: bool,
    pub eval_sink: bool,
}

impl Default for TaintToggles {
    fn default() -> Self {
        Self {
            user_input: true,
            environment: true,
            file_read: true,
            network_input: true,
            database_result: true,
            sql_sink: true,
            command_sink: true,
            path_sink: true,
            html_sink: true,
            eval_sink: true,
        }
    }
}

/// Types that validate their own invariants before the config is handed to the
/// pipeline. Kept as a trait, not a free function, so each config fragment owns
/// its own rule set.
pub trait Validatable {
    fn validate(&self) -> Result<()>;
}

/// Builder for [`ValidatedConfig`]. Level 1: pick a preset; level 2: override a
/// fragment with a closure.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    preset: Preset,
    pub unknown_call_policy: UnknownCallPolicy,
    pub strict_effects: bool,
    pub manifest_roots: ManifestRoots,
    pub k_induction: KInductionBudget,
    pub taint: TaintToggles,
    pub decision_procedure_assist: bool,
}

impl AnalysisConfig {
    pub fn preset(preset: Preset) -> Self {
        let (unknown_call_policy, strict_effects) = match preset {
            Preset::Fast => (UnknownCallPolicy::Warn, false),
            Preset::Balanced => (UnknownCallPolicy::Warn, false),
            Preset::Strict => (UnknownCallPolicy::Strict, true),
        };
        Self {
            preset,
            unknown_call_policy,
            strict_effects,
            manifest_roots: ManifestRoots::default(),
            k_induction: KInductionBudget {
                depth: 5,
                timeout_ms: 2_000,
            },
            taint: TaintToggles::default(),
            decision_procedure_assist: false,
        }
    }

    pub fn get_preset(&self) -> Preset {
        self.preset
    }

    pub fn unknown_call_policy(mut self, policy: UnknownCallPolicy) -> Self {
        self.unknown_call_policy = policy;
        self
    }

    pub fn strict_effects(mut self, enabled: bool) -> Self {
        self.strict_effects = enabled;
        self
    }

    pub fn manifest_roots(mut self, roots: ManifestRoots) -> Self {
        self.manifest_roots = roots;
        self
    }

    pub fn k_induction(mut self, depth: u32, timeout_ms: u64) -> Self {
        self.k_induction = KInductionBudget { depth, timeout_ms };
        self
    }

    pub fn taint<F>(mut self, f: F) -> Self
    where
        F: FnOnce(TaintToggles) -> TaintToggles,
    {
        self.taint = f(self.taint);
        self
    }

    pub fn decision_procedure_assist(mut self, enabled: bool) -> Self {
        self.decision_procedure_assist = enabled;
        self
    }

    pub fn build(self) -> Result<ValidatedConfig> {
        self.validate()?;
        Ok(ValidatedConfig(self))
    }
}

impl Validatable for AnalysisConfig {
    fn validate(&self) -> Result<()> {
        if self.k_induction.depth == 0 {
            return Err(CalorError::config("k-induction depth must be >= 1"));
        }
        if self.k_induction.timeout_ms == 0 {
            return Err(CalorError::config("k-induction timeout_ms must be >= 1"));
        }
        Ok(())
    }
}

/// An [`AnalysisConfig`] that passed validation. The pipeline only accepts this
/// type, never the raw builder.
#[derive(Debug, Clone)]
pub struct ValidatedConfig(AnalysisConfig);

impl ValidatedConfig {
    pub fn as_inner(&self) -> &AnalysisConfig {
        &self.0
    }
}
