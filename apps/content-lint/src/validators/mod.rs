//! Validator capability interface and the typed registry.
//!
//! Validator identities are a closed enum rather than stringly-typed
//! dispatch; the registry instantiates every validator once at startup
//! and hands out mutable access by kind. The uniqueness validator is the
//! only one that actually carries state between files.

pub mod readability;
pub mod seo;
pub mod uniqueness;

use crate::models::{ParsedContent, ValidationResult, ValidatorConfig};
use readability::ReadabilityValidator;
use seo::SeoValidator;
use uniqueness::UniquenessValidator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Identity of each registered validator.
pub enum ValidatorKind {
    Readability,
    Seo,
    Uniqueness,
}

impl ValidatorKind {
    pub const ALL: [ValidatorKind; 3] = [
        ValidatorKind::Readability,
        ValidatorKind::Seo,
        ValidatorKind::Uniqueness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ValidatorKind::Readability => "readability",
            ValidatorKind::Seo => "seo",
            ValidatorKind::Uniqueness => "uniqueness",
        }
    }

    pub fn from_name(name: &str) -> Option<ValidatorKind> {
        match name.trim().to_ascii_lowercase().as_str() {
            "readability" => Some(ValidatorKind::Readability),
            "seo" => Some(ValidatorKind::Seo),
            "uniqueness" => Some(ValidatorKind::Uniqueness),
            _ => None,
        }
    }
}

/// Common capability all validators conform to.
pub trait Validator {
    fn kind(&self) -> ValidatorKind;
    fn description(&self) -> &'static str;
    /// Run over one file. Mutable because the uniqueness validator
    /// accumulates corpus state as it goes.
    fn validate(&mut self, content: &ParsedContent, config: &ValidatorConfig) -> ValidationResult;
    /// Clear any cross-run state. Default is a no-op.
    fn reset(&mut self) {}
}

/// Holds one instance of every validator for the lifetime of a run.
pub struct Registry {
    validators: Vec<Box<dyn Validator>>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry {
            validators: vec![
                Box::new(ReadabilityValidator),
                Box::new(SeoValidator),
                Box::new(UniquenessValidator::new()),
            ],
        }
    }

    pub fn get_mut(&mut self, kind: ValidatorKind) -> Option<&mut (dyn Validator + 'static)> {
        self.validators
            .iter_mut()
            .find(|v| v.kind() == kind)
            .map(|v| v.as_mut())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.validators.iter().map(|v| v.kind().name()).collect()
    }

    pub fn descriptions(&self) -> Vec<(&'static str, &'static str)> {
        self.validators
            .iter()
            .map(|v| (v.kind().name(), v.description()))
            .collect()
    }

    /// Reset every validator's cross-file state. The runner calls this
    /// exactly once at the start of a corpus pass.
    pub fn reset_all(&mut self) {
        for v in &mut self.validators {
            v.reset();
        }
    }
}

impl Default for Registry {
    fn default() -> Registry {
        Registry::new()
    }
}
