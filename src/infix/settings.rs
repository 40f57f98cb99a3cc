//! Configuration of the infix parser and formatter.
//!
//! [`ParserSettings`] controls how ambiguous constructs of the Level 3
//! grammar are read; [`FormatterSettings`] mirrors the options that affect
//! output.
//!
//! # Examples
//!
//! ```rust
//! use sbml_math::infix::{LogParsing, ParserSettings};
//!
//! let settings = ParserSettings::new()
//!     .with_parse_log(LogParsing::AsLn)
//!     .with_collapse_minus(true);
//! assert!(settings.collapse_minus);
//! ```

use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How `log(x)` with a single argument is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogParsing {
    /// Base-10 logarithm
    #[default]
    AsLog10,
    /// Natural logarithm
    AsLn,
    /// Rejected as ambiguous
    AsError,
}

/// What the `%` operator produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuloMode {
    /// `rem(x, y)`
    #[default]
    Rem,
    /// The equivalent piecewise expansion, for targets without `rem`
    Piecewise,
}

/// Identifiers defined by the model a formula belongs to.
///
/// Model identifiers take precedence over built-in names: a model species
/// called `pi` stays a name, and a function definition called `sin` stays a
/// user-function call.
pub trait ModelNamespace {
    /// Whether `id` names a function definition.
    fn has_function_definition(&self, id: &str) -> bool;

    /// Whether `id` names any other model symbol (species, parameter,
    /// compartment, reaction).
    fn has_symbol(&self, id: &str) -> bool;
}

/// Options of the Level 3 infix parser.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserSettings {
    /// Meaning of single-argument `log`
    pub parse_log: LogParsing,
    /// Fold minus signs into numeric literals and cancel double negation
    pub collapse_minus: bool,
    /// Read an identifier following a number as its units
    pub parse_units: bool,
    /// Read `avogadro` as the csymbol rather than a plain name
    pub avogadro_is_csymbol: bool,
    /// Match built-in function and constant names case-sensitively
    pub case_sensitive_builtins: bool,
    /// Meaning of `%`
    pub modulo: ModuloMode,
    /// Target SBML level
    pub level: u32,
    /// Target SBML version
    pub version: u32,
    /// Model used to resolve identifiers that collide with built-ins
    #[serde(skip)]
    pub model: Option<Arc<dyn ModelNamespace + Send + Sync>>,
}

impl Default for ParserSettings {
    fn default() -> Self {
        Self {
            parse_log: LogParsing::AsLog10,
            collapse_minus: false,
            parse_units: true,
            avogadro_is_csymbol: true,
            case_sensitive_builtins: false,
            modulo: ModuloMode::Rem,
            level: 3,
            version: 2,
            model: None,
        }
    }
}

impl fmt::Debug for ParserSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserSettings")
            .field("parse_log", &self.parse_log)
            .field("collapse_minus", &self.collapse_minus)
            .field("parse_units", &self.parse_units)
            .field("avogadro_is_csymbol", &self.avogadro_is_csymbol)
            .field("case_sensitive_builtins", &self.case_sensitive_builtins)
            .field("modulo", &self.modulo)
            .field("level", &self.level)
            .field("version", &self.version)
            .field("model", &self.model.is_some())
            .finish()
    }
}

impl ParserSettings {
    /// Create settings with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from YAML. Missing keys keep their defaults; the model
    /// is never read from YAML.
    ///
    /// ```rust
    /// use sbml_math::infix::{ModuloMode, ParserSettings};
    ///
    /// let settings = ParserSettings::from_yaml("modulo: piecewise\nparse_units: false\n").unwrap();
    /// assert_eq!(settings.modulo, ModuloMode::Piecewise);
    /// assert!(!settings.parse_units);
    /// assert!(settings.avogadro_is_csymbol);
    /// ```
    pub fn from_yaml(text: &str) -> Result<Self> {
        serde_saphyr::from_str(text)
            .map_err(|e| Error::Config(format!("Failed to read parser settings: {}", e)))
    }

    /// Serialize settings to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Config(format!("Failed to write parser settings: {}", e)))
    }

    #[inline]
    pub fn with_parse_log(mut self, parse_log: LogParsing) -> Self {
        self.parse_log = parse_log;
        self
    }

    #[inline]
    pub fn with_collapse_minus(mut self, collapse: bool) -> Self {
        self.collapse_minus = collapse;
        self
    }

    #[inline]
    pub fn with_parse_units(mut self, parse_units: bool) -> Self {
        self.parse_units = parse_units;
        self
    }

    #[inline]
    pub fn with_avogadro_csymbol(mut self, csymbol: bool) -> Self {
        self.avogadro_is_csymbol = csymbol;
        self
    }

    #[inline]
    pub fn with_case_sensitive_builtins(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive_builtins = case_sensitive;
        self
    }

    #[inline]
    pub fn with_modulo(mut self, modulo: ModuloMode) -> Self {
        self.modulo = modulo;
        self
    }

    /// Set the target SBML level and version.
    #[inline]
    pub fn with_level_version(mut self, level: u32, version: u32) -> Self {
        self.level = level;
        self.version = version;
        self
    }

    /// Resolve identifiers against `model`.
    #[inline]
    pub fn with_model(mut self, model: Arc<dyn ModelNamespace + Send + Sync>) -> Self {
        self.model = Some(model);
        self
    }

    pub(crate) fn model_has_function(&self, id: &str) -> bool {
        self.model
            .as_ref()
            .is_some_and(|m| m.has_function_definition(id))
    }

    pub(crate) fn model_has_symbol(&self, id: &str) -> bool {
        self.model.as_ref().is_some_and(|m| m.has_symbol(id))
    }
}

/// Options of the infix formatters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterSettings {
    /// Write the units of numeric literals (`3 mL`)
    pub show_units: bool,
    /// Simplify double negation and negated literals
    pub collapse_minus: bool,
    /// Meaning of `%` for whoever reads the output; `rem` nodes are
    /// written as calls unless this is [`ModuloMode::Rem`]
    pub modulo: ModuloMode,
}

impl Default for FormatterSettings {
    fn default() -> Self {
        Self {
            show_units: true,
            collapse_minus: false,
            modulo: ModuloMode::Rem,
        }
    }
}

impl FormatterSettings {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_show_units(mut self, show: bool) -> Self {
        self.show_units = show;
        self
    }

    #[inline]
    pub fn with_collapse_minus(mut self, collapse: bool) -> Self {
        self.collapse_minus = collapse;
        self
    }

    #[inline]
    pub fn with_modulo(mut self, modulo: ModuloMode) -> Self {
        self.modulo = modulo;
        self
    }
}

impl From<&ParserSettings> for FormatterSettings {
    fn from(settings: &ParserSettings) -> Self {
        // Before L3v2 the parser expands `%` whatever the configured mode.
        let l3v2 = settings.level > 3 || (settings.level == 3 && settings.version >= 2);
        let modulo = match settings.modulo {
            ModuloMode::Rem if l3v2 => ModuloMode::Rem,
            _ => ModuloMode::Piecewise,
        };
        Self {
            show_units: settings.parse_units,
            collapse_minus: settings.collapse_minus,
            modulo,
        }
    }
}
