//! Knowledge base configuration types.

/// How much the knowledge base reports through `tracing`.
///
/// Levels are cumulative: `Derivations` also reports everything
/// `Mutations` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Report nothing
    Quiet,
    /// Report assertions and retractions (`info`)
    #[default]
    Mutations,
    /// Also report every query and add/merge (`debug`) and every inference
    /// attempt (`trace`)
    Derivations,
}

/// Configuration passed into a knowledge base and its inference engine
#[derive(Debug, Clone)]
pub struct KbConfig {
    pub verbosity: Verbosity,
    /// Spaces added per nesting level in `explain` output
    pub explain_indent: usize,
}

impl Default for KbConfig {
    fn default() -> Self {
        KbConfig {
            verbosity: Verbosity::Mutations,
            explain_indent: 4,
        }
    }
}

impl KbConfig {
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    pub fn with_explain_indent(mut self, indent: usize) -> Self {
        self.explain_indent = indent;
        self
    }

    pub(crate) fn reports_mutations(&self) -> bool {
        self.verbosity >= Verbosity::Mutations
    }

    pub(crate) fn reports_derivations(&self) -> bool {
        self.verbosity >= Verbosity::Derivations
    }

    pub(crate) fn reports_queries(&self) -> bool {
        self.reports_derivations()
    }
}
