use crate::IngestError;
use hexaplex_model::{GraphName, NamedNode, Quad};
use std::path::Path;
use url::Url;

/// A template for a graph IRI derived from a source file.
///
/// `{0}` is replaced by the `file:` URL of the file, `{1}` by the path of that URL and `{2}` by the
/// bare file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphTemplate(String);

impl GraphTemplate {
    /// Validates the template by resolving it for a sample file.
    pub fn new(template: impl Into<String>) -> Result<Self, IngestError> {
        let template = Self(template.into());
        template.resolve(&std::env::temp_dir().join("sample.ttl"))?;
        Ok(template)
    }

    /// Returns the graph IRI for the source file at the absolute `path`.
    pub fn resolve(&self, path: &Path) -> Result<NamedNode, IngestError> {
        let url = Url::from_file_path(path).map_err(|()| {
            IngestError::configuration(format!("{} is not an absolute path", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        let iri = self
            .0
            .replace("{0}", url.as_str())
            .replace("{1}", url.path())
            .replace("{2}", &file_name);
        NamedNode::new(&iri).map_err(|error| {
            IngestError::configuration(format!(
                "The graph template '{}' yields the invalid IRI '{iri}': {error}",
                self.0
            ))
        })
    }
}

/// How the graph of parsed statements is chosen. Resolved per file into a [ContextPolicy].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GraphContext {
    /// Statements keep the graph they were parsed with.
    #[default]
    AsParsed,
    /// Statements without a graph are put into the templated graph.
    DefaultIfAbsent(GraphTemplate),
    /// Every statement is put into the templated graph.
    AlwaysOverride(GraphTemplate),
    /// Every statement is put into the default graph.
    DefaultGraphOnly,
}

impl GraphContext {
    /// Builds the context from the optional graph `template` and the override flag.
    ///
    /// Overriding without a template drops the graph of every statement.
    pub fn new(template: Option<GraphTemplate>, override_context: bool) -> Self {
        match (template, override_context) {
            (None, false) => Self::AsParsed,
            (None, true) => Self::DefaultGraphOnly,
            (Some(template), false) => Self::DefaultIfAbsent(template),
            (Some(template), true) => Self::AlwaysOverride(template),
        }
    }

    /// Resolves the policy for the source file at `path`.
    pub fn for_file(&self, path: &Path) -> Result<ContextPolicy, IngestError> {
        Ok(match self {
            Self::AsParsed => ContextPolicy::AsParsed,
            Self::DefaultIfAbsent(template) => {
                ContextPolicy::DefaultIfAbsent(template.resolve(path)?.into())
            }
            Self::AlwaysOverride(template) => {
                ContextPolicy::AlwaysOverride(template.resolve(path)?.into())
            }
            Self::DefaultGraphOnly => ContextPolicy::AlwaysOverride(GraphName::DefaultGraph),
        })
    }
}

/// Transformation applied to the graph of each parsed statement before it is encoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContextPolicy {
    #[default]
    AsParsed,
    DefaultIfAbsent(GraphName),
    AlwaysOverride(GraphName),
}

impl ContextPolicy {
    pub fn apply(&self, mut quad: Quad) -> Quad {
        match self {
            Self::AsParsed => {}
            Self::DefaultIfAbsent(graph) => {
                if quad.graph_name.is_default_graph() {
                    quad.graph_name = graph.clone();
                }
            }
            Self::AlwaysOverride(graph) => quad.graph_name = graph.clone(),
        }
        quad
    }
}
