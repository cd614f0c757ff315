//! Navigation interception.
//!
//! A host routes every "open this link" request through a
//! [`NavigationPipeline`] before running its own navigation. Stages run in
//! order; the first one to return [`Flow::Handled`] wins.

use serde::{Deserialize, Serialize};

use crate::decider::{decide, Decision};
use crate::error::ResolveError;
use crate::index::AliasIndex;

/// A request to follow `linktext` from the note at `source_path`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRequest {
    pub linktext: String,
    pub source_path: String,
    /// Open the destination in a new pane
    #[serde(default)]
    pub new_leaf: bool,
}

impl NavigationRequest {
    pub fn new(linktext: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            linktext: linktext.into(),
            source_path: source_path.into(),
            new_leaf: false,
        }
    }

    pub fn in_new_leaf(mut self) -> Self {
        self.new_leaf = true;
        self
    }
}

/// What a stage did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Pass the request on to the next stage.
    Continue,
    /// Stop here with this decision.
    Handled(Decision),
}

/// Result of running a request through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// No stage intercepted; the host navigates as it normally would.
    Default,
    Intercepted {
        decision: Decision,
        new_leaf: bool,
    },
}

impl NavigationOutcome {
    /// The decision the host should act on. `Default` is direct navigation.
    pub fn into_decision(self) -> Decision {
        match self {
            NavigationOutcome::Default => Decision::NavigateDirect,
            NavigationOutcome::Intercepted { decision, .. } => decision,
        }
    }
}

/// The host's exact link resolution (Obsidian's `getFirstLinkpathDest`).
pub trait LinkResolver {
    /// Path of the note `linkpath` resolves to from `source_path`, if any.
    fn first_linkpath_dest(
        &self,
        index: &AliasIndex,
        linkpath: &str,
        source_path: &str,
    ) -> Option<String>;
}

pub trait NavigationStage {
    /// Name used in logs
    fn name(&self) -> &str;

    fn intercept(&self, index: &AliasIndex, request: &NavigationRequest) -> Flow;
}

/// Runs the decider for every request.
///
/// Direct navigation is left to the host by continuing; an unavailable
/// source note is logged and also continues.
pub struct DisambiguationStage<R> {
    resolver: R,
}

impl<R: LinkResolver> DisambiguationStage<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: LinkResolver> NavigationStage for DisambiguationStage<R> {
    fn name(&self) -> &str {
        "disambiguation"
    }

    fn intercept(&self, index: &AliasIndex, request: &NavigationRequest) -> Flow {
        let exact = self.resolver.first_linkpath_dest(
            index,
            wiki_links::linkpath(&request.linktext),
            &request.source_path,
        );

        match decide(index, &request.linktext, &request.source_path, exact.as_deref()) {
            Ok(Decision::NavigateDirect) => Flow::Continue,
            Ok(decision) => Flow::Handled(decision),
            Err(ResolveError::SourceNoteUnavailable { path }) => {
                tracing::warn!("Source note {} is not indexed, navigating directly", path);
                Flow::Continue
            }
        }
    }
}

/// Ordered list of navigation stages.
#[derive(Default)]
pub struct NavigationPipeline {
    stages: Vec<Box<dyn NavigationStage>>,
}

impl NavigationPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, stage: impl NavigationStage + 'static) -> Self {
        self.push(stage);
        self
    }

    pub fn push(&mut self, stage: impl NavigationStage + 'static) {
        self.stages.push(Box::new(stage));
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn navigate(&self, index: &AliasIndex, request: &NavigationRequest) -> NavigationOutcome {
        for stage in &self.stages {
            if let Flow::Handled(decision) = stage.intercept(index, request) {
                tracing::debug!("{} stage handled {:?}", stage.name(), request.linktext);
                return NavigationOutcome::Intercepted {
                    decision,
                    new_leaf: request.new_leaf,
                };
            }
        }
        NavigationOutcome::Default
    }
}
