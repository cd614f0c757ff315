//! JSON-lines request/response session over a vault.
//!
//! One request per input line, one response per output line. File watcher
//! events are applied between requests, so every request sees all changes
//! that arrived before it.

use alias_index::{
    suggest_folders, suggest_notes, Decision, DisambiguationEntry, DisambiguationStage,
    DisambiguationState, NavigationPipeline, NavigationRequest, NewNoteDraft, NoteSuggestion,
    SuggestedFolder,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::resolver::VaultResolver;
use crate::vault::Vault;
use crate::watcher::FileEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Request {
    /// Follow a link typed in `source_path`
    Resolve {
        linktext: String,
        source_path: String,
        #[serde(default)]
        new_leaf: bool,
    },
    /// Note picker suggestions
    Search { query: String, source_path: String },
    /// Rows of the disambiguation page
    Disambiguation { linktext: String, source_path: String },
    /// Display title of a note
    Title { path: String },
    /// Initial "create a new note" draft for an unresolved link
    NewNote { linktext: String, source_path: String },
    /// Re-check a draft after the user edited folder or filename
    CheckDraft { folder: String, filename: String },
    /// Folder suggestions for typed input
    Folders { query: String },
    /// A note moved within the vault
    Rename { from: String, to: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Response {
    Decision {
        decision: Decision,
        new_leaf: bool,
    },
    Suggestions {
        notes: Vec<NoteSuggestion>,
    },
    Entries {
        title: String,
        entries: Vec<DisambiguationEntry>,
    },
    Title {
        path: String,
        title: String,
    },
    Draft {
        draft: NewNoteDraft,
        target_path: Option<String>,
        creatable: bool,
    },
    Folders {
        folders: Vec<SuggestedFolder>,
    },
    Renamed {
        renamed: bool,
    },
    Error {
        message: String,
    },
}

/// What following one link in a note would do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkDecision {
    pub linktext: String,
    pub is_embed: bool,
    pub decision: Decision,
}

/// A vault plus the navigation pipeline that answers requests about it.
pub struct Session {
    vault: Vault,
    pipeline: NavigationPipeline,
}

impl Session {
    pub fn new(vault: Vault) -> Self {
        let pipeline =
            NavigationPipeline::new().with_stage(DisambiguationStage::new(VaultResolver::new()));
        Self { vault, pipeline }
    }

    pub fn vault(&self) -> &Vault {
        &self.vault
    }

    /// Decide what following `linktext` from `source_path` should do.
    pub fn resolve(&self, request: &NavigationRequest) -> Decision {
        self.pipeline
            .navigate(self.vault.index(), request)
            .into_decision()
    }

    fn draft_response(&self, draft: NewNoteDraft) -> Response {
        let index = self.vault.index();
        Response::Draft {
            target_path: draft.target_path(),
            creatable: draft.is_creatable(index),
            draft,
        }
    }

    pub fn handle(&mut self, request: Request) -> Response {
        let index = self.vault.index();
        match request {
            Request::Resolve {
                linktext,
                source_path,
                new_leaf,
            } => {
                let request = NavigationRequest {
                    linktext,
                    source_path,
                    new_leaf,
                };
                Response::Decision {
                    decision: self.resolve(&request),
                    new_leaf,
                }
            }
            Request::Search { query, source_path } => Response::Suggestions {
                notes: suggest_notes(index, &query, &source_path),
            },
            Request::Disambiguation {
                linktext,
                source_path,
            } => {
                let state = DisambiguationState::new(linktext, source_path);
                Response::Entries {
                    title: state.display_title(),
                    entries: state.entries(index),
                }
            }
            Request::Title { path } => Response::Title {
                title: index.display_title(&path).to_string(),
                path,
            },
            Request::NewNote {
                linktext,
                source_path,
            } => self.draft_response(NewNoteDraft::for_unresolved(
                wiki_links::linkpath(&linktext),
                &source_path,
            )),
            Request::CheckDraft { folder, filename } => {
                let folder = SuggestedFolder::from_input(&folder, self.vault.folders());
                self.draft_response(NewNoteDraft { folder, filename })
            }
            Request::Folders { query } => Response::Folders {
                folders: suggest_folders(&query, self.vault.folders()),
            },
            Request::Rename { from, to } => Response::Renamed {
                renamed: self.vault.rename(&from, &to),
            },
        }
    }

    /// Decisions for every wiki link in a note, in document order.
    pub async fn link_report(&self, note: &str) -> std::io::Result<Vec<LinkDecision>> {
        let content = self.vault.read_note(note).await?;
        Ok(wiki_links::parse_wiki_links(&content)
            .into_iter()
            .map(|link| LinkDecision {
                decision: self.resolve(&NavigationRequest::new(link.linktext.as_str(), note)),
                linktext: link.linktext,
                is_embed: link.is_embed,
            })
            .collect())
    }

    /// Parse and answer one input line.
    pub fn handle_line(&mut self, line: &str) -> Response {
        match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                debug!("Request: {:?}", request);
                self.handle(request)
            }
            Err(e) => {
                warn!("Malformed request: {}", e);
                Response::Error {
                    message: format!("Malformed request: {}", e),
                }
            }
        }
    }

    /// Serve requests from `input` until it closes, applying `events` as they
    /// arrive.
    pub async fn run<R, W>(
        &mut self,
        input: R,
        mut output: W,
        events: &mut mpsc::UnboundedReceiver<FileEvent>,
    ) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();

        loop {
            tokio::select! {
                // Drain pending file changes before the next request.
                biased;

                Some(event) = events.recv() => {
                    self.vault.apply(&event).await;
                }

                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("Input closed, ending session");
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }

                    let response = self.handle_line(&line);
                    let mut encoded = serde_json::to_string(&response)?;
                    encoded.push('\n');
                    output.write_all(encoded.as_bytes()).await?;
                    output.flush().await?;
                }
            }
        }

        Ok(())
    }
}
