//! End-to-end tests for the disambiguate session.
//!
//! Builds small vaults on disk, scans them, and drives the session through
//! typed requests and through the JSON-lines loop.

use std::path::Path;
use std::time::Duration;

use alias_index::{Decision, FolderKind, NavigationRequest};
use disambiguate::{FileEvent, FileEventKind, FileWatcher, Request, Response, Session, Vault};
use tempfile::TempDir;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio::time::timeout;

fn write_note(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create folder");
    }
    std::fs::write(full, content).expect("Failed to write note");
}

/// The vault from the disambiguation walkthrough: one note titled
/// "Meeting Notes" next to the source, one archived note aliased to it.
fn meeting_notes_vault() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_note(
        dir.path(),
        "proj/Index.md",
        "See [[Meeting Notes]] and [[Budget#Q3]] and [[Nowhere]].\n",
    );
    write_note(
        dir.path(),
        "proj/Meeting Notes.md",
        "---\ntitle: Meeting Notes\n---\n# Weekly\n",
    );
    write_note(
        dir.path(),
        "proj/archive/Old Meeting Notes.md",
        "---\naliases:\n  - Meeting Notes\n---\n# 2023\n",
    );
    write_note(dir.path(), "proj/Budget.md", "---\ntitle: Budget\n---\n");
    dir
}

async fn session_for(dir: &TempDir) -> Session {
    let vault = Vault::open(dir.path()).await.expect("Failed to open vault");
    Session::new(vault)
}

async fn run_lines(
    session: &mut Session,
    input: &str,
    events: &mut mpsc::UnboundedReceiver<FileEvent>,
) -> Vec<Response> {
    let mut output = Vec::new();
    session
        .run(BufReader::new(input.as_bytes()), &mut output, events)
        .await
        .expect("Session failed");

    String::from_utf8(output)
        .expect("Output is not UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("Response is not JSON"))
        .collect()
}

#[tokio::test]
async fn test_ambiguous_link_shows_closest_candidate_first() {
    let dir = meeting_notes_vault();
    let session = session_for(&dir).await;

    let decision = session.resolve(&NavigationRequest::new("Meeting Notes", "proj/Index.md"));

    assert_eq!(
        decision,
        Decision::ShowDisambiguation {
            linktext: "Meeting Notes".to_string(),
            source_path: "proj/Index.md".to_string(),
            candidates: vec![
                "proj/Meeting Notes.md".to_string(),
                "proj/archive/Old Meeting Notes.md".to_string(),
            ],
        }
    );
}

#[tokio::test]
async fn test_unique_and_unresolved_links() {
    let dir = meeting_notes_vault();
    let session = session_for(&dir).await;

    assert_eq!(
        session.resolve(&NavigationRequest::new("Budget#Q3", "proj/Index.md")),
        Decision::NavigateDirect
    );
    assert_eq!(
        session.resolve(&NavigationRequest::new("Nowhere", "proj/Index.md")),
        Decision::OfferCreateOrLink {
            linktext: "Nowhere".to_string(),
            source_path: "proj/Index.md".to_string(),
        }
    );
}

#[tokio::test]
async fn test_heading_link_into_same_note_navigates_directly() {
    let dir = meeting_notes_vault();
    let mut session = session_for(&dir).await;

    assert_eq!(
        session.resolve(&NavigationRequest::new("#Weekly", "proj/Meeting Notes.md")),
        Decision::NavigateDirect
    );

    let response = session.handle(Request::Disambiguation {
        linktext: "#Weekly".to_string(),
        source_path: "proj/Meeting Notes.md".to_string(),
    });
    let Response::Entries { entries, .. } = response else {
        panic!("Expected entries, got {:?}", response);
    };
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_link_report_covers_every_link() {
    let dir = meeting_notes_vault();
    let session = session_for(&dir).await;

    let report = session.link_report("proj/Index.md").await.expect("Failed to read note");

    let linktexts: Vec<_> = report.iter().map(|link| link.linktext.as_str()).collect();
    assert_eq!(linktexts, vec!["Meeting Notes", "Budget#Q3", "Nowhere"]);
    assert!(matches!(report[0].decision, Decision::ShowDisambiguation { .. }));
    assert!(report[1].decision.is_direct());
    assert!(matches!(report[2].decision, Decision::OfferCreateOrLink { .. }));
}

#[tokio::test]
async fn test_disambiguation_page_and_titles() {
    let dir = meeting_notes_vault();
    let mut session = session_for(&dir).await;

    let response = session.handle(Request::Disambiguation {
        linktext: "Meeting Notes".to_string(),
        source_path: "proj/Index.md".to_string(),
    });
    let Response::Entries { title, entries } = response else {
        panic!("Expected entries, got {:?}", response);
    };
    assert_eq!(title, "Meeting Notes (Disambiguation)");
    assert_eq!(entries[0].linktext, "proj/Meeting Notes");
    assert_eq!(entries[1].title, "Old Meeting Notes");

    let response = session.handle(Request::Title {
        path: "proj/archive/Old Meeting Notes.md".to_string(),
    });
    assert_eq!(
        response,
        Response::Title {
            path: "proj/archive/Old Meeting Notes.md".to_string(),
            title: "Old Meeting Notes".to_string(),
        }
    );
}

#[tokio::test]
async fn test_new_note_draft_for_unresolved_link() {
    let dir = meeting_notes_vault();
    let mut session = session_for(&dir).await;

    let response = session.handle(Request::NewNote {
        linktext: "Nowhere".to_string(),
        source_path: "proj/Index.md".to_string(),
    });
    let Response::Draft {
        draft,
        target_path,
        creatable,
    } = response
    else {
        panic!("Expected draft, got {:?}", response);
    };
    assert_eq!(draft.folder.path, "proj");
    assert_eq!(target_path.as_deref(), Some("proj/Nowhere.md"));
    assert!(creatable);

    let response = session.handle(Request::CheckDraft {
        folder: "proj/".to_string(),
        filename: "Budget".to_string(),
    });
    let Response::Draft {
        draft, creatable, ..
    } = response
    else {
        panic!("Expected draft, got {:?}", response);
    };
    assert_eq!(draft.folder.kind, FolderKind::Existing);
    assert!(!creatable, "proj/Budget.md already exists");

    let response = session.handle(Request::Folders {
        query: "arch".to_string(),
    });
    let Response::Folders { folders } = response else {
        panic!("Expected folders, got {:?}", response);
    };
    assert_eq!(folders[0].path, "proj/archive");
    assert_eq!(folders.last().map(|f| f.kind), Some(FolderKind::New));
}

#[tokio::test]
async fn test_json_lines_loop_survives_malformed_input() {
    let dir = meeting_notes_vault();
    let mut session = session_for(&dir).await;
    let (_tx, mut rx) = mpsc::unbounded_channel();

    let input = concat!(
        "{\"type\":\"resolve\",\"linktext\":\"Budget\",\"sourcePath\":\"proj/Index.md\"}\n",
        "not json\n",
        "\n",
        "{\"type\":\"search\",\"query\":\"budget\",\"sourcePath\":\"proj/Index.md\"}\n",
    );
    let responses = run_lines(&mut session, input, &mut rx).await;

    assert_eq!(responses.len(), 3);
    assert_eq!(
        responses[0],
        Response::Decision {
            decision: Decision::NavigateDirect,
            new_leaf: false,
        }
    );
    assert!(matches!(responses[1], Response::Error { .. }));
    let Response::Suggestions { notes } = &responses[2] else {
        panic!("Expected suggestions, got {:?}", responses[2]);
    };
    assert_eq!(notes[0].path, "proj/Budget.md");
}

#[tokio::test]
async fn test_file_events_apply_before_next_request() {
    let dir = meeting_notes_vault();
    let mut session = session_for(&dir).await;
    let (tx, mut rx) = mpsc::unbounded_channel();

    // A second note starts answering to "Budget".
    write_note(dir.path(), "finance/Budget 2024.md", "---\naliases: [Budget]\n---\n");
    tx.send(FileEvent {
        path: "finance/Budget 2024.md".to_string(),
        kind: FileEventKind::Modified,
    })
    .expect("Failed to queue event");

    let input = "{\"type\":\"resolve\",\"linktext\":\"Budget\",\"sourcePath\":\"proj/Index.md\"}\n";
    let responses = run_lines(&mut session, input, &mut rx).await;

    let Response::Decision { decision, .. } = &responses[0] else {
        panic!("Expected decision, got {:?}", responses[0]);
    };
    let Decision::ShowDisambiguation { candidates, .. } = decision else {
        panic!("Expected disambiguation, got {:?}", decision);
    };
    assert_eq!(
        candidates,
        &vec!["proj/Budget.md".to_string(), "finance/Budget 2024.md".to_string()]
    );
}

#[tokio::test]
async fn test_rename_keeps_identity() {
    let dir = meeting_notes_vault();
    let mut session = session_for(&dir).await;

    let response = session.handle(Request::Rename {
        from: "proj/archive/Old Meeting Notes.md".to_string(),
        to: "attic/Old Meeting Notes.md".to_string(),
    });
    assert_eq!(response, Response::Renamed { renamed: true });

    let Decision::ShowDisambiguation { candidates, .. } =
        session.resolve(&NavigationRequest::new("Meeting Notes", "proj/Index.md"))
    else {
        panic!("Expected disambiguation");
    };
    assert_eq!(candidates[1], "attic/Old Meeting Notes.md");
}

/// Test file watcher detects note changes.
#[tokio::test]
async fn test_file_watcher_reports_note_changes() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let mut watcher = FileWatcher::new(dir.path().to_path_buf()).expect("Failed to create watcher");

    // Give watcher time to fully initialize - FSEvents on macOS needs time
    tokio::time::sleep(Duration::from_millis(500)).await;

    std::fs::write(dir.path().join("ignored.txt"), "x").expect("Failed to write file");
    let note = dir.path().join("Note.md");
    std::fs::write(&note, "# Hello").expect("Failed to write note");
    tokio::time::sleep(Duration::from_millis(100)).await;
    std::fs::write(&note, "---\ntitle: Hello\n---\n").expect("Failed to modify note");

    let event = timeout(Duration::from_secs(10), watcher.event_rx().recv())
        .await
        .expect("Timeout waiting for file event")
        .expect("No event received");

    assert_eq!(event.path, "Note.md");
    assert_eq!(event.kind, FileEventKind::Modified);
}
