/// Chat widget state machine
///
/// One instance owns all of its state: visibility, the fetched peer set,
/// the active conversation target, the draft buffer, and the per-peer
/// transcripts. Every transition is a synchronous `&mut self` call; the
/// only async work (directory fetch, delivery) happens outside, at the
/// edges.
use crate::directory::Peer;
use crate::dispatch::{DeliveryDispatcher, OutboundMessage};
use std::collections::HashMap;
use tracing::debug;

/// Display state of the floating widget.
///
/// `Closed` is the initial state. Toggling from `Closed` always lands on
/// `Expanded`, never `Collapsed` — an open widget must show either the
/// bubble or the panel. Toggling while open flips between the two open
/// states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Closed,
    Collapsed,
    Expanded,
}

/// Identity supplied by the session collaborator at construction.
///
/// An empty `user_id` disables the widget: it renders hidden and ignores
/// all events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: String,
    pub username: String,
}

impl SessionUser {
    pub fn new(user_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            username: username.into(),
        }
    }
}

/// One transcript line. Append-only; never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationEntry {
    pub author: String,
    pub body: String,
}

/// Render target derived from visibility + selection. Every reachable
/// widget state maps to exactly one of these.
#[derive(Debug, PartialEq, Eq)]
pub enum WidgetView<'a> {
    /// Widget disabled (no session); nothing renders
    Hidden,
    /// Closed: only the floating launcher bubble
    Launcher,
    /// Open but collapsed to the small bubble
    Minimized,
    /// Open, no active peer: the selectable peer list (may be empty,
    /// which renders a "no peers" placeholder)
    Directory { peers: &'a [Peer] },
    /// Open with an active peer: transcript + composer
    Conversation {
        peer: &'a Peer,
        transcript: &'a [ConversationEntry],
    },
}

pub struct ChatWidget {
    session: SessionUser,
    outbox: DeliveryDispatcher,
    visibility: Visibility,
    peers: Vec<Peer>,
    active: Option<Peer>,
    draft: String,
    // Keyed per peer id so transcripts never bleed across conversations
    transcripts: HashMap<String, Vec<ConversationEntry>>,
}

impl ChatWidget {
    pub fn new(session: SessionUser, outbox: DeliveryDispatcher) -> Self {
        Self {
            session,
            outbox,
            visibility: Visibility::Closed,
            peers: Vec::new(),
            active: None,
            draft: String::new(),
            transcripts: HashMap::new(),
        }
    }

    /// False when the session collaborator supplied no user id
    pub fn is_enabled(&self) -> bool {
        !self.session.user_id.is_empty()
    }

    pub fn session(&self) -> &SessionUser {
        &self.session
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Store the fetched directory verbatim
    pub fn set_peers(&mut self, peers: Vec<Peer>) {
        self.peers = peers;
    }

    pub fn peers(&self) -> &[Peer] {
        &self.peers
    }

    pub fn active_peer(&self) -> Option<&Peer> {
        self.active.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Flip the open/minimized state; opening from `Closed` always expands
    pub fn toggle(&mut self) {
        if !self.is_enabled() {
            return;
        }
        self.visibility = match self.visibility {
            Visibility::Closed => Visibility::Expanded,
            Visibility::Expanded => Visibility::Collapsed,
            Visibility::Collapsed => Visibility::Expanded,
        };
    }

    /// Close the widget. Also deselects, so the next open shows the
    /// directory rather than a stale conversation. Transcripts are
    /// retained until the widget value itself is dropped.
    pub fn close(&mut self) {
        self.visibility = Visibility::Closed;
        self.deselect();
    }

    /// Make `peer` the active conversation target. Fetches nothing and
    /// clears nothing; the peer's transcript (if any) becomes visible.
    pub fn select(&mut self, peer: Peer) {
        if !self.is_enabled() {
            return;
        }
        debug!("Selected peer {}", peer.id);
        self.active = Some(peer);
    }

    /// Back out to the directory view without discarding any transcript
    pub fn deselect(&mut self) {
        self.active = None;
    }

    /// Replace the draft buffer; validated only at submit time
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn push_draft_char(&mut self, c: char) {
        self.draft.push(c);
    }

    pub fn pop_draft_char(&mut self) {
        self.draft.pop();
    }

    /// Transcript of the active conversation (empty when nothing selected)
    pub fn transcript(&self) -> &[ConversationEntry] {
        self.active
            .as_ref()
            .and_then(|p| self.transcripts.get(&p.id))
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    pub fn transcript_for(&self, peer_id: &str) -> &[ConversationEntry] {
        self.transcripts
            .get(peer_id)
            .map(|v| v.as_slice())
            .unwrap_or_default()
    }

    /// Submit the current draft to the active peer.
    ///
    /// No-op when nothing is selected or the trimmed draft is empty (the
    /// draft is left untouched on rejection). Otherwise the local echo is
    /// appended synchronously, the draft is cleared unconditionally, and
    /// the payload goes to the dispatcher. The echo is never retracted if
    /// delivery later fails.
    pub fn submit(&mut self) {
        let Some(peer) = self.active.as_ref() else {
            debug!("Submit ignored: no peer selected");
            return;
        };
        if self.draft.trim().is_empty() {
            return;
        }

        let recipient_id = peer.id.clone();
        let body = std::mem::take(&mut self.draft);

        self.transcripts
            .entry(recipient_id.clone())
            .or_default()
            .push(ConversationEntry {
                author: self.session.username.clone(),
                body: body.clone(),
            });

        self.outbox.dispatch(OutboundMessage {
            sender_id: self.session.user_id.clone(),
            recipient_id,
            body,
        });
    }

    /// Resolve the current render target
    pub fn view(&self) -> WidgetView<'_> {
        if !self.is_enabled() {
            return WidgetView::Hidden;
        }
        match self.visibility {
            Visibility::Closed => WidgetView::Launcher,
            Visibility::Collapsed => WidgetView::Minimized,
            Visibility::Expanded => match self.active.as_ref() {
                Some(peer) => WidgetView::Conversation {
                    peer,
                    transcript: self.transcript(),
                },
                None => WidgetView::Directory { peers: &self.peers },
            },
        }
    }
}
