//! Product option editor - Stages option edits for one product and commits or reverts
//! them as a unit.
//!
//! While editing, three label lists are tracked against the store snapshot:
//! `previous` (what the store held when editing began), `added` (new this session) and
//! `deleted` (previous labels marked for removal). Invariants: `added` and `previous`
//! never share a label, `deleted` is a subset of `previous`, and the visible list is
//! `previous - deleted + added`. Nothing touches the store until [`OptionEditor::commit`].

use crate::{
    core::product::{delete_option, get_product_by_id, get_product_options, insert_option},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use tracing::{debug, error, info, instrument};

/// Working state of an active edit session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSession {
    product_id: i64,
    previous: Vec<String>,
    added: Vec<String>,
    deleted: Vec<String>,
    visible: Vec<String>,
}

impl EditSession {
    /// Product being edited.
    pub const fn product_id(&self) -> i64 {
        self.product_id
    }

    /// Labels persisted when the session began.
    pub fn previous(&self) -> &[String] {
        &self.previous
    }

    /// Labels added this session, not yet persisted.
    pub fn added(&self) -> &[String] {
        &self.added
    }

    /// Persisted labels marked for removal this session.
    pub fn deleted(&self) -> &[String] {
        &self.deleted
    }

    /// Labels currently shown to the operator.
    pub fn visible(&self) -> &[String] {
        &self.visible
    }
}

/// Editor state machine: `Viewing` until [`OptionEditor::begin_edit`], then `Editing`
/// until a commit or revert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OptionEditor {
    /// No edit in progress
    #[default]
    Viewing,
    /// Staging changes for one product
    Editing(EditSession),
}

/// What a commit wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    /// Product whose options were committed
    pub product_id: i64,
    /// Labels inserted into the store
    pub inserted: Vec<String>,
    /// Labels deleted from the store
    pub removed: Vec<String>,
    /// Labels whose insert or delete failed
    pub failed: Vec<String>,
}

impl OptionEditor {
    /// Creates an editor in the viewing state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an edit session is active.
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    /// The active session, if any.
    #[must_use]
    pub const fn session(&self) -> Option<&EditSession> {
        match self {
            Self::Viewing => None,
            Self::Editing(session) => Some(session),
        }
    }

    /// Labels currently shown, empty while viewing.
    #[must_use]
    pub fn visible_options(&self) -> &[String] {
        self.session().map(EditSession::visible).unwrap_or_default()
    }

    fn session_mut(&mut self) -> Result<&mut EditSession> {
        match self {
            Self::Viewing => Err(Error::NoEditSession),
            Self::Editing(session) => Ok(session),
        }
    }

    /// Starts editing the options of `product_id`, snapshotting the stored labels.
    ///
    /// Any session already in progress is discarded without writing.
    ///
    /// # Errors
    /// Returns [`Error::ProductNotFound`] if the product does not exist, or a database
    /// error if the options cannot be loaded. The editor is left unchanged on error.
    #[instrument(skip(self, db))]
    pub async fn begin_edit(&mut self, db: &DatabaseConnection, product_id: i64) -> Result<()> {
        if get_product_by_id(db, product_id).await?.is_none() {
            return Err(Error::ProductNotFound { id: product_id });
        }
        let previous = get_product_options(db, product_id).await?;

        if self.is_editing() {
            debug!("Discarding unfinished option edit session");
        }
        debug!("Editing {} option(s) of product {product_id}", previous.len());
        *self = Self::Editing(EditSession {
            product_id,
            visible: previous.clone(),
            previous,
            added: Vec::new(),
            deleted: Vec::new(),
        });
        Ok(())
    }

    /// Adds a label to the working list.
    ///
    /// A label that was persisted and marked for deletion this session is restored
    /// instead of being added as new.
    ///
    /// # Errors
    /// - [`Error::NoEditSession`] while viewing
    /// - [`Error::Validation`] for an empty label
    /// - [`Error::DuplicateOption`] if the label is already visible; nothing changes
    pub fn add_option(&mut self, label: &str) -> Result<()> {
        let session = self.session_mut()?;
        let label = label.trim();
        if label.is_empty() {
            return Err(Error::Validation {
                message: "Option label cannot be empty".to_string(),
            });
        }

        if session.visible.iter().any(|v| v == label) {
            return Err(Error::DuplicateOption {
                label: label.to_string(),
            });
        }

        if let Some(index) = session.deleted.iter().position(|d| d == label) {
            session.deleted.remove(index);
            debug!("Restored option {label}");
        } else {
            session.added.push(label.to_string());
            debug!("Staged new option {label}");
        }
        session.visible.push(label.to_string());
        Ok(())
    }

    /// Removes labels from the working list.
    ///
    /// Labels are trimmed like in [`OptionEditor::add_option`]. Labels added this session
    /// are simply dropped; persisted labels are marked for deletion. Labels the session
    /// does not know are ignored.
    ///
    /// # Errors
    /// Returns [`Error::NoEditSession`] while viewing.
    pub fn delete_options<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<()> {
        let session = self.session_mut()?;

        for label in labels {
            let label = label.as_ref().trim();
            if let Some(index) = session.added.iter().position(|a| a == label) {
                session.added.remove(index);
            } else if session.previous.iter().any(|p| p == label) {
                if !session.deleted.iter().any(|d| d == label) {
                    session.deleted.push(label.to_string());
                }
            } else {
                debug!("Ignoring delete of unknown option {label}");
                continue;
            }
            session.visible.retain(|v| v != label);
        }
        Ok(())
    }

    /// Writes the staged changes: inserts for added labels, deletes for deleted ones.
    ///
    /// Writes are independent; a failed write is logged and listed in
    /// [`CommitSummary::failed`] without undoing earlier ones. The editor returns to
    /// viewing either way.
    ///
    /// # Errors
    /// Returns [`Error::NoEditSession`] while viewing.
    #[instrument(skip(self, db))]
    pub async fn commit(&mut self, db: &DatabaseConnection) -> Result<CommitSummary> {
        let Self::Editing(session) = std::mem::take(self) else {
            return Err(Error::NoEditSession);
        };

        let mut summary = CommitSummary {
            product_id: session.product_id,
            ..CommitSummary::default()
        };

        for label in session.added {
            match insert_option(db, session.product_id, &label).await {
                Ok(_) => summary.inserted.push(label),
                Err(e) => {
                    error!("Failed to insert option {label}: {e}");
                    summary.failed.push(label);
                }
            }
        }

        for label in session.deleted {
            match delete_option(db, session.product_id, &label).await {
                Ok(_) => summary.removed.push(label),
                Err(e) => {
                    error!("Failed to delete option {label}: {e}");
                    summary.failed.push(label);
                }
            }
        }

        info!(
            "Committed options for product {}: {} added, {} removed, {} failed",
            summary.product_id,
            summary.inserted.len(),
            summary.removed.len(),
            summary.failed.len()
        );
        Ok(summary)
    }

    /// Drops the staged changes without writing and returns to viewing. Returns the
    /// restored list, which is exactly the snapshot taken when editing began.
    ///
    /// # Errors
    /// Returns [`Error::NoEditSession`] while viewing.
    pub fn revert(&mut self) -> Result<Vec<String>> {
        match std::mem::take(self) {
            Self::Editing(session) => Ok(session.previous),
            Self::Viewing => Err(Error::NoEditSession),
        }
    }
}
