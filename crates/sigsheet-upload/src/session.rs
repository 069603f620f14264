//! One upload, driven through its phases
//!
//! Every rejection returns the session to [`UploadPhase::Idle`]; an idle
//! session accepts no further steps.

use crate::decode::FileDecoder;
use crate::error::UploadError;
use crate::phase::{validate_transition, UploadPhase};
use crate::validation::{validate_file, SelectedFile};
use sigsheet_roster::{ImageData, Roster, RosterStore, SlotIndex};

/// Upload of one signature into one slot
#[derive(Debug)]
pub struct UploadSession {
    slot: SlotIndex,
    participant: String,
    phase: UploadPhase,
    file: Option<SelectedFile>,
    image: Option<ImageData>,
}

impl UploadSession {
    /// Start an upload for `slot`, which must exist and be unsigned
    ///
    /// # Errors
    /// [`RosterError::AlreadySigned`](sigsheet_roster::RosterError::AlreadySigned)
    /// or [`RosterError::SlotOutOfRange`](sigsheet_roster::RosterError::SlotOutOfRange);
    /// no session is created.
    pub fn begin(
        slot: SlotIndex,
        participant: impl Into<String>,
        roster: &Roster,
    ) -> Result<Self, UploadError> {
        roster.ensure_signable(slot)?;
        validate_transition(UploadPhase::Idle, UploadPhase::AwaitingFileSelection)?;

        Ok(Self {
            slot,
            participant: participant.into(),
            phase: UploadPhase::AwaitingFileSelection,
            file: None,
            image: None,
        })
    }

    /// Target slot
    #[inline]
    #[must_use]
    pub fn slot(&self) -> SlotIndex {
        self.slot
    }

    /// Participant name for the target slot
    #[inline]
    #[must_use]
    pub fn participant(&self) -> &str {
        &self.participant
    }

    /// Current phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    /// Supply the chosen file and check it
    ///
    /// # Errors
    /// [`UploadError::Validation`] (session returns to idle) or
    /// [`UploadError::IllegalTransition`] if no file is awaited
    pub fn select_file(&mut self, file: SelectedFile) -> Result<(), UploadError> {
        self.advance(UploadPhase::Validating)?;

        if let Err(e) = validate_file(&file) {
            tracing::debug!(slot = %self.slot, file = %file.name, error = %e, "file rejected");
            self.reset();
            return Err(e.into());
        }

        self.file = Some(file);
        Ok(())
    }

    /// Decode the validated file; the session suspends here
    ///
    /// # Errors
    /// Decoder failure (session returns to idle) or
    /// [`UploadError::IllegalTransition`] outside the validating phase
    pub async fn decode(&mut self, decoder: &dyn FileDecoder) -> Result<(), UploadError> {
        validate_transition(self.phase, UploadPhase::Committing)?;
        let Some(file) = self.file.take() else {
            return Err(UploadError::IllegalTransition {
                from: self.phase,
                to: UploadPhase::Committing,
            });
        };

        match decoder.decode(&file).await {
            Ok(image) => {
                self.image = Some(image);
                self.advance(UploadPhase::Committing)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }

    /// Write the decoded signature into the store
    ///
    /// The slot is checked again first: another instance may have signed it
    /// while the file was decoding. The session is idle afterwards whatever
    /// the outcome.
    ///
    /// # Errors
    /// [`UploadError::Roster`] if the slot is no longer signable or the write
    /// fails, or [`UploadError::IllegalTransition`] if nothing was decoded
    pub fn commit(&mut self, store: &mut RosterStore) -> Result<SlotIndex, UploadError> {
        validate_transition(self.phase, UploadPhase::Idle)?;
        let image = match (self.phase, self.image.take()) {
            (UploadPhase::Committing, Some(image)) => image,
            (from, _) => {
                return Err(UploadError::IllegalTransition {
                    from,
                    to: UploadPhase::Idle,
                })
            }
        };
        self.reset();

        if let Err(e) = store.roster().ensure_signable(self.slot) {
            tracing::info!(slot = %self.slot, error = %e, "slot changed while the file was decoding");
            return Err(e.into());
        }
        store.set_signature(self.slot, image)?;
        Ok(self.slot)
    }

    /// Abandon the upload
    pub fn cancel(&mut self) {
        if self.phase != UploadPhase::Idle {
            self.reset();
        }
    }

    fn advance(&mut self, to: UploadPhase) -> Result<(), UploadError> {
        validate_transition(self.phase, to)?;
        self.phase = to;
        Ok(())
    }

    fn reset(&mut self) {
        self.phase = UploadPhase::Idle;
        self.file = None;
        self.image = None;
    }
}
