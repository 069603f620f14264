//! The sheet controller
//!
//! Owns the roster store and wires the collaborators together:
//! - **Load**: restore → reconcile → render
//! - **Storage change**: replay the load path for foreign writes to our key
//! - **Sign-in**: resolve the display name, open an upload for that slot
//! - **Submit**: validate, decode, re-check and commit the file
//! - **Clear** and **Export**

use crate::adapters::{ExportAdapter, ExportArtifact, ExportRequest, PresentationAdapter, PresentationObserver};
use crate::config::SheetConfig;
use crate::error::SheetError;
use crate::export::export_file_name;
use crate::notice::Notice;
use chrono::{DateTime, FixedOffset, Utc};
use parking_lot::Mutex;
use sigsheet_identity::{Identity, IdentityResolver, NameListResolver};
use sigsheet_roster::reconcile::{self, RosterStatus};
use sigsheet_roster::{
    InstanceId, NameList, RenderModel, Roster, RosterError, RosterStore, SlotIndex, StorageBackend,
    StorageEvent,
};
use sigsheet_upload::{DataUrlDecoder, FileDecoder, SelectedFile, UploadError, UploadPhase, UploadSession};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

type Claims = Arc<Mutex<BTreeSet<SlotIndex>>>;

/// Hold on a slot while its upload is open; released on drop
#[derive(Debug)]
struct SlotClaim {
    claims: Claims,
    slot: SlotIndex,
}

impl SlotClaim {
    fn acquire(claims: &Claims, slot: SlotIndex) -> Option<Self> {
        claims.lock().insert(slot).then(|| Self {
            claims: Arc::clone(claims),
            slot,
        })
    }
}

impl Drop for SlotClaim {
    fn drop(&mut self) {
        self.claims.lock().remove(&self.slot);
    }
}

/// An open upload for a signed-in participant
///
/// Dropping the ticket abandons the upload.
#[derive(Debug)]
pub struct UploadTicket {
    identity: Identity,
    session: UploadSession,
    _claim: SlotClaim,
}

impl UploadTicket {
    /// Target slot
    #[inline]
    #[must_use]
    pub fn slot(&self) -> SlotIndex {
        self.session.slot()
    }

    /// Roster name of the target slot
    #[inline]
    #[must_use]
    pub fn participant(&self) -> &str {
        self.session.participant()
    }

    /// Who signed in
    #[inline]
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current upload phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> UploadPhase {
        self.session.phase()
    }
}

/// Signature sheet
pub struct Sheet {
    names: NameList,
    store: Mutex<RosterStore>,
    resolver: Arc<dyn IdentityResolver>,
    decoder: Arc<dyn FileDecoder>,
    claims: Claims,
    origin: Option<InstanceId>,
    config: SheetConfig,
    offset: FixedOffset,
}

impl Sheet {
    /// Sheet over `storage`; call [`load`](Self::load) before use
    ///
    /// # Errors
    /// Returns [`SheetError::Config`] if the configuration is invalid
    pub fn new(config: SheetConfig, storage: Arc<dyn StorageBackend>) -> Result<Self, SheetError> {
        config.validate()?;
        let names = config.name_list()?;
        let offset = config.export.offset()?;
        let store = RosterStore::new(storage, config.storage_key.clone(), names.len());

        Ok(Self {
            resolver: Arc::new(NameListResolver::new(names.clone())),
            names,
            store: Mutex::new(store),
            decoder: Arc::new(DataUrlDecoder),
            claims: Arc::default(),
            origin: None,
            config,
            offset,
        })
    }

    /// Render through `adapter` on every roster change
    #[must_use]
    pub fn with_presenter(self, adapter: Arc<dyn PresentationAdapter>) -> Self {
        let observer = PresentationObserver::new(self.names.clone(), adapter);
        self.store.lock().observe(Arc::new(observer));
        self
    }

    /// Use a different file decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: Arc<dyn FileDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Use a different identity resolver
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Instance id of this sheet's own storage writes, ignored on notification
    #[must_use]
    pub fn with_origin(mut self, origin: InstanceId) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Participant names
    #[inline]
    #[must_use]
    pub fn names(&self) -> &NameList {
        &self.names
    }

    /// Configuration in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Restore persisted state and re-render
    ///
    /// On corrupt state the roster is already reset to empty when the error
    /// is returned; the sheet stays usable.
    ///
    /// # Errors
    /// [`SheetError::Roster`] with the restore failure
    pub fn load(&self) -> Result<RosterStatus, SheetError> {
        let mut store = self.store.lock();
        match store.restore() {
            Ok(()) => Ok(reconcile::status(store.roster())),
            Err(e @ RosterError::CorruptState { .. }) => {
                tracing::warn!(error = %e, "loaded empty sheet after unreadable snapshot");
                Err(e.into())
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to load sheet");
                Err(e.into())
            }
        }
    }

    /// React to a storage-change notification
    ///
    /// Returns whether the sheet reloaded.
    ///
    /// # Errors
    /// Restore failure, as for [`load`](Self::load)
    pub fn on_storage_event(&self, event: &StorageEvent) -> Result<bool, SheetError> {
        if event.key != self.config.storage_key || Some(event.origin) == self.origin {
            return Ok(false);
        }
        tracing::debug!(key = %event.key, origin = %event.origin, "sheet changed elsewhere, reloading");
        self.load().map(|_| true)
    }

    /// Current roster snapshot
    #[must_use]
    pub fn snapshot(&self) -> Roster {
        self.store.lock().snapshot()
    }

    /// Current completion status
    #[must_use]
    pub fn status(&self) -> RosterStatus {
        reconcile::status(self.store.lock().roster())
    }

    /// Whether every slot is signed
    #[must_use]
    pub fn is_complete(&self) -> bool {
        reconcile::is_complete(self.store.lock().roster())
    }

    /// Render model of the current roster
    #[must_use]
    pub fn render_model(&self) -> RenderModel {
        RenderModel::build(self.store.lock().roster(), &self.names)
    }

    /// Open an upload for a signed-in participant
    ///
    /// # Errors
    /// [`SheetError::NoMatch`] if the name is not on the roster,
    /// [`SheetError::AlreadySigned`] if the slot is signed, or
    /// [`SheetError::UploadInProgress`] if another ticket holds the slot
    pub fn sign_in(&self, identity: Identity) -> Result<UploadTicket, SheetError> {
        tracing::info!(
            display_name = %identity.display_name,
            email = identity.email.as_deref().unwrap_or("-"),
            "user signed in"
        );

        let Some(slot) = self.resolver.resolve(&identity) else {
            return Err(SheetError::NoMatch {
                display_name: identity.display_name,
            });
        };
        let name = self.slot_name(slot);

        let claim = SlotClaim::acquire(&self.claims, slot)
            .ok_or_else(|| SheetError::UploadInProgress { name: name.clone() })?;

        let session = UploadSession::begin(slot, name, self.store.lock().roster())
            .map_err(|e| self.named(e.into()))?;

        Ok(UploadTicket {
            identity,
            session,
            _claim: claim,
        })
    }

    /// Validate, decode and commit the selected file
    ///
    /// The store is not locked while the file decodes; the commit re-checks
    /// the slot against whatever the roster holds by then.
    ///
    /// # Errors
    /// Validation, decode or roster errors; nothing is written on failure
    pub async fn submit(&self, mut ticket: UploadTicket, file: SelectedFile) -> Result<Notice, SheetError> {
        ticket
            .session
            .select_file(file)
            .map_err(|e| self.named(e.into()))?;
        ticket
            .session
            .decode(self.decoder.as_ref())
            .await
            .map_err(|e| self.named(e.into()))?;

        let slot = {
            let mut store = self.store.lock();
            ticket
                .session
                .commit(&mut store)
                .map_err(|e| self.named(e.into()))?
        };

        tracing::info!(slot = %slot, name = %ticket.participant(), "signature uploaded");
        Ok(Notice::info(format!(
            "Signature uploaded for {}!",
            ticket.identity.display_name
        )))
    }

    /// Reset every slot
    ///
    /// # Errors
    /// Storage write failure; the roster is then unchanged
    pub fn clear(&self) -> Result<Notice, SheetError> {
        self.store.lock().clear()?;
        Ok(Notice::info("Sheet cleared!"))
    }

    /// Export the grid through `adapter`, stamped with the current time
    ///
    /// # Errors
    /// See [`export_at`](Self::export_at)
    pub fn export(&self, adapter: &dyn ExportAdapter) -> Result<ExportArtifact, SheetError> {
        self.export_at(adapter, Utc::now())
    }

    /// Export the grid through `adapter`, stamped with `now`
    ///
    /// # Errors
    /// [`SheetError::NothingToExport`] if no slot is signed, or
    /// [`SheetError::Export`] if the adapter fails
    pub fn export_at(&self, adapter: &dyn ExportAdapter, now: DateTime<Utc>) -> Result<ExportArtifact, SheetError> {
        let extension = adapter.extension();
        let format = extension.to_ascii_uppercase();
        let model = self.render_model();
        if !model.has_images() {
            return Err(SheetError::NothingToExport { format });
        }

        let export = &self.config.export;
        let request = ExportRequest {
            file_name: export_file_name(&export.file_prefix, now, self.offset, extension),
            scale: export.scale,
            background: export.background.clone(),
        };

        match adapter.export(&model, &request) {
            Ok(artifact) => {
                tracing::info!(file = %artifact.file_name, bytes = artifact.bytes, "sheet exported");
                Ok(artifact)
            }
            Err(e) => {
                tracing::error!(file = %request.file_name, error = %e, "export failed");
                Err(SheetError::Export { format, source: e })
            }
        }
    }

    fn slot_name(&self, slot: SlotIndex) -> String {
        self.names
            .get(slot)
            .map_or_else(|| format!("row {}", slot.get() + 1), str::to_string)
    }

    /// Attach the participant name to already-signed rejections
    fn named(&self, err: SheetError) -> SheetError {
        match err {
            SheetError::Roster(RosterError::AlreadySigned { index })
            | SheetError::Upload(UploadError::Roster(RosterError::AlreadySigned { index })) => {
                SheetError::AlreadySigned {
                    name: self.slot_name(index),
                }
            }
            other => other,
        }
    }
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("names", &self.names)
            .field("store", &*self.store.lock())
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockExportAdapter;
    use crate::error::ExportError;
    use chrono::TimeZone;
    use sigsheet_roster::MemoryStorage;

    fn sheet(names: &[&str]) -> Sheet {
        let config = SheetConfig::new().with_names(names.iter().copied());
        let sheet = Sheet::new(config, Arc::new(MemoryStorage::new())).unwrap();
        sheet.load().unwrap();
        sheet
    }

    fn png(kib: usize) -> SelectedFile {
        SelectedFile::from_bytes("sig.png", "image/png", vec![7; kib * 1024])
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SheetConfig::new().with_names(Vec::<String>::new());
        assert!(matches!(
            Sheet::new(config, Arc::new(MemoryStorage::new())),
            Err(SheetError::Config(_))
        ));
    }

    #[test]
    fn second_ticket_for_same_slot_is_refused() {
        let sheet = sheet(&["Ahsan", "Nasa"]);
        let first = sheet.sign_in(Identity::new("Ahsan Rahman")).unwrap();

        let err = sheet.sign_in(Identity::new("ahsan")).unwrap_err();
        assert!(matches!(err, SheetError::UploadInProgress { ref name } if name == "Ahsan"));

        let other = sheet.sign_in(Identity::new("Nasa X")).unwrap();
        assert_eq!(other.slot(), SlotIndex::new(1));

        drop(first);
        assert!(sheet.sign_in(Identity::new("Ahsan")).is_ok());
    }

    #[tokio::test]
    async fn claim_released_after_submit() {
        let sheet = sheet(&["Ahsan"]);
        let ticket = sheet.sign_in(Identity::new("Ahsan")).unwrap();
        assert_eq!(ticket.phase(), UploadPhase::AwaitingFileSelection);

        let err = sheet.submit(ticket, png(3 * 1024)).await.unwrap_err();
        assert_eq!(err.user_message(), "File size exceeds 2MB.");

        let ticket = sheet.sign_in(Identity::new("Ahsan")).unwrap();
        let notice = sheet.submit(ticket, png(100)).await.unwrap();
        assert_eq!(notice.message, "Signature uploaded for Ahsan!");
    }

    #[tokio::test]
    async fn signed_slot_rejected_with_name() {
        let sheet = sheet(&["Ahsan", "Nasa"]);
        let ticket = sheet.sign_in(Identity::new("Nasa")).unwrap();
        sheet.submit(ticket, png(10)).await.unwrap();

        let err = sheet.sign_in(Identity::new("NASA Putri")).unwrap_err();
        assert_eq!(
            err.user_message(),
            "A signature has already been uploaded for Nasa."
        );
    }

    #[test]
    fn export_refused_when_empty() {
        let sheet = sheet(&["Ahsan"]);
        let mut adapter = MockExportAdapter::new();
        adapter.expect_extension().return_const("png");
        adapter.expect_export().never();

        let err = sheet.export(&adapter).unwrap_err();
        assert!(matches!(err, SheetError::NothingToExport { .. }));
        assert_eq!(err.user_message(), "No data in the table to export as PNG.");
    }

    #[tokio::test]
    async fn export_passes_named_request() {
        let sheet = sheet(&["Ahsan", "Nasa"]);
        let ticket = sheet.sign_in(Identity::new("Ahsan")).unwrap();
        sheet.submit(ticket, png(1)).await.unwrap();

        let mut adapter = MockExportAdapter::new();
        adapter.expect_extension().return_const("png");
        adapter
            .expect_export()
            .withf(|model, request| {
                model.rows.len() == 2
                    && model.rows[0].image.is_some()
                    && request.file_name == "GarasiAMI_Table_10_18_2026__3_04_05_PM.png"
                    && request.scale == 2
                    && request.background == "#ffffff"
            })
            .times(1)
            .returning(|_, request| {
                Ok(ExportArtifact {
                    file_name: request.file_name.clone(),
                    location: None,
                    bytes: 42,
                })
            });

        let now = Utc.with_ymd_and_hms(2026, 10, 18, 8, 4, 5).unwrap();
        let artifact = sheet.export_at(&adapter, now).unwrap();
        assert_eq!(artifact.bytes, 42);
    }

    #[tokio::test]
    async fn export_failure_has_retry_message() {
        let sheet = sheet(&["Ahsan"]);
        let ticket = sheet.sign_in(Identity::new("Ahsan")).unwrap();
        sheet.submit(ticket, png(1)).await.unwrap();

        let mut adapter = MockExportAdapter::new();
        adapter.expect_extension().return_const("png");
        adapter
            .expect_export()
            .returning(|_, _| Err(ExportError::Render("canvas unavailable".to_string())));

        let err = sheet.export(&adapter).unwrap_err();
        assert_eq!(err.user_message(), "Failed to generate PNG. Please try again.");
    }

    #[test]
    fn own_and_foreign_key_events_are_ignored() {
        let storage = MemoryStorage::new();
        let config = SheetConfig::new().with_names(["Ahsan"]);
        let sheet = Sheet::new(config, Arc::new(storage.clone()))
            .unwrap()
            .with_origin(storage.origin());

        let own = StorageEvent {
            key: "spreadsheetData".to_string(),
            origin: storage.origin(),
        };
        let other_key = StorageEvent {
            key: "somethingElse".to_string(),
            origin: InstanceId::new(),
        };
        let foreign = StorageEvent {
            key: "spreadsheetData".to_string(),
            origin: InstanceId::new(),
        };

        assert!(!sheet.on_storage_event(&own).unwrap());
        assert!(!sheet.on_storage_event(&other_key).unwrap());
        assert!(sheet.on_storage_event(&foreign).unwrap());
    }
}
