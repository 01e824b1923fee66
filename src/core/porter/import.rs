//! Document import
//!
//! [`HealthNetImport`] walks a document section by section and hands each
//! decoded record to a creator callback supplied by the caller. The callback
//! returns the id the target system assigned, which later sections use to
//! resolve their references. A record that fails to decode or to be created
//! is logged and skipped; the rest of the document still imports.

use super::document::RawDocument;
use super::index_map::{EntityKind, IndexMaps};
use super::records::{
    AdminRecord, AppointmentRecord, DoctorRecord, HospitalRecord, LogEntryRecord, NurseRecord,
    PatientRecord, PorterRecord, PrescriptionRecord, TestRecord,
};
use super::summary::ImportSummary;
use crate::domain::{PorterError, Result};
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::time::Instant;

/// Creates one imported record and returns its new id
pub type CreateFn<R> = Box<dyn Fn(R) -> BoxFuture<'static, Result<i64>> + Send + Sync>;

fn boxed<R, F, Fut>(create: F) -> CreateFn<R>
where
    F: Fn(R) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<i64>> + Send + 'static,
{
    Box::new(move |record| create(record).boxed())
}

/// Importer for one document
///
/// A section without a registered creator is not imported at all.
///
/// # Example
///
/// ```rust
/// use healthnet::core::porter::{EntityKind, HealthNetImport};
///
/// # async fn example() -> healthnet::domain::Result<()> {
/// let json = r#"{"hospitals": [{"name": "General", "addr": "1 Main St"}]}"#;
/// let mut import = HealthNetImport::from_json(json)?
///     .with_hospitals(|hospital| async move {
///         println!("creating {}", hospital.name);
///         Ok(100)
///     });
///
/// let summary = import.import_all().await;
/// assert_eq!(summary.created(EntityKind::Hospitals), 1);
/// # Ok(())
/// # }
/// ```
pub struct HealthNetImport {
    document: RawDocument,
    maps: IndexMaps,
    create_hospital: Option<CreateFn<HospitalRecord>>,
    create_admin: Option<CreateFn<AdminRecord>>,
    create_doctor: Option<CreateFn<DoctorRecord>>,
    create_nurse: Option<CreateFn<NurseRecord>>,
    create_patient: Option<CreateFn<PatientRecord>>,
    create_appointment: Option<CreateFn<AppointmentRecord>>,
    create_test: Option<CreateFn<TestRecord>>,
    create_prescription: Option<CreateFn<PrescriptionRecord>>,
    create_log_entry: Option<CreateFn<LogEntryRecord>>,
}

macro_rules! creator_setter {
    ($(#[$meta:meta])* $method:ident, $field:ident, $record:ty) => {
        $(#[$meta])*
        pub fn $method<F, Fut>(mut self, create: F) -> Self
        where
            F: Fn($record) -> Fut + Send + Sync + 'static,
            Fut: Future<Output = Result<i64>> + Send + 'static,
        {
            self.$field = Some(boxed(create));
            self
        }
    };
}

impl HealthNetImport {
    pub fn new(document: RawDocument) -> Self {
        Self {
            document,
            maps: IndexMaps::new(),
            create_hospital: None,
            create_admin: None,
            create_doctor: None,
            create_nurse: None,
            create_patient: None,
            create_appointment: None,
            create_test: None,
            create_prescription: None,
            create_log_entry: None,
        }
    }

    /// Parse a document and prepare an importer with no creators
    ///
    /// # Errors
    ///
    /// Fails if the text is not a JSON object; individual records are only
    /// checked when they are imported.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::new(RawDocument::parse(json)?))
    }

    pub fn document(&self) -> &RawDocument {
        &self.document
    }

    /// Identifier maps built so far
    pub fn maps(&self) -> &IndexMaps {
        &self.maps
    }

    creator_setter!(with_hospitals, create_hospital, HospitalRecord);
    creator_setter!(with_admins, create_admin, AdminRecord);
    creator_setter!(with_doctors, create_doctor, DoctorRecord);
    creator_setter!(with_nurses, create_nurse, NurseRecord);
    creator_setter!(with_patients, create_patient, PatientRecord);
    creator_setter!(
        /// Register the appointment creator; nurse references resolve through
        /// the nurse map
        with_appointments,
        create_appointment,
        AppointmentRecord
    );
    creator_setter!(with_tests, create_test, TestRecord);
    creator_setter!(with_prescriptions, create_prescription, PrescriptionRecord);
    creator_setter!(with_log_entries, create_log_entry, LogEntryRecord);

    /// Drop the creator of one section so it is not imported
    pub fn without(mut self, kind: EntityKind) -> Self {
        match kind {
            EntityKind::Hospitals => self.create_hospital = None,
            EntityKind::Admins => self.create_admin = None,
            EntityKind::Doctors => self.create_doctor = None,
            EntityKind::Nurses => self.create_nurse = None,
            EntityKind::Patients => self.create_patient = None,
            EntityKind::Appointments => self.create_appointment = None,
            EntityKind::Tests => self.create_test = None,
            EntityKind::Prescriptions => self.create_prescription = None,
            EntityKind::LogEntries => self.create_log_entry = None,
        }
        self
    }

    /// Import every section in dependency order
    ///
    /// Hospitals, admins, doctors, nurses and patients come first so later
    /// sections can reference them; then appointments, tests, prescriptions
    /// and log entries. Maps start empty on every call.
    pub async fn import_all(&mut self) -> ImportSummary {
        let started = Instant::now();
        let mut summary = ImportSummary::new();
        self.maps = IndexMaps::new();

        tracing::info!(
            hospitals = self.document.len(EntityKind::Hospitals),
            patients = self.document.len(EntityKind::Patients),
            appointments = self.document.len(EntityKind::Appointments),
            "Starting import"
        );

        let document = &self.document;
        let maps = &mut self.maps;
        import_section(document, maps, self.create_hospital.as_ref(), &mut summary).await;
        import_section(document, maps, self.create_admin.as_ref(), &mut summary).await;
        import_section(document, maps, self.create_doctor.as_ref(), &mut summary).await;
        import_section(document, maps, self.create_nurse.as_ref(), &mut summary).await;
        import_section(document, maps, self.create_patient.as_ref(), &mut summary).await;
        import_section(document, maps, self.create_appointment.as_ref(), &mut summary).await;
        import_section(document, maps, self.create_test.as_ref(), &mut summary).await;
        import_section(document, maps, self.create_prescription.as_ref(), &mut summary).await;
        import_section(document, maps, self.create_log_entry.as_ref(), &mut summary).await;

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        summary
    }
}

async fn import_section<R: PorterRecord>(
    document: &RawDocument,
    maps: &mut IndexMaps,
    create: Option<&CreateFn<R>>,
    summary: &mut ImportSummary,
) {
    let kind = R::KIND;
    let Some(create) = create else {
        tracing::debug!(section = kind.key(), "No creator registered, section not imported");
        summary.mark_not_imported(kind);
        return;
    };

    for (index, value) in document.section(kind).iter().enumerate() {
        let mut record = match R::deserialize(value) {
            Ok(record) => record,
            Err(e) => {
                let error = PorterError::MalformedRecord {
                    kind: kind.key(),
                    index,
                    message: e.to_string(),
                };
                crate::log_import_skip!(kind.key(), index, error);
                summary.record_skipped(kind, index, error.to_string());
                continue;
            }
        };

        record.remap(maps);

        match create(record).await {
            Ok(id) => {
                if kind.is_referenced() {
                    maps.insert(kind, index as i64, id);
                }
                summary.record_created(kind);
            }
            Err(e) => {
                let error = PorterError::CreateFailed {
                    kind: kind.key(),
                    index,
                    message: e.to_string(),
                };
                crate::log_import_skip!(kind.key(), index, error);
                summary.record_skipped(kind, index, error.to_string());
            }
        }
    }
}
