//! Inter-instance data porter
//!
//! Moves a hospital's entity graph between HealthNet instances as a JSON
//! document. Store ids never leave an instance: the exporter replaces every
//! reference with the position of the referenced record in its section, and
//! the importer maps those positions back to the ids the target assigns.
//!
//! # Modules
//!
//! - [`records`] - wire records, one type per document section
//! - [`document`] - typed and raw document forms
//! - [`index_map`] - per-kind identifier maps
//! - [`dates`] - lenient date parsing and canonical formatting
//! - [`export`] - the exporter and the store snapshot mapping
//! - [`import`] - the importer with per-section creators
//! - [`binding`] - creators backed by a record store
//! - [`summary`] - import reporting

pub mod binding;
pub mod dates;
pub mod document;
pub mod export;
pub mod import;
pub mod index_map;
pub mod records;
pub mod summary;

pub use binding::{bind_calendar, import_into};
pub use document::{PorterDocument, RawDocument};
pub use export::{export_dataset, HealthNetExport};
pub use import::{CreateFn, HealthNetImport};
pub use index_map::{EntityKind, IndexMaps, Ref};
pub use records::{
    AdminRecord, AppointmentRecord, DoctorRecord, HospitalRecord, LogEntryRecord, NurseRecord,
    PatientRecord, PersonFields, PorterRecord, PrescriptionRecord, TestRecord,
};
pub use summary::{ImportFailure, ImportSummary, SectionCounts};
