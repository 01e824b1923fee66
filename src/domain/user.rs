//! User domain model
//!
//! Every HealthNet account is a single [`User`] record. What the account can do is
//! decided by its [`Role`], a tagged union carrying the role-specific profile, so a
//! user is exactly one of administrator, doctor, nurse or patient.

use super::hospital::Address;
use super::ids::{HospitalId, UserId};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role discriminant without the profile payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Administrator,
    Doctor,
    Nurse,
    Patient,
}

impl RoleKind {
    /// Every role, in porter emission order
    pub const ALL: [RoleKind; 4] = [
        RoleKind::Administrator,
        RoleKind::Doctor,
        RoleKind::Nurse,
        RoleKind::Patient,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            RoleKind::Administrator => "Administrator",
            RoleKind::Doctor => "Doctor",
            RoleKind::Nurse => "Nurse",
            RoleKind::Patient => "Patient",
        }
    }
}

impl fmt::Display for RoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Administrator profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorProfile {
    /// Hospital the administrator manages
    pub hospital_id: Option<HospitalId>,
}

/// Doctor profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
    #[serde(default)]
    pub hospital_ids: Vec<HospitalId>,
    #[serde(default)]
    pub patient_ids: Vec<UserId>,
}

/// Nurse profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NurseProfile {
    pub hospital_id: Option<HospitalId>,
    #[serde(default)]
    pub doctor_ids: Vec<UserId>,
}

/// Patient profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    #[serde(default)]
    pub emergency_contact: String,
    #[serde(default)]
    pub eye_color: String,
    #[serde(default)]
    pub bloodtype: String,
    /// Height in inches
    pub height: Option<i32>,
    /// Weight in pounds
    pub weight: Option<i32>,
    pub hospital_id: Option<HospitalId>,
    pub primary_care_provider: Option<UserId>,
    #[serde(default)]
    pub doctor_ids: Vec<UserId>,
    #[serde(default)]
    pub is_admitted: bool,
}

impl PatientProfile {
    /// Flips the admitted flag
    pub fn toggle_admit(&mut self) {
        self.is_admitted = !self.is_admitted;
    }

    /// Moves the patient to another hospital and admits them there
    pub fn transfer(&mut self, hospital: HospitalId) {
        self.hospital_id = Some(hospital);
        self.is_admitted = true;
    }
}

/// Role of a user, with its role-specific profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Role {
    Administrator(AdministratorProfile),
    Doctor(DoctorProfile),
    Nurse(NurseProfile),
    Patient(PatientProfile),
}

impl Role {
    pub fn kind(&self) -> RoleKind {
        match self {
            Role::Administrator(_) => RoleKind::Administrator,
            Role::Doctor(_) => RoleKind::Doctor,
            Role::Nurse(_) => RoleKind::Nurse,
            Role::Patient(_) => RoleKind::Patient,
        }
    }

    /// Hospitals this role is affiliated with
    pub fn hospital_ids(&self) -> Vec<HospitalId> {
        match self {
            Role::Administrator(p) => p.hospital_id.into_iter().collect(),
            Role::Doctor(p) => p.hospital_ids.clone(),
            Role::Nurse(p) => p.hospital_id.into_iter().collect(),
            Role::Patient(p) => p.hospital_id.into_iter().collect(),
        }
    }
}

/// A HealthNet account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub password_hash: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: Address,
    /// Accounts awaiting administrator approval
    #[serde(default)]
    pub is_pending: bool,
    #[serde(flatten)]
    pub role: Role,
}

impl User {
    /// `first last`, trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Full name, or the username when no name is recorded
    pub fn display_name(&self) -> String {
        let name = self.full_name();
        if name.is_empty() {
            self.username.clone()
        } else {
            name
        }
    }

    pub fn kind(&self) -> RoleKind {
        self.role.kind()
    }

    pub fn is(&self, kind: RoleKind) -> bool {
        self.role.kind() == kind
    }

    pub fn as_patient(&self) -> Option<&PatientProfile> {
        match &self.role {
            Role::Patient(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_patient_mut(&mut self) -> Option<&mut PatientProfile> {
        match &mut self.role {
            Role::Patient(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_doctor(&self) -> Option<&DoctorProfile> {
        match &self.role {
            Role::Doctor(p) => Some(p),
            _ => None,
        }
    }

    /// Age in whole years on `date`, if the date of birth is known
    pub fn age_on(&self, date: NaiveDate) -> Option<u32> {
        let dob = self.dob?;
        let mut age = date.year() - dob.year();
        if (date.month(), date.day()) < (dob.month(), dob.day()) {
            age -= 1;
        }
        u32::try_from(age).ok()
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.kind())
    }
}

/// A user that has not been stored yet
///
/// # Examples
///
/// ```
/// use healthnet::domain::user::{NewUser, Role, DoctorProfile};
///
/// let doctor = NewUser::new("house", Role::Doctor(DoctorProfile::default()))
///     .names("Gregory", "", "House")
///     .email("house@ppth.org");
/// assert_eq!(doctor.username, "house");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub dob: Option<NaiveDate>,
    pub phone: String,
    pub address: Address,
    pub is_pending: bool,
    pub role: Role,
}

impl NewUser {
    /// Creates a pending account with the given username and role
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password_hash: String::new(),
            email: String::new(),
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            dob: None,
            phone: String::new(),
            address: Address::default(),
            is_pending: true,
            role,
        }
    }

    pub fn names(
        mut self,
        first: impl Into<String>,
        middle: impl Into<String>,
        last: impl Into<String>,
    ) -> Self {
        self.first_name = first.into();
        self.middle_name = middle.into();
        self.last_name = last.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn password_hash(mut self, hash: impl Into<String>) -> Self {
        self.password_hash = hash.into();
        self
    }

    pub fn dob(mut self, dob: Option<NaiveDate>) -> Self {
        self.dob = dob;
        self
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn address(mut self, address: Address) -> Self {
        self.address = address;
        self
    }

    /// Marks the account as approved
    pub fn approved(mut self) -> Self {
        self.is_pending = false;
        self
    }

    /// Attaches the identifier assigned by the store
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            password_hash: self.password_hash,
            email: self.email,
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            dob: self.dob,
            phone: self.phone,
            address: self.address,
            is_pending: self.is_pending,
            role: self.role,
        }
    }
}
