//! Random data generation
//!
//! Fills a store with plausible hospitals, accounts, results, prescriptions
//! and appointments for demos and load testing. Appointments are booked
//! through the [`Calendar`], so random bookings that collide are rejected
//! like any other.

use crate::core::calendar::Calendar;
use crate::domain::{
    Address, AdministratorProfile, DoctorProfile, HospitalId, NewAppointment, NewHospital,
    NewPrescription, NewTestResult, NewUser, NurseProfile, PatientProfile, Result, Role, UserId,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use fake::faker::address::en::{CityName, StateAbbr, StreetName, ZipCode};
use fake::faker::company::en::CompanyName;
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::{FirstName, LastName};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

const BLOOD_TYPES: [&str; 8] = ["O-", "O+", "A-", "A+", "B-", "B+", "AB-", "AB+"];
const EYE_COLORS: [&str; 5] = ["brown", "blue", "green", "hazel", "gray"];
const APPOINTMENT_MINUTES: i64 = 30;

/// Counts of what a generation run created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub hospitals: usize,
    pub admins: usize,
    pub doctors: usize,
    pub nurses: usize,
    pub patients: usize,
    pub test_results: usize,
    pub prescriptions: usize,
    pub appointments: usize,
    pub rejected_appointments: usize,
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Hospitals:      {}", self.hospitals)?;
        writeln!(f, "  Administrators: {}", self.admins)?;
        writeln!(f, "  Doctors:        {}", self.doctors)?;
        writeln!(f, "  Nurses:         {}", self.nurses)?;
        writeln!(f, "  Patients:       {}", self.patients)?;
        writeln!(f, "  Test results:   {}", self.test_results)?;
        writeln!(f, "  Prescriptions:  {}", self.prescriptions)?;
        write!(
            f,
            "  Appointments:   {} ({} rejected)",
            self.appointments, self.rejected_appointments
        )
    }
}

/// Random record generator
pub struct Generator {
    calendar: Arc<Calendar>,
    rng: StdRng,
    hospitals: Vec<HospitalId>,
    doctors: Vec<UserId>,
    patients: Vec<UserId>,
    patients_by_doctor: HashMap<UserId, Vec<UserId>>,
}

impl Generator {
    pub fn new(calendar: Arc<Calendar>) -> Self {
        Self::with_rng(calendar, StdRng::from_entropy())
    }

    /// A generator with a fixed seed, for reproducible data
    pub fn seeded(calendar: Arc<Calendar>, seed: u64) -> Self {
        Self::with_rng(calendar, StdRng::seed_from_u64(seed))
    }

    fn with_rng(calendar: Arc<Calendar>, rng: StdRng) -> Self {
        Self {
            calendar,
            rng,
            hospitals: Vec::new(),
            doctors: Vec::new(),
            patients: Vec::new(),
            patients_by_doctor: HashMap::new(),
        }
    }

    /// Create `rounds` records of every kind
    ///
    /// Each round adds one hospital, administrator, doctor, nurse and patient,
    /// then a test result, a prescription and an appointment between a doctor
    /// and that doctor's patients.
    pub async fn run(&mut self, rounds: usize) -> Result<GenerationReport> {
        let mut report = GenerationReport::default();

        for round in 0..rounds {
            self.hospital().await?;
            report.hospitals += 1;
            self.admin().await?;
            report.admins += 1;
            self.doctor().await?;
            report.doctors += 1;
            self.nurse().await?;
            report.nurses += 1;
            self.patient().await?;
            report.patients += 1;
            self.test_result().await?;
            report.test_results += 1;
            self.prescription().await?;
            report.prescriptions += 1;
            if self.appointment().await? {
                report.appointments += 1;
            } else {
                report.rejected_appointments += 1;
            }
            tracing::debug!(round, "Generation round complete");
        }

        tracing::info!(
            rounds,
            appointments = report.appointments,
            rejected = report.rejected_appointments,
            "Random data generated"
        );
        Ok(report)
    }

    fn date(&mut self) -> NaiveDate {
        let year = self.rng.gen_range(1950..=2015);
        let month = self.rng.gen_range(1..=12);
        let day = self.rng.gen_range(1..=28);
        NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
    }

    fn address(&mut self) -> Address {
        Address {
            line_1: format!(
                "{} {}",
                self.rng.gen_range(1..=9999),
                StreetName().fake_with_rng::<String, _>(&mut self.rng)
            ),
            line_2: String::new(),
            city: CityName().fake_with_rng(&mut self.rng),
            state: StateAbbr().fake_with_rng(&mut self.rng),
            zipcode: ZipCode().fake_with_rng(&mut self.rng),
        }
    }

    fn sentence(&mut self) -> String {
        Sentence(3..12).fake_with_rng(&mut self.rng)
    }

    fn account(&mut self, role: Role) -> NewUser {
        let base: String = Username().fake_with_rng(&mut self.rng);
        let suffix: u32 = self.rng.gen();
        let dob = self.date();
        let address = self.address();
        NewUser::new(format!("{base}{suffix}"), role)
            .names(
                FirstName().fake_with_rng::<String, _>(&mut self.rng),
                "",
                LastName().fake_with_rng::<String, _>(&mut self.rng),
            )
            .email(SafeEmail().fake_with_rng::<String, _>(&mut self.rng))
            .phone(PhoneNumber().fake_with_rng::<String, _>(&mut self.rng))
            .dob(Some(dob))
            .address(address)
            .approved()
    }

    async fn hospital(&mut self) -> Result<()> {
        let name: String = CompanyName().fake_with_rng(&mut self.rng);
        let address = self.address();
        let hospital = self
            .calendar
            .store()
            .insert_hospital(NewHospital::new(format!("{name} Hospital"), address))
            .await?;
        self.hospitals.push(hospital.id);
        Ok(())
    }

    async fn admin(&mut self) -> Result<()> {
        let hospital_id = pick(&mut self.rng, &self.hospitals);
        let user = self.account(Role::Administrator(AdministratorProfile { hospital_id }));
        self.calendar.store().insert_user(user).await?;
        Ok(())
    }

    async fn doctor(&mut self) -> Result<()> {
        let count = self.rng.gen_range(1..=10).min(self.hospitals.len());
        let hospital_ids = self
            .hospitals
            .choose_multiple(&mut self.rng, count)
            .copied()
            .collect();
        let user = self.account(Role::Doctor(DoctorProfile {
            hospital_ids,
            patient_ids: Vec::new(),
        }));
        let doctor = self.calendar.store().insert_user(user).await?;
        self.doctors.push(doctor.id);
        Ok(())
    }

    async fn nurse(&mut self) -> Result<()> {
        let hospital_id = pick(&mut self.rng, &self.hospitals);
        let doctor_ids = pick(&mut self.rng, &self.doctors).into_iter().collect();
        let user = self.account(Role::Nurse(NurseProfile {
            hospital_id,
            doctor_ids,
        }));
        self.calendar.store().insert_user(user).await?;
        Ok(())
    }

    async fn patient(&mut self) -> Result<()> {
        let hospital_id = pick(&mut self.rng, &self.hospitals);
        let primary = pick(&mut self.rng, &self.doctors);
        let profile = PatientProfile {
            emergency_contact: format!(
                "{} {}",
                FirstName().fake_with_rng::<String, _>(&mut self.rng),
                PhoneNumber().fake_with_rng::<String, _>(&mut self.rng)
            ),
            eye_color: EYE_COLORS.choose(&mut self.rng).copied().unwrap_or("brown").to_string(),
            bloodtype: BLOOD_TYPES.choose(&mut self.rng).copied().unwrap_or("O+").to_string(),
            height: Some(self.rng.gen_range(48..=80)),
            weight: Some(self.rng.gen_range(90..=300)),
            hospital_id,
            primary_care_provider: primary,
            doctor_ids: primary.into_iter().collect(),
            is_admitted: self.rng.gen_bool(0.5),
        };
        let user = self.account(Role::Patient(profile));
        let patient = self.calendar.store().insert_user(user).await?;

        self.patients.push(patient.id);
        if let Some(doctor) = primary {
            self.patients_by_doctor.entry(doctor).or_default().push(patient.id);
        }
        Ok(())
    }

    async fn test_result(&mut self) -> Result<()> {
        let is_released = self.rng.gen_bool(0.5);
        let release_date = self.date();
        let result = NewTestResult {
            patient_id: pick(&mut self.rng, &self.patients),
            doctor_id: pick(&mut self.rng, &self.doctors),
            test_date: self.date(),
            test_type: Word().fake_with_rng(&mut self.rng),
            release_date: is_released.then_some(release_date),
            description: self.sentence(),
            comment: self.sentence(),
            is_released,
        };
        self.calendar.store().insert_test_result(result).await?;
        Ok(())
    }

    async fn prescription(&mut self) -> Result<()> {
        let prescription = NewPrescription {
            patient_id: pick(&mut self.rng, &self.patients),
            doctor_id: pick(&mut self.rng, &self.doctors),
            name: Word().fake_with_rng(&mut self.rng),
            issue_date: self.date(),
            expiration_date: self.date(),
            refills: self.rng.gen_range(0..=12),
            description: self.sentence(),
        };
        self.calendar.store().insert_prescription(prescription).await?;
        Ok(())
    }

    /// Book a doctor with their patients; returns whether it was booked
    async fn appointment(&mut self) -> Result<bool> {
        let Some(creator) = pick(&mut self.rng, &self.doctors) else {
            return Ok(false);
        };
        let mut attendees = self
            .patients_by_doctor
            .get(&creator)
            .cloned()
            .unwrap_or_default();
        attendees.push(creator);

        let day = self.date();
        let start = Utc.from_utc_datetime(&day.and_time(chrono::NaiveTime::MIN))
            + Duration::minutes(self.rng.gen_range(0..10_000));
        let end = start + Duration::minutes(APPOINTMENT_MINUTES);

        let name = Sentence(1..4).fake_with_rng::<String, _>(&mut self.rng);
        let request = NewAppointment::new(name, start, end, attendees)
            .description(self.sentence())
            .creator(Some(creator));

        Ok(self.calendar.create_appointment(request).await?.is_booked())
    }
}

fn pick<T: Copy>(rng: &mut StdRng, pool: &[T]) -> Option<T> {
    pool.choose(rng).copied()
}
