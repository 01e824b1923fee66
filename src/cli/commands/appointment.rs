//! Appointment command implementation
//!
//! This module implements the `appointment` command family, which books,
//! changes, cancels and lists appointments through the calendar engine.

use crate::core::calendar::{Booking, Calendar};
use crate::core::porter::dates::{format_timestamp, parse_date, parse_utc};
use crate::domain::{
    Appointment, AppointmentId, AppointmentPatch, HealthNetError, NewAppointment, UserId,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};

/// Arguments for the appointment command
#[derive(Args, Debug)]
pub struct AppointmentArgs {
    #[command(subcommand)]
    pub action: AppointmentAction,
}

/// Appointment operations
#[derive(Subcommand, Debug)]
pub enum AppointmentAction {
    /// Book a new appointment
    Create(CreateArgs),

    /// Change fields of an existing appointment
    Update(UpdateArgs),

    /// Cancel an appointment
    Remove(RemoveArgs),

    /// List an attendee's appointments
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Appointment name
    #[arg(long)]
    pub name: String,

    /// Start time (e.g. 2024-03-01T10:00:00)
    #[arg(long, value_parser = parse_time)]
    pub start: DateTime<Utc>,

    /// End time
    #[arg(long, value_parser = parse_time)]
    pub end: DateTime<Utc>,

    /// Attendee user ids (comma-separated or repeated)
    #[arg(long = "attendee", value_delimiter = ',', required = true)]
    pub attendees: Vec<i64>,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub location: String,

    /// User id recorded as the creator
    #[arg(long)]
    pub creator: Option<i64>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Appointment id
    pub id: i64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    #[arg(long, value_parser = parse_time)]
    pub start: Option<DateTime<Utc>>,

    #[arg(long, value_parser = parse_time)]
    pub end: Option<DateTime<Utc>>,

    /// Replace the attendee list
    #[arg(long = "attendee", value_delimiter = ',')]
    pub attendees: Option<Vec<i64>>,
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Appointment id
    pub id: i64,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Attendee user id
    #[arg(long)]
    pub attendee: i64,

    /// Only appointments starting on this day (YYYY-MM-DD, UTC)
    #[arg(long, value_parser = parse_day)]
    pub on: Option<NaiveDate>,

    /// Print the calendar feed as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, String> {
    parse_utc(value).map_err(|e| e.to_string())
}

fn parse_day(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).map_err(|e| e.to_string())
}

impl UpdateArgs {
    fn patch(&self) -> AppointmentPatch {
        AppointmentPatch {
            name: self.name.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start: self.start,
            end: self.end,
            attendees: self
                .attendees
                .as_ref()
                .map(|ids| ids.iter().copied().map(UserId::new).collect()),
        }
    }
}

impl AppointmentArgs {
    /// Execute the appointment command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let (_config, calendar) = match super::open_calendar(config_path).await {
            Ok(opened) => opened,
            Err(code) => return Ok(code),
        };

        let outcome = match &self.action {
            AppointmentAction::Create(args) => create(&calendar, args).await,
            AppointmentAction::Update(args) => update(&calendar, args).await,
            AppointmentAction::Remove(args) => remove(&calendar, args).await,
            AppointmentAction::List(args) => list(&calendar, args).await,
        };

        match outcome {
            Ok(code) => Ok(code),
            Err(HealthNetError::NotFound(message)) => {
                eprintln!("Not found: {message}");
                Ok(1)
            }
            Err(e) => {
                tracing::error!(error = %e, "Appointment command failed");
                eprintln!("Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }
}

fn print_appointment(appointment: &Appointment) {
    let attendees: Vec<String> = appointment
        .attendees
        .iter()
        .map(|id| id.get().to_string())
        .collect();
    println!(
        "{:<6} {:<26} {:<26} {:<24} [{}]",
        appointment.id.get(),
        format_timestamp(appointment.start),
        format_timestamp(appointment.end),
        appointment.name,
        attendees.join(", ")
    );
}

fn report(booking: Booking, verb: &str) -> i32 {
    match booking {
        Booking::Booked(appointment) => {
            println!("Appointment {verb}:");
            print_appointment(&appointment);
            0
        }
        Booking::Rejected { reason } => {
            eprintln!("{reason}");
            1 // Rejected exit code
        }
    }
}

async fn create(calendar: &Calendar, args: &CreateArgs) -> crate::domain::Result<i32> {
    let request = NewAppointment::new(
        args.name.clone(),
        args.start,
        args.end,
        args.attendees.iter().copied().map(UserId::new),
    )
    .description(args.description.clone())
    .location(args.location.clone())
    .creator(args.creator.map(UserId::new));

    Ok(report(calendar.create_appointment(request).await?, "created"))
}

async fn update(calendar: &Calendar, args: &UpdateArgs) -> crate::domain::Result<i32> {
    let booking = calendar
        .update_appointment(AppointmentId::new(args.id), &args.patch())
        .await?;
    Ok(report(booking, "updated"))
}

async fn remove(calendar: &Calendar, args: &RemoveArgs) -> crate::domain::Result<i32> {
    let removed = calendar
        .remove_appointment(AppointmentId::new(args.id))
        .await?;
    println!("Removed appointment {} '{}'", removed.id.get(), removed.name);
    Ok(0)
}

async fn list(calendar: &Calendar, args: &ListArgs) -> crate::domain::Result<i32> {
    let attendee = UserId::new(args.attendee);

    if args.json {
        let feed = calendar.appointments_feed(attendee).await?;
        println!("{}", serde_json::to_string_pretty(&feed)?);
        return Ok(0);
    }

    let appointments = match args.on {
        Some(day) => calendar.appointments_for_attendee_on(attendee, day).await?,
        None => calendar.appointments_for_attendee(attendee).await?,
    };

    if appointments.is_empty() {
        println!("No appointments for user {}", args.attendee);
        return Ok(0);
    }

    println!(
        "{:<6} {:<26} {:<26} {:<24} Attendees",
        "ID", "Start", "End", "Name"
    );
    println!("{}", "-".repeat(100));
    for appointment in &appointments {
        print_appointment(appointment);
    }
    Ok(0)
}
