//! Session-scoped agenda context.
//!
//! One `AgendaSession` per signed-in professional. It owns the calendar
//! cursor, the current view mode and the scheduling engine; there is no
//! global state. Engine work runs on the blocking pool since the
//! repositories behind it are synchronous.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{Datelike, NaiveDate};
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;

use crate::calendar::{month_label, DateCursor, DayDescriptor, MonthGrid};
use crate::config::AgendaSettings;
use crate::insight::{insight_or_fallback, InsightAdvisor, InsightContext};
use crate::models::*;
use crate::scheduling::{DayStats, SchedulingEngine, SchedulingError, SqliteAgenda};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Scheduling(#[from] SchedulingError),

    #[error("A booking is already being saved")]
    SubmissionInFlight,

    #[error("Engine lock poisoned")]
    LockPoisoned,

    #[error("Background task failed: {0}")]
    Task(String),
}

impl SessionError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Scheduling(e) => e.user_message(),
            Self::SubmissionInFlight => "Aguarde, o agendamento está sendo salvo.".into(),
            Self::LockPoisoned | Self::Task(_) => {
                "Não foi possível salvar. Verifique sua conexão.".into()
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════
// View models
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViewMode {
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayView {
    pub header: String,
    pub day: DayDescriptor,
    pub strip: Vec<DayDescriptor>,
    pub stats: DayStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayCard {
    pub day: DayDescriptor,
    pub count: usize,
    pub revenue: f64,
    /// Forecast profit: revenue minus material cost.
    pub profit: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeekView {
    pub header: String,
    pub days: Vec<DayCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub header: String,
    pub label: &'static str,
    pub grid: MonthGrid,
    /// Days of the month with at least one appointment.
    pub marked_days: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", content = "view")]
pub enum AgendaView {
    Day(DayView),
    Week(WeekView),
    Month(MonthView),
}

// ═══════════════════════════════════════════════════════════
// Submission guard
// ═══════════════════════════════════════════════════════════

/// Held while a booking is in flight; a second booking is refused until
/// it drops. The guard travels with the engine work, so a caller that
/// stops waiting does not release it early.
struct SubmissionGuard {
    flag: Arc<AtomicBool>,
}

impl SubmissionGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Result<Self, SessionError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SessionError::SubmissionInFlight)?;
        Ok(Self {
            flag: Arc::clone(flag),
        })
    }
}

impl Drop for SubmissionGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// ═══════════════════════════════════════════════════════════
// AgendaSession
// ═══════════════════════════════════════════════════════════

pub struct AgendaSession {
    owner_id: String,
    settings: AgendaSettings,
    cursor: DateCursor,
    mode: ViewMode,
    engine: Arc<Mutex<SchedulingEngine>>,
    advisor: Option<Arc<dyn InsightAdvisor>>,
    submitting: Arc<AtomicBool>,
}

impl AgendaSession {
    pub fn new(
        owner_id: impl Into<String>,
        engine: SchedulingEngine,
        settings: AgendaSettings,
        today: NaiveDate,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            settings,
            cursor: DateCursor::new(today),
            mode: ViewMode::Day,
            engine: Arc::new(Mutex::new(engine)),
            advisor: None,
            submitting: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Session over an SQLite database, scoped to `owner_id`.
    pub fn open(
        conn: Connection,
        owner_id: impl Into<String>,
        settings: AgendaSettings,
        today: NaiveDate,
    ) -> Self {
        let owner_id = owner_id.into();
        let agenda = Arc::new(SqliteAgenda::new(conn, owner_id.clone()));
        let engine = SchedulingEngine::new(agenda.clone(), agenda.clone(), agenda);
        Self::new(owner_id, engine, settings, today)
    }

    pub fn with_advisor(mut self, advisor: Arc<dyn InsightAdvisor>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn settings(&self) -> &AgendaSettings {
        &self.settings
    }

    pub fn cursor(&self) -> &DateCursor {
        &self.cursor
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    // ─── Navigation ───

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    pub fn shift_day(&mut self, delta: i64) {
        self.cursor.shift_day(delta);
    }

    pub fn set_day(&mut self, day: i64, month: i64, year: i32) {
        self.cursor.set_day(day, month, year);
    }

    pub fn select_month(&mut self, month: i64) {
        self.cursor.select_month(month);
    }

    /// Picking a day from the week or month view opens it in day mode.
    pub fn choose_date(&mut self, date: NaiveDate) {
        self.cursor = DateCursor::new(date);
        self.mode = ViewMode::Day;
    }

    /// Picking a cell of the month grid.
    pub fn choose_day_of_month(&mut self, day: i64) {
        let (month, year) = (i64::from(self.cursor.month()), self.cursor.year());
        self.cursor.set_day(day, month, year);
        self.mode = ViewMode::Day;
    }

    /// The strip of days around the cursor.
    pub fn strip(&self) -> Vec<DayDescriptor> {
        self.cursor.window_around(self.settings.window_radius)
    }

    // ─── Commands ───

    pub async fn load(&self) -> Result<usize, SessionError> {
        self.with_engine(|engine| engine.load()).await
    }

    /// Book an appointment. Refused while another booking of this
    /// session is still being saved.
    pub async fn create_appointment(
        &self,
        input: NewAppointment,
    ) -> Result<Appointment, SessionError> {
        let guard = SubmissionGuard::acquire(&self.submitting)?;
        self.with_engine(move |engine| {
            let result = engine.create_appointment(input);
            drop(guard);
            result
        })
        .await
    }

    pub async fn update_status(
        &self,
        id: &str,
        status: AppointmentStatus,
        payment_status: Option<PaymentStatus>,
    ) -> Result<Appointment, SessionError> {
        let id = id.to_string();
        self.with_engine(move |engine| engine.update_status(&id, status, payment_status))
            .await
    }

    // ─── Views ───

    pub async fn day_view(&self) -> Result<DayView, SessionError> {
        let date = self.cursor.date();
        let stats = self.with_engine(move |engine| engine.day_stats(date)).await?;
        Ok(DayView {
            header: self.cursor.header_label(),
            day: DayDescriptor::from_date(date),
            strip: self.strip(),
            stats,
        })
    }

    pub async fn week_view(&self) -> Result<WeekView, SessionError> {
        let days = self.cursor.days_from_cursor(self.settings.week_length);
        let cards = self
            .with_engine(move |engine| {
                days.into_iter()
                    .map(|day| {
                        let stats = engine.day_stats(day.date().unwrap_or_default())?;
                        Ok::<_, SchedulingError>(DayCard {
                            day,
                            count: stats.count,
                            revenue: stats.revenue,
                            profit: stats.profit,
                        })
                    })
                    .collect::<Result<Vec<_>, SchedulingError>>()
            })
            .await?;
        Ok(WeekView {
            header: self.cursor.header_label(),
            days: cards,
        })
    }

    pub async fn month_view(&self) -> Result<MonthView, SessionError> {
        let grid = self.cursor.current_grid();
        let (month, year) = (grid.month, grid.year);
        let marked = self
            .with_engine(move |engine| Ok(engine.days_with_appointments(month, year)))
            .await?;
        Ok(MonthView {
            header: self.cursor.header_label(),
            label: month_label(month),
            grid,
            marked_days: marked.into_iter().collect(),
        })
    }

    pub async fn current_view(&self) -> Result<AgendaView, SessionError> {
        Ok(match self.mode {
            ViewMode::Day => AgendaView::Day(self.day_view().await?),
            ViewMode::Week => AgendaView::Week(self.week_view().await?),
            ViewMode::Month => AgendaView::Month(self.month_view().await?),
        })
    }

    /// Advisor line for the cursor's month, or the fallback text.
    pub async fn insight(&self) -> Result<String, SessionError> {
        let grid = self.cursor.current_grid();
        let start = self.cursor.date().with_day(1).unwrap_or(self.cursor.date());
        let end = start + chrono::Duration::days(i64::from(grid.day_count.max(1)) - 1);
        let stats = self
            .with_engine(move |engine| engine.period_stats(start, end))
            .await?;

        let context = InsightContext {
            period_label: self.cursor.header_label(),
            revenue: stats.revenue,
            profit: stats.profit,
            volume: stats.volume,
            average_ticket: stats.average_ticket,
        };
        let advisor = self.advisor.clone();
        let settings = self.settings.clone();
        tokio::task::spawn_blocking(move || {
            insight_or_fallback(advisor.as_deref(), &context, &settings)
        })
        .await
        .map_err(|e| SessionError::Task(e.to_string()))
    }

    async fn with_engine<F, R>(&self, f: F) -> Result<R, SessionError>
    where
        F: FnOnce(&mut SchedulingEngine) -> Result<R, SchedulingError> + Send + 'static,
        R: Send + 'static,
    {
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || {
            let mut engine = engine.lock().map_err(|_| SessionError::LockPoisoned)?;
            f(&mut *engine).map_err(SessionError::from)
        })
        .await
        .map_err(|e| SessionError::Task(e.to_string()))?
    }
}
