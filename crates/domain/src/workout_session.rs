use std::fmt;

use chrono::{DateTime, Utc};
use derive_more::Deref;
use uuid::Uuid;

use crate::{
    BoxedError, CreateError, DeleteError, Division, InstructorID, MuscleGroup, Name, ReadError,
    Reps, Seconds, StorageError, StudentID, UpdateError, Weight, WorkoutPlanID,
};

/// Lifecycle of one workout execution: a session is created in progress,
/// mutated while the student trains and either completed (kept as history) or
/// cancelled (deleted). All lookups are scoped by both session and student,
/// so a foreign session is indistinguishable from a missing one.
#[allow(async_fn_in_trait)]
pub trait WorkoutSessionService {
    async fn start_session(
        &self,
        student_id: StudentID,
        plan_id: WorkoutPlanID,
        division_index: usize,
    ) -> Result<WorkoutSession, StartSessionError>;
    async fn active_session(
        &self,
        student_id: StudentID,
    ) -> Result<Option<WorkoutSession>, ReadError>;
    async fn update_session(
        &self,
        student_id: StudentID,
        session_id: WorkoutSessionID,
        exercises: Option<Vec<ExerciseLog>>,
        notes: Option<String>,
    ) -> Result<WorkoutSession, UpdateError>;
    async fn skip_exercise(
        &self,
        student_id: StudentID,
        session_id: WorkoutSessionID,
        exercise_index: usize,
        reason: Option<String>,
    ) -> Result<WorkoutSession, UpdateError>;
    async fn complete_session(
        &self,
        student_id: StudentID,
        session_id: WorkoutSessionID,
        exercises: Vec<ExerciseLog>,
        notes: Option<String>,
    ) -> Result<WorkoutSession, UpdateError>;
    async fn cancel_session(
        &self,
        student_id: StudentID,
        session_id: WorkoutSessionID,
    ) -> Result<WorkoutSessionID, UpdateError>;
    async fn session_history(
        &self,
        student_id: StudentID,
        page: usize,
        per_page: usize,
    ) -> Result<SessionPage, ReadError>;
    async fn student_sessions(
        &self,
        student_id: StudentID,
    ) -> Result<Vec<WorkoutSession>, ReadError>;
    async fn instructor_sessions(
        &self,
        instructor_id: InstructorID,
    ) -> Result<Vec<WorkoutSession>, ReadError>;
}

#[allow(async_fn_in_trait)]
pub trait WorkoutSessionRepository {
    async fn read_sessions(&self, student_id: StudentID)
    -> Result<Vec<WorkoutSession>, ReadError>;
    /// Scoped lookup: misses and foreign sessions both yield `NotFound`.
    async fn read_session(
        &self,
        id: WorkoutSessionID,
        student_id: StudentID,
    ) -> Result<WorkoutSession, ReadError>;
    async fn find_in_progress(
        &self,
        student_id: StudentID,
    ) -> Result<Option<WorkoutSession>, ReadError>;
    async fn read_sessions_for_students(
        &self,
        student_ids: &[StudentID],
    ) -> Result<Vec<WorkoutSession>, ReadError>;
    async fn count_completed(
        &self,
        student_id: StudentID,
        plan_id: WorkoutPlanID,
    ) -> Result<u64, ReadError>;
    async fn create_session(&self, session: WorkoutSession)
    -> Result<WorkoutSession, CreateError>;
    async fn replace_session(
        &self,
        session: WorkoutSession,
    ) -> Result<WorkoutSession, UpdateError>;
    async fn delete_session(&self, id: WorkoutSessionID)
    -> Result<WorkoutSessionID, DeleteError>;
}

/// One execution instance of a plan division. The exercise list is a deep
/// copy taken at start time, so later plan edits never affect a running or
/// recorded session.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: WorkoutSessionID,
    pub student_id: StudentID,
    pub instructor_id: InstructorID,
    pub workout_plan_id: WorkoutPlanID,
    pub workout_name: Name,
    pub division_name: Name,
    pub division_index: usize,
    pub exercises: Vec<ExerciseLog>,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    /// Body weight captured once at session start, substituted for the load
    /// of body-weight sets in the volume computation.
    pub student_weight: Option<Weight>,
    pub overall_difficulty: Option<PerceivedDifficulty>,
    pub mood: Option<Mood>,
    pub notes: Option<String>,
    pub instructor_feedback: Option<String>,
    pub totals: SessionTotals,
}

impl WorkoutSession {
    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == SessionStatus::InProgress
    }

    /// Refreshes the cached totals from the raw exercise logs. Called before
    /// every persist; the totals are never patched incrementally.
    pub fn recompute_totals(&mut self) {
        self.totals = compute_totals(self);
    }
}

#[derive(Deref, Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct WorkoutSessionID(Uuid);

impl WorkoutSessionID {
    #[must_use]
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }
}

impl From<Uuid> for WorkoutSessionID {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl From<u128> for WorkoutSessionID {
    fn from(value: u128) -> Self {
        Self(Uuid::from_bytes(value.to_be_bytes()))
    }
}

/// Cancellation deletes the session document outright, so no `Cancelled`
/// state is ever persisted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SessionStatus::InProgress => "in-progress",
                SessionStatus::Completed => "completed",
            }
        )
    }
}

/// Snapshot of one plan exercise plus its per-set performance log.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseLog {
    pub exercise_id: Option<crate::ExerciseID>,
    pub exercise_name: Name,
    pub ideal_weight: Weight,
    pub rest_time: Seconds,
    pub to_failure: bool,
    pub muscle_groups: Vec<MuscleGroup>,
    pub sets: Vec<SetLog>,
    pub notes: Option<String>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub skipped: bool,
    pub skip_reason: Option<String>,
}

/// Target values copied from the plan plus the actual performance recorded
/// during the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SetLog {
    pub set_number: u32,
    pub reps: Reps,
    pub weight: Weight,
    pub is_body_weight: bool,
    pub actual_reps: Option<Reps>,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub rest_time_taken: Option<Seconds>,
    pub difficulty: Option<PerceivedDifficulty>,
    pub notes: Option<String>,
}

impl SetLog {
    /// The load counted towards volume: the student's captured body weight
    /// for body-weight sets (falling back to the stored weight when none was
    /// captured), the set's weight otherwise.
    #[must_use]
    pub fn effective_weight(&self, student_weight: Option<Weight>) -> Weight {
        if self.is_body_weight {
            if let Some(weight) = student_weight {
                return weight;
            }
        }
        self.weight
    }

    /// Actually performed repetitions, falling back to the target.
    #[must_use]
    pub fn effective_reps(&self) -> Reps {
        self.actual_reps.unwrap_or(self.reps)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerceivedDifficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for PerceivedDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                PerceivedDifficulty::Easy => "easy",
                PerceivedDifficulty::Medium => "medium",
                PerceivedDifficulty::Hard => "hard",
            }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Great,
    Good,
    Normal,
    Tired,
    Bad,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Mood::Great => "great",
                Mood::Good => "good",
                Mood::Normal => "normal",
                Mood::Tired => "tired",
                Mood::Bad => "bad",
            }
        )
    }
}

/// Derived metrics cached on the session document. Always recomputable from
/// the raw exercise logs via [`compute_totals`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SessionTotals {
    /// Minutes between start and end, present only on completed sessions.
    pub duration: Option<u32>,
    pub total_exercises: u32,
    pub completed_exercises: u32,
    pub skipped_exercises: u32,
    pub total_sets: u32,
    pub completed_sets: u32,
    /// Sum over completed sets of effective weight times effective reps.
    pub total_volume: f64,
    /// Rounded mean of the recorded per-set rest times in seconds.
    pub average_rest_time: Option<u32>,
}

/// Derives the cached session metrics from the raw exercise logs.
#[must_use]
pub fn compute_totals(session: &WorkoutSession) -> SessionTotals {
    let duration = match (session.status, session.end_time) {
        (SessionStatus::Completed, Some(end_time)) => {
            let millis = (end_time - session.start_time).num_milliseconds();
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            Some((millis as f64 / 60_000.0).round().max(0.0) as u32)
        }
        _ => None,
    };

    let sets = session
        .exercises
        .iter()
        .flat_map(|e| &e.sets)
        .collect::<Vec<_>>();

    let total_volume = sets
        .iter()
        .filter(|s| s.completed)
        .map(|s| {
            f64::from(f32::from(s.effective_weight(session.student_weight)))
                * f64::from(u32::from(s.effective_reps()))
        })
        .sum::<f64>();

    let rest_times = sets
        .iter()
        .filter_map(|s| s.rest_time_taken)
        .map(u32::from)
        .collect::<Vec<_>>();
    let average_rest_time = if rest_times.is_empty() {
        None
    } else {
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
        Some((f64::from(rest_times.iter().sum::<u32>()) / rest_times.len() as f64).round() as u32)
    };

    #[allow(clippy::cast_possible_truncation)]
    SessionTotals {
        duration,
        total_exercises: session.exercises.len() as u32,
        completed_exercises: session.exercises.iter().filter(|e| e.completed).count() as u32,
        skipped_exercises: session.exercises.iter().filter(|e| e.skipped).count() as u32,
        total_sets: sets.len() as u32,
        completed_sets: sets.iter().filter(|s| s.completed).count() as u32,
        total_volume,
        average_rest_time,
    }
}

/// Materializes the exercise logs for a new session as a deep copy of the
/// division's prescriptions.
#[must_use]
pub fn materialize_division(division: &Division) -> Vec<ExerciseLog> {
    division
        .exercises
        .iter()
        .map(|exercise| ExerciseLog {
            exercise_id: exercise.exercise_id,
            exercise_name: exercise.name.clone(),
            ideal_weight: exercise.ideal_weight,
            rest_time: exercise.rest_time,
            to_failure: exercise.to_failure,
            muscle_groups: division.muscle_groups.clone(),
            sets: (1..=u32::from(exercise.sets))
                .map(|set_number| SetLog {
                    set_number,
                    reps: exercise.reps,
                    weight: exercise.ideal_weight,
                    is_body_weight: exercise.is_body_weight(),
                    actual_reps: None,
                    completed: false,
                    completed_at: None,
                    rest_time_taken: None,
                    difficulty: None,
                    notes: None,
                })
                .collect(),
            notes: None,
            completed: false,
            completed_at: None,
            skipped: false,
            skip_reason: None,
        })
        .collect()
}

/// One page of a student's completed-session history.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPage {
    pub sessions: Vec<WorkoutSession>,
    pub page: usize,
    pub per_page: usize,
    pub total: u64,
    pub pages: u64,
}

#[derive(thiserror::Error, Debug)]
pub enum StartSessionError {
    #[error("not found")]
    NotFound,
    #[error("student has no assigned instructor")]
    NoInstructor,
    #[error("a session is already in progress")]
    AlreadyInProgress { session_id: WorkoutSessionID },
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Other(#[from] BoxedError),
}

impl From<ReadError> for StartSessionError {
    fn from(value: ReadError) -> Self {
        match value {
            ReadError::NotFound => StartSessionError::NotFound,
            ReadError::Storage(storage) => StartSessionError::Storage(storage),
            ReadError::Other(other) => StartSessionError::Other(other),
        }
    }
}

impl From<CreateError> for StartSessionError {
    fn from(value: CreateError) -> Self {
        match value {
            CreateError::Conflict | CreateError::NotFound => StartSessionError::NotFound,
            CreateError::Storage(storage) => StartSessionError::Storage(storage),
            CreateError::Other(other) => StartSessionError::Other(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;
    use chrono::TimeDelta;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{PlanExercise, SetCount};

    use super::*;

    fn set_log(weight: f32, is_body_weight: bool, completed: bool) -> SetLog {
        SetLog {
            set_number: 1,
            reps: Reps::new(10).unwrap(),
            weight: Weight::new(weight).unwrap(),
            is_body_weight,
            actual_reps: None,
            completed,
            completed_at: None,
            rest_time_taken: None,
            difficulty: None,
            notes: None,
        }
    }

    fn exercise_log(sets: Vec<SetLog>) -> ExerciseLog {
        ExerciseLog {
            exercise_id: None,
            exercise_name: Name::new("Push-up").unwrap(),
            ideal_weight: Weight::default(),
            rest_time: Seconds::default(),
            to_failure: false,
            muscle_groups: vec![],
            sets,
            notes: None,
            completed: false,
            completed_at: None,
            skipped: false,
            skip_reason: None,
        }
    }

    fn session(exercises: Vec<ExerciseLog>) -> WorkoutSession {
        WorkoutSession {
            id: 1.into(),
            student_id: 1.into(),
            instructor_id: 1.into(),
            workout_plan_id: 1.into(),
            workout_name: Name::new("Hypertrophy").unwrap(),
            division_name: Name::new("A").unwrap(),
            division_index: 0,
            exercises,
            status: SessionStatus::InProgress,
            start_time: DateTime::UNIX_EPOCH,
            end_time: None,
            student_weight: Some(Weight::new(70.0).unwrap()),
            overall_difficulty: None,
            mood: None,
            notes: None,
            instructor_feedback: None,
            totals: SessionTotals::default(),
        }
    }

    #[test]
    fn test_compute_totals_volume_substitutes_body_weight() {
        let session = session(vec![
            exercise_log(vec![
                set_log(20.0, false, true),
                set_log(20.0, false, true),
                set_log(20.0, false, true),
                set_log(20.0, false, true),
            ]),
            exercise_log(vec![set_log(0.0, true, true), set_log(0.0, true, true)]),
        ]);
        let totals = compute_totals(&session);
        assert_eq!(totals.total_sets, 6);
        assert_eq!(totals.completed_sets, 6);
        assert_approx_eq!(totals.total_volume, 2200.0);
    }

    #[test]
    fn test_compute_totals_skips_incomplete_sets() {
        let session = session(vec![exercise_log(vec![
            set_log(20.0, false, true),
            set_log(20.0, false, false),
        ])]);
        let totals = compute_totals(&session);
        assert_eq!(totals.completed_sets, 1);
        assert_approx_eq!(totals.total_volume, 200.0);
    }

    #[test]
    fn test_compute_totals_uses_actual_reps_when_recorded() {
        let mut set = set_log(20.0, false, true);
        set.actual_reps = Some(Reps::new(8).unwrap());
        let totals = compute_totals(&session(vec![exercise_log(vec![set])]));
        assert_approx_eq!(totals.total_volume, 160.0);
    }

    #[test]
    fn test_compute_totals_body_weight_falls_back_to_set_weight() {
        let mut session = session(vec![exercise_log(vec![set_log(0.0, true, true)])]);
        session.student_weight = None;
        let totals = compute_totals(&session);
        assert_approx_eq!(totals.total_volume, 0.0);
    }

    #[rstest]
    #[case(90, 2)]
    #[case(60, 1)]
    #[case(29, 0)]
    #[case(45 * 60, 45)]
    fn test_compute_totals_duration_rounds_to_minutes(
        #[case] elapsed_seconds: i64,
        #[case] expected: u32,
    ) {
        let mut session = session(vec![]);
        session.status = SessionStatus::Completed;
        session.end_time = Some(session.start_time + TimeDelta::seconds(elapsed_seconds));
        assert_eq!(compute_totals(&session).duration, Some(expected));
    }

    #[test]
    fn test_compute_totals_no_duration_while_in_progress() {
        let mut session = session(vec![]);
        session.end_time = Some(session.start_time + TimeDelta::seconds(600));
        assert_eq!(compute_totals(&session).duration, None);
    }

    #[test]
    fn test_compute_totals_exercise_counts() {
        let mut completed = exercise_log(vec![set_log(20.0, false, true)]);
        completed.completed = true;
        let mut skipped = exercise_log(vec![set_log(20.0, false, false)]);
        skipped.skipped = true;
        let totals = compute_totals(&session(vec![
            completed,
            skipped,
            exercise_log(vec![set_log(20.0, false, false)]),
        ]));
        assert_eq!(totals.total_exercises, 3);
        assert_eq!(totals.completed_exercises, 1);
        assert_eq!(totals.skipped_exercises, 1);
    }

    #[test]
    fn test_compute_totals_average_rest_time() {
        let mut first = set_log(20.0, false, true);
        first.rest_time_taken = Some(Seconds::new(60).unwrap());
        let mut second = set_log(20.0, false, true);
        second.rest_time_taken = Some(Seconds::new(91).unwrap());
        let without_rest = set_log(20.0, false, true);
        let totals = compute_totals(&session(vec![exercise_log(vec![
            first,
            second,
            without_rest,
        ])]));
        assert_eq!(totals.average_rest_time, Some(76));
    }

    #[test]
    fn test_compute_totals_average_rest_time_absent_without_records() {
        let totals = compute_totals(&session(vec![exercise_log(vec![set_log(
            20.0, false, true,
        )])]));
        assert_eq!(totals.average_rest_time, None);
    }

    #[test]
    fn test_materialize_division_defaults_and_body_weight() {
        let division = Division {
            name: Name::new("A").unwrap(),
            muscle_groups: vec![MuscleGroup::Chest],
            exercises: vec![
                PlanExercise {
                    exercise_id: Some(1.into()),
                    name: Name::new("Bench Press").unwrap(),
                    description: None,
                    sets: SetCount::new(4).unwrap(),
                    reps: Reps::new(12).unwrap(),
                    ideal_weight: Weight::new(40.0).unwrap(),
                    rest_time: Seconds::new(90).unwrap(),
                    to_failure: true,
                    equipment_id: None,
                },
                PlanExercise {
                    exercise_id: None,
                    name: Name::new("Push-up").unwrap(),
                    description: None,
                    sets: SetCount::default(),
                    reps: Reps::default(),
                    ideal_weight: Weight::default(),
                    rest_time: Seconds::default(),
                    to_failure: false,
                    equipment_id: None,
                },
            ],
        };

        let logs = materialize_division(&division);

        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].sets.len(), 4);
        assert_eq!(logs[0].sets[0].set_number, 1);
        assert_eq!(logs[0].sets[3].set_number, 4);
        assert!(!logs[0].sets[0].is_body_weight);
        assert_eq!(f32::from(logs[0].sets[0].weight), 40.0);
        assert_eq!(logs[0].muscle_groups, vec![MuscleGroup::Chest]);

        assert_eq!(logs[1].sets.len(), 3);
        assert!(logs[1].sets.iter().all(|s| s.is_body_weight));
        assert!(logs[1].sets.iter().all(|s| !s.completed));
        assert_eq!(u32::from(logs[1].sets[0].reps), 10);
        assert_eq!(u32::from(logs[1].rest_time), 60);
    }

    #[test]
    fn test_materialize_division_is_a_deep_copy() {
        let mut division = Division {
            name: Name::new("A").unwrap(),
            muscle_groups: vec![],
            exercises: vec![PlanExercise {
                exercise_id: None,
                name: Name::new("Squat").unwrap(),
                description: None,
                sets: SetCount::default(),
                reps: Reps::default(),
                ideal_weight: Weight::new(100.0).unwrap(),
                rest_time: Seconds::default(),
                to_failure: false,
                equipment_id: None,
            }],
        };

        let logs = materialize_division(&division);
        division.exercises[0].ideal_weight = Weight::new(120.0).unwrap();

        assert_eq!(f32::from(logs[0].sets[0].weight), 100.0);
    }

    #[rstest]
    #[case(SessionStatus::InProgress, "in-progress")]
    #[case(SessionStatus::Completed, "completed")]
    fn test_session_status_display(#[case] status: SessionStatus, #[case] string: &str) {
        assert_eq!(status.to_string(), string);
    }

    #[test]
    fn test_workout_session_id_nil() {
        assert!(WorkoutSessionID::nil().is_nil());
        assert_eq!(WorkoutSessionID::nil(), WorkoutSessionID::default());
    }
}
