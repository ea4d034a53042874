use assert_approx_eq::assert_approx_eq;
use gymtrack_domain::{
    Division, ExerciseLog, InstructorRepository, Name, Service, SessionStatus, StartSessionError,
    StudentRepository, UpdateError, WorkoutPlanRepository, WorkoutPlanService,
    WorkoutSessionRepository, WorkoutSessionService,
};
use pretty_assertions::assert_eq;

use crate::DocumentStore;

use super::data;

async fn service() -> Service<DocumentStore> {
    let store = DocumentStore::new();
    store
        .create_instructor(data::instructor(1, 100, 20))
        .await
        .unwrap();
    store.create_student(data::student(1, 1)).await.unwrap();
    store.create_student(data::student(2, 2)).await.unwrap();
    store.create_plan(data::plan(7, 1)).await.unwrap();
    Service::new(store)
}

fn all_completed(exercises: &[ExerciseLog]) -> Vec<ExerciseLog> {
    exercises
        .iter()
        .cloned()
        .map(|mut exercise| {
            for set in &mut exercise.sets {
                set.completed = true;
            }
            exercise.completed = true;
            exercise
        })
        .collect()
}

#[tokio::test]
async fn test_start_session_materializes_snapshot() {
    let service = service().await;

    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    assert_eq!(session.status, SessionStatus::InProgress);
    assert_eq!(session.workout_name, Name::new("Hypertrophy").unwrap());
    assert_eq!(session.division_name, Name::new("A").unwrap());
    assert_eq!(session.exercises.len(), 2);
    assert_eq!(session.totals.total_sets, 6);
    assert_eq!(session.totals.total_exercises, 2);
    assert_eq!(session.totals.completed_sets, 0);
    assert_eq!(session.student_weight.map(f32::from), Some(70.0));
    assert!(session.exercises[1].sets.iter().all(|s| s.is_body_weight));
    assert!(!session.exercises[0].sets[0].is_body_weight);

    let active = service.active_session(1.into()).await.unwrap();
    assert_eq!(active.map(|s| s.id), Some(session.id));
}

#[tokio::test]
async fn test_start_session_requires_instructor() {
    let store = DocumentStore::new();
    let mut student = data::student(1, 1);
    student.instructor_id = None;
    store.create_student(student).await.unwrap();
    store.create_plan(data::plan(7, 1)).await.unwrap();
    let service = Service::new(store);

    assert!(matches!(
        service.start_session(1.into(), 7.into(), 0).await,
        Err(StartSessionError::NoInstructor)
    ));
}

#[tokio::test]
async fn test_start_session_conflicts_with_active_session() {
    let service = service().await;
    let first = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    match service.start_session(1.into(), 7.into(), 1).await {
        Err(StartSessionError::AlreadyInProgress { session_id }) => {
            assert_eq!(session_id, first.id);
        }
        other => panic!("expected conflict, got {other:?}"),
    }

    // A second student is not affected by the first student's session.
    assert!(service.start_session(2.into(), 7.into(), 0).await.is_ok());
}

#[tokio::test]
async fn test_start_session_unknown_division_is_not_found() {
    let service = service().await;

    assert!(matches!(
        service.start_session(1.into(), 7.into(), 2).await,
        Err(StartSessionError::NotFound)
    ));
}

#[tokio::test]
async fn test_start_session_unknown_plan_is_not_found() {
    let service = service().await;

    assert!(matches!(
        service.start_session(1.into(), 99.into(), 0).await,
        Err(StartSessionError::NotFound)
    ));
}

#[tokio::test]
async fn test_complete_session_computes_volume_and_duration() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    let completed = service
        .complete_session(
            1.into(),
            session.id,
            all_completed(&session.exercises),
            Some(String::from("solid workout")),
        )
        .await
        .unwrap();

    assert_eq!(completed.status, SessionStatus::Completed);
    let end_time = completed.end_time.unwrap();
    assert!(end_time >= completed.start_time);
    assert!(completed.totals.duration.is_some());
    assert_eq!(completed.totals.completed_sets, 6);
    assert_eq!(completed.totals.completed_exercises, 2);
    // 4 sets x 20 kg x 10 reps + 2 body-weight sets x 70 kg x 10 reps
    assert_approx_eq!(completed.totals.total_volume, 2200.0);
    assert_eq!(completed.notes.as_deref(), Some("solid workout"));
}

#[tokio::test]
async fn test_complete_session_twice_is_a_conflict() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();
    let exercises = all_completed(&session.exercises);

    service
        .complete_session(1.into(), session.id, exercises.clone(), None)
        .await
        .unwrap();

    assert!(matches!(
        service
            .complete_session(1.into(), session.id, exercises, None)
            .await,
        Err(UpdateError::Conflict)
    ));
}

#[tokio::test]
async fn test_update_session_recomputes_progress() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    let mut exercises = session.exercises.clone();
    exercises[0].completed = true;
    for set in &mut exercises[0].sets {
        set.completed = true;
    }

    let updated = service
        .update_session(1.into(), session.id, Some(exercises), None)
        .await
        .unwrap();

    assert_eq!(updated.totals.completed_exercises, 1);
    assert_eq!(updated.totals.completed_sets, 4);
    assert_approx_eq!(updated.totals.total_volume, 800.0);
    // Still in progress, so no duration yet.
    assert_eq!(updated.totals.duration, None);
}

#[tokio::test]
async fn test_update_session_requires_in_progress() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();
    service
        .complete_session(1.into(), session.id, all_completed(&session.exercises), None)
        .await
        .unwrap();

    assert!(matches!(
        service
            .update_session(1.into(), session.id, None, Some(String::from("late")))
            .await,
        Err(UpdateError::Conflict)
    ));
}

#[tokio::test]
async fn test_session_lookup_is_scoped_by_student() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    assert!(matches!(
        service.update_session(2.into(), session.id, None, None).await,
        Err(UpdateError::NotFound)
    ));
}

#[tokio::test]
async fn test_skip_exercise_forces_incomplete() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    let updated = service
        .skip_exercise(1.into(), session.id, 1, None)
        .await
        .unwrap();

    let exercise = &updated.exercises[1];
    assert!(exercise.skipped);
    assert!(!exercise.completed);
    assert_eq!(exercise.skip_reason.as_deref(), Some("not specified"));
    assert_eq!(updated.totals.skipped_exercises, 1);
}

#[tokio::test]
async fn test_skip_exercise_records_reason() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    let updated = service
        .skip_exercise(1.into(), session.id, 0, Some(String::from("shoulder pain")))
        .await
        .unwrap();

    assert_eq!(
        updated.exercises[0].skip_reason.as_deref(),
        Some("shoulder pain")
    );
}

#[tokio::test]
async fn test_skip_exercise_invalid_index() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    assert!(matches!(
        service.skip_exercise(1.into(), session.id, 2, None).await,
        Err(UpdateError::Invalid(_))
    ));
}

#[tokio::test]
async fn test_cancel_session_deletes_it() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    let cancelled = service.cancel_session(1.into(), session.id).await.unwrap();
    assert_eq!(cancelled, session.id);

    assert_eq!(service.active_session(1.into()).await.unwrap(), None);
    assert!(matches!(
        service.update_session(1.into(), session.id, None, None).await,
        Err(UpdateError::NotFound)
    ));

    // History never sees cancelled sessions.
    let history = service.session_history(1.into(), 1, 10).await.unwrap();
    assert_eq!(history.total, 0);
}

#[tokio::test]
async fn test_cancel_completed_session_is_a_conflict() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();
    service
        .complete_session(1.into(), session.id, all_completed(&session.exercises), None)
        .await
        .unwrap();

    assert!(matches!(
        service.cancel_session(1.into(), session.id).await,
        Err(UpdateError::Conflict)
    ));
}

#[tokio::test]
async fn test_session_history_is_paginated_newest_first() {
    let store = DocumentStore::new();
    store.create_student(data::student(1, 1)).await.unwrap();
    for id in 1..=3u128 {
        store
            .create_session(data::completed_session(id, 1, 1, 7))
            .await
            .unwrap();
    }
    let mut in_progress = data::completed_session(4, 1, 1, 7);
    in_progress.status = SessionStatus::InProgress;
    in_progress.end_time = None;
    in_progress.recompute_totals();
    store.create_session(in_progress).await.unwrap();
    let service = Service::new(store);

    let page = service.session_history(1.into(), 1, 2).await.unwrap();

    assert_eq!(page.total, 3);
    assert_eq!(page.pages, 2);
    assert_eq!(page.sessions.len(), 2);
    // Fixture start times grow with the id.
    assert_eq!(page.sessions[0].id, 3.into());
    assert_eq!(page.sessions[1].id, 2.into());

    let last = service.session_history(1.into(), 2, 2).await.unwrap();
    assert_eq!(last.sessions.len(), 1);
    assert_eq!(last.sessions[0].id, 1.into());
}

#[tokio::test]
async fn test_plan_edits_do_not_affect_started_sessions() {
    let service = service().await;
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();

    service
        .update_workout_plan(
            1.into(),
            7.into(),
            None,
            None,
            None,
            Some(vec![Division {
                name: Name::new("Rewritten").unwrap(),
                muscle_groups: vec![],
                exercises: vec![],
            }]),
            None,
        )
        .await
        .unwrap();

    let active = service.active_session(1.into()).await.unwrap().unwrap();
    assert_eq!(active.exercises, session.exercises);
    assert_eq!(active.division_name, Name::new("A").unwrap());
}

#[tokio::test]
async fn test_student_plans_reports_completion_stats() {
    let service = service().await;
    service
        .assign_plan_to_student(7.into(), 1.into())
        .await
        .unwrap();
    let session = service.start_session(1.into(), 7.into(), 0).await.unwrap();
    service
        .complete_session(1.into(), session.id, all_completed(&session.exercises), None)
        .await
        .unwrap();

    let plans = service.student_plans(1.into()).await.unwrap();

    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].plan.id, 7.into());
    assert_eq!(plans[0].completed_sessions, 1);
    assert!(plans[0].last_completed.is_some());
}

#[tokio::test]
async fn test_instructor_sessions_cover_the_whole_roster() {
    let store = DocumentStore::new();
    let mut instructor = data::instructor(1, 100, 20);
    instructor.students = [1.into(), 2.into()].into();
    store.create_instructor(instructor).await.unwrap();
    store.create_student(data::student(1, 1)).await.unwrap();
    store.create_student(data::student(2, 2)).await.unwrap();
    store.create_student(data::student(3, 3)).await.unwrap();
    for (session_id, student_id) in [(1, 1), (2, 2), (3, 3)] {
        store
            .create_session(data::completed_session(session_id, student_id, 1, 7))
            .await
            .unwrap();
    }
    let service = Service::new(store);

    let sessions = service.instructor_sessions(1.into()).await.unwrap();

    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.student_id != 3.into()));
}
