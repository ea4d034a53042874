use std::collections::BTreeSet;

use gymtrack_domain::{
    DeleteError, ReadError, Service, StudentRepository, StudentService, UpdateError,
    WorkoutPlanRepository, WorkoutPlanService,
};
use pretty_assertions::assert_eq;

use crate::DocumentStore;

use super::data;

async fn service_with_students(
    student_ids: &[u128],
    plan_ids: &[u128],
) -> Service<DocumentStore> {
    let store = DocumentStore::new();
    for id in student_ids {
        store.create_student(data::student(*id, *id)).await.unwrap();
    }
    for id in plan_ids {
        store.create_plan(data::plan(*id, 1)).await.unwrap();
    }
    Service::new(store)
}

#[tokio::test]
async fn test_assign_links_both_sides() {
    let service = service_with_students(&[1], &[7]).await;

    let (student, plan) = service
        .assign_plan_to_student(7.into(), 1.into())
        .await
        .unwrap();

    assert!(student.enrolled_in(7.into()));
    assert_eq!(student.current_plan_id, Some(7.into()));
    assert!(plan.assigned_students.contains(&1.into()));

    // Both sides survived the round trip through the store.
    let student = service.get_student(1.into()).await.unwrap();
    let plan = service.get_workout_plan(7.into()).await.unwrap();
    assert!(student.enrolled_in(7.into()));
    assert!(plan.assigned_students.contains(&1.into()));
}

#[tokio::test]
async fn test_assign_is_idempotent() {
    let service = service_with_students(&[1], &[7]).await;

    service
        .assign_plan_to_student(7.into(), 1.into())
        .await
        .unwrap();
    let (student, plan) = service
        .assign_plan_to_student(7.into(), 1.into())
        .await
        .unwrap();

    assert_eq!(student.workout_plans.len(), 1);
    assert_eq!(plan.assigned_students.len(), 1);
}

#[tokio::test]
async fn test_assign_overwrites_current_plan_pointer() {
    let service = service_with_students(&[1], &[7, 8]).await;

    service
        .assign_plan_to_student(7.into(), 1.into())
        .await
        .unwrap();
    let (student, _) = service
        .assign_plan_to_student(8.into(), 1.into())
        .await
        .unwrap();

    assert_eq!(student.current_plan_id, Some(8.into()));
    assert_eq!(student.workout_plans.len(), 2);
}

#[tokio::test]
async fn test_assign_missing_student_or_plan_is_not_found() {
    let service = service_with_students(&[1], &[7]).await;

    assert!(matches!(
        service.assign_plan_to_student(7.into(), 99.into()).await,
        Err(UpdateError::NotFound)
    ));
    assert!(matches!(
        service.assign_plan_to_student(99.into(), 1.into()).await,
        Err(UpdateError::NotFound)
    ));
}

#[tokio::test]
async fn test_unassign_removes_both_sides_and_pointer() {
    let service = service_with_students(&[1], &[7]).await;
    service
        .assign_plan_to_student(7.into(), 1.into())
        .await
        .unwrap();

    let (student, plan) = service
        .unassign_plan_from_student(7.into(), 1.into())
        .await
        .unwrap();

    assert!(!student.enrolled_in(7.into()));
    assert_eq!(student.current_plan_id, None);
    assert!(plan.assigned_students.is_empty());
}

#[tokio::test]
async fn test_unassign_keeps_unrelated_pointer() {
    let service = service_with_students(&[1], &[7, 8]).await;
    service
        .assign_plan_to_student(7.into(), 1.into())
        .await
        .unwrap();
    service
        .assign_plan_to_student(8.into(), 1.into())
        .await
        .unwrap();

    let (student, _) = service
        .unassign_plan_from_student(7.into(), 1.into())
        .await
        .unwrap();

    assert_eq!(student.current_plan_id, Some(8.into()));
    assert!(student.enrolled_in(8.into()));
}

#[tokio::test]
async fn test_delete_plan_detaches_all_assigned_students() {
    let service = service_with_students(&[1, 2, 3], &[7]).await;
    for student_id in 1..=3u128 {
        service
            .assign_plan_to_student(7.into(), student_id.into())
            .await
            .unwrap();
    }

    let deleted = service.delete_workout_plan(1.into(), 7.into()).await.unwrap();
    assert_eq!(deleted, 7.into());

    assert!(matches!(
        service.get_workout_plan(7.into()).await,
        Err(ReadError::NotFound)
    ));
    for student_id in 1..=3u128 {
        let student = service.get_student(student_id.into()).await.unwrap();
        assert!(!student.enrolled_in(7.into()));
        assert_eq!(student.current_plan_id, None);
    }
}

#[tokio::test]
async fn test_delete_plan_requires_owning_instructor() {
    let service = service_with_students(&[1], &[7]).await;
    service
        .assign_plan_to_student(7.into(), 1.into())
        .await
        .unwrap();

    assert!(matches!(
        service.delete_workout_plan(2.into(), 7.into()).await,
        Err(DeleteError::NotFound)
    ));

    // Nothing was detached.
    let student = service.get_student(1.into()).await.unwrap();
    assert!(student.enrolled_in(7.into()));
    assert!(service.get_workout_plan(7.into()).await.is_ok());
}

#[tokio::test]
async fn test_update_plan_reconciles_roster() {
    let service = service_with_students(&[1, 2, 3], &[7]).await;
    service
        .assign_plan_to_student(7.into(), 1.into())
        .await
        .unwrap();
    service
        .assign_plan_to_student(7.into(), 2.into())
        .await
        .unwrap();

    let roster = BTreeSet::from([2.into(), 3.into()]);
    let plan = service
        .update_workout_plan(1.into(), 7.into(), None, None, None, None, Some(roster.clone()))
        .await
        .unwrap();

    assert_eq!(plan.assigned_students, roster);

    let dropped = service.get_student(1.into()).await.unwrap();
    assert!(!dropped.enrolled_in(7.into()));
    assert_eq!(dropped.current_plan_id, None);

    let untouched = service.get_student(2.into()).await.unwrap();
    assert!(untouched.enrolled_in(7.into()));
    assert_eq!(untouched.current_plan_id, Some(7.into()));

    let added = service.get_student(3.into()).await.unwrap();
    assert!(added.enrolled_in(7.into()));
    assert_eq!(added.current_plan_id, Some(7.into()));
}

#[tokio::test]
async fn test_update_plan_requires_owning_instructor() {
    let service = service_with_students(&[1], &[7]).await;

    assert!(matches!(
        service
            .update_workout_plan(2.into(), 7.into(), None, None, None, None, None)
            .await,
        Err(UpdateError::NotFound)
    ));
}
