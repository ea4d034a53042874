use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Weekday};
use gymtrack_domain as domain;

pub fn user(id: u128, email: &str, cpf: &str) -> domain::User {
    domain::User {
        id: id.into(),
        name: domain::Name::new("Alice").unwrap(),
        email: domain::Email::new(email).unwrap(),
        cpf: domain::Cpf::new(cpf).unwrap(),
        phone: String::from("+55 11 91234-5678"),
        birth_date: NaiveDate::from_ymd_opt(1995, 4, 17).unwrap(),
        password_hash: String::from("$argon2id$stub"),
        role: domain::Role::Student,
        avatar: None,
    }
}

pub fn instructor(id: u128, user_id: u128, max_students: u32) -> domain::Instructor {
    domain::Instructor {
        id: id.into(),
        user_id: user_id.into(),
        name: domain::Name::new("Carol").unwrap(),
        email: domain::Email::new("carol@example.com").unwrap(),
        phone: None,
        cref: Some(String::from("012345-G/SP")),
        years_of_experience: 8,
        bio: String::from(
            "Strength and conditioning coach focused on progressive overload programs.",
        ),
        certifications: vec![String::from("CREF")],
        specialties: vec![String::from("hypertrophy")],
        availability: domain::Availability {
            working_days: vec![Weekday::Mon, Weekday::Wed, Weekday::Fri],
            start_time: NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        },
        max_students,
        students: BTreeSet::new(),
        gym_id: None,
        active: true,
    }
}

/// Student linked to instructor 1 with a recorded weight of 70 kg.
pub fn student(id: u128, user_id: u128) -> domain::Student {
    domain::Student {
        id: id.into(),
        user_id: user_id.into(),
        instructor_id: Some(1.into()),
        current_plan_id: None,
        workout_plans: BTreeSet::new(),
        personal_info: domain::PersonalInfo {
            current_weight: Some(domain::Weight::new(70.0).unwrap()),
            height: Some(175.0),
            experience: Some(domain::TrainingExperience::Intermediate),
            training_days: vec![Weekday::Mon, Weekday::Thu],
            preferred_times: vec![],
        },
        health: domain::HealthRestrictions::default(),
        goals: vec![],
        progress_history: vec![],
        status: domain::StudentStatus::Active,
    }
}

fn plan_exercise(name: &str, sets: u32, reps: u32, ideal_weight: f32) -> domain::PlanExercise {
    domain::PlanExercise {
        exercise_id: None,
        name: domain::Name::new(name).unwrap(),
        description: None,
        sets: domain::SetCount::new(sets).unwrap(),
        reps: domain::Reps::new(reps).unwrap(),
        ideal_weight: domain::Weight::new(ideal_weight).unwrap(),
        rest_time: domain::Seconds::new(90).unwrap(),
        to_failure: false,
        equipment_id: None,
    }
}

/// Two divisions; division 0 holds four weighted sets plus two body-weight
/// sets (six in total).
pub fn plan(id: u128, instructor_id: u128) -> domain::WorkoutPlan {
    domain::WorkoutPlan {
        id: id.into(),
        instructor_id: instructor_id.into(),
        name: domain::Name::new("Hypertrophy").unwrap(),
        description: Some(String::from("Push/pull split")),
        goal: Some(String::from("muscle gain")),
        divisions: vec![
            domain::Division {
                name: domain::Name::new("A").unwrap(),
                muscle_groups: vec![domain::MuscleGroup::Chest],
                exercises: vec![
                    plan_exercise("Bench Press", 4, 10, 20.0),
                    plan_exercise("Push-up", 2, 10, 0.0),
                ],
            },
            domain::Division {
                name: domain::Name::new("B").unwrap(),
                muscle_groups: vec![domain::MuscleGroup::Legs],
                exercises: vec![plan_exercise("Squat", 3, 8, 60.0)],
            },
        ],
        assigned_students: BTreeSet::new(),
        created_at: DateTime::UNIX_EPOCH,
    }
}

/// Completed 45-minute session with one fully logged exercise. Start times
/// are staggered by id so history ordering is deterministic.
pub fn completed_session(
    id: u128,
    student_id: u128,
    instructor_id: u128,
    plan_id: u128,
) -> domain::WorkoutSession {
    let start_time = DateTime::UNIX_EPOCH + TimeDelta::hours(i64::try_from(id).unwrap());
    let mut session = domain::WorkoutSession {
        id: id.into(),
        student_id: student_id.into(),
        instructor_id: instructor_id.into(),
        workout_plan_id: plan_id.into(),
        workout_name: domain::Name::new("Hypertrophy").unwrap(),
        division_name: domain::Name::new("A").unwrap(),
        division_index: 0,
        exercises: vec![domain::ExerciseLog {
            exercise_id: None,
            exercise_name: domain::Name::new("Bench Press").unwrap(),
            ideal_weight: domain::Weight::new(20.0).unwrap(),
            rest_time: domain::Seconds::new(90).unwrap(),
            to_failure: false,
            muscle_groups: vec![domain::MuscleGroup::Chest],
            sets: (1..=2)
                .map(|set_number| domain::SetLog {
                    set_number,
                    reps: domain::Reps::new(10).unwrap(),
                    weight: domain::Weight::new(20.0).unwrap(),
                    is_body_weight: false,
                    actual_reps: None,
                    completed: true,
                    completed_at: None,
                    rest_time_taken: Some(domain::Seconds::new(75).unwrap()),
                    difficulty: Some(domain::PerceivedDifficulty::Medium),
                    notes: None,
                })
                .collect(),
            notes: None,
            completed: true,
            completed_at: None,
            skipped: false,
            skip_reason: None,
        }],
        status: domain::SessionStatus::Completed,
        start_time,
        end_time: Some(start_time + TimeDelta::minutes(45)),
        student_weight: Some(domain::Weight::new(70.0).unwrap()),
        overall_difficulty: None,
        mood: Some(domain::Mood::Good),
        notes: None,
        instructor_feedback: None,
        totals: domain::SessionTotals::default(),
    };
    session.recompute_totals();
    session
}
