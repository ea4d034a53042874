#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod equipment;
pub mod error;
pub mod exercise;
pub mod gym;
pub mod instructor;
pub mod name;
pub mod quantity;
pub mod service;
pub mod student;
pub mod user;
pub mod workout_plan;
pub mod workout_session;

pub use equipment::{
    Equipment, EquipmentCategory, EquipmentID, EquipmentRepository, EquipmentService,
};
pub use error::{
    BoxedError, CreateError, DeleteError, ReadError, StorageError, UpdateError, ValidationError,
};
pub use exercise::{
    Exercise, ExerciseCategory, ExerciseID, ExerciseRepository, ExerciseService, ExperienceLevel,
    MuscleGroup,
};
pub use gym::{
    EquipmentCondition, Gym, GymEquipment, GymID, GymRepository, GymService, Location,
};
pub use instructor::{
    Availability, Instructor, InstructorID, InstructorRepository, InstructorService,
};
pub use name::{Name, NameError};
pub use quantity::{
    Reps, RepsError, Seconds, SecondsError, SetCount, SetCountError, Weight, WeightError,
};
pub use service::Service;
pub use student::{
    Goal, HealthRestrictions, Measurements, PersonalInfo, ProgressEntry, Student, StudentID,
    StudentRepository, StudentService, StudentStatus, TrainingExperience,
};
pub use user::{Cpf, CpfError, Email, EmailError, Role, User, UserID, UserRepository, UserService};
pub use workout_plan::{
    Division, PlanExercise, PlanWithStats, WorkoutPlan, WorkoutPlanID, WorkoutPlanRepository,
    WorkoutPlanService,
};
pub use workout_session::{
    ExerciseLog, Mood, PerceivedDifficulty, SessionPage, SessionStatus, SessionTotals, SetLog,
    StartSessionError, WorkoutSession, WorkoutSessionID, WorkoutSessionRepository,
    WorkoutSessionService, compute_totals, materialize_division,
};
