use std::collections::BTreeMap;
use std::path::PathBuf;

use gymtrack_domain::{
    CreateError, DeleteError, Equipment, EquipmentID, EquipmentRepository, Exercise, ExerciseID,
    ExerciseRepository, Gym, GymID, GymRepository, Instructor, InstructorID, InstructorRepository,
    ReadError, StorageError, Student, StudentID, StudentRepository, UpdateError, User, UserID,
    UserRepository, WorkoutPlan, WorkoutPlanID, WorkoutPlanRepository, WorkoutSession,
    WorkoutSessionID, WorkoutSessionRepository,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::document::{
    EquipmentDocument, ExerciseDocument, GymDocument, InstructorDocument, StudentDocument,
    UserDocument, WorkoutPlanDocument, WorkoutSessionDocument,
};

#[derive(Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct Collections {
    users: BTreeMap<Uuid, UserDocument>,
    instructors: BTreeMap<Uuid, InstructorDocument>,
    students: BTreeMap<Uuid, StudentDocument>,
    gyms: BTreeMap<Uuid, GymDocument>,
    equipment: BTreeMap<Uuid, EquipmentDocument>,
    exercises: BTreeMap<Uuid, ExerciseDocument>,
    workout_plans: BTreeMap<Uuid, WorkoutPlanDocument>,
    workout_sessions: BTreeMap<Uuid, WorkoutSessionDocument>,
}

/// Document store holding one collection per entity. Without a snapshot path
/// the store is purely in-memory; with one, every mutation rewrites the
/// snapshot file.
pub struct DocumentStore {
    collections: RwLock<Collections>,
    path: Option<PathBuf>,
}

impl DocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(Collections::default()),
            path: None,
        }
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let collections = match std::fs::read(&path) {
            Ok(bytes) => {
                serde_json::from_slice(&bytes).map_err(|err| StorageError::Other(err.into()))?
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Collections::default(),
            Err(err) => return Err(StorageError::Other(err.into())),
        };
        Ok(Self {
            collections: RwLock::new(collections),
            path: Some(path),
        })
    }

    fn persist(&self, collections: &Collections) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_vec_pretty(collections)
            .map_err(|err| StorageError::Other(err.into()))?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json).map_err(|err| StorageError::Other(err.into()))?;
        std::fs::rename(&tmp, path).map_err(|err| StorageError::Other(err.into()))
    }
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRepository for DocumentStore {
    async fn read_users(&self) -> Result<Vec<User>, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .users
            .values()
            .cloned()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn read_user(&self, id: UserID) -> Result<User, ReadError> {
        let collections = self.collections.read().await;
        let document = collections.users.get(&*id).cloned().ok_or(ReadError::NotFound)?;
        Ok(document.try_into()?)
    }

    async fn create_user(&self, mut user: User) -> Result<User, CreateError> {
        if user.id.is_nil() {
            user.id = Uuid::new_v4().into();
        }
        let mut collections = self.collections.write().await;
        collections.users.insert(*user.id, UserDocument::from(&user));
        self.persist(&collections)?;
        Ok(user)
    }
}

impl InstructorRepository for DocumentStore {
    async fn read_instructors(&self) -> Result<Vec<Instructor>, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .instructors
            .values()
            .cloned()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn read_instructor(&self, id: InstructorID) -> Result<Instructor, ReadError> {
        let collections = self.collections.read().await;
        let document = collections
            .instructors
            .get(&*id)
            .cloned()
            .ok_or(ReadError::NotFound)?;
        Ok(document.try_into()?)
    }

    async fn find_instructor_by_user(
        &self,
        user_id: UserID,
    ) -> Result<Option<Instructor>, ReadError> {
        let collections = self.collections.read().await;
        collections
            .instructors
            .values()
            .find(|d| d.user_id == *user_id)
            .cloned()
            .map(|d| d.try_into().map_err(ReadError::from))
            .transpose()
    }

    async fn create_instructor(&self, mut instructor: Instructor) -> Result<Instructor, CreateError> {
        if instructor.id.is_nil() {
            instructor.id = Uuid::new_v4().into();
        }
        let mut collections = self.collections.write().await;
        collections
            .instructors
            .insert(*instructor.id, InstructorDocument::from(&instructor));
        self.persist(&collections)?;
        Ok(instructor)
    }

    async fn replace_instructor(&self, instructor: Instructor) -> Result<Instructor, UpdateError> {
        let mut collections = self.collections.write().await;
        if !collections.instructors.contains_key(&*instructor.id) {
            return Err(UpdateError::NotFound);
        }
        collections
            .instructors
            .insert(*instructor.id, InstructorDocument::from(&instructor));
        self.persist(&collections)?;
        Ok(instructor)
    }
}

impl StudentRepository for DocumentStore {
    async fn read_students(&self) -> Result<Vec<Student>, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .students
            .values()
            .cloned()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn read_student(&self, id: StudentID) -> Result<Student, ReadError> {
        let collections = self.collections.read().await;
        let document = collections
            .students
            .get(&*id)
            .cloned()
            .ok_or(ReadError::NotFound)?;
        Ok(document.try_into()?)
    }

    async fn find_student_by_user(&self, user_id: UserID) -> Result<Option<Student>, ReadError> {
        let collections = self.collections.read().await;
        collections
            .students
            .values()
            .find(|d| d.user_id == *user_id)
            .cloned()
            .map(|d| d.try_into().map_err(ReadError::from))
            .transpose()
    }

    async fn create_student(&self, mut student: Student) -> Result<Student, CreateError> {
        if student.id.is_nil() {
            student.id = Uuid::new_v4().into();
        }
        let mut collections = self.collections.write().await;
        collections
            .students
            .insert(*student.id, StudentDocument::from(&student));
        self.persist(&collections)?;
        Ok(student)
    }

    async fn replace_student(&self, student: Student) -> Result<Student, UpdateError> {
        let mut collections = self.collections.write().await;
        if !collections.students.contains_key(&*student.id) {
            return Err(UpdateError::NotFound);
        }
        collections
            .students
            .insert(*student.id, StudentDocument::from(&student));
        self.persist(&collections)?;
        Ok(student)
    }

    async fn delete_student(&self, id: StudentID) -> Result<StudentID, DeleteError> {
        let mut collections = self.collections.write().await;
        if collections.students.remove(&*id).is_none() {
            return Err(DeleteError::NotFound);
        }
        self.persist(&collections)?;
        Ok(id)
    }

    async fn detach_plan_from_students(&self, plan_id: WorkoutPlanID) -> Result<u64, UpdateError> {
        let mut collections = self.collections.write().await;
        let mut modified = 0;
        for student in collections.students.values_mut() {
            if !student.workout_plans.contains(&*plan_id) {
                continue;
            }
            student.workout_plans.retain(|id| *id != *plan_id);
            if student.current_workout_plan_id == Some(*plan_id) {
                student.current_workout_plan_id = None;
            }
            if student.workout_plan_id == Some(*plan_id) {
                student.workout_plan_id = None;
            }
            modified += 1;
        }
        self.persist(&collections)?;
        Ok(modified)
    }
}

impl GymRepository for DocumentStore {
    async fn read_gyms(&self) -> Result<Vec<Gym>, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .gyms
            .values()
            .cloned()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn read_gym(&self, id: GymID) -> Result<Gym, ReadError> {
        let collections = self.collections.read().await;
        let document = collections.gyms.get(&*id).cloned().ok_or(ReadError::NotFound)?;
        Ok(document.try_into()?)
    }

    async fn create_gym(&self, mut gym: Gym) -> Result<Gym, CreateError> {
        if gym.id.is_nil() {
            gym.id = Uuid::new_v4().into();
        }
        let mut collections = self.collections.write().await;
        collections.gyms.insert(*gym.id, GymDocument::from(&gym));
        self.persist(&collections)?;
        Ok(gym)
    }

    async fn replace_gym(&self, gym: Gym) -> Result<Gym, UpdateError> {
        let mut collections = self.collections.write().await;
        if !collections.gyms.contains_key(&*gym.id) {
            return Err(UpdateError::NotFound);
        }
        collections.gyms.insert(*gym.id, GymDocument::from(&gym));
        self.persist(&collections)?;
        Ok(gym)
    }

    async fn delete_gym(&self, id: GymID) -> Result<GymID, DeleteError> {
        let mut collections = self.collections.write().await;
        if collections.gyms.remove(&*id).is_none() {
            return Err(DeleteError::NotFound);
        }
        self.persist(&collections)?;
        Ok(id)
    }
}

impl EquipmentRepository for DocumentStore {
    async fn read_equipment(&self) -> Result<Vec<Equipment>, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .equipment
            .values()
            .cloned()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn read_equipment_item(&self, id: EquipmentID) -> Result<Equipment, ReadError> {
        let collections = self.collections.read().await;
        let document = collections
            .equipment
            .get(&*id)
            .cloned()
            .ok_or(ReadError::NotFound)?;
        Ok(document.try_into()?)
    }

    async fn create_equipment(&self, mut equipment: Equipment) -> Result<Equipment, CreateError> {
        if equipment.id.is_nil() {
            equipment.id = Uuid::new_v4().into();
        }
        let mut collections = self.collections.write().await;
        collections
            .equipment
            .insert(*equipment.id, EquipmentDocument::from(&equipment));
        self.persist(&collections)?;
        Ok(equipment)
    }

    async fn replace_equipment(&self, equipment: Equipment) -> Result<Equipment, UpdateError> {
        let mut collections = self.collections.write().await;
        if !collections.equipment.contains_key(&*equipment.id) {
            return Err(UpdateError::NotFound);
        }
        collections
            .equipment
            .insert(*equipment.id, EquipmentDocument::from(&equipment));
        self.persist(&collections)?;
        Ok(equipment)
    }

    async fn delete_equipment(&self, id: EquipmentID) -> Result<EquipmentID, DeleteError> {
        let mut collections = self.collections.write().await;
        if collections.equipment.remove(&*id).is_none() {
            return Err(DeleteError::NotFound);
        }
        self.persist(&collections)?;
        Ok(id)
    }
}

impl ExerciseRepository for DocumentStore {
    async fn read_exercises(&self) -> Result<Vec<Exercise>, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .exercises
            .values()
            .cloned()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn read_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        let collections = self.collections.read().await;
        let document = collections
            .exercises
            .get(&*id)
            .cloned()
            .ok_or(ReadError::NotFound)?;
        Ok(document.try_into()?)
    }

    async fn create_exercise(&self, mut exercise: Exercise) -> Result<Exercise, CreateError> {
        if exercise.id.is_nil() {
            exercise.id = Uuid::new_v4().into();
        }
        let mut collections = self.collections.write().await;
        collections
            .exercises
            .insert(*exercise.id, ExerciseDocument::from(&exercise));
        self.persist(&collections)?;
        Ok(exercise)
    }

    async fn replace_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
        let mut collections = self.collections.write().await;
        if !collections.exercises.contains_key(&*exercise.id) {
            return Err(UpdateError::NotFound);
        }
        collections
            .exercises
            .insert(*exercise.id, ExerciseDocument::from(&exercise));
        self.persist(&collections)?;
        Ok(exercise)
    }

    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        let mut collections = self.collections.write().await;
        if collections.exercises.remove(&*id).is_none() {
            return Err(DeleteError::NotFound);
        }
        self.persist(&collections)?;
        Ok(id)
    }
}

impl WorkoutPlanRepository for DocumentStore {
    async fn read_plans(&self) -> Result<Vec<WorkoutPlan>, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .workout_plans
            .values()
            .cloned()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn read_plan(&self, id: WorkoutPlanID) -> Result<WorkoutPlan, ReadError> {
        let collections = self.collections.read().await;
        let document = collections
            .workout_plans
            .get(&*id)
            .cloned()
            .ok_or(ReadError::NotFound)?;
        Ok(document.try_into()?)
    }

    async fn create_plan(&self, mut plan: WorkoutPlan) -> Result<WorkoutPlan, CreateError> {
        if plan.id.is_nil() {
            plan.id = Uuid::new_v4().into();
        }
        let mut collections = self.collections.write().await;
        collections
            .workout_plans
            .insert(*plan.id, WorkoutPlanDocument::from(&plan));
        self.persist(&collections)?;
        Ok(plan)
    }

    async fn replace_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, UpdateError> {
        let mut collections = self.collections.write().await;
        if !collections.workout_plans.contains_key(&*plan.id) {
            return Err(UpdateError::NotFound);
        }
        collections
            .workout_plans
            .insert(*plan.id, WorkoutPlanDocument::from(&plan));
        self.persist(&collections)?;
        Ok(plan)
    }

    async fn delete_plan(&self, id: WorkoutPlanID) -> Result<WorkoutPlanID, DeleteError> {
        let mut collections = self.collections.write().await;
        if collections.workout_plans.remove(&*id).is_none() {
            return Err(DeleteError::NotFound);
        }
        self.persist(&collections)?;
        Ok(id)
    }
}

impl WorkoutSessionRepository for DocumentStore {
    async fn read_sessions(&self, student_id: StudentID) -> Result<Vec<WorkoutSession>, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .workout_sessions
            .values()
            .filter(|d| d.student_id == *student_id)
            .cloned()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn read_session(
        &self,
        id: WorkoutSessionID,
        student_id: StudentID,
    ) -> Result<WorkoutSession, ReadError> {
        let collections = self.collections.read().await;
        let document = collections
            .workout_sessions
            .get(&*id)
            .filter(|d| d.student_id == *student_id)
            .cloned()
            .ok_or(ReadError::NotFound)?;
        Ok(document.try_into()?)
    }

    async fn find_in_progress(
        &self,
        student_id: StudentID,
    ) -> Result<Option<WorkoutSession>, ReadError> {
        let collections = self.collections.read().await;
        collections
            .workout_sessions
            .values()
            .find(|d| d.student_id == *student_id && d.status == "in-progress")
            .cloned()
            .map(|d| d.try_into().map_err(ReadError::from))
            .transpose()
    }

    async fn read_sessions_for_students(
        &self,
        student_ids: &[StudentID],
    ) -> Result<Vec<WorkoutSession>, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .workout_sessions
            .values()
            .filter(|d| student_ids.iter().any(|id| **id == d.student_id))
            .cloned()
            .map(TryInto::try_into)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn count_completed(
        &self,
        student_id: StudentID,
        plan_id: WorkoutPlanID,
    ) -> Result<u64, ReadError> {
        let collections = self.collections.read().await;
        Ok(collections
            .workout_sessions
            .values()
            .filter(|d| {
                d.student_id == *student_id
                    && d.workout_plan_id == *plan_id
                    && d.status == "completed"
            })
            .count() as u64)
    }

    async fn create_session(
        &self,
        mut session: WorkoutSession,
    ) -> Result<WorkoutSession, CreateError> {
        if session.id.is_nil() {
            session.id = Uuid::new_v4().into();
        }
        let mut collections = self.collections.write().await;
        collections
            .workout_sessions
            .insert(*session.id, WorkoutSessionDocument::from(&session));
        self.persist(&collections)?;
        Ok(session)
    }

    async fn replace_session(&self, session: WorkoutSession) -> Result<WorkoutSession, UpdateError> {
        let mut collections = self.collections.write().await;
        if !collections.workout_sessions.contains_key(&*session.id) {
            return Err(UpdateError::NotFound);
        }
        collections
            .workout_sessions
            .insert(*session.id, WorkoutSessionDocument::from(&session));
        self.persist(&collections)?;
        Ok(session)
    }

    async fn delete_session(&self, id: WorkoutSessionID) -> Result<WorkoutSessionID, DeleteError> {
        let mut collections = self.collections.write().await;
        if collections.workout_sessions.remove(&*id).is_none() {
            return Err(DeleteError::NotFound);
        }
        self.persist(&collections)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use gymtrack_domain::SessionStatus;
    use pretty_assertions::assert_eq;

    use crate::tests::data;

    use super::*;

    #[tokio::test]
    async fn test_create_assigns_id_and_reads_back() {
        let store = DocumentStore::new();
        let mut user = data::user(0, "alice@example.com", "52998224725");
        user.id = UserID::nil();
        let created = store.create_user(user).await.unwrap();
        assert!(!created.id.is_nil());
        assert_eq!(store.read_user(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn test_replace_missing_student_is_not_found() {
        let store = DocumentStore::new();
        assert!(matches!(
            store.replace_student(data::student(1, 1)).await,
            Err(UpdateError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_detach_plan_from_students_reports_modified_count() {
        let store = DocumentStore::new();
        let plan = store.create_plan(data::plan(7, 1)).await.unwrap();
        for id in 1..=3u128 {
            let mut student = data::student(id, id);
            if id < 3 {
                student.enroll(plan.id);
            }
            store.create_student(student).await.unwrap();
        }

        let modified = store.detach_plan_from_students(plan.id).await.unwrap();

        assert_eq!(modified, 2);
        for id in 1..=3u128 {
            let student = store.read_student(id.into()).await.unwrap();
            assert!(!student.enrolled_in(plan.id));
            assert_eq!(student.current_plan_id, None);
        }
    }

    #[tokio::test]
    async fn test_read_session_is_scoped_by_student() {
        let store = DocumentStore::new();
        let session = store
            .create_session(data::completed_session(1, 1, 1, 1))
            .await
            .unwrap();
        assert!(store.read_session(session.id, 1.into()).await.is_ok());
        assert!(matches!(
            store.read_session(session.id, 2.into()).await,
            Err(ReadError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_find_in_progress_ignores_completed_sessions() {
        let store = DocumentStore::new();
        store
            .create_session(data::completed_session(1, 1, 1, 1))
            .await
            .unwrap();
        assert_eq!(store.find_in_progress(1.into()).await.unwrap(), None);

        let mut session = data::completed_session(2, 1, 1, 1);
        session.status = SessionStatus::InProgress;
        session.end_time = None;
        let session = store.create_session(session).await.unwrap();
        assert_eq!(
            store
                .find_in_progress(1.into())
                .await
                .unwrap()
                .map(|s| s.id),
            Some(session.id)
        );
    }

    #[tokio::test]
    async fn test_snapshot_survives_reopen() {
        let path = std::env::temp_dir().join(format!("gymtrack-{}.json", Uuid::new_v4()));

        let store = DocumentStore::open(&path).unwrap();
        let user = store
            .create_user(data::user(1, "alice@example.com", "52998224725"))
            .await
            .unwrap();
        drop(store);

        let reopened = DocumentStore::open(&path).unwrap();
        assert_eq!(reopened.read_user(user.id).await.unwrap(), user);

        std::fs::remove_file(&path).unwrap();
    }
}
