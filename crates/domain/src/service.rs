use std::collections::BTreeSet;

use chrono::Utc;
use log::{debug, error, warn};

use crate::{
    CreateError, DeleteError, Division, Equipment, EquipmentID, EquipmentRepository,
    EquipmentService, Exercise, ExerciseID, ExerciseRepository, ExerciseService, Gym, GymID,
    GymRepository, GymService, Instructor, InstructorID, InstructorRepository, InstructorService,
    Name, PlanWithStats, ProgressEntry, ReadError, SessionPage, SessionStatus, StartSessionError,
    Student, StudentID, StudentRepository, StudentService, UpdateError, User, UserID,
    UserRepository, UserService, WorkoutPlan, WorkoutPlanID, WorkoutPlanRepository,
    WorkoutPlanService, WorkoutSession, WorkoutSessionID, WorkoutSessionRepository,
    WorkoutSessionService, materialize_division, workout_session::ExerciseLog,
};

pub struct Service<R> {
    repository: R,
}

impl<R> Service<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }
}

macro_rules! log_on_error {
    ($func: expr, $action: literal, $entity: literal) => {{
        let result = $func.await;
        if let Err(ref err) = result {
            error!("failed to {} {}: {err}", $action, $entity);
        }
        result
    }};
}

impl<R: UserRepository> UserService for Service<R> {
    async fn get_users(&self) -> Result<Vec<User>, ReadError> {
        log_on_error!(self.repository.read_users(), "get", "users")
    }

    async fn get_user(&self, id: UserID) -> Result<User, ReadError> {
        self.repository.read_user(id).await
    }

    async fn register_user(&self, user: User) -> Result<User, CreateError> {
        let users = self.repository.read_users().await?;
        if users
            .iter()
            .any(|u| u.email == user.email || u.cpf == user.cpf)
        {
            return Err(CreateError::Conflict);
        }
        log_on_error!(self.repository.create_user(user), "register", "user")
    }
}

impl<R: InstructorRepository> InstructorService for Service<R> {
    async fn get_instructors(&self) -> Result<Vec<Instructor>, ReadError> {
        log_on_error!(self.repository.read_instructors(), "get", "instructors")
    }

    async fn get_instructor(&self, id: InstructorID) -> Result<Instructor, ReadError> {
        self.repository.read_instructor(id).await
    }

    async fn instructor_by_user(&self, user_id: UserID) -> Result<Option<Instructor>, ReadError> {
        self.repository.find_instructor_by_user(user_id).await
    }

    async fn create_instructor(&self, instructor: Instructor) -> Result<Instructor, CreateError> {
        if self
            .repository
            .find_instructor_by_user(instructor.user_id)
            .await?
            .is_some()
        {
            return Err(CreateError::Conflict);
        }
        log_on_error!(
            self.repository.create_instructor(instructor),
            "create",
            "instructor"
        )
    }

    async fn update_instructor(&self, instructor: Instructor) -> Result<Instructor, UpdateError> {
        log_on_error!(
            self.repository.replace_instructor(instructor),
            "update",
            "instructor"
        )
    }
}

impl<R: StudentRepository + InstructorRepository + WorkoutPlanRepository> StudentService
    for Service<R>
{
    async fn get_students(&self) -> Result<Vec<Student>, ReadError> {
        log_on_error!(self.repository.read_students(), "get", "students")
    }

    async fn get_student(&self, id: StudentID) -> Result<Student, ReadError> {
        self.repository.read_student(id).await
    }

    async fn student_by_user(&self, user_id: UserID) -> Result<Option<Student>, ReadError> {
        self.repository.find_student_by_user(user_id).await
    }

    async fn create_student(&self, student: Student) -> Result<Student, CreateError> {
        if self
            .repository
            .find_student_by_user(student.user_id)
            .await?
            .is_some()
        {
            return Err(CreateError::Conflict);
        }

        let instructor = match student.instructor_id {
            Some(instructor_id) => {
                let instructor = self
                    .repository
                    .read_instructor(instructor_id)
                    .await
                    .map_err(CreateError::from)?;
                if !instructor.can_add_student() {
                    return Err(CreateError::Conflict);
                }
                Some(instructor)
            }
            None => None,
        };

        let student =
            log_on_error!(self.repository.create_student(student), "create", "student")?;

        if let Some(mut instructor) = instructor {
            instructor.students.insert(student.id);
            self.repository
                .replace_instructor(instructor)
                .await
                .map_err(CreateError::from)?;
        }

        Ok(student)
    }

    async fn update_student(&self, student: Student) -> Result<Student, UpdateError> {
        log_on_error!(self.repository.replace_student(student), "update", "student")
    }

    async fn delete_student(&self, id: StudentID) -> Result<StudentID, DeleteError> {
        let student = self
            .repository
            .read_student(id)
            .await
            .map_err(DeleteError::from)?;

        if let Some(instructor_id) = student.instructor_id {
            match self.repository.read_instructor(instructor_id).await {
                Ok(mut instructor) => {
                    instructor.students.remove(&id);
                    self.repository
                        .replace_instructor(instructor)
                        .await
                        .map_err(DeleteError::from)?;
                }
                Err(err) => warn!("instructor of deleted student missing: {err}"),
            }
        }

        for plan_id in &student.workout_plans {
            match self.repository.read_plan(*plan_id).await {
                Ok(mut plan) => {
                    plan.assigned_students.remove(&id);
                    self.repository
                        .replace_plan(plan)
                        .await
                        .map_err(DeleteError::from)?;
                }
                Err(err) => warn!("plan of deleted student missing: {err}"),
            }
        }

        log_on_error!(self.repository.delete_student(id), "delete", "student")
    }

    async fn add_progress_entry(
        &self,
        id: StudentID,
        entry: ProgressEntry,
    ) -> Result<Student, UpdateError> {
        let mut student = self.repository.read_student(id).await?;
        student.personal_info.current_weight = Some(entry.weight);
        student.progress_history.push(entry);
        log_on_error!(
            self.repository.replace_student(student),
            "record progress for",
            "student"
        )
    }

    async fn set_goal_achieved(
        &self,
        id: StudentID,
        goal_index: usize,
        achieved: bool,
    ) -> Result<Student, UpdateError> {
        let mut student = self.repository.read_student(id).await?;
        let Some(goal) = student.goals.get_mut(goal_index) else {
            return Err(UpdateError::Invalid(format!(
                "invalid goal index {goal_index}"
            )));
        };
        goal.achieved = achieved;
        log_on_error!(
            self.repository.replace_student(student),
            "update goal of",
            "student"
        )
    }
}

impl<R: StudentRepository + WorkoutPlanRepository + WorkoutSessionRepository> WorkoutPlanService
    for Service<R>
{
    async fn get_workout_plans(
        &self,
        instructor_id: InstructorID,
    ) -> Result<Vec<WorkoutPlan>, ReadError> {
        let plans = log_on_error!(self.repository.read_plans(), "get", "workout plans")?;
        Ok(plans
            .into_iter()
            .filter(|p| p.owned_by(instructor_id))
            .collect())
    }

    async fn get_workout_plan(&self, id: WorkoutPlanID) -> Result<WorkoutPlan, ReadError> {
        self.repository.read_plan(id).await
    }

    async fn create_workout_plan(&self, plan: WorkoutPlan) -> Result<WorkoutPlan, CreateError> {
        log_on_error!(self.repository.create_plan(plan), "create", "workout plan")
    }

    async fn assign_plan_to_student(
        &self,
        plan_id: WorkoutPlanID,
        student_id: StudentID,
    ) -> Result<(Student, WorkoutPlan), UpdateError> {
        let mut student = self.repository.read_student(student_id).await?;
        let mut plan = self.repository.read_plan(plan_id).await?;

        // Paired writes, student side first. There is no rollback if the
        // plan-side save fails.
        student.enroll(plan_id);
        let student = self.repository.replace_student(student).await?;

        plan.assigned_students.insert(student_id);
        let plan = log_on_error!(
            self.repository.replace_plan(plan),
            "assign",
            "workout plan"
        )?;

        debug!("assigned plan {} to student {}", *plan.id, *student.id);
        Ok((student, plan))
    }

    async fn unassign_plan_from_student(
        &self,
        plan_id: WorkoutPlanID,
        student_id: StudentID,
    ) -> Result<(Student, WorkoutPlan), UpdateError> {
        let mut plan = self.repository.read_plan(plan_id).await?;
        let mut student = self.repository.read_student(student_id).await?;

        plan.assigned_students.remove(&student_id);
        let plan = self.repository.replace_plan(plan).await?;

        student.withdraw(plan_id);
        let student = log_on_error!(
            self.repository.replace_student(student),
            "unassign",
            "workout plan"
        )?;

        Ok((student, plan))
    }

    async fn update_workout_plan(
        &self,
        instructor_id: InstructorID,
        id: WorkoutPlanID,
        name: Option<Name>,
        description: Option<String>,
        goal: Option<String>,
        divisions: Option<Vec<Division>>,
        assigned_students: Option<BTreeSet<StudentID>>,
    ) -> Result<WorkoutPlan, UpdateError> {
        let mut plan = self.repository.read_plan(id).await?;
        if !plan.owned_by(instructor_id) {
            return Err(UpdateError::NotFound);
        }

        if let Some(name) = name {
            plan.name = name;
        }
        if let Some(description) = description {
            plan.description = Some(description);
        }
        if let Some(goal) = goal {
            plan.goal = Some(goal);
        }
        if let Some(divisions) = divisions {
            plan.divisions = divisions;
        }

        if let Some(roster) = assigned_students {
            self.reconcile_roster(&mut plan, roster).await?;
        }

        log_on_error!(self.repository.replace_plan(plan), "update", "workout plan")
    }

    async fn delete_workout_plan(
        &self,
        instructor_id: InstructorID,
        id: WorkoutPlanID,
    ) -> Result<WorkoutPlanID, DeleteError> {
        let plan = self
            .repository
            .read_plan(id)
            .await
            .map_err(DeleteError::from)?;
        if !plan.owned_by(instructor_id) {
            return Err(DeleteError::NotFound);
        }

        // One multi-document update detaches the plan from every assigned
        // student, regardless of roster size.
        let detached = self
            .repository
            .detach_plan_from_students(id)
            .await
            .map_err(DeleteError::from)?;
        debug!("detached plan {} from {detached} students", *id);

        log_on_error!(self.repository.delete_plan(id), "delete", "workout plan")
    }

    async fn plan_students(&self, plan_id: WorkoutPlanID) -> Result<Vec<Student>, ReadError> {
        let plan = self.repository.read_plan(plan_id).await?;
        let students = self.repository.read_students().await?;
        Ok(students
            .into_iter()
            .filter(|s| plan.assigned_students.contains(&s.id))
            .collect())
    }

    async fn student_plans(&self, student_id: StudentID) -> Result<Vec<PlanWithStats>, ReadError> {
        let student = self.repository.read_student(student_id).await?;
        let mut result = Vec::with_capacity(student.workout_plans.len());
        for plan_id in &student.workout_plans {
            let plan = match self.repository.read_plan(*plan_id).await {
                Ok(plan) => plan,
                Err(ReadError::NotFound) => {
                    warn!("student {} references missing plan {}", *student.id, **plan_id);
                    continue;
                }
                Err(err) => return Err(err),
            };
            let completed_sessions = self
                .repository
                .count_completed(student_id, *plan_id)
                .await?;
            let last_completed = self
                .repository
                .read_sessions(student_id)
                .await?
                .into_iter()
                .filter(|s| {
                    s.workout_plan_id == *plan_id && s.status == SessionStatus::Completed
                })
                .filter_map(|s| s.end_time)
                .max();
            result.push(PlanWithStats {
                plan,
                completed_sessions,
                last_completed,
            });
        }
        Ok(result)
    }
}

impl<R: StudentRepository + WorkoutPlanRepository + WorkoutSessionRepository> Service<R> {
    /// Reconciles a wholesale roster replacement: detaches removed members,
    /// attaches added ones, then overwrites the plan's roster. Students that
    /// vanished between reads are skipped.
    async fn reconcile_roster(
        &self,
        plan: &mut WorkoutPlan,
        roster: BTreeSet<StudentID>,
    ) -> Result<(), UpdateError> {
        let removed = plan
            .assigned_students
            .difference(&roster)
            .copied()
            .collect::<Vec<_>>();
        let added = roster
            .difference(&plan.assigned_students)
            .copied()
            .collect::<Vec<_>>();

        for student_id in removed {
            match self.repository.read_student(student_id).await {
                Ok(mut student) => {
                    student.withdraw(plan.id);
                    self.repository.replace_student(student).await?;
                }
                Err(err) => warn!("removed roster member {} missing: {err}", *student_id),
            }
        }

        for student_id in added {
            match self.repository.read_student(student_id).await {
                Ok(mut student) => {
                    student.enroll(plan.id);
                    self.repository.replace_student(student).await?;
                }
                Err(err) => warn!("added roster member {} missing: {err}", *student_id),
            }
        }

        plan.assigned_students = roster;
        Ok(())
    }
}

impl<R> WorkoutSessionService for Service<R>
where
    R: StudentRepository
        + InstructorRepository
        + WorkoutPlanRepository
        + WorkoutSessionRepository,
{
    async fn start_session(
        &self,
        student_id: StudentID,
        plan_id: WorkoutPlanID,
        division_index: usize,
    ) -> Result<WorkoutSession, StartSessionError> {
        let student = self.repository.read_student(student_id).await?;
        let Some(instructor_id) = student.instructor_id else {
            return Err(StartSessionError::NoInstructor);
        };

        if let Some(existing) = self.repository.find_in_progress(student_id).await? {
            return Err(StartSessionError::AlreadyInProgress {
                session_id: existing.id,
            });
        }

        let plan = self.repository.read_plan(plan_id).await?;
        let Some(division) = plan.division(division_index) else {
            return Err(StartSessionError::NotFound);
        };

        let mut session = WorkoutSession {
            id: WorkoutSessionID::nil(),
            student_id,
            instructor_id,
            workout_plan_id: plan_id,
            workout_name: plan.name.clone(),
            division_name: division.name.clone(),
            division_index,
            exercises: materialize_division(division),
            status: SessionStatus::InProgress,
            start_time: Utc::now(),
            end_time: None,
            student_weight: student.personal_info.current_weight,
            overall_difficulty: None,
            mood: None,
            notes: None,
            instructor_feedback: None,
            totals: Default::default(),
        };
        session.recompute_totals();

        let session = log_on_error!(
            self.repository.create_session(session),
            "start",
            "workout session"
        )?;
        debug!(
            "started session {} for student {} (plan {}, division {division_index})",
            *session.id, *student_id, *plan_id
        );
        Ok(session)
    }

    async fn active_session(
        &self,
        student_id: StudentID,
    ) -> Result<Option<WorkoutSession>, ReadError> {
        self.repository.find_in_progress(student_id).await
    }

    async fn update_session(
        &self,
        student_id: StudentID,
        session_id: WorkoutSessionID,
        exercises: Option<Vec<ExerciseLog>>,
        notes: Option<String>,
    ) -> Result<WorkoutSession, UpdateError> {
        let mut session = self.repository.read_session(session_id, student_id).await?;
        if !session.is_in_progress() {
            return Err(UpdateError::Conflict);
        }

        if let Some(exercises) = exercises {
            session.exercises = exercises;
        }
        if let Some(notes) = notes {
            session.notes = Some(notes);
        }
        session.recompute_totals();

        log_on_error!(
            self.repository.replace_session(session),
            "update",
            "workout session"
        )
    }

    async fn skip_exercise(
        &self,
        student_id: StudentID,
        session_id: WorkoutSessionID,
        exercise_index: usize,
        reason: Option<String>,
    ) -> Result<WorkoutSession, UpdateError> {
        let mut session = self.repository.read_session(session_id, student_id).await?;
        if !session.is_in_progress() {
            return Err(UpdateError::Conflict);
        }

        let Some(exercise) = session.exercises.get_mut(exercise_index) else {
            return Err(UpdateError::Invalid(format!(
                "invalid exercise index {exercise_index}"
            )));
        };
        exercise.skipped = true;
        exercise.skip_reason = Some(reason.unwrap_or_else(|| String::from("not specified")));
        exercise.completed = false;
        session.recompute_totals();

        log_on_error!(
            self.repository.replace_session(session),
            "skip exercise in",
            "workout session"
        )
    }

    async fn complete_session(
        &self,
        student_id: StudentID,
        session_id: WorkoutSessionID,
        exercises: Vec<ExerciseLog>,
        notes: Option<String>,
    ) -> Result<WorkoutSession, UpdateError> {
        let mut session = self.repository.read_session(session_id, student_id).await?;
        if !session.is_in_progress() {
            return Err(UpdateError::Conflict);
        }

        session.exercises = exercises;
        session.status = SessionStatus::Completed;
        session.end_time = Some(Utc::now());
        if let Some(notes) = notes {
            session.notes = Some(notes);
        }
        session.recompute_totals();

        let session = log_on_error!(
            self.repository.replace_session(session),
            "complete",
            "workout session"
        )?;
        debug!("completed session {} for student {}", *session.id, *student_id);
        Ok(session)
    }

    async fn cancel_session(
        &self,
        student_id: StudentID,
        session_id: WorkoutSessionID,
    ) -> Result<WorkoutSessionID, UpdateError> {
        let session = self.repository.read_session(session_id, student_id).await?;
        if !session.is_in_progress() {
            return Err(UpdateError::Conflict);
        }

        // Cancelled sessions are removed, not archived.
        self.repository
            .delete_session(session_id)
            .await
            .map_err(|err| match err {
                DeleteError::NotFound => UpdateError::NotFound,
                DeleteError::Storage(storage) => UpdateError::Storage(storage),
                DeleteError::Other(other) => UpdateError::Other(other),
            })
    }

    async fn session_history(
        &self,
        student_id: StudentID,
        page: usize,
        per_page: usize,
    ) -> Result<SessionPage, ReadError> {
        let mut sessions = self
            .repository
            .read_sessions(student_id)
            .await?
            .into_iter()
            .filter(|s| s.status == SessionStatus::Completed)
            .collect::<Vec<_>>();
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));

        let total = sessions.len() as u64;
        let per_page = per_page.max(1);
        let page = page.max(1);
        let pages = total.div_ceil(per_page as u64);
        let sessions = sessions
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Ok(SessionPage {
            sessions,
            page,
            per_page,
            total,
            pages,
        })
    }

    async fn student_sessions(
        &self,
        student_id: StudentID,
    ) -> Result<Vec<WorkoutSession>, ReadError> {
        let mut sessions = log_on_error!(
            self.repository.read_sessions(student_id),
            "get",
            "workout sessions"
        )?;
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(sessions)
    }

    async fn instructor_sessions(
        &self,
        instructor_id: InstructorID,
    ) -> Result<Vec<WorkoutSession>, ReadError> {
        let instructor = self.repository.read_instructor(instructor_id).await?;
        let student_ids = instructor.students.iter().copied().collect::<Vec<_>>();
        let mut sessions = self
            .repository
            .read_sessions_for_students(&student_ids)
            .await?;
        sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(sessions)
    }
}

impl<R: GymRepository> GymService for Service<R> {
    async fn get_gyms(&self) -> Result<Vec<Gym>, ReadError> {
        log_on_error!(self.repository.read_gyms(), "get", "gyms")
    }

    async fn get_gym(&self, id: GymID) -> Result<Gym, ReadError> {
        self.repository.read_gym(id).await
    }

    async fn create_gym(&self, gym: Gym) -> Result<Gym, CreateError> {
        log_on_error!(self.repository.create_gym(gym), "create", "gym")
    }

    async fn update_gym(&self, gym: Gym) -> Result<Gym, UpdateError> {
        log_on_error!(self.repository.replace_gym(gym), "update", "gym")
    }

    async fn delete_gym(&self, id: GymID) -> Result<GymID, DeleteError> {
        log_on_error!(self.repository.delete_gym(id), "delete", "gym")
    }
}

impl<R: EquipmentRepository> EquipmentService for Service<R> {
    async fn get_equipment(
        &self,
        instructor_id: InstructorID,
    ) -> Result<Vec<Equipment>, ReadError> {
        let equipment = log_on_error!(self.repository.read_equipment(), "get", "equipment")?;
        Ok(equipment
            .into_iter()
            .filter(|e| e.instructor_id == instructor_id)
            .collect())
    }

    async fn get_equipment_item(&self, id: EquipmentID) -> Result<Equipment, ReadError> {
        self.repository.read_equipment_item(id).await
    }

    async fn create_equipment(&self, equipment: Equipment) -> Result<Equipment, CreateError> {
        log_on_error!(
            self.repository.create_equipment(equipment),
            "create",
            "equipment"
        )
    }

    async fn update_equipment(&self, equipment: Equipment) -> Result<Equipment, UpdateError> {
        log_on_error!(
            self.repository.replace_equipment(equipment),
            "update",
            "equipment"
        )
    }

    async fn delete_equipment(&self, id: EquipmentID) -> Result<EquipmentID, DeleteError> {
        log_on_error!(self.repository.delete_equipment(id), "delete", "equipment")
    }
}

impl<R: ExerciseRepository> ExerciseService for Service<R> {
    async fn get_exercises(&self, instructor_id: InstructorID) -> Result<Vec<Exercise>, ReadError> {
        let exercises = log_on_error!(self.repository.read_exercises(), "get", "exercises")?;
        Ok(exercises
            .into_iter()
            .filter(|e| e.instructor_id == instructor_id)
            .collect())
    }

    async fn get_exercise(&self, id: ExerciseID) -> Result<Exercise, ReadError> {
        self.repository.read_exercise(id).await
    }

    async fn create_exercise(&self, exercise: Exercise) -> Result<Exercise, CreateError> {
        log_on_error!(
            self.repository.create_exercise(exercise),
            "create",
            "exercise"
        )
    }

    async fn update_exercise(&self, exercise: Exercise) -> Result<Exercise, UpdateError> {
        log_on_error!(
            self.repository.replace_exercise(exercise),
            "update",
            "exercise"
        )
    }

    async fn delete_exercise(&self, id: ExerciseID) -> Result<ExerciseID, DeleteError> {
        log_on_error!(self.repository.delete_exercise(id), "delete", "exercise")
    }
}
