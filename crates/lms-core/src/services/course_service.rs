// ============================================================================
// LMS Core - Course Service
// File: crates/lms-core/src/services/course_service.rs
// ============================================================================
//! Course authoring, review, enrollment, and bulk assignment

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    AdminStats, AssignmentOutcome, Caller, Course, CourseAssignment, CourseStatus, Enrollment,
    EnrollmentSource, InstructorStats, Module, UserRole, ValidityUnit,
};
use crate::error::DomainError;
use crate::repositories::{CourseRepository, EnrollmentRepository, UserRepository};
use crate::services::GroupService;

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourse {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub thumbnail_url: Option<String>,
    pub validity_value: Option<i32>,
    pub validity_unit: Option<ValidityUnit>,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewModule {
    pub title: String,
    pub notes: Option<String>,
    pub position: Option<i32>,
}

pub struct CourseService {
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
    users: Arc<dyn UserRepository>,
    groups: Arc<GroupService>,
}

impl CourseService {
    pub fn new(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
        users: Arc<dyn UserRepository>,
        groups: Arc<GroupService>,
    ) -> Self {
        Self {
            courses,
            enrollments,
            users,
            groups,
        }
    }

    pub async fn get_course(&self, id: &Uuid) -> Result<Course, DomainError> {
        self.courses
            .find_by_id(id)
            .await?
            .ok_or(DomainError::CourseNotFound(*id))
    }

    pub async fn create_course(&self, instructor: &Caller, input: NewCourse) -> Result<Course, DomainError> {
        let course = Course::new(
            instructor.user_id,
            input.title,
            input.description,
            input.category,
            input.difficulty,
            input.thumbnail_url,
        )?
        .with_validity(input.validity_value, input.validity_unit, input.expires_at)?;
        let created = self.courses.create(&course).await?;
        info!("Course created: {} by instructor {}", created.id, instructor.user_id);
        Ok(created)
    }

    /// Appends a module to a course owned by the caller.
    pub async fn add_module(
        &self,
        instructor: &Caller,
        course_id: &Uuid,
        input: NewModule,
    ) -> Result<Module, DomainError> {
        let course = self.get_course(course_id).await?;
        if !course.is_owned_by(instructor.user_id) {
            warn!("Instructor {} tried to edit course {}", instructor.user_id, course.id);
            return Err(DomainError::Forbidden("only the course owner can add modules".into()));
        }

        let position = match input.position {
            Some(position) => position,
            None => i32::try_from(self.courses.count_modules(&course.id).await? + 1)
                .map_err(|_| DomainError::validation("Too many modules"))?,
        };
        let module = Module::new(course.id, input.title, input.notes, position)?;
        let created = self.courses.add_module(&module).await?;
        info!("Module {} added to course {}", created.id, course.id);
        Ok(created)
    }

    pub async fn list_instructor_courses(&self, instructor: &Caller) -> Result<Vec<Course>, DomainError> {
        self.courses.list_by_instructor(&instructor.user_id).await
    }

    pub async fn instructor_stats(&self, instructor: &Caller) -> Result<InstructorStats, DomainError> {
        Ok(InstructorStats {
            total_courses: self.courses.count_by_instructor(&instructor.user_id).await?,
            total_students: self
                .enrollments
                .count_students_for_instructor(&instructor.user_id)
                .await?,
        })
    }

    pub async fn list_courses(&self, status: Option<CourseStatus>) -> Result<Vec<Course>, DomainError> {
        self.courses.list(status).await
    }

    /// Approves or rejects a course.
    pub async fn review_course(&self, id: &Uuid, status: CourseStatus) -> Result<Course, DomainError> {
        if status == CourseStatus::Pending {
            return Err(DomainError::validation("A review must approve or reject the course"));
        }
        let course = self
            .courses
            .update_status(id, status)
            .await?
            .ok_or(DomainError::CourseNotFound(*id))?;
        info!("Course {} marked {}", course.id, status.as_str());
        Ok(course)
    }

    pub async fn explore(&self) -> Result<Vec<Course>, DomainError> {
        self.courses.list(Some(CourseStatus::Approved)).await
    }

    pub async fn my_courses(&self, student: &Caller) -> Result<Vec<Course>, DomainError> {
        self.enrollments.list_courses_for_student(&student.user_id).await
    }

    pub async fn enroll(&self, student: &Caller, course_id: &Uuid) -> Result<Enrollment, DomainError> {
        let course = self.get_course(course_id).await?;
        if !course.is_visible() {
            return Err(DomainError::validation("Only approved courses accept enrollments"));
        }

        let enrollment = Enrollment::new(student.user_id, course.id, EnrollmentSource::SelfService);
        if !self.enrollments.enroll(&enrollment).await? {
            return Err(DomainError::AlreadyEnrolled {
                student_id: student.user_id,
                course_id: course.id,
            });
        }
        info!("Student {} enrolled in course {}", student.user_id, course.id);
        Ok(enrollment)
    }

    pub async fn assign_courses(&self, assignment: CourseAssignment) -> Result<AssignmentOutcome, DomainError> {
        self.assign_courses_on(assignment, lms_shared::today_utc()).await
    }

    /// Enrolls the explicit students plus every current member of the
    /// groups in every course. Existing enrollments are left as they are.
    pub async fn assign_courses_on(
        &self,
        assignment: CourseAssignment,
        today: NaiveDate,
    ) -> Result<AssignmentOutcome, DomainError> {
        let course_ids = dedup(&assignment.course_ids);
        let group_ids = dedup(&assignment.group_ids);
        let explicit_students = dedup(&assignment.student_ids);

        if course_ids.is_empty() || (group_ids.is_empty() && explicit_students.is_empty()) {
            return Err(DomainError::validation(
                "Select at least one group or student and one course",
            ));
        }

        let courses = self.courses.find_many(&course_ids).await?;
        for id in &course_ids {
            match courses.iter().find(|c| c.id == *id) {
                None => return Err(DomainError::CourseNotFound(*id)),
                Some(course) if !course.is_visible() => {
                    return Err(DomainError::validation(format!(
                        "Course '{}' is not approved",
                        course.title
                    )))
                }
                Some(_) => {}
            }
        }

        let mut targets: BTreeSet<Uuid> = BTreeSet::new();
        if !explicit_students.is_empty() {
            let users = self.users.find_many(&explicit_students).await?;
            for id in &explicit_students {
                match users.iter().find(|u| u.id == *id) {
                    None => return Err(DomainError::UserNotFound(*id)),
                    Some(user) if user.role != UserRole::Student => {
                        return Err(DomainError::validation("Courses can only be assigned to students"))
                    }
                    Some(_) => {
                        targets.insert(*id);
                    }
                }
            }
        }

        for group_id in &group_ids {
            let group = self.groups.get_group(group_id).await?;
            targets.extend(self.groups.current_member_ids(&group, today).await?);
        }

        let students: Vec<Uuid> = targets.into_iter().collect();
        let new_enrollments = if students.is_empty() {
            0
        } else {
            self.enrollments
                .enroll_many(&students, &course_ids, EnrollmentSource::Assigned)
                .await?
        };

        info!(
            "Assigned {} course(s) to {} student(s), {} new enrollment(s)",
            course_ids.len(),
            students.len(),
            new_enrollments
        );
        Ok(AssignmentOutcome {
            students: students.len(),
            courses: course_ids.len(),
            new_enrollments,
        })
    }

    pub async fn dashboard_stats(&self) -> Result<AdminStats, DomainError> {
        Ok(AdminStats {
            total_students: self.users.count_by_role(UserRole::Student).await?,
            total_instructors: self.users.count_by_role(UserRole::Instructor).await?,
            total_courses: self.courses.count(None).await?,
            pending_courses: self.courses.count(Some(CourseStatus::Pending)).await?,
            total_groups: self.groups.count_groups().await?,
        })
    }
}

/// Order-preserving de-duplication.
fn dedup(ids: &[Uuid]) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}
