use chrono::NaiveDateTime;
use diesel::prelude::*;
use uuid::Uuid;

use crate::schema::*;

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = interns)]
pub struct Intern {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub college: String,
    pub course: String,
    pub year_of_study: String,
    pub domain: Option<String>,
    pub skills: serde_json::Value,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub profile_image: Option<String>,
    pub is_paid: bool,
    pub plan_type: String,
    pub plan_expiry: Option<NaiveDateTime>,
    pub job_credits: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = interns)]
pub struct NewIntern {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub college: String,
    pub course: String,
    pub year_of_study: String,
    pub domain: Option<String>,
    pub skills: serde_json::Value,
    pub resume_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub profile_image: Option<String>,
    pub plan_type: String,
    pub job_credits: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = staff)]
pub struct Staff {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: String,
    pub experience: Option<String>,
    pub domain: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = staff)]
pub struct NewStaff {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: String,
    pub experience: Option<String>,
    pub domain: Option<String>,
    pub linkedin_url: Option<String>,
    pub github_url: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = job_posts)]
pub struct JobPost {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub required_skills: serde_json::Value,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub work_mode: String,
    pub job_type: String,
    pub status: String,
    pub is_active: bool,
    pub custom_fields: serde_json::Value,
    pub applicants_count: i32,
    pub total_vacancies: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = job_posts)]
pub struct NewJobPost {
    pub id: Uuid,
    pub title: String,
    pub company_name: String,
    pub description: String,
    pub required_skills: serde_json::Value,
    pub salary_min: Option<i32>,
    pub salary_max: Option<i32>,
    pub work_mode: String,
    pub job_type: String,
    pub status: String,
    pub is_active: bool,
    pub custom_fields: serde_json::Value,
    pub total_vacancies: i32,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = job_applications)]
#[diesel(belongs_to(JobPost, foreign_key = job_id))]
#[diesel(belongs_to(Intern, foreign_key = applicant_id))]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub resume: serde_json::Value,
    pub custom_field_answers: serde_json::Value,
    pub status: String,
    pub applied_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = job_applications)]
pub struct NewJobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applicant_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    pub resume: serde_json::Value,
    pub custom_field_answers: serde_json::Value,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = payment_records)]
#[diesel(belongs_to(Intern, foreign_key = intern_id))]
pub struct PaymentRecord {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub amount_paise: i64,
    pub currency: String,
    pub order_ref: String,
    pub payment_ref: String,
    pub plan_type: String,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = payment_records)]
pub struct NewPaymentRecord {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub amount_paise: i64,
    pub currency: String,
    pub order_ref: String,
    pub payment_ref: String,
    pub plan_type: String,
    pub status: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = credit_events)]
#[diesel(belongs_to(Intern, foreign_key = intern_id))]
pub struct CreditEvent {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub action: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = credit_events)]
pub struct NewCreditEvent {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub action: String,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations)]
#[diesel(table_name = feedback_entries)]
#[diesel(belongs_to(Intern, foreign_key = intern_id))]
pub struct FeedbackEntry {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub source: String,
    pub comment: String,
    pub rating: i32,
    pub strengths: serde_json::Value,
    pub areas_for_improvement: serde_json::Value,
    pub improvement_suggestions: String,
    pub actionable_items: serde_json::Value,
    pub follow_up_required: bool,
    pub sentiment: String,
    pub given_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = feedback_entries)]
pub struct NewFeedbackEntry {
    pub id: Uuid,
    pub intern_id: Uuid,
    pub source: String,
    pub comment: String,
    pub rating: i32,
    pub strengths: serde_json::Value,
    pub areas_for_improvement: serde_json::Value,
    pub improvement_suggestions: String,
    pub actionable_items: serde_json::Value,
    pub follow_up_required: bool,
    pub sentiment: String,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = study_materials)]
pub struct StudyMaterial {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub file_url: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = study_materials)]
pub struct NewStudyMaterial {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub file_url: String,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = video_lectures)]
pub struct VideoLecture {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub video_url: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = video_lectures)]
pub struct NewVideoLecture {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub thumbnail_url: Option<String>,
    pub duration: Option<String>,
    pub video_url: String,
}

#[derive(Debug, Clone, Queryable, Identifiable)]
#[diesel(table_name = live_classes)]
pub struct LiveClass {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub class_type: String,
    pub meeting_link: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub thumbnail_url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = live_classes)]
pub struct NewLiveClass {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub class_type: String,
    pub meeting_link: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub thumbnail_url: Option<String>,
}
