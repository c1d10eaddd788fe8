use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Area {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Member {
    pub id: i32,
    pub name: String,
    pub photo: Option<String>,
    pub active: bool,
    pub area: Option<String>,
}

/// Active member as offered to selection controls, which expect string ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberOption {
    pub id: String,
    pub name: String,
    pub photo: Option<String>,
    pub area: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedMember {
    pub id: String,
    pub name: String,
    pub area: String,
    pub photo: Option<String>,
}

impl From<MemberOption> for SelectedMember {
    fn from(option: MemberOption) -> Self {
        Self {
            id: option.id,
            name: option.name,
            area: option.area,
            photo: option.photo,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Cycle {
    pub id: i32,
    pub name: String,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct MemberCycleScore {
    pub member_id: i32,
    pub member_name: String,
    pub area: String,
    pub average_nota: f64,
    pub evaluation_count: i64,
    pub has_report: bool,
}

#[derive(Debug, Clone)]
pub struct CriterionGrade {
    pub criterion: String,
    pub nota: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EvaluationDetail {
    pub member: Member,
    pub cycle: Cycle,
    pub grades: Vec<CriterionGrade>,
    pub report: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ThermometerPoint {
    pub cycle_id: i32,
    pub cycle_name: String,
    pub starts_on: NaiveDate,
    pub average_nota: f64,
    pub evaluation_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Rising,
    Falling,
    Steady,
}

#[derive(Debug, Clone)]
pub struct ThermometerReading {
    pub weighted_nota: f64,
    pub latest_nota: f64,
    pub trend: Trend,
    pub border_color: &'static str,
    pub cycle_count: usize,
}

#[derive(Debug, Clone)]
pub struct SelectionProcess {
    pub id: i32,
    pub name: String,
    pub year: i32,
}

#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub course: String,
}

#[derive(Debug, Clone)]
pub struct Exam {
    pub id: i32,
    pub process_id: i32,
    pub title: String,
    pub instructions: String,
}

#[derive(Debug, Clone)]
pub struct ExamQuestion {
    pub position: i32,
    pub statement: String,
    pub max_score: f64,
}

#[derive(Debug, Clone)]
pub struct ExamDetail {
    pub exam: Exam,
    pub questions: Vec<ExamQuestion>,
}

#[derive(Debug, Clone)]
pub struct ResultDetail {
    pub id: i32,
    pub exam: Exam,
    pub candidate: Candidate,
    pub score: f64,
    pub max_score: f64,
    pub notes: String,
}
