//! Static platform-plan catalog.
//!
//! Platform plans (what students and teachers buy from the platform itself)
//! are a fixed product list, not store data. Teacher content plans are the
//! dynamic, per-teacher counterpart and live in the `teacher_plans` table.

/// A platform plan sold to students.
#[derive(Debug, Clone, Copy)]
pub struct StudentPlatformPlan {
    pub id: &'static str,
    pub name: &'static str,
    /// Price in major units (rupees).
    pub price: f64,
}

/// A platform plan sold to teachers; grants a content-plan quota.
#[derive(Debug, Clone, Copy)]
pub struct TeacherPlatformPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: f64,
    pub max_content_plans: i64,
}

pub const STUDENT_PLATFORM_PLANS: &[StudentPlatformPlan] = &[
    StudentPlatformPlan {
        id: "Dpp",
        name: "Daily Practice Problems",
        price: 499.0,
    },
    StudentPlatformPlan {
        id: "TestSeries",
        name: "Full Test Series",
        price: 999.0,
    },
    StudentPlatformPlan {
        id: "Combo",
        name: "DPP + Test Series Combo",
        price: 1299.0,
    },
];

pub const TEACHER_PLATFORM_PLANS: &[TeacherPlatformPlan] = &[
    TeacherPlatformPlan {
        id: "Starter",
        name: "Starter",
        price: 1999.0,
        max_content_plans: 5,
    },
    TeacherPlatformPlan {
        id: "Pro",
        name: "Pro",
        price: 4999.0,
        max_content_plans: 25,
    },
    TeacherPlatformPlan {
        id: "Institute",
        name: "Institute",
        price: 9999.0,
        max_content_plans: 200,
    },
];

pub fn student_platform_plan(id: &str) -> Option<&'static StudentPlatformPlan> {
    STUDENT_PLATFORM_PLANS.iter().find(|p| p.id == id)
}

pub fn teacher_platform_plan(id: &str) -> Option<&'static TeacherPlatformPlan> {
    TEACHER_PLATFORM_PLANS.iter().find(|p| p.id == id)
}
