//! Order intent types.
//!
//! The business intent of a payment travels through the gateway as a
//! string-keyed metadata map (Razorpay order notes, PayU udf fields). Inside
//! the service it is a closed tagged union; serialization to the string-keyed
//! form happens only at the gateway boundary so tampering is detected by one
//! field-for-field comparison at verification time.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{msg, AppError, Result};

/// The three purchase flows, carried on the wire as `user_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderFlow {
    StudentPlatformPlan,
    TeacherPlatformPlan,
    StudentTeacherPlan,
}

impl OrderFlow {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderFlow::StudentPlatformPlan => "student_platform_plan",
            OrderFlow::TeacherPlatformPlan => "teacher_platform_plan",
            OrderFlow::StudentTeacherPlan => "student_teacher_plan",
        }
    }

    /// Short form used in gateway receipt strings.
    pub fn abbrev(&self) -> &'static str {
        match self {
            OrderFlow::StudentPlatformPlan => "spp",
            OrderFlow::TeacherPlatformPlan => "tpp",
            OrderFlow::StudentTeacherPlan => "stp",
        }
    }
}

impl FromStr for OrderFlow {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "student_platform_plan" => Ok(OrderFlow::StudentPlatformPlan),
            "teacher_platform_plan" => Ok(OrderFlow::TeacherPlatformPlan),
            "student_teacher_plan" => Ok(OrderFlow::StudentTeacherPlan),
            _ => Err(()),
        }
    }
}

/// Validated business intent of one payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderContext {
    StudentPlatformPlan {
        user_id: String,
        plan_id: String,
    },
    TeacherPlatformPlan {
        user_id: String,
        plan_id: String,
    },
    StudentTeacherPlan {
        user_id: String,
        plan_id: String,
        teacher_id: String,
        referral_code: Option<String>,
    },
}

impl OrderContext {
    /// Build from wire-level parts, enforcing flow-specific requirements
    /// before any side effect (teacher id is mandatory for the third flow).
    pub fn from_parts(
        user_type: &str,
        user_id: &str,
        plan_id: &str,
        teacher_id: Option<&str>,
        referral_code: Option<&str>,
    ) -> Result<Self> {
        let flow = user_type
            .parse::<OrderFlow>()
            .map_err(|_| AppError::BadRequest(msg::INVALID_USER_TYPE.into()))?;

        if user_id.is_empty() || plan_id.is_empty() {
            return Err(AppError::BadRequest(
                "user_id and plan_id are required".into(),
            ));
        }

        let user_id = user_id.to_string();
        let plan_id = plan_id.to_string();

        Ok(match flow {
            OrderFlow::StudentPlatformPlan => OrderContext::StudentPlatformPlan { user_id, plan_id },
            OrderFlow::TeacherPlatformPlan => OrderContext::TeacherPlatformPlan { user_id, plan_id },
            OrderFlow::StudentTeacherPlan => {
                let teacher_id = teacher_id
                    .filter(|t| !t.is_empty())
                    .ok_or_else(|| AppError::BadRequest(msg::TEACHER_ID_REQUIRED.into()))?
                    .to_string();
                OrderContext::StudentTeacherPlan {
                    user_id,
                    plan_id,
                    teacher_id,
                    referral_code: referral_code
                        .map(str::trim)
                        .filter(|c| !c.is_empty())
                        .map(String::from),
                }
            }
        })
    }

    pub fn flow(&self) -> OrderFlow {
        match self {
            OrderContext::StudentPlatformPlan { .. } => OrderFlow::StudentPlatformPlan,
            OrderContext::TeacherPlatformPlan { .. } => OrderFlow::TeacherPlatformPlan,
            OrderContext::StudentTeacherPlan { .. } => OrderFlow::StudentTeacherPlan,
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            OrderContext::StudentPlatformPlan { user_id, .. }
            | OrderContext::TeacherPlatformPlan { user_id, .. }
            | OrderContext::StudentTeacherPlan { user_id, .. } => user_id,
        }
    }

    pub fn plan_id(&self) -> &str {
        match self {
            OrderContext::StudentPlatformPlan { plan_id, .. }
            | OrderContext::TeacherPlatformPlan { plan_id, .. }
            | OrderContext::StudentTeacherPlan { plan_id, .. } => plan_id,
        }
    }

    pub fn teacher_id(&self) -> Option<&str> {
        match self {
            OrderContext::StudentTeacherPlan { teacher_id, .. } => Some(teacher_id),
            _ => None,
        }
    }

    pub fn referral_code(&self) -> Option<&str> {
        match self {
            OrderContext::StudentTeacherPlan { referral_code, .. } => referral_code.as_deref(),
            _ => None,
        }
    }

    /// Serialize to the gateway's string-keyed metadata (Razorpay notes).
    pub fn to_notes(&self) -> BTreeMap<String, String> {
        let mut notes = BTreeMap::new();
        notes.insert("user_id".to_string(), self.user_id().to_string());
        notes.insert("plan_id".to_string(), self.plan_id().to_string());
        notes.insert("user_type".to_string(), self.flow().as_str().to_string());
        if let Some(teacher_id) = self.teacher_id() {
            notes.insert("teacher_id_for_plan".to_string(), teacher_id.to_string());
        }
        if let Some(code) = self.referral_code() {
            notes.insert("referral_code_used".to_string(), code.to_string());
        }
        notes
    }

    /// Decode gateway metadata back into a context. Missing or malformed
    /// fields produce an error the caller maps to a generic verification
    /// failure.
    pub fn from_notes(notes: &BTreeMap<String, String>) -> Result<Self> {
        let get = |key: &str| notes.get(key).map(String::as_str).unwrap_or("");
        Self::from_parts(
            get("user_type"),
            get("user_id"),
            get("plan_id"),
            notes.get("teacher_id_for_plan").map(String::as_str),
            notes.get("referral_code_used").map(String::as_str),
        )
    }

    /// Compare the identity fields against another context. The referral code
    /// is audit metadata, not identity, so it is excluded.
    pub fn matches(&self, other: &OrderContext) -> bool {
        self.flow() == other.flow()
            && self.user_id() == other.user_id()
            && self.plan_id() == other.plan_id()
            && self.teacher_id() == other.teacher_id()
    }
}
