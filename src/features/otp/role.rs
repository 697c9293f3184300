//! Per-role endpoint table. One page component serves every role; only the
//! `OtpFlow` it is handed differs.

/// Account roles that verify their email with a one-time code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Student,
    Faculty,
}

/// Endpoints and routes the OTP page is parameterized by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OtpFlow {
    pub role: Role,
    pub label: &'static str,
    pub verify_path: &'static str,
    pub resend_path: &'static str,
    pub login_route: &'static str,
}

const STUDENT_FLOW: OtpFlow = OtpFlow {
    role: Role::Student,
    label: "Student",
    verify_path: "/api/student/otpverify",
    resend_path: "/api/student/resend-otp",
    login_route: "/student/login",
};

const FACULTY_FLOW: OtpFlow = OtpFlow {
    role: Role::Faculty,
    label: "Faculty",
    verify_path: "/api/faculty/otpverify",
    resend_path: "/api/faculty/resend-otp",
    login_route: "/faculty/login",
};

impl Role {
    /// Parses the role segment of `/{role}/verify-otp`.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_lowercase().as_str() {
            "student" => Some(Self::Student),
            "faculty" => Some(Self::Faculty),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Faculty => "faculty",
        }
    }

    pub fn flow(self) -> OtpFlow {
        match self {
            Self::Student => STUDENT_FLOW,
            Self::Faculty => FACULTY_FLOW,
        }
    }
}
