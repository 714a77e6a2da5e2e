//! Backend endpoint paths, relative to the configured base URL.

pub const LOGIN: &str = "/auth/login";
pub const LOGOUT: &str = "/auth/logout";
pub const CURRENT_USER: &str = "/auth/me";
pub const REFRESH_TOKEN: &str = "/auth/refresh-token";
pub const REGISTER: &str = "/auth/register";
pub const FORGOT_PASSWORD: &str = "/auth/forgot-password";
pub const RESET_PASSWORD: &str = "/auth/reset-password";
pub const CHANGE_PASSWORD: &str = "/auth/change-password";
pub const PROFILE: &str = "/auth/profile";

pub const KYC_STATUS: &str = "/kyc/status";
pub const CREDIT_SCORE: &str = "/credit/score";

pub const LOAN_TYPES: &str = "/loans/types";
pub const MY_LOANS: &str = "/loans/my-loans";
pub const APPLY: &str = "/loans/apply";
pub const PAYMENTS: &str = "/payments";

/// Path of a single loan.
#[must_use]
pub fn loan(id: &str) -> String {
    format!("/loans/{id}")
}
