//! 역할 정의와 역할 기반 접근 판단

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use super::authenticated_user::Principal;

/// 사용자 역할
///
/// 고정된 열거형이며 저장/토큰에는 snake_case 문자열로 기록됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// 모든 역할 검사를 우회하는 최상위 관리자
    SuperAdmin,
    Admin,
    HrAdmin,
    SchoolAdmin,
    Recruiter,
    Talent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::HrAdmin => "hr_admin",
            Role::SchoolAdmin => "school_admin",
            Role::Recruiter => "recruiter",
            Role::Talent => "talent",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "hr_admin" => Ok(Role::HrAdmin),
            "school_admin" => Ok(Role::SchoolAdmin),
            "recruiter" => Ok(Role::Recruiter),
            "talent" => Ok(Role::Talent),
            _ => Err(format!("Unknown role: {}", s)),
        }
    }
}

/// 역할 기반 접근 판단
///
/// - `require_all == true`: `allowed`의 모든 역할을 보유해야 허용 (AND)
/// - `require_all == false`: `allowed` 중 하나라도 보유하면 허용 (OR)
/// - 슈퍼 관리자는 항상 허용
/// - `allowed`가 비어 있으면 슈퍼 관리자만 허용
pub fn authorize(principal: &Principal, allowed: &[Role], require_all: bool) -> bool {
    if principal.is_super_admin() {
        return true;
    }

    if allowed.is_empty() {
        return false;
    }

    if require_all {
        allowed.iter().all(|role| principal.has_role(*role))
    } else {
        allowed.iter().any(|role| principal.has_role(*role))
    }
}

/// 라우트/스코프에 요구되는 역할 정보
#[derive(Debug, Clone, PartialEq)]
pub struct RoleRequirement {
    pub allowed: Vec<Role>,
    pub require_all: bool,
}

impl RoleRequirement {
    /// 여러 역할 중 하나라도 있으면 허용 (OR 조건)
    pub fn any(roles: &[Role]) -> Self {
        Self { allowed: roles.to_vec(), require_all: false }
    }

    /// 모든 역할을 보유해야 허용 (AND 조건)
    pub fn all(roles: &[Role]) -> Self {
        Self { allowed: roles.to_vec(), require_all: true }
    }

    /// 슈퍼 관리자 전용
    pub fn super_admin_only() -> Self {
        Self { allowed: Vec::new(), require_all: false }
    }

    pub fn is_satisfied(&self, principal: &Principal) -> bool {
        authorize(principal, &self.allowed, self.require_all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(roles: &[Role]) -> Principal {
        Principal { id: "64b7f0c2a1b2c3d4e5f60718".to_string(), roles: roles.to_vec() }
    }

    #[test]
    fn test_any_requires_intersection() {
        let talent = principal(&[Role::Talent]);

        assert!(!authorize(&talent, &[Role::SuperAdmin, Role::HrAdmin], false));
        assert!(authorize(&talent, &[Role::HrAdmin, Role::Talent], false));
    }

    #[test]
    fn test_super_admin_bypasses_everything() {
        let root = principal(&[Role::SuperAdmin]);

        assert!(authorize(&root, &[Role::HrAdmin], false));
        assert!(authorize(&root, &[Role::HrAdmin, Role::SchoolAdmin], true));
        assert!(authorize(&root, &[], false));
    }

    #[test]
    fn test_require_all_is_conjunction() {
        let hr = principal(&[Role::HrAdmin, Role::Talent]);

        assert!(authorize(&hr, &[Role::HrAdmin, Role::Talent], true));
        assert!(!authorize(&hr, &[Role::HrAdmin, Role::Admin], true));
        // 하나만 일치해도 OR 조건에서는 허용
        assert!(authorize(&hr, &[Role::HrAdmin, Role::Admin], false));
    }

    #[test]
    fn test_empty_allowed_set_only_admits_super_admin() {
        let admin = principal(&[Role::Admin]);

        assert!(!authorize(&admin, &[], false));
        assert!(!authorize(&admin, &[], true));
        assert!(!RoleRequirement::super_admin_only().is_satisfied(&admin));
    }

    #[test]
    fn test_role_string_roundtrip() {
        for role in [Role::SuperAdmin, Role::Admin, Role::HrAdmin, Role::SchoolAdmin, Role::Recruiter, Role::Talent] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            assert_eq!(serde_json::to_string(&role).unwrap(), format!("\"{}\"", role));
        }
        assert!("owner".parse::<Role>().is_err());
    }
}
