use log::debug;
use serde::Deserialize;

use crate::error_handling::types::DataError;
use crate::models::{Module, ProficiencyLevel, ProgressBook, Role, User};
use crate::storage::{Collection, Store};

/// Filter value meaning "no constraint".
pub const ALL: &str = "all";

/// Search term plus optional filters. Missing, empty and `"all"` filter
/// values impose no constraint; present filters combine with AND. The term
/// is always a literal substring, so `"all"` there matches "Allison".
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UserQuery {
    pub term: Option<String>,
    pub role: Option<String>,
    pub level: Option<String>,
    pub module: Option<String>,
}

impl UserQuery {
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = Some(term.into());
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != ALL)
}

/// Non-admin users matching `query`, in collection order.
///
/// Role and level values that do not name a known role or level are
/// rejected as `Malformed`. An unknown module id is not an error and simply
/// matches no teacher.
pub fn search_users(store: &Store, query: &UserQuery) -> Result<Vec<User>, DataError> {
    let role = active(&query.role)
        .map(|r| Role::parse(r).ok_or_else(|| DataError::Malformed(format!("unknown role '{}'", r))))
        .transpose()?;
    let level = active(&query.level)
        .map(|l| ProficiencyLevel::parse(l).ok_or_else(|| DataError::Malformed(format!("unknown level '{}'", l))))
        .transpose()?;
    let term = query
        .term
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let users: Vec<User> = store.read(Collection::Users)?;

    let progress: Option<ProgressBook> = match level {
        Some(_) => Some(store.read(Collection::StudentProgress)?),
        None => None,
    };
    let module_teachers: Option<Vec<String>> = match active(&query.module) {
        Some(module_id) => {
            let modules: Vec<Module> = store.read(Collection::Modules)?;
            Some(
                modules
                    .into_iter()
                    .find(|m| m.id == module_id)
                    .map(|m| m.assigned_teacher_ids)
                    .unwrap_or_default(),
            )
        }
        None => None,
    };

    let matches: Vec<User> = users
        .into_iter()
        .filter(|u| u.role != Role::Admin)
        .filter(|u| match &term {
            Some(t) => u.display_name.to_lowercase().contains(t) || u.email.to_lowercase().contains(t),
            None => true,
        })
        .filter(|u| role.map_or(true, |r| u.role == r))
        .filter(|u| match (level, &progress) {
            (Some(wanted), Some(book)) => {
                u.is_student() && book.get(&u.id).map_or(false, |p| p.level == wanted)
            }
            _ => true,
        })
        .filter(|u| match &module_teachers {
            Some(ids) => u.is_teacher() && ids.contains(&u.id),
            None => true,
        })
        .collect();

    debug!("User search {:?} matched {} user(s)", query, matches.len());
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentProgress;
    use crate::seeding::catalogue;
    use crate::test_support::{failing_store, user};
    use chrono::Utc;

    fn directory() -> Store {
        let store = Store::in_memory();
        let now = Utc::now();
        let mut ana = user("s1", Role::Student, now);
        ana.display_name = "Ana Silva".into();
        let mut ben = user("s2", Role::Student, now);
        ben.display_name = "Ben Carter".into();
        ben.email = "ben@school.test".into();
        let cleo = user("s3", Role::Student, now);
        let mut amira = user("teacher-001", Role::Teacher, now);
        amira.display_name = "Amira Haddad".into();
        let lucas = user("teacher-002", Role::Teacher, now);
        let mut admin = user("admin-001", Role::Admin, now);
        admin.display_name = "Ana Admin".into();
        store
            .write(Collection::Users, &vec![ana, ben, cleo, amira, lucas, admin])
            .unwrap();

        let mut book = ProgressBook::new();
        let mut advanced = StudentProgress::new("s1");
        advanced.level = ProficiencyLevel::Advanced;
        book.insert("s1".into(), advanced);
        let mut beginner = StudentProgress::new("s2");
        beginner.level = ProficiencyLevel::Beginner;
        book.insert("s2".into(), beginner);
        store.write(Collection::StudentProgress, &book).unwrap();
        store
            .write(Collection::Modules, &catalogue::baseline_modules())
            .unwrap();
        store
    }

    fn ids(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_lists_everyone_but_admins() {
        let store = directory();
        let found = search_users(&store, &UserQuery::default()).unwrap();
        assert_eq!(ids(&found), vec!["s1", "s2", "s3", "teacher-001", "teacher-002"]);
    }

    #[test]
    fn test_term_matches_name_or_email_case_insensitively() {
        let store = directory();
        let found = search_users(&store, &UserQuery::default().term("ANA")).unwrap();
        assert_eq!(ids(&found), vec!["s1"]);
        let found = search_users(&store, &UserQuery::default().term("school.TEST")).unwrap();
        assert_eq!(ids(&found), vec!["s2"]);
    }

    #[test]
    fn test_all_as_term_is_a_literal_substring() {
        let store = directory();
        store
            .update(Collection::Users, |users: &mut Vec<User>| {
                users[0].display_name = "Allison Park".into();
                Ok::<_, DataError>(())
            })
            .unwrap();
        let found = search_users(&store, &UserQuery::default().term("all")).unwrap();
        assert_eq!(ids(&found), vec!["s1"]);
        let found = search_users(&store, &UserQuery::default().term("ALL").role("all")).unwrap();
        assert_eq!(ids(&found), vec!["s1"]);
    }

    #[test]
    fn test_role_and_level_combine() {
        let store = directory();
        let query = UserQuery::default().term("").role("student").level("Advanced");
        let found = search_users(&store, &query).unwrap();
        assert_eq!(ids(&found), vec!["s1"]);

        // teachers never pass a level filter
        let query = UserQuery::default().role("teacher").level("Advanced");
        assert!(search_users(&store, &query).unwrap().is_empty());
    }

    #[test]
    fn test_all_sentinel_is_no_constraint() {
        let store = directory();
        let query = UserQuery::default().role("all").level("all").module("all");
        assert_eq!(search_users(&store, &query).unwrap().len(), 5);
    }

    #[test]
    fn test_module_filter_keeps_assigned_teachers() {
        let store = directory();
        let found = search_users(&store, &UserQuery::default().module("module-001")).unwrap();
        assert_eq!(ids(&found), vec!["teacher-001"]);
        let found = search_users(&store, &UserQuery::default().module("module-003")).unwrap();
        assert_eq!(ids(&found), vec!["teacher-001", "teacher-002"]);
        let found = search_users(&store, &UserQuery::default().module("missing")).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_unknown_filter_values_are_malformed() {
        let store = directory();
        let err = search_users(&store, &UserQuery::default().role("owner")).unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));
        let err = search_users(&store, &UserQuery::default().level("expert")).unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));
    }

    #[test]
    fn test_storage_failure_surfaces() {
        let err = search_users(&failing_store(), &UserQuery::default()).unwrap_err();
        assert!(matches!(err, DataError::Storage(_)));
    }
}
