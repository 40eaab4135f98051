//! Base-relative paths of the directory API.

pub fn organizations() -> String {
    "directory/v1/org/".to_string()
}

pub fn users(org_id: &str) -> String {
    format!("directory/v1/org/{org_id}/users/")
}

pub fn user(org_id: &str, user_id: &str) -> String {
    format!("directory/v1/org/{org_id}/users/{user_id}")
}

pub fn user_contacts(org_id: &str, user_id: &str) -> String {
    format!("directory/v1/org/{org_id}/users/{user_id}/contacts/")
}

pub fn user_2fa(org_id: &str, user_id: &str) -> String {
    format!("directory/v1/org/{org_id}/users/{user_id}/2fa/")
}

pub fn user_aliases(org_id: &str, user_id: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => format!("directory/v1/org/{org_id}/users/{user_id}/aliases/{alias}"),
        None => format!("directory/v1/org/{org_id}/users/{user_id}/aliases/"),
    }
}

pub fn groups(org_id: &str) -> String {
    format!("directory/v1/org/{org_id}/groups/")
}

pub fn group(org_id: &str, group_id: &str) -> String {
    format!("directory/v1/org/{org_id}/groups/{group_id}")
}

pub fn group_members(org_id: &str, group_id: &str) -> String {
    format!("directory/v1/org/{org_id}/groups/{group_id}/members")
}

pub fn group_admins(org_id: &str, group_id: &str) -> String {
    format!("directory/v1/org/{org_id}/groups/{group_id}/admins")
}

pub fn departments(org_id: &str) -> String {
    format!("directory/v1/org/{org_id}/departments/")
}

pub fn department(org_id: &str, department_id: &str) -> String {
    format!("directory/v1/org/{org_id}/departments/{department_id}")
}

pub fn department_aliases(org_id: &str, department_id: &str, alias: Option<&str>) -> String {
    match alias {
        Some(alias) => {
            format!("directory/v1/org/{org_id}/departments/{department_id}/aliases/{alias}")
        }
        None => format!("directory/v1/org/{org_id}/departments/{department_id}/aliases"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_paths_end_with_slash() {
        assert_eq!(organizations(), "directory/v1/org/");
        assert_eq!(users("42"), "directory/v1/org/42/users/");
        assert_eq!(groups("42"), "directory/v1/org/42/groups/");
        assert_eq!(departments("42"), "directory/v1/org/42/departments/");
    }

    #[test]
    fn item_paths() {
        assert_eq!(user("42", "7"), "directory/v1/org/42/users/7");
        assert_eq!(group_members("42", "19"), "directory/v1/org/42/groups/19/members");
        assert_eq!(department("42", "11"), "directory/v1/org/42/departments/11");
        assert_eq!(user_2fa("42", "7"), "directory/v1/org/42/users/7/2fa/");
    }

    #[test]
    fn alias_paths() {
        assert_eq!(
            user_aliases("42", "7", None),
            "directory/v1/org/42/users/7/aliases/"
        );
        assert_eq!(
            user_aliases("42", "7", Some("boss")),
            "directory/v1/org/42/users/7/aliases/boss"
        );
        assert_eq!(
            department_aliases("42", "11", Some("sales")),
            "directory/v1/org/42/departments/11/aliases/sales"
        );
    }
}
