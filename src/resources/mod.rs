pub mod departments;
pub mod groups;
pub mod listing;
pub mod organizations;
pub mod users;

pub use departments::Department;
pub use groups::{Group, GroupMember, GroupMembers, MemberType};
pub use listing::Listing;
pub use organizations::Organization;
pub use users::{User, UserContact, UserName, UserUpdate};

/// Page size used by the list helpers.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// The API is inconsistent about numeric vs string identifiers; records keep
/// every identifier as a string.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Str(String),
        Num(serde_json::Number),
    }

    impl RawId {
        fn into_string(self) -> String {
            match self {
                RawId::Str(s) => s,
                RawId::Num(n) => n.to_string(),
            }
        }
    }

    pub fn id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        RawId::deserialize(d).map(RawId::into_string)
    }

    pub fn opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(Option::<RawId>::deserialize(d)?.map(RawId::into_string))
    }

    pub fn ids<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(Option::<Vec<RawId>>::deserialize(d)?
            .unwrap_or_default()
            .into_iter()
            .map(RawId::into_string)
            .collect())
    }

    /// `null` or missing becomes an empty vector.
    pub fn vec_or_null<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
    }
}
