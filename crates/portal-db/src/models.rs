/// Database row type, mapped directly from the `users` table.
/// Distinct from the portal-types `User` view, which drops the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: String,
}
