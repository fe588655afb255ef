/// A stored account as shown to its owner. The password never leaves the
/// store layer through this type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
}
