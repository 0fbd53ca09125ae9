/// Custom actions for User entities.
#[derive(Debug, Clone)]
pub enum UserAction {
    /// Grants the admin role. Returns `true` if the role changed.
    PromoteToAdmin,
}
