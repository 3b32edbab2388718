/// Row-level lock requested for the selected rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lock {
    /// `FOR UPDATE`
    Update,

    /// `FOR SHARE`
    Share,
}
